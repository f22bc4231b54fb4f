use tokio::time::sleep;

use notify_core::{EventContext, NotificationContext, NotifyError, Result, Transport};

use super::best_effort_delete;

/// Sends a plain text message and deletes it after the configured delay. The
/// deletion is best-effort: the message may already be gone.
pub(crate) async fn auto_expire(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
) -> Result<()> {
    let chat_id = event.chat_id();
    let text = ctx
        .text
        .as_deref()
        .ok_or_else(|| NotifyError::Config("auto-expire notification requires text".into()))?;

    let sent = transport.send_text(chat_id, text, None).await?;

    sleep(ctx.delay).await;
    best_effort_delete(transport, chat_id, sent.message_id).await;
    Ok(())
}
