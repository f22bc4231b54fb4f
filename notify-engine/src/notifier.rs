//! The notifier: one entry point that resolves an intent to its workflow.

use std::sync::Arc;

use sqlx::SqliteConnection;
use tracing::debug;

use notify_core::{
    EventContext, MediaRef, NotificationContext, NotificationIntent, NotifyError, Result,
    Transport,
};

use crate::menu::{MenuContent, MenuRegistry};
use crate::workflows;

/// Dispatches notification requests to their workflows over an injected
/// transport and the tracking store.
///
/// All state a workflow touches is passed in: the transport is a shared trait
/// object, the store connection comes from the caller so several workflow calls
/// can share one transaction.
pub struct Notifier {
    transport: Arc<dyn Transport>,
    menus: Arc<MenuRegistry>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn Transport>, menus: Arc<MenuRegistry>) -> Self {
        Self { transport, menus }
    }

    pub fn menus(&self) -> &MenuRegistry {
        &self.menus
    }

    /// Runs the workflow for `intent`.
    ///
    /// Rejects a context that carries both a prebuilt keyboard and raw
    /// button/callback grids before any transport or store side effect.
    pub async fn send(
        &self,
        intent: NotificationIntent,
        event: &EventContext,
        ctx: &NotificationContext,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        if ctx.keyboard.is_some() && (ctx.button_text.is_some() || ctx.callback_data.is_some()) {
            return Err(NotifyError::ConflictingKeyboard);
        }

        debug!(?intent, chat_id = event.chat_id(), "Dispatching notification");

        let transport = self.transport.as_ref();
        match intent {
            NotificationIntent::AutoExpire => workflows::auto_expire(transport, event, ctx).await,
            NotificationIntent::Info => workflows::info(transport, event, ctx, conn).await,
            NotificationIntent::InvalidInput => {
                workflows::invalid_input(transport, event, ctx, conn).await
            }
            NotificationIntent::InvalidMediaGroup => {
                workflows::invalid_media_group(transport, event, ctx).await
            }
            NotificationIntent::StartMenu => {
                workflows::start_menu(transport, event, ctx, conn).await
            }
            NotificationIntent::EditMenu => workflows::edit_menu(transport, event, ctx, conn).await,
            NotificationIntent::CloseMenu => workflows::close_menu(transport, event, conn).await,
            NotificationIntent::CloseNotification => {
                workflows::close_notification(transport, event, conn).await
            }
            NotificationIntent::Dialog => workflows::dialog(transport, event, ctx, conn).await,
            NotificationIntent::Media
            | NotificationIntent::MediaApart
            | NotificationIntent::MediaGroup => {
                workflows::media(transport, event, ctx, conn).await
            }
        }
    }

    /// Dismisses one tracked notification by its correlation key. Returns
    /// whether a record was found and closed.
    pub async fn dismiss(&self, key: &str, conn: &mut SqliteConnection) -> Result<bool> {
        workflows::dismiss(self.transport.as_ref(), key, conn).await
    }

    /// Renders a registered menu and launches it, replacing the triggering
    /// message.
    pub async fn show_menu(
        &self,
        name: &str,
        event: &EventContext,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let ctx = self.menu_context(name)?;
        self.send(NotificationIntent::StartMenu, event, &ctx, conn)
            .await
    }

    /// Renders a registered menu and edits the active menu message to it.
    pub async fn switch_menu(
        &self,
        name: &str,
        event: &EventContext,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let ctx = self.menu_context(name)?;
        self.send(NotificationIntent::EditMenu, event, &ctx, conn)
            .await
    }

    fn menu_context(&self, name: &str) -> Result<NotificationContext> {
        let (content, keyboard) = self.menus.create(name)?;
        let ctx = NotificationContext::new().keyboard(keyboard);
        Ok(match content {
            MenuContent::Text(text) => ctx.text(text),
            MenuContent::Photo { file_id, caption } => ctx
                .media(MediaRef::Photo(file_id))
                .text(caption.clone())
                .media_caption(caption),
        })
    }
}
