//! Menu registry: named menu definitions registered at startup and turned into
//! (content, keyboard) pairs at request time.

use std::collections::HashMap;
use std::sync::RwLock;

use notify_core::{InlineButton, InlineKeyboard, NotifyError, Result};

use crate::keyboard::chunk_rows;

/// Callback-data prefix for buttons that navigate to another registered menu.
pub const MENU_CALLBACK_PREFIX: &str = "menu:";

/// One button of a menu definition.
#[derive(Debug, Clone)]
pub enum MenuButton {
    /// Opens an external link.
    Url { text: String, url: String },
    /// Emits raw callback data handled by the application.
    Callback { text: String, data: String },
    /// Navigates to another registered menu.
    Menu { text: String, name: String },
}

/// A named menu registered at startup; read-only at request time.
#[derive(Debug, Clone)]
pub struct MenuDefinition {
    /// Message text, or photo caption when a banner is set.
    pub text: String,
    pub buttons: Vec<MenuButton>,
    /// Remote file id of the banner photo, when the menu has one.
    pub banner: Option<String>,
    /// Buttons per keyboard row; the last size repeats.
    pub layout: Vec<usize>,
}

/// What a menu renders to: a plain text message or a photo with caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuContent {
    Text(String),
    Photo { file_id: String, caption: String },
}

/// Registry of menu definitions keyed by name.
#[derive(Default)]
pub struct MenuRegistry {
    menus: RwLock<HashMap<String, MenuDefinition>>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a menu under a unique name. Re-registering a name is rejected
    /// rather than silently overwriting.
    pub fn register(&self, name: &str, definition: MenuDefinition) -> Result<()> {
        if name.is_empty() {
            return Err(NotifyError::Config("menu name must be non-empty".into()));
        }

        let mut menus = self.menus.write().expect("menu registry lock poisoned");
        if menus.contains_key(name) {
            return Err(NotifyError::MenuAlreadyRegistered(name.to_string()));
        }
        menus.insert(name.to_string(), definition);
        Ok(())
    }

    /// Builds the content and keyboard for a registered menu.
    pub fn create(&self, name: &str) -> Result<(MenuContent, InlineKeyboard)> {
        let menus = self.menus.read().expect("menu registry lock poisoned");
        let definition = menus
            .get(name)
            .ok_or_else(|| NotifyError::MenuNotRegistered(name.to_string()))?;

        let buttons = definition
            .buttons
            .iter()
            .map(|button| match button {
                MenuButton::Url { text, url } => InlineButton::url(text.clone(), url.clone()),
                MenuButton::Callback { text, data } => {
                    InlineButton::callback(text.clone(), data.clone())
                }
                MenuButton::Menu { text, name } => InlineButton::callback(
                    text.clone(),
                    format!("{}{}", MENU_CALLBACK_PREFIX, name),
                ),
            })
            .collect();

        let keyboard = chunk_rows(buttons, &definition.layout);

        let content = match &definition.banner {
            Some(file_id) => MenuContent::Photo {
                file_id: file_id.clone(),
                caption: definition.text.clone(),
            },
            None => MenuContent::Text(definition.text.clone()),
        };

        Ok((content, keyboard))
    }
}

/// Extracts the target menu name from navigation callback data.
pub fn menu_name(data: &str) -> Option<&str> {
    data.strip_prefix(MENU_CALLBACK_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::ButtonAction;

    fn main_menu() -> MenuDefinition {
        MenuDefinition {
            text: "Main menu".into(),
            buttons: vec![
                MenuButton::Menu {
                    text: "Settings".into(),
                    name: "settings".into(),
                },
                MenuButton::Url {
                    text: "Site".into(),
                    url: "https://example.com".into(),
                },
            ],
            banner: None,
            layout: vec![1],
        }
    }

    #[test]
    fn test_register_and_create() {
        let registry = MenuRegistry::new();
        registry.register("main", main_menu()).unwrap();

        let (content, keyboard) = registry.create("main").unwrap();
        assert_eq!(content, MenuContent::Text("Main menu".into()));
        assert_eq!(keyboard.rows.len(), 2);
        match &keyboard.rows[0][0].action {
            ButtonAction::Callback(data) => assert_eq!(data, "menu:settings"),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = MenuRegistry::new();
        registry.register("main", main_menu()).unwrap();

        let err = registry.register("main", main_menu()).unwrap_err();
        assert!(matches!(err, NotifyError::MenuAlreadyRegistered(name) if name == "main"));

        // The original definition survives.
        let (content, _) = registry.create("main").unwrap();
        assert_eq!(content, MenuContent::Text("Main menu".into()));
    }

    #[test]
    fn test_banner_selects_photo_content() {
        let registry = MenuRegistry::new();
        let mut definition = main_menu();
        definition.banner = Some("file-123".into());
        registry.register("main", definition).unwrap();

        let (content, _) = registry.create("main").unwrap();
        assert_eq!(
            content,
            MenuContent::Photo {
                file_id: "file-123".into(),
                caption: "Main menu".into(),
            }
        );
    }

    #[test]
    fn test_unregistered_menu_is_error() {
        let registry = MenuRegistry::new();
        assert!(matches!(
            registry.create("ghost").unwrap_err(),
            NotifyError::MenuNotRegistered(name) if name == "ghost"
        ));
    }

    #[test]
    fn test_menu_name_parsing() {
        assert_eq!(menu_name("menu:settings"), Some("settings"));
        assert_eq!(menu_name("delete_notification_1"), None);
    }
}
