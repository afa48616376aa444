//! Notification host-service adapter for browser contexts.

use platform_host::{NotificationFuture, NotificationLevel, NotificationService};

const NOTIFICATION_TITLE: &str = "DropVault";

#[derive(Debug, Clone, Copy, Default)]
/// Browser notification adapter.
///
/// Every message goes to the developer console; when the user has granted permission it is also
/// shown through the Web Notifications API.
pub struct WebNotificationService;

impl NotificationService for WebNotificationService {
    fn notify<'a>(
        &'a self,
        level: NotificationLevel,
        message: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                use wasm_bindgen::JsValue;

                let line = JsValue::from_str(&format!("[{}] {message}", level.as_str()));
                match level {
                    NotificationLevel::Warning | NotificationLevel::Error => {
                        web_sys::console::warn_1(&line)
                    }
                    NotificationLevel::Info | NotificationLevel::Success => {
                        web_sys::console::log_1(&line)
                    }
                }

                if web_sys::Notification::permission() != web_sys::NotificationPermission::Granted
                {
                    return Ok(());
                }
                web_sys::Notification::new(&format!("{NOTIFICATION_TITLE}: {message}"))
                    .map(|_| ())
                    .map_err(|err: JsValue| format!("notification dispatch failed: {err:?}"))
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = (level, message, NOTIFICATION_TITLE);
                Ok(())
            }
        })
    }
}
