/*!
 * System clipboard capability.
 *
 * Only available with the `clipboard` feature; without it the host reports
 * no clipboard and copy requests are skipped.
 */

use std::sync::Arc;

use super::Clipboard;

#[cfg(feature = "clipboard")]
mod system {
    use async_trait::async_trait;
    use cli_clipboard::{ClipboardContext, ClipboardProvider};

    use crate::capabilities::Clipboard;
    use crate::errors::CapabilityError;

    /// Clipboard backed by the desktop clipboard
    #[derive(Debug, Default)]
    pub struct SystemClipboard;

    #[async_trait]
    impl Clipboard for SystemClipboard {
        async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
            let text = text.to_string();

            tokio::task::spawn_blocking(move || {
                let mut ctx = ClipboardContext::new()
                    .map_err(|e| CapabilityError::Rejected(e.to_string()))?;
                ctx.set_contents(text)
                    .map_err(|e| CapabilityError::CallFailed(e.to_string()))
            })
            .await
            .map_err(|e| CapabilityError::CallFailed(e.to_string()))?
        }
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

/// The system clipboard, when compiled in
#[cfg(feature = "clipboard")]
pub fn system_clipboard() -> Option<Arc<dyn Clipboard>> {
    Some(Arc::new(SystemClipboard))
}

/// The system clipboard, when compiled in
#[cfg(not(feature = "clipboard"))]
pub fn system_clipboard() -> Option<Arc<dyn Clipboard>> {
    None
}
