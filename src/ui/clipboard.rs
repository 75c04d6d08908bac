//! System clipboard access for the "copy message" action.

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where a copied commit message goes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard, through arboard.
///
/// The handle is opened on first use and kept, since on X11 the selection
/// is only served while its owner is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.handle.as_mut() {
            Some(clipboard) => clipboard,
            None => self.handle.insert(arboard::Clipboard::new()?),
        };
        clipboard.set_text(text)?;
        Ok(())
    }
}
