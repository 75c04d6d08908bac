pub mod clipboard;
pub mod colors;
pub mod presenter;
pub mod prompt;
pub mod spinner;
pub mod terminal;

pub use clipboard::{Clipboard, SystemClipboard};
pub use colors::*;
pub use presenter::{CommitReport, MessageAction, Notice, Presenter, SplitChoice};
pub use prompt::*;
pub use spinner::Spinner;
pub use terminal::TerminalPresenter;
