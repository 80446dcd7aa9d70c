//! Session plumbing for the `docqa` binary: upload staging, chat history and
//! the engine wrapper the commands drive.

pub mod chat;
pub mod history;
pub mod logging;
pub mod session;
pub mod upload;

pub use history::{ChatHistory, ChatTurn};
pub use session::{DocumentInfo, Session};
pub use upload::StagedUpload;
