//! SatLens Session - Upload/analysis and chat state machines
//!
//! Each session owns its state exclusively. Front-ends drive a session through
//! its methods and render from its accessors or from the progress channel.

pub mod chat;
pub mod preview;
pub mod progress;
pub mod upload;

// Re-export main types
pub use chat::{ChatSession, ChatState, DemoResponder, LiveResponder, Responder};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use progress::{Pacing, ProgressSimulator, ProgressSnapshot};
pub use upload::{UploadSession, UploadState};
