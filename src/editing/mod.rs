// Edit session - image edits with a linear undo history

pub mod catalog;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod service;
pub mod session;
pub mod types;

pub use config::{RetouchConfig, ServiceConfig};
pub use controller::EditController;
pub use error::{EditorError, ErrorKind, Result};
pub use history::EditHistory;
pub use service::{EditService, GeminiEditService, ServiceError};
pub use session::EditSession;
pub use types::*;
