mod engine;
mod error;
mod types;

pub use engine::{Engine, detect_format};
pub use error::{CoreError, CoreErrorCode};
pub use types::{ParseIssue, Sheet, SheetFormat};
