pub mod error;

pub use error::{ErrorCode, RefineError, Result};
