//! wikiqa core library
//!
//! Foundational pieces shared by every wikiqa crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
