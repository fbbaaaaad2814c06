//! Command handlers for the wikiqa CLI.

pub mod ask;
pub mod serve;

pub use ask::AskCommand;
pub use serve::ServeCommand;
