pub mod args;
pub mod commands;
pub mod session;

pub use args::Args;
pub use commands::CliApp;
