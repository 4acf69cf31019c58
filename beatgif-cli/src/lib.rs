// beatgif-cli/src/lib.rs
//
// Library portion of the beatgif CLI application.
// Contains argument definitions, terminal output and command logic.

pub mod cli;
pub mod commands;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::convert::run_convert;
