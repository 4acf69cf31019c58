//! Command implementations for the CLI.

/// Converts one clip into its archive and collection GIFs.
pub mod convert;
