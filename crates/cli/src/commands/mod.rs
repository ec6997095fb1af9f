//! Subcommand implementations

pub mod analyze;
pub mod cost;
pub mod init;
pub mod load;
pub mod sites;
