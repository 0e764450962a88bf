//! CLI subcommands.

pub mod check;
pub mod fix;
pub mod init;
pub mod sanitize;
pub mod serve;
pub mod sources;
