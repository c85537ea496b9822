//! CLI command implementations

pub mod catalog;
pub mod clean;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
