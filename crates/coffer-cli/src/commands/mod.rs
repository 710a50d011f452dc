//! Command handlers, one module per area.

pub mod accounts;
pub mod backups;
pub mod init;
pub mod keys;
pub mod misc;
