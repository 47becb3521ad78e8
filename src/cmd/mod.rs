pub mod completions;
pub mod config;
pub mod dose;
pub mod init;
pub mod intake;
pub mod med;
pub mod schedule;
pub mod upcoming;
