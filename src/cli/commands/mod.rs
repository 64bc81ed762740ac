pub mod capture;
pub mod config;
pub mod init;
pub mod list;
pub mod log;
pub mod pending;
pub mod remote;
pub mod sync;
pub mod watch;
