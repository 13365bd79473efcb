//! Command implementations.

pub mod configure;
pub mod dedup;
pub mod process;

pub use self::configure::execute_config;
pub use self::dedup::execute_dedup;
pub use self::process::execute_process;
