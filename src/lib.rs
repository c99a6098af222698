//! Typed model, parser and writer for OpenSSH server configuration files
// (c) 2024 Ross Younger

//! The interesting parts live in [config]:
//!
//! ```
//! use sshdconf::config::{parse_str, serialize, LogLevel};
//!
//! let config = parse_str("Port 2222\nLogLevel verbose\n").unwrap();
//! assert_eq!(config.port, 2222);
//! assert_eq!(config.log_level, LogLevel::Verbose);
//! assert!(serialize(&config).contains("LogLevel Verbose\n"));
//! ```

mod cli;
pub use cli::cli;
/// sshd configuration model, parser and writer
pub mod config;
/// Utilities
pub mod util;
