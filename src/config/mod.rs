// (c) 2024 Ross Younger
//! # sshd configuration files
//!
//! This module reads and writes the OpenSSH server configuration format (`sshd_config`),
//! for the subset of directives modelled by [Configuration].
//!
//! ## File format
//!
//! A textual `Keyword value` format, one directive per line.
//! Blank lines and lines starting with `#` are ignored.
//! Keywords are case-insensitive and may also be written `Keyword=value`.
//!
//! A `Match` line opens a conditional block. Every directive after it, up to the next
//! `Match` line or the end of the file, belongs to that block.
//!
//! ### Example
//!
//! ```text
//! Protocol 2
//! Port 2222
//! LogLevel VERBOSE
//! Subsystem sftp /usr/lib/openssh/sftp-server
//! UsePAM yes
//! AcceptEnv LANG LC_*
//! Ciphers aes128-ctr,aes256-ctr
//!
//! Match User alice,bob Address 10.0.0.0/8
//!     AuthenticationMethods publickey
//! ```
//!
//! ## Parsing
//!
//! [Parser] reads from a file, any reader, or a string. Parsing is strict: an unknown directive,
//! or a value that doesn't fit its directive's type, fails the whole parse with an [Error]
//! naming the source and line. A handful of common legacy directives (`PermitRootLogin`,
//! `LoginGraceTime` and friends) are accepted and discarded at global scope.
//!
//! ### Traps and tips
//! 1. `Ciphers`, `HostKeyAlgorithms`, `KexAlgorithms` and `MACs` are replaced each time they appear:
//!    the last one wins.
//! 1. `AcceptEnv` and `Subsystem` accumulate.
//! 1. Inside a `Match` block only `AuthenticationMethods` is understood.
//!
//! ## Writing
//!
//! [serialize] (or `Display`) renders the directives in a fixed order, with `Match` blocks last.
//! Directives at their defaults are written out explicitly; empty algorithm lists are omitted.
//! Output always parses back to an equal [Configuration].

mod errors;
pub use errors::{Error, FormatError, Scope};

mod values;
pub use values::{Cipher, HostKeyAlgorithm, KexAlgorithm, LogLevel, MacAlgorithm, Subsystem};

mod matching;
pub use matching::MatchBlock;

mod structure;
pub use structure::Configuration;

mod directives;
mod lines;

mod parser;
pub use parser::{parse_str, Parser};

mod writer;
pub use writer::serialize;

mod pretty;
pub use pretty::DisplayAdapter;
