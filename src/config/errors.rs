//! Error types
// (c) 2024 Ross Younger

use std::fmt::Display;

/// The directive context a line was read in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Outside of any `Match` block
    Global,
    /// Inside a `Match` block
    Match,
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => f.write_str("global scope"),
            Scope::Match => f.write_str("Match block"),
        }
    }
}

/// Something wrong with the content of a single line.
///
/// These never carry location information; the parser wraps them into [`Error::Format`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The directive name is not one we recognise in this scope
    #[error("unknown directive `{keyword}` in {scope}")]
    UnknownDirective {
        /// The directive name, as written
        keyword: String,
        /// Where it was found
        scope: Scope,
    },
    /// A directive appeared without a value
    #[error("missing value for directive `{0}`")]
    MissingValue(String),
    /// Booleans must be exactly `yes` or `no`
    #[error("invalid boolean `{0}` (expected `yes` or `no`)")]
    InvalidBoolean(String),
    /// Not a decimal integer, or out of range for the field
    #[error("invalid integer `{0}`")]
    InvalidInteger(String),
    /// Not one of the named log levels
    #[error("unknown log level `{found}`, expected one of: {expected}")]
    InvalidLogLevel {
        /// The token we read
        found: String,
        /// The accepted values, for display
        expected: String,
    },
    /// A `Match` line that doesn't fit `Match [User <list>] [Address <list>]`
    #[error("malformed Match condition `{0}`")]
    MalformedMatch(String),
    /// A `Subsystem` value without a command
    #[error("malformed subsystem `{0}` (expected `<name> <command>`)")]
    MalformedSubsystem(String),
    /// A list element or single-token value that is empty once trimmed
    #[error("empty value in `{0}`")]
    EmptyToken(String),
    /// A value that needs to be one token contains whitespace, a comma or a line break
    #[error("`{0}` is not a single token")]
    NotAToken(String),
    /// A value that would not read back the same once written (line breaks, leading `=`)
    #[error("`{0}` cannot be written as a directive value")]
    Unrepresentable(String),
}

/// Errors arising from reading a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The content could not be understood
    #[error("{source_name} line {line_number}: {kind}")]
    Format {
        /// Where the content came from (a filename, or a placeholder)
        source_name: String,
        /// 1-based line number
        line_number: usize,
        /// What was wrong
        kind: FormatError,
    },
    /// The content could not be read (includes text that is not valid UTF-8)
    #[error("reading {source_name}")]
    Io {
        /// Where the content came from
        source_name: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The underlying format problem, if this was one
    #[must_use]
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Error::Format { kind, .. } => Some(kind),
            Error::Io { .. } => None,
        }
    }
}
