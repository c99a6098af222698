//! Directive value types and their canonical textual forms
// (c) 2024 Ross Younger

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use strum::VariantNames;

use super::FormatError;

/// Renders a boolean the only way sshd spells them
pub(crate) fn format_yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Parses `yes` or `no`. Case matters; nothing else is accepted.
pub(crate) fn parse_yes_no(token: &str) -> Result<bool, FormatError> {
    match token {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(FormatError::InvalidBoolean(other.into())),
    }
}

/// Invariant decimal parsing into whatever integer type the field uses.
/// Out-of-range values are rejected the same way as garbage.
pub(crate) fn parse_integer<T: FromStr>(token: &str) -> Result<T, FormatError> {
    token
        .parse::<T>()
        .map_err(|_| FormatError::InvalidInteger(token.into()))
}

/// Comma-joins, no whitespace
pub(crate) fn join_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits on commas, trimming each element. Empty elements are an error.
pub(crate) fn split_list<T>(value: &str) -> Result<Vec<T>, FormatError>
where
    T: FromStr<Err = FormatError>,
{
    value.split(',').map(T::from_str).collect()
}

/// Checks a free-text directive value (which may contain inner spaces) and returns it trimmed.
///
/// The value must survive being written after its keyword and read back: it can't be empty,
/// span lines, or start with `=` (which would be taken as the `Keyword=value` separator).
pub(crate) fn check_value(value: &str) -> Result<&str, FormatError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormatError::EmptyToken(value.into()));
    }
    if trimmed.starts_with('=') || trimmed.contains(['\n', '\r']) {
        return Err(FormatError::Unrepresentable(value.into()));
    }
    Ok(trimmed)
}

/// As [`check_value`], but the result must also be a single token: no whitespace and no commas.
pub(crate) fn check_token(value: &str) -> Result<&str, FormatError> {
    let trimmed = check_value(value)?;
    if trimmed.contains(|c: char| c.is_whitespace() || c == ',') {
        return Err(FormatError::NotAToken(value.into()));
    }
    Ok(trimmed)
}

///////////////////////////////////////////////////////////////////////////////////////

/// sshd logging verbosity (`LogLevel`)
///
/// Displays as the mixed-case variant name; parsing is case-insensitive.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum LogLevel {
    /// Nothing is logged
    Quiet,
    /// Fatal errors only
    Fatal,
    /// Errors
    Error,
    /// The sshd default
    #[default]
    Info,
    /// Verbose
    Verbose,
    /// Same as `Debug1`
    Debug,
    /// Debug level 1
    Debug1,
    /// Debug level 2
    Debug2,
    /// Debug level 3 (most verbose)
    Debug3,
}

impl LogLevel {
    /// Case-insensitive lookup of a log level token
    pub fn from_token(token: &str) -> Result<Self, FormatError> {
        Self::from_str(token).map_err(|_| FormatError::InvalidLogLevel {
            found: token.into(),
            expected: LogLevel::VARIANTS.join(", "),
        })
    }
}

///////////////////////////////////////////////////////////////////////////////////////

macro_rules! named_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Wraps a token, trimming surrounding whitespace.
            /// Empty tokens, and anything that isn't a single token, are rejected.
            pub fn new(token: &str) -> Result<Self, FormatError> {
                Ok(Self(check_token(token)?.into()))
            }

            /// The token itself
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = FormatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

named_token!(
    /// A cipher name, as used by `Ciphers`
    Cipher
);
named_token!(
    /// A host key signature algorithm, as used by `HostKeyAlgorithms`
    HostKeyAlgorithm
);
named_token!(
    /// A key exchange algorithm, as used by `KexAlgorithms`
    KexAlgorithm
);
named_token!(
    /// A message authentication code algorithm, as used by `MACs`
    MacAlgorithm
);

///////////////////////////////////////////////////////////////////////////////////////

/// An external subsystem (`Subsystem <name> <command>`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Subsystem {
    name: String,
    command: String,
}

impl Subsystem {
    /// Standard constructor.
    ///
    /// Both parts are trimmed. The name must be a single token; the command line is taken
    /// verbatim and may contain spaces, but can't be empty.
    pub fn new(name: &str, command: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedSubsystem(format!("{name} {command}"));
        let name = check_token(name).map_err(|_| malformed())?;
        let command = check_value(command).map_err(|_| malformed())?;
        Ok(Self {
            name: name.into(),
            command: command.into(),
        })
    }

    /// Subsystem name, e.g. `sftp`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command line to run
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.command)
    }
}

impl FromStr for Subsystem {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((name, command)) = s.split_once(char::is_whitespace) else {
            return Err(FormatError::MalformedSubsystem(s.into()));
        };
        Self::new(name, command)
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::str::FromStr as _;

    use anyhow::{anyhow, Context as _, Result};
    use assertables::assert_eq_as_result;

    use super::{
        check_token, check_value, format_yes_no, join_list, parse_integer, parse_yes_no,
        split_list, Cipher, LogLevel, Subsystem,
    };
    use crate::config::FormatError;

    #[test]
    fn booleans() {
        for b in [true, false] {
            let text = format_yes_no(b);
            assert!(text == "yes" || text == "no");
            assert_eq!(parse_yes_no(text).unwrap(), b);
        }
        for bad in ["Yes", "NO", "true", "1", "", "maybe"] {
            assert_eq!(
                parse_yes_no(bad).unwrap_err(),
                FormatError::InvalidBoolean(bad.into())
            );
        }
    }

    #[test]
    fn integers() {
        assert_eq!(parse_integer::<u16>("2222").unwrap(), 2222);
        let _ = parse_integer::<u16>("65536").expect_err("out of range");
        let _ = parse_integer::<u16>("22a").expect_err("not decimal");
        let _ = parse_integer::<u16>("2,222").expect_err("no separators");
        let _ = parse_integer::<u16>("-1").expect_err("negative");
    }

    #[test]
    fn log_levels() -> Result<()> {
        for (input, expected) in [
            ("INFO", LogLevel::Info),
            ("info", LogLevel::Info),
            ("Quiet", LogLevel::Quiet),
            ("DEBUG3", LogLevel::Debug3),
            ("verbose", LogLevel::Verbose),
        ] {
            assert_eq_as_result!(LogLevel::from_token(input)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        assert_eq!(LogLevel::Debug2.to_string(), "Debug2");
        assert_eq!(LogLevel::default(), LogLevel::Info);
        let err = LogLevel::from_token("chatty").unwrap_err();
        assert!(err.to_string().contains("Quiet, Fatal, Error, Info"));
        Ok(())
    }

    #[test]
    fn named_tokens() {
        let c = Cipher::new("  aes128-ctr ").unwrap();
        assert_eq!(c.as_str(), "aes128-ctr");
        assert_eq!(c, Cipher::from_str("aes128-ctr").unwrap());
        let _ = Cipher::new("   ").expect_err("empty token");
    }

    #[test]
    fn lists() {
        let list: Vec<Cipher> =
            split_list("aes128-ctr, aes256-ctr ,chacha20-poly1305@openssh.com").unwrap();
        assert_eq!(
            join_list(&list),
            "aes128-ctr,aes256-ctr,chacha20-poly1305@openssh.com"
        );
        let _ = split_list::<Cipher>("aes128-ctr,,aes256-ctr").expect_err("empty element");
        assert_eq!(join_list(Vec::<Cipher>::new()), "");
    }

    #[test]
    fn subsystems() {
        let s = Subsystem::from_str("sftp   /usr/lib/openssh/sftp-server -l INFO").unwrap();
        assert_eq!(s.name(), "sftp");
        assert_eq!(s.command(), "/usr/lib/openssh/sftp-server -l INFO");
        assert_eq!(s.to_string(), "sftp /usr/lib/openssh/sftp-server -l INFO");
        let _ = Subsystem::from_str("sftp").expect_err("no command");
        let _ = Subsystem::from_str("sftp   ").expect_err("no command");
    }

    #[test]
    fn subsystem_constructor_checks_its_parts() -> Result<()> {
        let s = Subsystem::new("  sftp ", " internal-sftp -u 077 ")?;
        assert_eq!(s.name(), "sftp");
        assert_eq!(s.command(), "internal-sftp -u 077");
        for (name, command) in [
            ("sftp", ""),
            ("sftp", "   "),
            ("", "/bin/x"),
            (" a b", "x"),
            ("a,b", "x"),
            ("=sftp", "x"),
            ("sftp", "x\nPort 1"),
        ] {
            let err = Subsystem::new(name, command).unwrap_err();
            assert_eq_as_result!(
                matches!(err, FormatError::MalformedSubsystem(_)),
                true
            )
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("input {name:?} {command:?} failed"))?;
        }
        Ok(())
    }

    #[test]
    fn tokens_and_values() -> Result<()> {
        assert_eq!(check_value("  publickey,password publickey ")?, "publickey,password publickey");
        assert_eq!(check_token(" LC_* ")?, "LC_*");
        for (input, token_ok, value_ok) in [
            ("LANG", true, true),
            ("", false, false),
            ("   ", false, false),
            ("LANG LC_*", false, true),
            ("a,b", false, true),
            ("a\tb", false, true),
            ("=LANG", false, false),
            ("LANG=C", true, true),
            ("a\nb", false, false),
            ("a\r", true, true), // trailing line ending is trimmed
        ] {
            assert_eq_as_result!(
                (check_token(input).is_ok(), check_value(input).is_ok()),
                (token_ok, value_ok)
            )
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("input {input:?} failed"))?;
        }
        assert_eq!(
            check_token("").unwrap_err(),
            FormatError::EmptyToken(String::new())
        );
        assert_eq!(
            check_token("a b").unwrap_err(),
            FormatError::NotAToken("a b".into())
        );
        Ok(())
    }

    #[test]
    fn named_tokens_are_single_tokens() {
        let _ = Cipher::new("aes128-ctr aes256-ctr").expect_err("whitespace");
        let _ = Cipher::new("aes128-ctr,aes256-ctr").expect_err("comma");
        let _ = split_list::<Cipher>("aes128-ctr aes256-ctr").expect_err("whitespace");
    }
}
