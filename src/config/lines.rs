//! Line parsing internals
// (c) 2024 Ross Younger

use std::collections::BTreeSet;

use regex::Regex;

use super::FormatError;

#[derive(Debug, PartialEq)]
/// A tokenized line from an sshd config file
pub(super) enum Line {
    /// Blank or comment
    Empty,
    /// Opens a new Match block
    Match {
        users: BTreeSet<String>,
        addresses: BTreeSet<String>,
    },
    Directive {
        keyword: String, /* as written */
        value: String,
    },
}

/// `Match [User <list>] [Address <list>]`
const MATCH_PATTERN: &str =
    r"(?i)^match(?:\s+user\s+(?P<users>\S+))?(?:\s+address\s+(?P<addresses>\S+))?$";

/// Splits lines into a [`Line`]. Holds the compiled Match grammar.
#[derive(Debug)]
pub(super) struct Tokenizer {
    match_line: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            match_line: Regex::new(MATCH_PATTERN).expect("Invalid Match line regex"),
        }
    }
}

impl Tokenizer {
    pub(super) fn tokenize(&self, line: &str) -> Result<Line, FormatError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Line::Empty);
        }
        if let Some(caps) = self.match_line.captures(line) {
            let users = caps
                .name("users")
                .map_or(Ok(BTreeSet::new()), |m| split_patterns(m.as_str(), line))?;
            let addresses = caps
                .name("addresses")
                .map_or(Ok(BTreeSet::new()), |m| split_patterns(m.as_str(), line))?;
            return Ok(Line::Match { users, addresses });
        }

        // The keyword ends at the first whitespace or `=` (sshd accepts `Key=Value`)
        let (keyword, rest) = line
            .split_once(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or((line, ""));
        if keyword.eq_ignore_ascii_case("match") {
            return Err(FormatError::MalformedMatch(line.into()));
        }
        let rest = rest.trim_start();
        let value = rest.strip_prefix('=').unwrap_or(rest).trim();
        if value.is_empty() {
            return Err(FormatError::MissingValue(keyword.into()));
        }
        Ok(Line::Directive {
            keyword: keyword.into(),
            value: value.into(),
        })
    }
}

fn split_patterns(list: &str, line: &str) -> Result<BTreeSet<String>, FormatError> {
    list.split(',')
        .map(|p| {
            let p = p.trim();
            if p.is_empty() {
                Err(FormatError::MalformedMatch(line.into()))
            } else {
                Ok(p.to_string())
            }
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////////////
