//! Match blocks
// (c) 2024 Ross Younger

use std::{collections::BTreeSet, net::IpAddr};

use serde::Serialize;

use super::{
    values::{check_token, check_value},
    FormatError,
};

/// A conditional section of the configuration (`Match User ... Address ...`).
///
/// Either pattern set may be empty, in which case that criterion does not constrain the match.
/// Patterns are single tokens (no whitespace, no commas); the builder methods enforce this.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchBlock {
    pub(crate) user_patterns: BTreeSet<String>,
    pub(crate) address_patterns: BTreeSet<String>,
    pub(crate) authentication_methods: Option<String>,
}

fn check_patterns<I, S>(patterns: I) -> Result<Vec<String>, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| check_token(p.as_ref()).map(String::from))
        .collect()
}

impl MatchBlock {
    /// Creates an unconditional block with no directives
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds user patterns.
    ///
    /// Nothing is added if any of them is empty or not a single token.
    pub fn with_users<I, S>(mut self, users: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.user_patterns.extend(check_patterns(users)?);
        Ok(self)
    }

    /// Adds address patterns.
    ///
    /// Nothing is added if any of them is empty or not a single token.
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.address_patterns.extend(check_patterns(addresses)?);
        Ok(self)
    }

    /// Sets `AuthenticationMethods`, builder style
    pub fn with_authentication_methods(mut self, methods: &str) -> Result<Self, FormatError> {
        self.set_authentication_methods(methods)?;
        Ok(self)
    }

    /// Sets `AuthenticationMethods`.
    /// The value is trimmed; it may contain spaces (alternative method lists) but not line breaks.
    pub fn set_authentication_methods(&mut self, methods: &str) -> Result<(), FormatError> {
        self.authentication_methods = Some(check_value(methods)?.into());
        Ok(())
    }

    /// Patterns matched against the connecting user name
    #[must_use]
    pub fn user_patterns(&self) -> &BTreeSet<String> {
        &self.user_patterns
    }

    /// Patterns matched against the connecting client address
    #[must_use]
    pub fn address_patterns(&self) -> &BTreeSet<String> {
        &self.address_patterns
    }

    /// `AuthenticationMethods`, if set within this block
    #[must_use]
    pub fn authentication_methods(&self) -> Option<&str> {
        self.authentication_methods.as_deref()
    }

    /// Does this block apply to a connection from `user` at `address`?
    ///
    /// Each criterion is a pattern list in the sshd style: `*` and `?` wildcards,
    /// and a leading `!` negates. A negated hit rejects outright; otherwise any
    /// positive hit accepts. Address patterns may also be given in CIDR
    /// notation (`10.0.0.0/8`).
    #[must_use]
    pub fn matches(&self, user: &str, address: &str) -> bool {
        (self.user_patterns.is_empty()
            || evaluate_pattern_list(user, &self.user_patterns, wildcard_match))
            && (self.address_patterns.is_empty()
                || evaluate_pattern_list(address, &self.address_patterns, address_match))
    }
}

fn evaluate_pattern_list(
    candidate: &str,
    patterns: &BTreeSet<String>,
    matcher: fn(&str, &str) -> bool,
) -> bool {
    let mut matched = false;
    for pattern in patterns {
        if let Some(negated) = pattern.strip_prefix('!') {
            if matcher(candidate, negated) {
                return false;
            }
        } else if matcher(candidate, pattern) {
            matched = true;
        }
    }
    matched
}

fn wildcard_match(candidate: &str, pattern: &str) -> bool {
    wildmatch::WildMatch::new(pattern).matches(candidate)
}

fn address_match(candidate: &str, pattern: &str) -> bool {
    match pattern.split_once('/') {
        Some((network, prefix)) => cidr_contains(network, prefix, candidate),
        None => wildcard_match(candidate, pattern),
    }
}

fn cidr_contains(network: &str, prefix: &str, candidate: &str) -> bool {
    let (Ok(network), Ok(prefix), Ok(candidate)) = (
        network.parse::<IpAddr>(),
        prefix.parse::<u32>(),
        candidate.parse::<IpAddr>(),
    ) else {
        return false;
    };
    match (network, candidate) {
        (IpAddr::V4(n), IpAddr::V4(c)) => {
            prefix_matches(u32::from(n).into(), u32::from(c).into(), prefix, 32)
        }
        (IpAddr::V6(n), IpAddr::V6(c)) => prefix_matches(n.into(), c.into(), prefix, 128),
        _ => false,
    }
}

fn prefix_matches(network: u128, candidate: u128, prefix: u32, width: u32) -> bool {
    if prefix > width {
        return false;
    }
    if prefix == 0 {
        return true;
    }
    let shift = width - prefix;
    (network >> shift) == (candidate >> shift)
}

///////////////////////////////////////////////////////////////////////////////////////
