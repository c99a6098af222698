//! Configuration structure
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{
    values::{check_token, check_value},
    Cipher, FormatError, HostKeyAlgorithm, KexAlgorithm, LogLevel, MacAlgorithm, MatchBlock,
    Subsystem,
};

/// The settings of an sshd configuration file that we model.
///
/// **Note:** The implementation of `default()` for this struct returns the defaults
/// which apply when a directive is absent from the file.
///
/// Numeric, boolean and enumerated settings are plain public fields.
/// Everything else is private and changes only through methods which check that the value
/// can be written out and read back: `add_*` (which accumulate) and `set_*` (which replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// `Port` [default: 22]
    pub port: u16,
    pub(crate) host_key_file: Option<PathBuf>,
    /// `ChallengeResponseAuthentication` [default: no]
    pub challenge_response_authentication: bool,
    /// `LogLevel` [default: Info]
    pub log_level: LogLevel,
    /// `UsePAM` [default: yes]
    pub use_pam: bool,
    /// `UsePrivilegeSeparation` [default: yes]
    pub use_privilege_separation: bool,
    /// `X11Forwarding` [default: no]
    pub x11_forwarding: bool,
    /// `PrintMotd` [default: no]
    pub print_motd: bool,

    pub(crate) protocol_versions: String,
    accepted_environment_variables: Vec<String>,
    subsystems: Vec<Subsystem>,
    ciphers: Vec<Cipher>,
    host_key_algorithms: Vec<HostKeyAlgorithm>,
    key_exchange_algorithms: Vec<KexAlgorithm>,
    mac_algorithms: Vec<MacAlgorithm>,
    match_blocks: Vec<MatchBlock>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            port: 22,
            host_key_file: None,
            challenge_response_authentication: false,
            log_level: LogLevel::Info,
            use_pam: true,
            use_privilege_separation: true,
            protocol_versions: "2,1".into(),
            x11_forwarding: false,
            print_motd: false,
            accepted_environment_variables: Vec::new(),
            subsystems: Vec::new(),
            ciphers: Vec::new(),
            host_key_algorithms: Vec::new(),
            key_exchange_algorithms: Vec::new(),
            mac_algorithms: Vec::new(),
            match_blocks: Vec::new(),
        }
    }
}

impl Configuration {
    // CHECKED SCALARS =============================================================================

    /// `Protocol`, as a raw value [default: `2,1`]
    #[must_use]
    pub fn protocol_versions(&self) -> &str {
        &self.protocol_versions
    }
    /// Sets `Protocol`. The value is trimmed and can't be empty.
    pub fn set_protocol_versions(&mut self, versions: &str) -> Result<(), FormatError> {
        self.protocol_versions = check_value(versions)?.into();
        Ok(())
    }

    /// `HostKey` (not emitted if unset)
    #[must_use]
    pub fn host_key_file(&self) -> Option<&Path> {
        self.host_key_file.as_deref()
    }
    /// Sets `HostKey`. The path must be valid UTF-8, non-empty and on one line.
    pub fn set_host_key_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), FormatError> {
        let path = path.as_ref();
        let text = path
            .to_str()
            .ok_or_else(|| FormatError::Unrepresentable(path.to_string_lossy().into()))?;
        self.host_key_file = Some(check_value(text)?.into());
        Ok(())
    }
    /// Unsets `HostKey`
    pub fn clear_host_key_file(&mut self) {
        self.host_key_file = None;
    }

    // ACCUMULATING COLLECTIONS ====================================================================

    /// `AcceptEnv` patterns, in the order they were added
    #[must_use]
    pub fn accepted_environment_variables(&self) -> &[String] {
        &self.accepted_environment_variables
    }
    /// Appends an `AcceptEnv` pattern.
    /// Each call adds exactly one pattern, so it must be a single non-empty token.
    pub fn add_accepted_environment_variable(&mut self, pattern: &str) -> Result<(), FormatError> {
        self.accepted_environment_variables
            .push(check_token(pattern)?.into());
        Ok(())
    }

    /// `Subsystem` entries, in the order they were added
    #[must_use]
    pub fn subsystems(&self) -> &[Subsystem] {
        &self.subsystems
    }
    /// Appends a `Subsystem`
    pub fn add_subsystem(&mut self, subsystem: Subsystem) {
        self.subsystems.push(subsystem);
    }

    /// `Match` blocks, in file order
    #[must_use]
    pub fn match_blocks(&self) -> &[MatchBlock] {
        &self.match_blocks
    }
    /// Appends a `Match` block, returning it for further setup
    pub fn add_match_block(&mut self, block: MatchBlock) -> &mut MatchBlock {
        self.match_blocks.push(block);
        let last = self.match_blocks.len() - 1;
        &mut self.match_blocks[last]
    }
    pub(crate) fn match_block_mut(&mut self, index: usize) -> &mut MatchBlock {
        &mut self.match_blocks[index]
    }

    // REPLACED LISTS ==============================================================================

    /// `Ciphers`
    #[must_use]
    pub fn ciphers(&self) -> &[Cipher] {
        &self.ciphers
    }
    /// Replaces the `Ciphers` list
    pub fn set_ciphers<I: IntoIterator<Item = Cipher>>(&mut self, ciphers: I) {
        self.ciphers = ciphers.into_iter().collect();
    }

    /// `HostKeyAlgorithms`
    #[must_use]
    pub fn host_key_algorithms(&self) -> &[HostKeyAlgorithm] {
        &self.host_key_algorithms
    }
    /// Replaces the `HostKeyAlgorithms` list
    pub fn set_host_key_algorithms<I: IntoIterator<Item = HostKeyAlgorithm>>(
        &mut self,
        algorithms: I,
    ) {
        self.host_key_algorithms = algorithms.into_iter().collect();
    }

    /// `KexAlgorithms`
    #[must_use]
    pub fn key_exchange_algorithms(&self) -> &[KexAlgorithm] {
        &self.key_exchange_algorithms
    }
    /// Replaces the `KexAlgorithms` list
    pub fn set_key_exchange_algorithms<I: IntoIterator<Item = KexAlgorithm>>(
        &mut self,
        algorithms: I,
    ) {
        self.key_exchange_algorithms = algorithms.into_iter().collect();
    }

    /// `MACs`
    #[must_use]
    pub fn mac_algorithms(&self) -> &[MacAlgorithm] {
        &self.mac_algorithms
    }
    /// Replaces the `MACs` list
    pub fn set_mac_algorithms<I: IntoIterator<Item = MacAlgorithm>>(&mut self, algorithms: I) {
        self.mac_algorithms = algorithms.into_iter().collect();
    }

    // QUERIES =====================================================================================

    /// The `AuthenticationMethods` that would apply to a connection from `user` at `address`.
    ///
    /// Like sshd, the first matching block that sets the value wins.
    /// Returns None if no matching block sets it.
    #[must_use]
    pub fn authentication_methods_for(&self, user: &str, address: &str) -> Option<&str> {
        self.match_blocks
            .iter()
            .filter(|b| b.matches(user, address))
            .find_map(MatchBlock::authentication_methods)
    }
}
