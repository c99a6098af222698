//! Output in sshd_config format
// (c) 2024 Ross Younger

use std::fmt::{Display, Formatter, Result};

use super::{
    values::{format_yes_no, join_list},
    Configuration, MatchBlock,
};

const BLOCK_INDENT: &str = "    ";

/// The condition line of a Match block; a clause whose pattern set is empty is left out.
pub(super) fn render_condition(block: &MatchBlock) -> String {
    let mut condition = String::from("Match");
    if !block.user_patterns.is_empty() {
        condition.push_str(" User ");
        condition.push_str(&join_list(&block.user_patterns));
    }
    if !block.address_patterns.is_empty() {
        condition.push_str(" Address ");
        condition.push_str(&join_list(&block.address_patterns));
    }
    condition
}

fn write_block(f: &mut Formatter<'_>, block: &MatchBlock) -> Result {
    writeln!(f, "{}", render_condition(block))?;
    if let Some(methods) = &block.authentication_methods {
        writeln!(f, "{BLOCK_INDENT}AuthenticationMethods {methods}")?;
    }
    Ok(())
}

fn write_list<T: Display>(f: &mut Formatter<'_>, keyword: &str, items: &[T]) -> Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "{keyword} {}", join_list(items))
}

impl Display for Configuration {
    /// Renders the configuration as sshd_config text, one directive per line, in a fixed order.
    ///
    /// Match blocks come last, after `AcceptEnv` and the algorithm lists.
    /// Anything written after a `Match` line would belong to that block when read back.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Protocol {}", self.protocol_versions)?;
        writeln!(f, "Port {}", self.port)?;
        if let Some(path) = &self.host_key_file {
            writeln!(f, "HostKey {}", path.display())?;
        }
        writeln!(
            f,
            "ChallengeResponseAuthentication {}",
            format_yes_no(self.challenge_response_authentication)
        )?;
        writeln!(f, "LogLevel {}", self.log_level)?;
        for subsystem in self.subsystems() {
            writeln!(f, "Subsystem {subsystem}")?;
        }
        writeln!(f, "UsePAM {}", format_yes_no(self.use_pam))?;
        writeln!(
            f,
            "UsePrivilegeSeparation {}",
            format_yes_no(self.use_privilege_separation)
        )?;
        writeln!(f, "X11Forwarding {}", format_yes_no(self.x11_forwarding))?;
        writeln!(f, "PrintMotd {}", format_yes_no(self.print_motd))?;
        for pattern in self.accepted_environment_variables() {
            writeln!(f, "AcceptEnv {pattern}")?;
        }
        write_list(f, "Ciphers", self.ciphers())?;
        write_list(f, "HostKeyAlgorithms", self.host_key_algorithms())?;
        write_list(f, "KexAlgorithms", self.key_exchange_algorithms())?;
        write_list(f, "MACs", self.mac_algorithms())?;
        // Must stay last
        for block in self.match_blocks() {
            write_block(f, block)?;
        }
        Ok(())
    }
}

impl Configuration {
    /// Writes the configuration in sshd_config format
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{self}")
    }
}

/// Renders a configuration as sshd_config text
#[must_use]
pub fn serialize(config: &Configuration) -> String {
    config.to_string()
}

///////////////////////////////////////////////////////////////////////////////////////
