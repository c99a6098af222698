//! Pretty-printing as a table
// (c) 2024 Ross Younger

use std::fmt::Display;

use tabled::{settings::style::Style, Table, Tabled};

use super::{
    values::{format_yes_no, join_list},
    writer::render_condition,
    Configuration,
};

const GLOBAL: &str = "(global)";

#[derive(Tabled)]
struct PrettyDirective {
    scope: String,
    directive: &'static str,
    value: String,
}

impl PrettyDirective {
    fn global<V: Display>(directive: &'static str, value: V) -> Self {
        Self {
            scope: GLOBAL.into(),
            directive,
            value: value.to_string(),
        }
    }
}

/// Pretty-printing type wrapper to [`Configuration`]
#[derive(Debug, Clone, Copy)]
pub struct DisplayAdapter<'a> {
    source: &'a Configuration,
}

impl Configuration {
    /// Creates a `DisplayAdapter` for this struct.
    ///
    /// # Returns
    /// An ephemeral structure implementing `Display`, which renders every setting
    /// (defaults included) as a table.
    #[must_use]
    pub fn to_display_adapter(&self) -> DisplayAdapter<'_> {
        DisplayAdapter { source: self }
    }
}

impl DisplayAdapter<'_> {
    fn rows(&self) -> Vec<PrettyDirective> {
        let c = self.source;
        let mut rows = vec![
            PrettyDirective::global("Protocol", c.protocol_versions()),
            PrettyDirective::global("Port", c.port),
            PrettyDirective::global(
                "HostKey",
                c.host_key_file()
                    .map_or_else(|| "<unset>".into(), |p| p.display().to_string()),
            ),
            PrettyDirective::global(
                "ChallengeResponseAuthentication",
                format_yes_no(c.challenge_response_authentication),
            ),
            PrettyDirective::global("LogLevel", c.log_level),
        ];
        rows.extend(
            c.subsystems()
                .iter()
                .map(|s| PrettyDirective::global("Subsystem", s)),
        );
        rows.extend([
            PrettyDirective::global("UsePAM", format_yes_no(c.use_pam)),
            PrettyDirective::global(
                "UsePrivilegeSeparation",
                format_yes_no(c.use_privilege_separation),
            ),
            PrettyDirective::global("X11Forwarding", format_yes_no(c.x11_forwarding)),
            PrettyDirective::global("PrintMotd", format_yes_no(c.print_motd)),
            PrettyDirective::global("AcceptEnv", c.accepted_environment_variables().join(" ")),
            PrettyDirective::global("Ciphers", join_list(c.ciphers())),
            PrettyDirective::global("HostKeyAlgorithms", join_list(c.host_key_algorithms())),
            PrettyDirective::global("KexAlgorithms", join_list(c.key_exchange_algorithms())),
            PrettyDirective::global("MACs", join_list(c.mac_algorithms())),
        ]);
        for block in c.match_blocks() {
            rows.push(PrettyDirective {
                scope: render_condition(block),
                directive: "AuthenticationMethods",
                value: block.authentication_methods().unwrap_or("<unset>").into(),
            });
        }
        rows
    }
}

impl Display for DisplayAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Table::new(self.rows()).with(Style::sharp()))
    }
}
