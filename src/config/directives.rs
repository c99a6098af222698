//! Directive dispatch tables
// (c) 2024 Ross Younger

use std::collections::HashMap;

use tracing::{debug, trace};

use super::{
    values::{parse_integer, parse_yes_no, split_list},
    Configuration, FormatError, LogLevel, MatchBlock, Scope, Subsystem,
};

type GlobalHandler = fn(&mut Configuration, &str) -> Result<(), FormatError>;
type BlockHandler = fn(&mut MatchBlock, &str) -> Result<(), FormatError>;

#[derive(Clone, Copy)]
enum GlobalDirective {
    Apply(GlobalHandler),
    /// Recognised, but we don't model it
    Ignore,
}

// Keys are lowercase; sshd keywords are case-insensitive.
const GLOBAL_DIRECTIVES: &[(&str, GlobalHandler)] = &[
    ("protocol", |c, v| c.set_protocol_versions(v)),
    ("port", |c, v| {
        c.port = parse_integer(v)?;
        Ok(())
    }),
    ("hostkey", |c, v| c.set_host_key_file(v)),
    ("challengeresponseauthentication", |c, v| {
        c.challenge_response_authentication = parse_yes_no(v)?;
        Ok(())
    }),
    ("loglevel", |c, v| {
        c.log_level = LogLevel::from_token(v)?;
        Ok(())
    }),
    ("subsystem", |c, v| {
        c.add_subsystem(v.parse::<Subsystem>()?);
        Ok(())
    }),
    ("usepam", |c, v| {
        c.use_pam = parse_yes_no(v)?;
        Ok(())
    }),
    ("useprivilegeseparation", |c, v| {
        c.use_privilege_separation = parse_yes_no(v)?;
        Ok(())
    }),
    ("x11forwarding", |c, v| {
        c.x11_forwarding = parse_yes_no(v)?;
        Ok(())
    }),
    ("printmotd", |c, v| {
        c.print_motd = parse_yes_no(v)?;
        Ok(())
    }),
    ("acceptenv", |c, v| {
        for pattern in v.split_whitespace() {
            c.add_accepted_environment_variable(pattern)?;
        }
        Ok(())
    }),
    ("ciphers", |c, v| {
        c.set_ciphers(split_list(v)?);
        Ok(())
    }),
    ("hostkeyalgorithms", |c, v| {
        c.set_host_key_algorithms(split_list(v)?);
        Ok(())
    }),
    ("kexalgorithms", |c, v| {
        c.set_key_exchange_algorithms(split_list(v)?);
        Ok(())
    }),
    ("macs", |c, v| {
        c.set_mac_algorithms(split_list(v)?);
        Ok(())
    }),
];

/// Legacy or otherwise unmodelled global options which real-world files commonly contain.
/// These are accepted and discarded.
const IGNORED_GLOBAL_DIRECTIVES: &[&str] = &[
    "authorizedkeysfile",
    "hostbasedauthentication",
    "ignorerhosts",
    "keyregenerationinterval",
    "logingracetime",
    "passwordauthentication",
    "permitemptypasswords",
    "permitrootlogin",
    "printlastlog",
    "pubkeyauthentication",
    "rhostsrsaauthentication",
    "rsaauthentication",
    "serverkeybits",
    "strictmodes",
    "syslogfacility",
    "tcpkeepalive",
    "usedns",
    "x11displayoffset",
];

const BLOCK_DIRECTIVES: &[(&str, BlockHandler)] = &[("authenticationmethods", |b, v| {
    b.set_authentication_methods(v)
})];

///////////////////////////////////////////////////////////////////////////////////////

/// The closed set of directives we understand, in each scope
pub(super) struct Directives {
    global: HashMap<&'static str, GlobalDirective>,
    block: HashMap<&'static str, BlockHandler>,
}

impl std::fmt::Debug for Directives {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut global: Vec<_> = self.global.keys().collect();
        global.sort();
        let mut block: Vec<_> = self.block.keys().collect();
        block.sort();
        f.debug_struct("Directives")
            .field("global", &global)
            .field("block", &block)
            .finish()
    }
}

impl Default for Directives {
    fn default() -> Self {
        let mut global: HashMap<&'static str, GlobalDirective> = GLOBAL_DIRECTIVES
            .iter()
            .map(|(k, h)| (*k, GlobalDirective::Apply(*h)))
            .collect();
        global.extend(
            IGNORED_GLOBAL_DIRECTIVES
                .iter()
                .map(|k| (*k, GlobalDirective::Ignore)),
        );
        Self {
            global,
            block: BLOCK_DIRECTIVES.iter().copied().collect(),
        }
    }
}

impl Directives {
    pub(super) fn apply_global(
        &self,
        config: &mut Configuration,
        keyword: &str,
        value: &str,
    ) -> Result<(), FormatError> {
        match self.global.get(keyword.to_ascii_lowercase().as_str()) {
            Some(GlobalDirective::Apply(handler)) => {
                trace!("{keyword} {value}");
                handler(config, value)
            }
            Some(GlobalDirective::Ignore) => {
                debug!("ignoring unsupported directive {keyword}");
                Ok(())
            }
            None => Err(FormatError::UnknownDirective {
                keyword: keyword.into(),
                scope: Scope::Global,
            }),
        }
    }

    pub(super) fn apply_block(
        &self,
        block: &mut MatchBlock,
        keyword: &str,
        value: &str,
    ) -> Result<(), FormatError> {
        let Some(handler) = self.block.get(keyword.to_ascii_lowercase().as_str()) else {
            return Err(FormatError::UnknownDirective {
                keyword: keyword.into(),
                scope: Scope::Match,
            });
        };
        trace!("    {keyword} {value}");
        handler(block, value)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
