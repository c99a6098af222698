//! File parsing internals
// (c) 2024 Ross Younger

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

use tracing::debug;

use super::{
    directives::Directives,
    lines::{Line, Tokenizer},
    Configuration, Error, FormatError, MatchBlock,
};

/// Reads an sshd config file into a [`Configuration`].
///
/// # Note
/// You can only use this struct once. If for some reason you want to re-parse a file,
/// you must create a fresh `Parser` to do so.
#[derive(Debug)]
pub struct Parser<R>
where
    R: Read,
{
    line_number: usize,
    reader: BufReader<R>,
    source: String,
    tokenizer: Tokenizer,
    directives: Directives,
}

impl Parser<File> {
    /// Opens a file for parsing
    pub fn for_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let source = path.to_string_lossy().to_string();
        let file = File::open(path).map_err(|e| Error::Io {
            source_name: source.clone(),
            source: e,
        })?;
        Ok(Self::for_reader(file, source))
    }
}

impl<'a> Parser<&'a [u8]> {
    /// Parses from a string
    #[must_use]
    pub fn for_str(s: &'a str) -> Self {
        Self::for_reader(s.as_bytes(), "<string>")
    }
}

impl<R: Read> Parser<R> {
    /// Parses from any reader. `source` names it in error messages.
    pub fn for_reader<S: Into<String>>(reader: R, source: S) -> Self {
        Self {
            line_number: 0,
            reader: BufReader::new(reader),
            source: source.into(),
            tokenizer: Tokenizer::default(),
            directives: Directives::default(),
        }
    }

    fn format_error(&self, kind: FormatError) -> Error {
        Error::Format {
            source_name: self.source.clone(),
            line_number: self.line_number,
            kind,
        }
    }

    /// Applies one line. `current` is the index of the active Match block, if any.
    fn parse_line(
        &self,
        line: &str,
        output: &mut Configuration,
        current: &mut Option<usize>,
    ) -> Result<(), FormatError> {
        match self.tokenizer.tokenize(line)? {
            Line::Empty => Ok(()),
            Line::Match { users, addresses } => {
                debug!(
                    "Match block at {} line {}: users {users:?}, addresses {addresses:?}",
                    self.source, self.line_number
                );
                let _ = output.add_match_block(MatchBlock {
                    user_patterns: users,
                    address_patterns: addresses,
                    authentication_methods: None,
                });
                *current = Some(output.match_blocks().len() - 1);
                Ok(())
            }
            Line::Directive { keyword, value } => match *current {
                None => self.directives.apply_global(output, &keyword, &value),
                Some(index) => {
                    self.directives
                        .apply_block(output.match_block_mut(index), &keyword, &value)
                }
            },
        }
    }

    /// Reads the whole source.
    /// This consumes the `Parser`.
    ///
    /// Fails on the first line that can't be understood; there is no partial result.
    pub fn parse(mut self) -> Result<Configuration, Error> {
        let mut output = Configuration::default();
        let mut current = None;
        let mut line = String::new();

        loop {
            line.clear();
            self.line_number += 1;
            let n = self.reader.read_line(&mut line).map_err(|e| Error::Io {
                source_name: self.source.clone(),
                source: e,
            })?;
            if n == 0 {
                break; // EOF
            }
            self.parse_line(&line, &mut output, &mut current)
                .map_err(|kind| self.format_error(kind))?;
        }
        debug!(
            "read {} lines from {}: {} match blocks",
            self.line_number - 1,
            self.source,
            output.match_blocks().len()
        );
        Ok(output)
    }
}

impl FromStr for Configuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::for_str(s).parse()
    }
}

/// Parses configuration text
pub fn parse_str(s: &str) -> Result<Configuration, Error> {
    Parser::for_str(s).parse()
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::{collections::BTreeSet, path::PathBuf};

    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains, assert_contains_as_result, assert_eq_as_result};

    use super::{parse_str, Parser};
    use crate::{
        config::{Configuration, Error, FormatError, LogLevel, Scope, Subsystem},
        util::make_test_tempfile,
    };

    #[test]
    fn port() {
        let c = parse_str("Port 2222").unwrap();
        assert_eq!(c.port, 2222);
    }

    #[test]
    fn empty_input_gives_defaults() {
        assert_eq!(parse_str("").unwrap(), Configuration::default());
        assert_eq!(
            parse_str("\n\n   # nothing to see here\n\n").unwrap(),
            Configuration::default()
        );
    }

    #[test]
    fn globals() {
        let c = parse_str(
            r"
            # A realistic-looking file
            Protocol 2
            Port 2022
            HostKey /etc/ssh/ssh_host_ed25519_key
            ChallengeResponseAuthentication yes
            LogLevel DEBUG3
            Subsystem sftp /usr/lib/openssh/sftp-server
            UsePAM no
            UsePrivilegeSeparation no
            X11Forwarding yes
            PrintMotd yes
            KexAlgorithms curve25519-sha256,diffie-hellman-group14-sha256
            HostKeyAlgorithms ssh-ed25519
            MACs hmac-sha2-256,hmac-sha2-512
        ",
        )
        .unwrap();
        assert_eq!(c.protocol_versions, "2");
        assert_eq!(c.port, 2022);
        assert_eq!(
            c.host_key_file,
            Some(PathBuf::from("/etc/ssh/ssh_host_ed25519_key"))
        );
        assert!(c.challenge_response_authentication);
        assert_eq!(c.log_level, LogLevel::Debug3);
        assert_eq!(
            c.subsystems(),
            [Subsystem::new("sftp", "/usr/lib/openssh/sftp-server").unwrap()]
        );
        assert!(!c.use_pam);
        assert!(!c.use_privilege_separation);
        assert!(c.x11_forwarding);
        assert!(c.print_motd);
        assert_eq!(c.key_exchange_algorithms().len(), 2);
        assert_eq!(c.host_key_algorithms().len(), 1);
        assert_eq!(c.mac_algorithms()[1].as_str(), "hmac-sha2-512");
    }

    #[test]
    fn match_block() {
        let c = parse_str(
            "Match User alice,bob Address 10.0.0.0/8\n    AuthenticationMethods publickey\n",
        )
        .unwrap();
        assert_eq!(c.match_blocks().len(), 1);
        let b = &c.match_blocks()[0];
        assert_eq!(
            b.user_patterns,
            BTreeSet::from(["alice".to_string(), "bob".to_string()])
        );
        assert_eq!(
            b.address_patterns,
            BTreeSet::from(["10.0.0.0/8".to_string()])
        );
        assert_eq!(b.authentication_methods.as_deref(), Some("publickey"));
    }

    #[test]
    fn match_scope_lasts_until_next_match() {
        let c = parse_str(
            r"
            Port 2200
            Match User alice

            # comments don't end the block
            AuthenticationMethods publickey
            Match Address 192.168.0.0/16
            AuthenticationMethods password
            Match User bob
        ",
        )
        .unwrap();
        assert_eq!(c.port, 2200);
        let blocks = c.match_blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].authentication_methods.as_deref(), Some("publickey"));
        assert_eq!(blocks[1].authentication_methods.as_deref(), Some("password"));
        assert_eq!(blocks[2].authentication_methods, None);
    }

    fn names<T: ToString>(items: &[T]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn lists_replace() -> Result<()> {
        type Getter = fn(&Configuration) -> Vec<String>;
        let table: [(&str, &str, &str, Getter); 4] = [
            ("Ciphers", "aes128-ctr,aes192-ctr", "aes256-ctr", |c| {
                names(c.ciphers())
            }),
            ("HostKeyAlgorithms", "ssh-rsa,ssh-dss", "ssh-ed25519", |c| {
                names(c.host_key_algorithms())
            }),
            (
                "KexAlgorithms",
                "diffie-hellman-group1-sha1",
                "curve25519-sha256",
                |c| names(c.key_exchange_algorithms()),
            ),
            ("MACs", "hmac-md5,hmac-sha1", "hmac-sha2-256", |c| {
                names(c.mac_algorithms())
            }),
        ];
        for (keyword, first, last, get) in table {
            let input = format!("{keyword} {first}\nPort 2022\n{keyword} {last}\n");
            let c = parse_str(&input)?;
            assert_eq_as_result!(get(&c), vec![last.to_string()])
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn accept_env_accumulates() {
        let c = parse_str("AcceptEnv LANG\nAcceptEnv LC_*\nAcceptEnv XMODIFIERS  TZ\n").unwrap();
        assert_eq!(
            c.accepted_environment_variables(),
            ["LANG", "LC_*", "XMODIFIERS", "TZ"]
        );
    }

    #[test]
    fn subsystems_accumulate() {
        let c = parse_str("Subsystem sftp internal-sftp\nSubsystem x /usr/bin/x -v\n").unwrap();
        assert_eq!(
            c.subsystems(),
            [
                Subsystem::new("sftp", "internal-sftp").unwrap(),
                Subsystem::new("x", "/usr/bin/x -v").unwrap()
            ]
        );
    }

    #[test]
    fn ignored_legacy_directives() {
        let c = parse_str(
            r"
            LoginGraceTime 120
            PermitRootLogin without-password
            StrictModes yes
            Port 2022
        ",
        )
        .unwrap();
        assert_eq!(c.port, 2022);
    }

    #[test]
    fn ignored_directives_are_global_only() {
        let err = parse_str("Match User alice\nPermitRootLogin no\n").unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(&FormatError::UnknownDirective {
                keyword: "PermitRootLogin".into(),
                scope: Scope::Match
            })
        );
    }

    #[test]
    fn errors() -> Result<()> {
        for (input, expected_msg) in [
            ("FooBar baz", "unknown directive `FooBar` in global scope"),
            ("UsePAM maybe", "invalid boolean `maybe`"),
            ("UsePAM Yes", "invalid boolean `Yes`"),
            ("Port 22x", "invalid integer `22x`"),
            ("Port 70000", "invalid integer `70000`"),
            ("LogLevel LOUD", "unknown log level `LOUD`"),
            ("Match Host foo", "malformed Match condition"),
            ("Subsystem sftp", "malformed subsystem"),
            ("Ciphers aes128-ctr,", "empty value"),
            ("Port", "missing value"),
            ("Ciphers aes128-ctr aes256-ctr", "is not a single token"),
            ("Protocol = =2", "cannot be written"),
            (
                "Match User alice\nX11Forwarding no",
                "unknown directive `X11Forwarding` in Match block",
            ),
        ] {
            let err = parse_str(input).unwrap_err();
            assert_contains_as_result!(err.to_string(), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn errors_carry_location() {
        let err = parse_str("Port 22\n\n# comment\nFooBar baz\n").unwrap_err();
        match &err {
            Error::Format {
                source_name,
                line_number,
                ..
            } => {
                assert_eq!(source_name, "<string>");
                assert_eq!(*line_number, 4);
            }
            Error::Io { .. } => panic!("unexpected error {err:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"Port 22\nHostKey \xff\xfe\n";
        let err = Parser::for_reader(bytes, "bytes").parse().unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn from_str() {
        let c: Configuration = "Port 2022".parse().unwrap();
        assert_eq!(c.port, 2022);
    }

    #[test]
    fn read_real_file() {
        let (path, _dir) = make_test_tempfile(
            r"
            Port 2022
            FooBar baz
        ",
            "sshd_config",
        );
        let err = Parser::for_path(&path).unwrap().parse().unwrap_err();
        assert_contains!(err.to_string(), "sshd_config line 3");
    }

    #[test]
    fn missing_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let err = Parser::for_path(tempdir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
