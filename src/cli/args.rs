// sshdconf top-level command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Filename meaning standard input
pub(crate) const STDIN: &str = "-";

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("SSHDCONF_VERSION_STRING")),
    about,
    before_help = "e.g.   sshdconf check /etc/ssh/sshd_config",
    infer_long_args(true),
    infer_subcommands(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    /// Quiet mode
    ///
    /// Reports only errors
    #[arg(short, long, action, global = true, conflicts_with("debug"))]
    pub quiet: bool,

    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sshdconf=trace` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, global = true, help_heading("Debug"))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(
        short('l'),
        long,
        action,
        global = true,
        help_heading("Debug"),
        value_name("FILE")
    )]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum Command {
    /// Checks that one or more files parse
    Check {
        /// Files to check (`-` for standard input)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,
    },

    /// Rewrites a file in canonical form
    ///
    /// Comments, blank lines and ignored directives are dropped.
    /// Directives are emitted in a fixed order, with Match blocks last.
    Format {
        /// Input file (`-` for standard input)
        #[arg(value_name = "FILE")]
        file: String,
        /// Output file [default: standard output]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Shows the settings a file results in, including defaults
    Show {
        /// Input file (`-` for standard input)
        #[arg(value_name = "FILE")]
        file: String,
        /// Outputs JSON instead of a table
        #[arg(long, action)]
        json: bool,
    },

    /// Reports the `AuthenticationMethods` that would apply to a connection
    Query {
        /// Input file (`-` for standard input)
        #[arg(value_name = "FILE")]
        file: String,
        /// Connecting user name
        #[arg(short, long)]
        user: String,
        /// Connecting client address
        #[arg(short, long)]
        address: String,
    },

    /// Prints the default configuration
    Defaults,
}
