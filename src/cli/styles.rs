// (c) 2024 Ross Younger
//! CLI output styling
//!
//! Print styled text through anstream's `println!` / `eprintln!`, which strip the
//! escapes when output is not a terminal.

#[allow(clippy::enum_glob_use)]
use anstyle::AnsiColor::*;
use anstyle::{Color::Ansi, Style};
use clap::builder::styling::Styles;

/// A file that failed to load
pub(crate) const ERROR: Style = Style::new().bold().fg_color(Some(Ansi(Red)));
/// A file that parsed cleanly
pub(crate) const SUCCESS: Style = Style::new().bold().fg_color(Some(Ansi(Green)));

const HEADING: Style = Style::new().underline().fg_color(Some(Ansi(Yellow)));
const PLACEHOLDER: Style = Style::new().fg_color(Some(Ansi(Cyan)));

pub(crate) const CLAP_STYLES: Styles = Styles::styled()
    .usage(HEADING)
    .header(HEADING)
    .literal(Style::new().bold())
    .invalid(Style::new().bold().fg_color(Some(Ansi(Yellow))))
    .error(ERROR)
    .valid(PLACEHOLDER.bold().underline())
    .placeholder(PLACEHOLDER);

/// The status word leading a line of `check` output, e.g. `OK` or `ERROR`
pub(crate) fn tag(style: Style, word: &str) -> String {
    format!("{style}{word}{style:#}")
}
