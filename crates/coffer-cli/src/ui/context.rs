//! Rendering choices derived from flags and the attached terminal.

use std::io::IsTerminal;

use super::mode::{ListFormat, OutputMode};

#[derive(Debug, Clone)]
pub struct UiContext {
    pub mode: OutputMode,
    pub color: bool,
    pub unicode: bool,
    /// Draw spinners on stderr
    pub animate: bool,
}

impl UiContext {
    pub fn from_env(
        json: bool,
        format: Option<ListFormat>,
        no_color_flag: bool,
        ascii_flag: bool,
    ) -> Self {
        let stdout_tty = std::io::stdout().is_terminal();
        let dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let no_color = no_color_flag || std::env::var_os("NO_COLOR").is_some();
        Self::detect(
            json,
            format,
            stdout_tty && !dumb,
            std::io::stderr().is_terminal(),
            no_color,
            ascii_flag,
        )
    }

    fn detect(
        json: bool,
        format: Option<ListFormat>,
        pretty_terminal: bool,
        stderr_tty: bool,
        no_color: bool,
        ascii: bool,
    ) -> Self {
        let mode = OutputMode::resolve(json, format, pretty_terminal);
        Self {
            mode,
            color: pretty_terminal && !no_color,
            unicode: !ascii,
            animate: pretty_terminal && stderr_tty && mode.is_pretty(),
        }
    }

    /// Context for unit tests that render without a terminal.
    #[cfg(test)]
    pub fn fixed(mode: OutputMode, unicode: bool) -> Self {
        Self {
            mode,
            color: false,
            unicode,
            animate: false,
        }
    }
}
