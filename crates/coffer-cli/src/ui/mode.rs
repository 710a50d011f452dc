//! How a command's result reaches stdout.

use clap::ValueEnum;

/// Rendering requested with `coffer list --format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Bordered table, even when piped
    Table,
    /// Tab-separated rows
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Pretty-printed JSON and nothing else
    Json,
    /// `key=value` lines and tab-separated rows
    #[default]
    Plain,
    /// Receipts, badges and tables
    Pretty,
}

impl OutputMode {
    /// `--json` wins, then an explicit `--format`, then whether stdout can
    /// show pretty output.
    pub fn resolve(json: bool, format: Option<ListFormat>, pretty_terminal: bool) -> Self {
        match (json, format) {
            (true, _) => Self::Json,
            (false, Some(ListFormat::Table)) => Self::Pretty,
            (false, Some(ListFormat::Plain)) => Self::Plain,
            (false, None) if pretty_terminal => Self::Pretty,
            (false, None) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_pretty(&self) -> bool {
        *self == Self::Pretty
    }
}
