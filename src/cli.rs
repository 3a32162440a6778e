use crate::paths;
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use ratatui::crossterm::style::Stylize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableKind {
    Wallet,
    Products,
    Notifications,
}

impl TableKind {
    pub fn position(self) -> usize {
        match self {
            TableKind::Wallet => 0,
            TableKind::Products => 1,
            TableKind::Notifications => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Browse paginated demo tables with persistent column layouts.
#[derive(Debug, Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Table shown at startup
    #[arg(short, long, value_enum, default_value_t = TableKind::Wallet)]
    pub table: TableKind,

    /// Rows requested per page
    #[arg(short = 'p', long, default_value_t = 20)]
    pub page_size: usize,

    /// Placeholder rows shown during the initial load
    #[arg(long, default_value_t = 8)]
    pub skeleton_rows: usize,

    /// Placeholder rows appended while the next page loads
    #[arg(long, default_value_t = 3)]
    pub loading_more_rows: usize,

    /// Quiet period before a search edit is applied, in milliseconds
    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,

    /// Simulated latency of every page request, in milliseconds
    #[arg(long, default_value_t = 400)]
    pub latency_ms: u64,

    /// Make every Nth page request fail (0 disables)
    #[arg(long, default_value_t = 0)]
    pub fail_every: u64,

    /// Rows generated for each demo table
    #[arg(short = 'n', long, default_value_t = 500)]
    pub rows: usize,

    /// Column layout store (defaults to the platform data directory)
    #[arg(long, conflicts_with = "ephemeral")]
    pub store: Option<PathBuf>,

    /// Keep column layouts in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Log file (defaults to the platform cache directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Do not capture the mouse (keeps terminal text selection working)
    #[arg(long)]
    pub no_mouse: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if !(1..=500).contains(&self.page_size) {
            bail!(
                "{} --page-size must be between 1 and 500 (got {})",
                "[ERROR]".red().bold(),
                self.page_size
            );
        }
        if self.skeleton_rows > 100 || self.loading_more_rows > 100 {
            bail!(
                "{} placeholder row counts must not exceed 100",
                "[ERROR]".red().bold()
            );
        }
        if !(100..=1000).contains(&self.debounce_ms) {
            bail!(
                "{} --debounce-ms must be between 100 and 1000 (got {})",
                "[ERROR]".red().bold(),
                self.debounce_ms
            );
        }
        if self.latency_ms > 10_000 {
            bail!(
                "{} --latency-ms must not exceed 10000",
                "[ERROR]".red().bold()
            );
        }
        Ok(())
    }

    /// Where column layouts are persisted, or `None` for `--ephemeral`.
    pub fn store_path(&self) -> Result<Option<PathBuf>> {
        if self.ephemeral {
            return Ok(None);
        }
        match &self.store {
            Some(path) => Ok(Some(path.clone())),
            None => paths::column_store()
                .map(Some)
                .context("cannot determine the data directory; pass --store or --ephemeral"),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => paths::log_file().context("cannot determine the cache directory; pass --log-file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("datagrid").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let args = parse(&[]);
        assert!(args.validate().is_ok());
        assert_eq!(args.table, TableKind::Wallet);
        assert_eq!(args.loading_more_rows, 3);
        assert_eq!(args.skeleton_rows, 8);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["--page-size", "0"]).validate().is_err());
        assert!(parse(&["--debounce-ms", "50"]).validate().is_err());
        assert!(parse(&["--debounce-ms", "1000"]).validate().is_ok());
    }

    #[test]
    fn ephemeral_has_no_store() {
        assert_eq!(parse(&["--ephemeral"]).store_path().unwrap(), None);
        let args = parse(&["--store", "/tmp/layouts.json"]);
        assert_eq!(args.store_path().unwrap(), Some(PathBuf::from("/tmp/layouts.json")));
        assert!(Args::try_parse_from(["datagrid", "--ephemeral", "--store", "x"]).is_err());
    }
}
