use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;

/// A terminal tracker for personal income and expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the transaction data. Defaults to the platform data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// File the log is appended to. Defaults to `fintrack.log` in the data directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter such as `info` or `fintrack=debug`. `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Number of months shown in the expense chart.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u16).range(1..=36))]
    pub chart_months: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub chart_months: usize,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let log_file = cli
            .log_file
            .unwrap_or_else(|| data_dir.join("fintrack.log"));

        Ok(Self {
            data_dir,
            log_file,
            log_filter: cli.log_level,
            chart_months: usize::from(cli.chart_months),
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "fintrack", "fintrack")
        .context("unable to locate a data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_kept() {
        let cli = Cli::try_parse_from([
            "fintrack",
            "--data-dir",
            "/tmp/fintrack-data",
            "--log-file",
            "/tmp/fintrack.log",
            "--log-level",
            "debug",
            "--chart-months",
            "12",
        ])
        .unwrap();

        let config = Config::from_cli(cli).unwrap();

        assert_eq!(
            config,
            Config {
                data_dir: PathBuf::from("/tmp/fintrack-data"),
                log_file: PathBuf::from("/tmp/fintrack.log"),
                log_filter: "debug".into(),
                chart_months: 12,
            }
        );
    }

    #[test]
    fn log_file_defaults_into_data_dir() {
        let cli = Cli::try_parse_from(["fintrack", "--data-dir", "/tmp/fintrack-data"]).unwrap();

        let config = Config::from_cli(cli).unwrap();

        assert_eq!(
            config.log_file,
            PathBuf::from("/tmp/fintrack-data/fintrack.log")
        );
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.chart_months, 6);
    }

    #[test]
    fn chart_months_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["fintrack", "--chart-months", "0"]).is_err());
        assert!(Cli::try_parse_from(["fintrack", "--chart-months", "37"]).is_err());
    }
}
