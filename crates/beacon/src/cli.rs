use anyhow::Context;
use clap::CommandFactory;
use crate::commands;
use libbeacon::BeaconConfig;
use std::path::Path;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "beacon.toml";

#[derive(clap::Parser, Debug)]
#[command(name = "beacon", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        help="Path to a TOML config file. Defaults to `beacon.toml` when \
             present. Defaults are used for every setting it leaves out.",
        long,
        short='c',
    )]
    pub config: Option<PathBuf>,

    #[arg(
        help="Enable verbose output.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    /// The config named by `--config`, else `beacon.toml` in the working
    /// directory, else the defaults.
    pub(crate) fn load_config(&self) -> anyhow::Result<BeaconConfig> {
        let path = match &self.config {
            Some(path) => path.as_path(),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => {
                log::debug!("No config file found, using defaults.");
                return Ok(BeaconConfig::default());
            },
        };
        log::debug!("Loading config from {path:#?}.");
        BeaconConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    pub(crate) async fn run_default(self) -> anyhow::Result<()> {
        Self::command().print_help()?;
        Ok(())
    }
}
