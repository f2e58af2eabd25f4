//! `starsync config show|path|init`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use starsync_core::config::{self, Config};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration with credentials redacted.
    Show {
        /// Config file to use instead of ~/.starsync/config.yaml.
        #[arg(long, short = 'c', value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the default config file location.
    Path,

    /// Write a blank config file to the default location.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show { config: explicit } => {
            let cfg = config::load(explicit.as_deref()).context("failed to load configuration")?;
            let source = match explicit {
                Some(path) => path,
                None => config::config_path()?,
            };
            println!("# source: {}", source.display());
            print!("{}", render(&cfg));
        }
        ConfigCommand::Path => {
            println!("{}", config::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = config::init(force).context("failed to write config file")?;
            println!("✓ Wrote {}", path.display());
            println!("  Fill in the GitHub and Notion credentials, or set them via environment variables.");
        }
    }
    Ok(())
}

fn render(cfg: &Config) -> String {
    let f = &cfg.sync.fields;
    format!(
        "github.username: {}\n\
         github.token: {}\n\
         notion.table_url: {}\n\
         notion.token: {}\n\
         sync.delete: {}\n\
         sync.timeout_secs: {}\n\
         sync.fields.name: {}\n\
         sync.fields.url: {}\n\
         sync.fields.description: {}\n",
        cfg.github.username,
        cfg.github.token,
        cfg.notion.table_url,
        cfg.notion.token,
        cfg.sync.delete,
        cfg.sync.timeout.as_secs(),
        f.name,
        f.url,
        f.description,
    )
}
