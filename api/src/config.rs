use clap::{Parser, Subcommand};
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use std::{fs, path::PathBuf};

use crate::Result;
use crate::error::{ConfigFileSnafu, ConfigParseSnafu, ConfigSnafu};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub encryption_key: String,
    pub server: ServerConfig,
    pub db: DbConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Config {
    pub fn build(filename: &PathBuf) -> Result<Self> {
        let toml_string = fs::read_to_string(filename).context(ConfigFileSnafu)?;
        Self::parse(toml_string.as_str())
    }

    pub fn parse(toml_string: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_string).context(ConfigParseSnafu)?;

        // Validate config values
        ensure!(
            cipher::valid_key(config.encryption_key.as_str()),
            ConfigSnafu {
                msg: "Encryption key must be 32 bytes encoded in base64.".to_string()
            }
        );

        ensure!(
            config.db.url.len() > 0,
            ConfigSnafu {
                msg: "Database URL is required.".to_string()
            }
        );

        ensure!(
            config.server.host.len() > 0,
            ConfigSnafu {
                msg: "Server host is required.".to_string()
            }
        );

        ensure!(
            config.server.port > 0,
            ConfigSnafu {
                msg: "Server port is required.".to_string()
            }
        );

        Ok(config)
    }
}

/// Password keeping API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "config.toml")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the API server
    Server,

    /// Prints the OpenAPI document
    Openapi {
        /// Write the document to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generates a new encryption key
    Keygen,
}
