use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::storage::{FileGateway, StorageFormat};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DATA_FILE: &str = "patients.json";

#[derive(Debug, Parser)]
#[command(name = "patientdb")]
#[command(about = "Patient record store with BMI metrics, served over HTTP")]
pub struct Cli {
    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    /// File holding the patient collection
    #[arg(long, env = "PATIENTDB_DATA_FILE", default_value = DEFAULT_DATA_FILE, global = true)]
    pub data_file: PathBuf,

    /// Encoding of the data file
    #[arg(
        long,
        env = "PATIENTDB_FORMAT",
        value_enum,
        default_value_t = StorageFormat::Json,
        global = true
    )]
    pub format: StorageFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    Serve {
        #[arg(long, env = "PATIENTDB_BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
    /// Load the data file and report whether every record is valid
    Check,
    /// Print every patient with derived metrics as JSON
    List {
        /// Sort by height, weight or bmi
        #[arg(long)]
        sort_by: Option<String>,
        /// asc or desc
        #[arg(long)]
        order: Option<String>,
    },
}

impl Cli {
    /// Split into storage settings and the command to run. A bare
    /// `patientdb` serves, honouring `PATIENTDB_BIND_ADDR`.
    pub fn into_parts(self) -> Result<(StorageArgs, Command)> {
        let command = match self.command {
            Some(command) => command,
            None => Command::Serve {
                bind: env_string("PATIENTDB_BIND_ADDR", DEFAULT_BIND_ADDR)
                    .parse::<SocketAddr>()
                    .context("PATIENTDB_BIND_ADDR must be a valid host:port")?,
            },
        };
        Ok((self.storage, command))
    }
}

/// Resolved settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageArgs,
}

impl AppConfig {
    pub fn new(bind_addr: SocketAddr, storage: StorageArgs) -> Self {
        Self { bind_addr, storage }
    }
}

impl StorageArgs {
    pub fn gateway(&self) -> FileGateway {
        FileGateway::new(&self.data_file, self.format)
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
