//! Config given as command line arguments

use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand, arg, command};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct ArgsConfig {
    /// Print build info and quit.
    #[arg(short, long)]
    pub build_info: bool,

    /// Directory where the config file is loaded from. Default is the
    /// working directory.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(flatten)]
    pub server: ServerModeArgs,

    #[command(subcommand)]
    pub mode: Option<AppMode>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServerModeArgs {
    /// Set public API socket address. Overrides config file value.
    #[arg(long, value_name = "ADDR")]
    pub public_api: Option<SocketAddr>,

    /// Use in RAM profile store instead of Firestore. Requires debug mode.
    #[arg(short, long)]
    pub memory_store: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    /// Geocode an address and print the map state as JSON
    Geocode {
        address: String,
    },
    /// Print profiles matching the query as JSON
    List {
        #[arg(short, long, default_value = "")]
        query: String,
    },
}
