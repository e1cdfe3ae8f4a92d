#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

use std::process::ExitCode;

use clap::Parser;
use directory_config::{
    Config,
    args::{AppMode, ArgsConfig},
    get_config,
};
use directory_geocoding::{create_geocoder, resolve_map};
use directory_server::{DirectoryServer, app::create_view_context, init_tool_logging};
use directory_views::DirectoryView;
use error_stack::{Result, ResultExt};
use serde::Serialize;

const BUILD_INFO_CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
const BUILD_INFO_CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(thiserror::Error, Debug)]
#[error("Tool mode failed")]
struct ToolModeError;

fn main() -> ExitCode {
    let args = ArgsConfig::parse();

    if args.build_info {
        println!("{BUILD_INFO_CARGO_PKG_NAME} {BUILD_INFO_CARGO_PKG_VERSION}");
        return ExitCode::SUCCESS;
    }

    let config = match get_config(args, BUILD_INFO_CARGO_PKG_VERSION.to_string()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Tokio runtime creation failed. Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match config.current_mode().cloned() {
        Some(AppMode::Geocode { address }) => {
            init_tool_logging(&config);
            runtime.block_on(async { handle_geocode_mode(&config, &address).await })
        }
        Some(AppMode::List { query }) => {
            init_tool_logging(&config);
            runtime.block_on(async { handle_list_mode(&config, &query).await })
        }
        None => runtime.block_on(async {
            DirectoryServer::new(config)
                .run()
                .await
                .change_context(ToolModeError)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn handle_geocode_mode(config: &Config, address: &str) -> Result<(), ToolModeError> {
    let geocoder = create_geocoder(config.geocoding()).change_context(ToolModeError)?;
    let state = resolve_map(geocoder.as_ref(), Some(address), config.map()).await;
    print_json(&state)
}

async fn handle_list_mode(config: &Config, query: &str) -> Result<(), ToolModeError> {
    let context = create_view_context(config).change_context(ToolModeError)?;
    let mut view = DirectoryView::new(context);
    view.load().await;
    print_json(&view.search(query))
}

fn print_json(value: &impl Serialize) -> Result<(), ToolModeError> {
    let text = serde_json::to_string_pretty(value).change_context(ToolModeError)?;
    println!("{text}");
    Ok(())
}
