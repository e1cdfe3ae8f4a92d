#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! HTTP server for the profile directory

use axum::Router;
use directory_config::Config;
use error_stack::{Result, ResultExt};
use tokio::{
    net::TcpListener,
    signal::{
        self,
        unix::{Signal, SignalKind},
    },
    sync::broadcast,
    task::JoinHandle,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub mod api;
pub mod app;
pub mod utils;

use app::AppState;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Profile store init failed")]
    StoreInit,
    #[error("Geocoder init failed")]
    GeocoderInit,
    #[error("Binding public API socket failed")]
    Bind,
    #[error("Signal handler init failed")]
    Signal,
}

/// Drop this when quit starts
pub type ServerQuitHandle = broadcast::Sender<()>;

/// Use resubscribe() for cloning.
pub type ServerQuitWatcher = broadcast::Receiver<()>;

/// Initialize global tracing subscriber which writes to stdout. Log level
/// filter is read from the `RUST_LOG` environment variable.
pub fn init_logging(config: &Config) {
    init_logging_with_writer(config, std::io::stdout);
}

/// Tool modes print their results to stdout, so logs are written to
/// stderr.
pub fn init_tool_logging(config: &Config) {
    init_logging_with_writer(config, std::io::stderr);
}

fn init_logging_with_writer<W>(config: &Config, writer: W)
where
    W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    let log_with_timestamp_layer = if config.log_timestamp() {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer.clone())
                .with_filter(EnvFilter::from_default_env()),
        )
    } else {
        None
    };

    let log_without_timestamp_layer = if config.log_timestamp() {
        None
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .without_time()
                .with_filter(EnvFilter::from_default_env()),
        )
    };

    tracing_subscriber::registry()
        .with(log_with_timestamp_layer)
        .with(log_without_timestamp_layer)
        .init();
}

/// Router for all public API routes.
pub fn create_router(state: AppState, debug_mode: bool) -> Router {
    let router = Router::new()
        .merge(api::directory_router())
        .merge(api::map_router())
        .merge(api::admin_router());

    let router = if debug_mode {
        router.route_layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

pub struct DirectoryServer {
    config: Config,
}

impl DirectoryServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server until SIGTERM or Ctrl-C is received.
    pub async fn run(self) -> Result<(), ServerError> {
        init_logging(&self.config);

        info!(
            "{} version: {}",
            env!("CARGO_PKG_NAME"),
            self.config.semver_version()
        );

        if self.config.debug_mode() {
            warn!("Debug mode is enabled");
        }

        let (server_quit_handle, server_quit_watcher) = broadcast::channel(1);
        let mut terminate_signal =
            signal::unix::signal(SignalKind::terminate()).change_context(ServerError::Signal)?;

        let state = AppState::from_config(&self.config)?;
        let server_task = self
            .create_public_api_server_task(state, server_quit_watcher)
            .await?;

        Self::wait_quit_signal(&mut terminate_signal).await;

        info!("Server quit started");

        drop(server_quit_handle);

        if let Err(e) = server_task.await {
            error!("Public API server task failed, error: {}", e);
        }

        info!("Server quit done");

        Ok(())
    }

    pub async fn wait_quit_signal(terminate_signal: &mut Signal) {
        tokio::select! {
            _ = terminate_signal.recv() => {}
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => (),
                    Err(e) => error!("Failed to listen CTRL+C. Error: {}", e),
                }
            }
        }
    }

    async fn create_public_api_server_task(
        &self,
        state: AppState,
        mut quit_notification: ServerQuitWatcher,
    ) -> Result<JoinHandle<()>, ServerError> {
        let addr = self.config.public_api();
        let router = create_router(state, self.config.debug_mode());
        let listener = TcpListener::bind(addr)
            .await
            .change_context(ServerError::Bind)
            .attach_printable(addr)?;

        info!("Public API is available on {}", addr);

        Ok(tokio::spawn(async move {
            let shutdown_handle = axum::serve(listener, router).with_graceful_shutdown(async move {
                let _ = quit_notification.recv().await;
            });

            match shutdown_handle.await {
                Ok(()) => {
                    info!("Public API server future returned Ok()");
                }
                Err(e) => {
                    error!("Public API server future returned error: {}", e);
                }
            }
        }))
    }
}
