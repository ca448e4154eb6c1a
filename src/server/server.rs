//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{HealthError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    dev::ServerHandle,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Probe HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config.server.clone(),
            state,
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", crate::NAME)))
            .configure(routes::health::configure_routes)
    }

    /// Bind and serve until the server stops
    pub async fn start(self) -> Result<()> {
        let (server, _shutdown) = self.bind()?;
        server
            .await
            .map_err(|e| HealthError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Bind without running
    ///
    /// Actix's own signal handling is disabled. Ctrl+C, SIGTERM and
    /// [`ShutdownHandle::stop`] all cancel `AppState::shutdown` first, so
    /// in-flight service checks abort before the graceful stop waits on them.
    pub fn bind(self) -> Result<(actix_web::dev::Server, ShutdownHandle)> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let shutdown = self.state.shutdown.clone();
        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .disable_signals();
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr))?
            .run();
        let handle = ShutdownHandle {
            server: server.handle(),
            token: shutdown.clone(),
        };

        let watcher = handle.server.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = Self::shutdown_signal() => shutdown.cancel(),
                _ = shutdown.cancelled() => {}
            }
            watcher.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);
        Ok((server, handle))
    }

    /// Resolves on Ctrl+C or SIGTERM
    pub async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => {
                    warn!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    fn format_bind_error(e: std::io::Error, bind_addr: &str) -> HealthError {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            HealthError::server(format!(
                "Failed to bind {}: address already in use (is another instance running?)",
                bind_addr
            ))
        } else {
            HealthError::server(format!("Failed to bind {}: {}", bind_addr, e))
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Stops a bound server after cancelling its in-flight service checks
#[derive(Clone)]
pub struct ShutdownHandle {
    server: ServerHandle,
    token: CancellationToken,
}

impl ShutdownHandle {
    /// Cancel in-flight checks, then stop gracefully
    pub async fn stop(&self) {
        self.token.cancel();
        self.server.stop(true).await;
    }

    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }
}
