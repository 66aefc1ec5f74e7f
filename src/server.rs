//! HTTP server lifecycle: bind, serve, and drain on SIGINT/SIGTERM

use crate::api::{self, AppState};
use crate::cli::config::ServerConfig;
use crate::logging::Logger;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;

pub struct Server {
    config: ServerConfig,
    state: AppState,
    output: Logger,
}

impl Server {
    pub fn new(config: ServerConfig, state: AppState, output: Logger) -> Self {
        Self {
            config,
            state,
            output,
        }
    }

    /// Serve until a shutdown signal arrives, then give in-flight requests the
    /// configured grace period to finish.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.listen_address).await?;
        self.output.info(&format!(
            "Listening on http://{}",
            listener.local_addr()?
        ));

        let app = api::router(self.state);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut serve = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        tokio::select! {
            result = &mut serve => {
                return match result {
                    Ok(result) => result,
                    Err(e) => Err(std::io::Error::other(e)),
                };
            }
            _ = shutdown_signal() => {}
        }

        self.output.info("Shutting down server...");
        let _ = stop_tx.send(());

        match tokio::time::timeout(self.config.shutdown_grace(), serve).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(std::io::Error::other(e)),
            Err(_) => {
                self.output.warning(&format!(
                    "Shutdown grace period of {}s elapsed with requests still in flight",
                    self.config.shutdown_grace
                ));
                Ok(())
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
