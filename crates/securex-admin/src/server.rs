//! Admin console server

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::api::router::{create_router, AppState};
use crate::auth::{AdminCredentials, SessionService};
use crate::config::AppConfig;
use crate::db::DbStore;
use crate::metrics::{MetricsService, MetricsSource};
use crate::series::SeriesGenerator;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Admin console server
pub struct AdminServer {
    config: AppConfig,
    state: AppState,
}

impl AdminServer {
    /// Build the shared state. Never dials the database.
    pub async fn new(config: AppConfig) -> Result<Self> {
        if config.uses_default_password() {
            warn!("ADMIN_PASSWORD is not set; using the built-in default password");
        }
        let credentials = AdminCredentials::from_config(&config)?;

        let source: Option<Arc<dyn MetricsSource>> = match &config.database_url {
            Some(url) => match DbStore::connect_lazy(url, &config) {
                Ok(store) => {
                    if config.run_migrations {
                        if let Err(e) = store.run_migrations().await {
                            warn!("Migrations failed, continuing: {}", e);
                        }
                    }
                    info!("Metrics store configured ({:?})", config.environment);
                    Some(Arc::new(store) as Arc<dyn MetricsSource>)
                }
                Err(e) => {
                    warn!("Invalid DATABASE_URL, serving mock data only: {}", e);
                    None
                }
            },
            None => {
                info!("DATABASE_URL not set, serving mock data only");
                None
            }
        };

        let state = AppState::new(
            MetricsService::new(source),
            SeriesGenerator::new(config.max_range_days),
            credentials,
            SessionService::new(config.session_timeout_minutes),
        )?;

        Ok(Self { config, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Run until interrupted
    pub async fn run(&self) -> Result<()> {
        let app = self.router();
        let addr = self.config.listen_addr;

        // Start session sweep
        let sessions = self.state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    debug!("Purged {} expired sessions", purged);
                }
            }
        });

        if let (Some(cert_path), Some(key_path)) = (&self.config.tls_cert_path, &self.config.tls_key_path) {
            use axum_server::tls_rustls::RustlsConfig;

            info!("Starting SecureX admin console on https://{} (TLS enabled)", addr);
            let tls = RustlsConfig::from_pem_file(cert_path, key_path).await?;

            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        } else {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Starting SecureX admin console on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        info!("Admin console stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordSource;

    #[tokio::test]
    async fn test_new_without_database_is_mock_only() {
        let server = AdminServer::new(AppConfig::default()).await.unwrap();
        assert!(!server.state().metrics.has_store());
        assert_eq!(server.state().sessions.active_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_still_boots() {
        let config = AppConfig {
            database_url: Some("postgres://user:pw@127.0.0.1:1/stats".into()),
            ..AppConfig::default()
        };
        let server = AdminServer::new(config).await.unwrap();
        assert!(server.state().metrics.has_store());
    }

    #[tokio::test]
    async fn test_bad_hash_fails_startup() {
        let config = AppConfig {
            admin_password: PasswordSource::Hash("garbage".into()),
            ..AppConfig::default()
        };
        assert!(AdminServer::new(config).await.is_err());
    }
}
