//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database connection,
//! migrations, default admin, REST API, metrics, graceful shutdown.
//! Binaries only parse options and wait on the handle.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::modules::metrics::install_recorder;
use crate::interfaces::http::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{init_database, SeaOrmRepositoryProvider};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup
    pub auto_migrate: bool,
    /// Create the configured admin while no users exist
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// Handle to a running server.
///
/// ```rust,no_run
/// use coworking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address actually bound; differs from the config when port 0 was requested
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable; /metrics disabled");
                None
            }
        })
        .clone()
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting coworking service...");

        let prometheus = prometheus_handle();

        let db = init_database(&app_cfg.database_config()).await?;
        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = app_cfg.jwt_config();
        info!(
            expiration_minutes = jwt_config.expiration_minutes,
            "JWT configured"
        );
        let services = ApiServices::new(repos.clone(), jwt_config);

        if opts.create_default_admin {
            let admin = &app_cfg.admin;
            match services
                .users
                .ensure_default_admin(&admin.username, &admin.email, &admin.password)
                .await
            {
                Ok(Some(user)) => info!(user_id = user.id, "Default admin created"),
                Ok(None) => {}
                Err(e) => error!(error = %e, "Failed to create default admin"),
            }
        }

        let router = create_api_router(services, Some(db.clone()), prometheus);

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests (bounded by `shutdown_timeout`), then
    /// close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async {
                if let Err(e) = api_task.await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Some requests were still running at shutdown");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Coworking service stopped");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the logging section. `RUST_LOG` wins over the
/// configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.admin.password = "admin-pass".into();
        ServerOptions {
            config,
            ..ServerOptions::default()
        }
    }

    #[tokio::test]
    async fn starts_seeds_and_stops() {
        let handle = ServerHandle::start(options()).await.unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);

        assert_eq!(handle.repos.users().count().await.unwrap(), 1);
        let admin = handle.repos.users().find_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin());

        handle.shutdown().await;
    }
}
