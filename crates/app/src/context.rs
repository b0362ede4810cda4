//! Application context - dependency injection container

use std::sync::Arc;

use thanksync_core::{SyncService, SyncSettings};
use thanksync_domain::{Config, Result};
use thanksync_infra::{
    ApiClient, ApiTestTakerSource, CredentialsAuthenticator, DbManager, LogNotifier,
    SqliteLedgerRepository, SqliteWatermarkRepository, SyncScheduler, SyncSchedulerConfig,
};
use tracing::info;

/// Application context - holds the configuration and the wired services
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub sync_service: Arc<SyncService>,
}

impl AppContext {
    /// Open the state database and connect every port of the sync service.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated, or if
    /// the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::open(&config.database)?);
        db.health_check()?;

        let client = ApiClient::from_config(&config.api)?;
        let tokens = CredentialsAuthenticator::from_config(client.clone(), &config.api);
        let source = ApiTestTakerSource::from_config(client, &config.api);

        let sync_service = Arc::new(SyncService::new(
            Arc::new(tokens),
            Arc::new(source),
            Arc::new(SqliteWatermarkRepository::new(Arc::clone(&db))),
            Arc::new(SqliteLedgerRepository::new(Arc::clone(&db))),
            Arc::new(LogNotifier::new()),
            SyncSettings::from_config(&config),
        ));

        info!(
            db_path = %db.path().display(),
            page_size = config.sync.page_size,
            interval_secs = config.sync.interval_seconds,
            advance = %config.sync.watermark_advance,
            "application context ready"
        );

        Ok(Self { config, db, sync_service })
    }

    /// Scheduler for the sync service, not yet started.
    pub fn sync_scheduler(&self) -> SyncScheduler {
        SyncScheduler::new(
            Arc::clone(&self.sync_service),
            SyncSchedulerConfig::from(&self.config.sync),
        )
    }
}
