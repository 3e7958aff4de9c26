use std::sync::Arc;

use mongodb::Database;
use tokio::spawn;

use super::{
    config::Config,
    database::{ConnectionHandle, connect_mongo, connect_with_retry},
};

pub struct AppState {
    pub config: Config,
    pub database: Arc<ConnectionHandle<Database>>,
}

impl AppState {
    /// Loads configuration and kicks off the background connection task.
    /// Returns immediately; handlers consult the handle for readiness.
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let database = Arc::new(ConnectionHandle::new());

        let mongo_url = config.mongo_url.clone();
        let database_name = config.database_name.clone();

        spawn(connect_with_retry(
            database.clone(),
            config.connect_retries,
            config.retry_delay,
            move || {
                let mongo_url = mongo_url.clone();
                let database_name = database_name.clone();

                async move { connect_mongo(&mongo_url, &database_name).await }
            },
        ));

        Arc::new(Self { config, database })
    }
}
