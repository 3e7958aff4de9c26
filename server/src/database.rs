//! # MongoDB
//!
//! Document database holding the single profile document.
//!
//! ## Requirements
//!
//! - One collection (`users`), one document, fixed key `userid = 1`
//! - Server must keep serving while the database is still coming up
//!   (containers start in arbitrary order)
//!
//! ## Implementation
//!
//! - One long-lived client established by a background task at startup
//! - Bounded retry with a fixed delay between attempts
//! - [`ConnectionHandle`] is the readiness gate consulted by handlers;
//!   once the retry budget is spent it reports [`ConnectionStatus::Failed`]
//!   and the server keeps running with persistence disabled

use std::{
    future::Future,
    sync::{Arc, RwLock},
    time::Duration,
};

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::{error, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Initial state, attempts still in flight.
    Connecting,
    /// Terminal, a live handle is stored.
    Connected,
    /// Terminal, the retry budget is spent.
    Failed,
}

/// Shared slot for the process-lifetime database handle.
///
/// The retry task is the only writer; request handlers read a snapshot
/// via [`ConnectionHandle::get`].
pub struct ConnectionHandle<T> {
    slot: RwLock<Slot<T>>,
}

struct Slot<T> {
    handle: Option<T>,
    status: ConnectionStatus,
}

impl<T: Clone> ConnectionHandle<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                handle: None,
                status: ConnectionStatus::Connecting,
            }),
        }
    }

    pub fn get(&self) -> Option<T> {
        self.slot
            .read()
            .expect("connection slot lock poisoned")
            .handle
            .clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.slot
            .read()
            .expect("connection slot lock poisoned")
            .status
    }

    fn set_connected(&self, handle: T) {
        let mut slot = self.slot.write().expect("connection slot lock poisoned");

        slot.handle = Some(handle);
        slot.status = ConnectionStatus::Connected;
    }

    fn set_failed(&self) {
        self.slot
            .write()
            .expect("connection slot lock poisoned")
            .status = ConnectionStatus::Failed;
    }
}

impl<T: Clone> Default for ConnectionHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempts `connect` until it succeeds or `retries` extra attempts are
/// spent, sleeping `delay` between attempts.
///
/// Runs as a fire-and-forget background task, so nothing propagates out:
/// success stores the handle, exhaustion flips the slot to
/// [`ConnectionStatus::Failed`] and the server stays up in degraded mode.
pub async fn connect_with_retry<T, E, C, Fut>(
    handle: Arc<ConnectionHandle<T>>,
    mut retries: u32,
    delay: Duration,
    mut connect: C,
) where
    T: Clone,
    E: std::fmt::Display,
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        match connect().await {
            Ok(connection) => {
                handle.set_connected(connection);
                info!("Connected successfully to MongoDB");
                return;
            }
            Err(e) => {
                error!("MongoDB connection failed: {e}");

                if retries == 0 {
                    error!(
                        "Max retries reached. Continuing without DB connection \
                         (save/load features disabled)"
                    );
                    handle.set_failed();
                    return;
                }

                info!(
                    "Retrying connection in {} seconds... ({retries} attempts left)",
                    delay.as_secs_f64()
                );
                retries -= 1;
                sleep(delay).await;
            }
        }
    }
}

/// One connection attempt: parse the URL, connect with bounded timeouts,
/// ping to verify, hand back the database.
pub async fn connect_mongo(
    mongo_url: &str,
    database_name: &str,
) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(mongo_url).await?;
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    Ok(client.database(database_name))
}
