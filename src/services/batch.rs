//! Batch Asset Registration
//!
//! Decodes and normalizes every submitted asset on its own, hands each one to
//! the store, and folds the per-item results into a single [`BatchOutcome`]
//! once all of them have completed. A failing item never stops the rest of
//! the batch and nothing is rolled back.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::database::store::AssetStore;
use crate::services::activos::{NewActivo, today_utc};

/// Store calls in flight at once when no limit is configured
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Aggregate result of one batch registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub total_submitted: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

impl BatchOutcome {
    /// Fold per-item results. Counts always add up to `total_submitted`.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        results.into_iter().fold(
            BatchOutcome {
                total_submitted: 0,
                succeeded_count: 0,
                failed_count: 0,
            },
            |mut outcome, succeeded| {
                outcome.total_submitted += 1;
                if succeeded {
                    outcome.succeeded_count += 1;
                } else {
                    outcome.failed_count += 1;
                }
                outcome
            },
        )
    }

    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Se requiere al menos un activo")]
    Empty,
}

/// Registers assets one store call per item
#[derive(Clone)]
pub struct BatchRegistrar {
    store: Arc<dyn AssetStore>,
    max_in_flight: usize,
}

impl BatchRegistrar {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Cap concurrent store calls, normally at the pool size
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Register a batch, defaulting missing purchase dates to today (UTC).
    pub async fn register_batch(&self, items: Vec<Value>) -> Result<BatchOutcome, BatchError> {
        self.register_batch_on(items, today_utc()).await
    }

    /// Register a batch with an explicit date for missing purchase dates.
    ///
    /// An element that does not decode as an asset counts as a failed item.
    /// At most `max_in_flight` submissions run at once; the outcome is only
    /// built after every one of them has finished.
    pub async fn register_batch_on(
        &self,
        items: Vec<Value>,
        today: NaiveDate,
    ) -> Result<BatchOutcome, BatchError> {
        if items.is_empty() {
            return Err(BatchError::Empty);
        }

        let submissions = items.into_iter().enumerate().map(|(index, item)| {
            let store = Arc::clone(&self.store);
            async move {
                let record = match serde_json::from_value::<NewActivo>(item) {
                    Ok(activo) => activo.normalize(today),
                    Err(e) => {
                        warn!("⚠️ Activo {} rechazado, formato inválido: {}", index + 1, e);
                        return false;
                    }
                };

                match store.insert_activo(&record).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!(
                            "❌ Error al registrar activo {} ({}): {}",
                            index + 1,
                            record.item_code.as_deref().unwrap_or("sin ItemCode"),
                            e
                        );
                        false
                    }
                }
            }
        });

        let results: Vec<bool> = stream::iter(submissions)
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        let outcome = BatchOutcome::from_results(results);
        info!(
            "Batch registration finished: total={} ok={} failed={}",
            outcome.total_submitted, outcome.succeeded_count, outcome.failed_count
        );
        Ok(outcome)
    }
}
