pub mod json_store;
pub mod service;

pub use json_store::JsonJournalStore;
pub use service::DashboardService;

use async_trait::async_trait;
use thiserror::Error;

use crate::analytics::DateRange;
use crate::models::{EodRecord, MorningBiasSnapshot, Trade};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },
    #[error("a {kind} with id '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },
    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

/// Where the dashboard reads the journal from.
#[async_trait]
pub trait JournalSource: Send + Sync {
    async fn load_all_trades(&self) -> Result<Vec<Trade>, StoreError>;
    async fn load_morning_bias(
        &self,
        range: DateRange,
    ) -> Result<Vec<MorningBiasSnapshot>, StoreError>;
    async fn load_eod_records(&self, range: DateRange) -> Result<Vec<EodRecord>, StoreError>;
}
