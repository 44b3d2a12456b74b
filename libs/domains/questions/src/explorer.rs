//! Bounded registry of in-memory datasets opened for exploration.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{QuestionError, QuestionResult};
use crate::models::{DataPage, PageParams, QuestionRecord};

pub const DEFAULT_CAPACITY: usize = 16;

/// A registered dataset. Rows are shared, not copied, between snapshots.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub records: Arc<Vec<QuestionRecord>>,
}

impl Snapshot {
    pub fn page(&self, params: PageParams) -> DataPage {
        let (offset, limit) = (params.offset(), params.limit());
        let rows = self
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        DataPage {
            data_id: self.id,
            offset,
            limit,
            total: self.records.len(),
            rows,
        }
    }
}

/// Holds at most `capacity` snapshots; registering past the limit evicts the
/// oldest one.
#[derive(Debug)]
pub struct DataExplorer {
    snapshots: RwLock<VecDeque<Arc<Snapshot>>>,
    capacity: usize,
}

impl Default for DataExplorer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DataExplorer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Register a dataset and return its id
    pub async fn register(&self, records: Arc<Vec<QuestionRecord>>) -> Uuid {
        let snapshot = Arc::new(Snapshot {
            id: Uuid::new_v4(),
            registered_at: Utc::now(),
            records,
        });
        let id = snapshot.id;

        let mut snapshots = self.snapshots.write().await;
        while snapshots.len() >= self.capacity {
            if let Some(evicted) = snapshots.pop_front() {
                debug!(data_id = %evicted.id, "Evicted explorer snapshot");
            }
        }
        snapshots.push_back(snapshot);

        info!(data_id = %id, live = snapshots.len(), "Registered explorer snapshot");
        id
    }

    pub async fn get(&self, id: Uuid) -> QuestionResult<Arc<Snapshot>> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| QuestionError::DatasetNotFound(id.to_string()))
    }

    pub async fn page(&self, id: Uuid, params: PageParams) -> QuestionResult<DataPage> {
        Ok(self.get(id).await?.page(params))
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
