use std::sync::Arc;
use tokio::sync::RwLock;

use identa_core::{AuditLog, AuditStore, AuditStoreError, UserId};

/// Append-only audit log kept in memory.
#[derive(Default, Clone)]
pub struct HashMapAuditStore {
    logs: Arc<RwLock<Vec<AuditLog>>>,
}

impl HashMapAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AuditStore for HashMapAuditStore {
    async fn save(&self, log: &AuditLog) -> Result<(), AuditStoreError> {
        self.logs.write().await.push(log.clone());
        Ok(())
    }

    async fn find_by_target(&self, target_id: &UserId) -> Result<Vec<AuditLog>, AuditStoreError> {
        let logs = self.logs.read().await;
        let mut found: Vec<AuditLog> = logs
            .iter()
            .filter(|log| log.target_id.as_ref() == Some(target_id))
            .cloned()
            .collect();
        // Equal timestamps keep the latest insert first.
        found.reverse();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }
}
