use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entry::{EventKind, EventRecord};
use crate::traits::EventLog;
use vigil_types::{AgentId, VigilError};

/// In-memory event log implementation (default).
#[derive(Debug, Clone)]
pub struct InMemoryEventLog {
    records: Arc<RwLock<Vec<EventRecord>>>,
    index_by_id: Arc<DashMap<Uuid, usize>>,
    index_by_subject: Arc<DashMap<AgentId, Vec<usize>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            index_by_id: Arc::new(DashMap::new()),
            index_by_subject: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, record: EventRecord) -> Result<(), VigilError> {
        let mut records = self.records.write().await;
        let idx = records.len();

        self.index_by_id.insert(record.id, idx);
        self.index_by_subject
            .entry(record.subject)
            .or_default()
            .push(idx);

        records.push(record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<EventRecord>, VigilError> {
        let records = self.records.read().await;
        Ok(self
            .index_by_id
            .get(&id)
            .and_then(|idx| records.get(*idx).cloned()))
    }

    async fn latest_hash(&self) -> Result<Option<String>, VigilError> {
        let records = self.records.read().await;
        Ok(records.last().map(|r| r.hash.clone()))
    }

    async fn query_by_subject(
        &self,
        subject: AgentId,
    ) -> Result<Vec<EventRecord>, VigilError> {
        let records = self.records.read().await;
        Ok(self
            .index_by_subject
            .get(&subject)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|i| records.get(*i).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, VigilError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.kind == kind).cloned().collect())
    }

    async fn all_records(&self) -> Result<Vec<EventRecord>, VigilError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn verify_integrity(&self) -> Result<bool, VigilError> {
        let records = self.records.read().await;
        for (i, record) in records.iter().enumerate() {
            if i == 0 {
                if record.previous_hash.is_some() {
                    return Ok(false);
                }
            } else if record.previous_hash.as_ref() != Some(&records[i - 1].hash) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_get() {
        let log = InMemoryEventLog::new();
        let record = EventRecord::new(
            EventKind::Pulse,
            0,
            AgentId::random(),
            AgentId::random(),
            serde_json::json!({}),
            None,
        );
        let id = record.id;
        log.append(record).await.unwrap();

        let retrieved = log.get(id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_chain_integrity() {
        let log = InMemoryEventLog::new();
        let subject = AgentId::random();

        let first = EventRecord::new(
            EventKind::Pulse,
            0,
            subject,
            subject,
            serde_json::json!({}),
            None,
        );
        let hash1 = first.hash.clone();
        log.append(first).await.unwrap();

        let second = EventRecord::new(
            EventKind::Pulse,
            86_400,
            subject,
            subject,
            serde_json::json!({}),
            Some(hash1),
        );
        log.append(second).await.unwrap();

        assert!(log.verify_integrity().await.unwrap());
    }

    #[tokio::test]
    async fn test_broken_chain_detected() {
        let log = InMemoryEventLog::new();
        let subject = AgentId::random();

        let first = EventRecord::new(
            EventKind::Pulse,
            0,
            subject,
            subject,
            serde_json::json!({}),
            None,
        );
        log.append(first).await.unwrap();

        // Second record chained to a hash that is not the tip.
        let second = EventRecord::new(
            EventKind::Pulse,
            86_400,
            subject,
            subject,
            serde_json::json!({}),
            Some("bogus".to_string()),
        );
        log.append(second).await.unwrap();

        assert!(!log.verify_integrity().await.unwrap());
    }

    #[tokio::test]
    async fn test_query_by_subject() {
        let log = InMemoryEventLog::new();
        let subject = AgentId::random();
        let other = AgentId::random();

        for i in 0..3 {
            let record = EventRecord::new(
                EventKind::Pulse,
                i * 86_400,
                subject,
                subject,
                serde_json::json!({}),
                log.latest_hash().await.unwrap(),
            );
            log.append(record).await.unwrap();
        }

        let record = EventRecord::new(
            EventKind::Pulse,
            0,
            other,
            other,
            serde_json::json!({}),
            log.latest_hash().await.unwrap(),
        );
        log.append(record).await.unwrap();

        let results = log.query_by_subject(subject).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_query_by_kind() {
        let log = InMemoryEventLog::new();
        let agent = AgentId::random();

        let pulse = EventRecord::new(
            EventKind::Pulse,
            0,
            agent,
            agent,
            serde_json::json!({}),
            None,
        );
        let hash = pulse.hash.clone();
        log.append(pulse).await.unwrap();

        let attestation = EventRecord::new(
            EventKind::AttestationSubmitted,
            10,
            agent,
            AgentId::random(),
            serde_json::json!({}),
            Some(hash),
        );
        log.append(attestation).await.unwrap();

        let pulses = log.query_by_kind(EventKind::Pulse).await.unwrap();
        assert_eq!(pulses.len(), 1);
        let attestations = log
            .query_by_kind(EventKind::AttestationSubmitted)
            .await
            .unwrap();
        assert_eq!(attestations.len(), 1);
    }
}
