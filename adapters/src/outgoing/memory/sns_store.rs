use dashmap::DashMap;

use domain::{identity::SubjectIndex, neuron::SnsThreshold};
use namehub_application::error::AuthResult;
use namehub_application::ports::outgoing::sns_store::SnsThresholdStorePort;

#[derive(Debug, Default)]
pub struct MemorySnsThresholdStore {
    thresholds: DashMap<(SubjectIndex, SubjectIndex), SnsThreshold>,
}

impl MemorySnsThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(thresholds: Vec<(SubjectIndex, SubjectIndex, SnsThreshold)>) -> Self {
        let store = Self::new();
        for (governance, permission, threshold) in thresholds {
            store.thresholds.insert((governance, permission), threshold);
        }
        store
    }

    pub fn threshold_snapshot(&self) -> Vec<(SubjectIndex, SubjectIndex, SnsThreshold)> {
        let mut thresholds: Vec<_> = self
            .thresholds
            .iter()
            .map(|entry| (entry.key().0, entry.key().1, *entry.value()))
            .collect();
        thresholds.sort_by_key(|(governance, permission, _)| (*governance, *permission));
        thresholds
    }
}

#[async_trait::async_trait]
impl SnsThresholdStorePort for MemorySnsThresholdStore {
    async fn threshold(
        &self,
        governance: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<Option<SnsThreshold>> {
        Ok(self
            .thresholds
            .get(&(governance, permission))
            .map(|threshold| *threshold.value()))
    }

    async fn upsert_threshold(
        &self,
        governance: SubjectIndex,
        permission: SubjectIndex,
        threshold: SnsThreshold,
    ) -> AuthResult<()> {
        self.thresholds.insert((governance, permission), threshold);
        Ok(())
    }

    async fn thresholds(&self) -> AuthResult<Vec<((SubjectIndex, SubjectIndex), SnsThreshold)>> {
        Ok(self
            .threshold_snapshot()
            .into_iter()
            .map(|(governance, permission, threshold)| ((governance, permission), threshold))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upserts_overwrite_existing_thresholds() {
        let store = MemorySnsThresholdStore::new();
        let key = (SubjectIndex(1), SubjectIndex(2));

        store
            .upsert_threshold(
                key.0,
                key.1,
                SnsThreshold {
                    min_voting_power: 10,
                    max_duration: None,
                    default_duration: None,
                },
            )
            .await
            .unwrap();
        store
            .upsert_threshold(
                key.0,
                key.1,
                SnsThreshold {
                    min_voting_power: 99,
                    max_duration: None,
                    default_duration: None,
                },
            )
            .await
            .unwrap();

        let stored = store.threshold(key.0, key.1).await.unwrap().unwrap();
        assert_eq!(stored.min_voting_power, 99);
        assert_eq!(store.thresholds().await.unwrap().len(), 1);
    }
}
