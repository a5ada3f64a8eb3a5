use std::sync::Arc;

use crate::error::AuthResult;
use domain::{identity::SubjectIndex, neuron::SnsThreshold};

#[async_trait::async_trait]
pub trait SnsThresholdStorePort: Send + Sync {
    async fn threshold(
        &self,
        governance: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<Option<SnsThreshold>>;

    async fn upsert_threshold(
        &self,
        governance: SubjectIndex,
        permission: SubjectIndex,
        threshold: SnsThreshold,
    ) -> AuthResult<()>;

    async fn thresholds(&self) -> AuthResult<Vec<((SubjectIndex, SubjectIndex), SnsThreshold)>>;
}

pub type DynSnsThresholdStorePort = Arc<dyn SnsThresholdStorePort>;
