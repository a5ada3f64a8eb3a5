use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    identity::NeuronId,
    neuron::{Neuron, SnsThreshold},
    principal::Principal,
};

#[async_trait::async_trait]
pub trait SnsUseCase: Send + Sync {
    async fn set_threshold(
        &self,
        caller: Principal,
        governance: Principal,
        permission: String,
        threshold: SnsThreshold,
    ) -> AuthResult<()>;

    async fn threshold(
        &self,
        governance: &Principal,
        permission: &str,
    ) -> AuthResult<Option<SnsThreshold>>;

    async fn check_sns_permission(
        &self,
        principal: &Principal,
        permission: &str,
        governance: &Principal,
    ) -> AuthResult<bool>;

    async fn has_neuron_access(
        &self,
        principal: &Principal,
        neuron_id: &NeuronId,
        governance: &Principal,
    ) -> AuthResult<bool>;

    async fn find_reachable_principals(
        &self,
        principal: &Principal,
        governance: &Principal,
    ) -> AuthResult<Vec<Principal>>;

    async fn find_reachable_neurons(
        &self,
        principal: &Principal,
        governance: &Principal,
    ) -> AuthResult<Vec<Neuron>>;
}

pub type DynSnsUseCase = Arc<dyn SnsUseCase>;
