use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use domain::identity::NeuronId;
use domain::neuron::{Neuron, SnsError, SnsThreshold};
use domain::permission::PermissionError;
use domain::principal::Principal;

use crate::error::{AuthError, AuthResult};
use crate::ports::incoming::permissions::PermissionCheckUseCase;
use crate::ports::incoming::sns::SnsUseCase;
use crate::ports::outgoing::identity_index::DynIdentityIndexPort;
use crate::ports::outgoing::neuron_oracle::DynNeuronOraclePort;
use crate::ports::outgoing::sns_store::DynSnsThresholdStorePort;

pub struct SnsService {
    threshold_store: DynSnsThresholdStorePort,
    identity_index: DynIdentityIndexPort,
    permission_checks: Arc<dyn PermissionCheckUseCase>,
    oracle: DynNeuronOraclePort,
}

impl SnsService {
    pub fn new(
        threshold_store: DynSnsThresholdStorePort,
        identity_index: DynIdentityIndexPort,
        permission_checks: Arc<dyn PermissionCheckUseCase>,
        oracle: DynNeuronOraclePort,
    ) -> Self {
        Self {
            threshold_store,
            identity_index,
            permission_checks,
            oracle,
        }
    }

    async fn require_admin(&self, caller: &Principal) -> AuthResult<()> {
        match self.permission_checks.ensure_admin(caller).await {
            Ok(()) => Ok(()),
            Err(AuthError::Permission(PermissionError::NotAuthorized { required })) => {
                Err(SnsError::NotAuthorized { required }.into())
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait::async_trait]
impl SnsUseCase for SnsService {
    async fn set_threshold(
        &self,
        caller: Principal,
        governance: Principal,
        permission: String,
        threshold: SnsThreshold,
    ) -> AuthResult<()> {
        self.require_admin(&caller).await?;

        let governance_index = self.identity_index.index_of_principal(&governance).await?;
        let permission_index = self
            .identity_index
            .index_of_bytes(permission.as_bytes())
            .await?;
        self.threshold_store
            .upsert_threshold(governance_index, permission_index, threshold)
            .await?;

        tracing::info!(
            governance = %governance,
            permission = %permission,
            min_voting_power = threshold.min_voting_power,
            "Voting power threshold configured"
        );
        Ok(())
    }

    async fn threshold(
        &self,
        governance: &Principal,
        permission: &str,
    ) -> AuthResult<Option<SnsThreshold>> {
        let Some(governance_index) = self.identity_index.lookup_bytes(governance.as_bytes()).await?
        else {
            return Ok(None);
        };
        let Some(permission_index) =
            self.identity_index.lookup_bytes(permission.as_bytes()).await?
        else {
            return Ok(None);
        };
        self.threshold_store
            .threshold(governance_index, permission_index)
            .await
    }

    #[instrument(skip(self))]
    async fn check_sns_permission(
        &self,
        principal: &Principal,
        permission: &str,
        governance: &Principal,
    ) -> AuthResult<bool> {
        if principal == governance {
            return Ok(true);
        }

        if self
            .permission_checks
            .check_permission(principal, permission)
            .await?
        {
            return Ok(true);
        }

        let Some(threshold) = self.threshold(governance, permission).await? else {
            return Ok(false);
        };

        let neurons = self.oracle.list_neurons(principal).await?;
        let voting_power: u128 = neurons
            .iter()
            .filter(|neuron| neuron.involves(principal))
            .map(Neuron::voting_power)
            .sum();

        Ok(voting_power >= u128::from(threshold.min_voting_power))
    }

    #[instrument(skip(self))]
    async fn has_neuron_access(
        &self,
        principal: &Principal,
        neuron_id: &NeuronId,
        governance: &Principal,
    ) -> AuthResult<bool> {
        if principal == governance {
            return Ok(true);
        }

        let neurons = self.find_reachable_neurons(principal, governance).await?;
        Ok(neurons
            .iter()
            .any(|neuron| neuron.id.as_ref() == Some(neuron_id)))
    }

    async fn find_reachable_principals(
        &self,
        principal: &Principal,
        _governance: &Principal,
    ) -> AuthResult<Vec<Principal>> {
        let neurons = self.oracle.list_neurons(principal).await?;

        let mut owners = Vec::new();
        for neuron in &neurons {
            let Some(owner) = neuron.owner() else {
                continue;
            };
            if !owners.contains(owner) {
                owners.push(owner.clone());
            }
        }
        Ok(owners)
    }

    async fn find_reachable_neurons(
        &self,
        principal: &Principal,
        governance: &Principal,
    ) -> AuthResult<Vec<Neuron>> {
        let owners = self
            .find_reachable_principals(principal, governance)
            .await?;

        let mut seen: HashSet<Vec<u8>> = HashSet::new();
        let mut neurons = Vec::new();
        for owner in &owners {
            for neuron in self.oracle.list_neurons(owner).await? {
                let Some(id) = &neuron.id else {
                    continue;
                };
                if seen.insert(id.as_bytes().to_vec()) {
                    neurons.push(neuron);
                }
            }
        }
        Ok(neurons)
    }
}
