use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    identity::NeuronId,
    name::{BannedWordEntry, NameRecord, NameSettings, ResolvedName},
    principal::{Account, Principal},
};

#[async_trait::async_trait]
pub trait NameUseCase: Send + Sync {
    async fn set_principal_name(
        &self,
        caller: Principal,
        subject: Principal,
        name: String,
    ) -> AuthResult<NameRecord>;

    async fn remove_principal_name(&self, caller: Principal, subject: Principal)
    -> AuthResult<()>;

    async fn set_account_name(
        &self,
        caller: Principal,
        account: Account,
        name: String,
    ) -> AuthResult<NameRecord>;

    async fn remove_account_name(&self, caller: Principal, account: Account) -> AuthResult<()>;

    async fn set_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
        name: String,
    ) -> AuthResult<NameRecord>;

    async fn remove_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<()>;

    async fn set_sns_principal_name(
        &self,
        caller: Principal,
        governance: Principal,
        subject: Principal,
        name: String,
    ) -> AuthResult<NameRecord>;

    async fn remove_sns_principal_name(
        &self,
        caller: Principal,
        governance: Principal,
        subject: Principal,
    ) -> AuthResult<()>;
}

#[async_trait::async_trait]
pub trait NameQueryUseCase: Send + Sync {
    async fn get_principal_name(&self, subject: &Principal) -> AuthResult<Option<NameRecord>>;

    async fn get_account_name(&self, account: &Account) -> AuthResult<Option<NameRecord>>;

    async fn get_neuron_name(&self, neuron_id: &NeuronId) -> AuthResult<Option<NameRecord>>;

    async fn resolve_name(&self, name: &str) -> AuthResult<Option<ResolvedName>>;
}

#[async_trait::async_trait]
pub trait NameVerifyUseCase: Send + Sync {
    async fn verify_name(&self, caller: Principal, name: String) -> AuthResult<NameRecord>;

    async fn unverify_name(&self, caller: Principal, name: String) -> AuthResult<NameRecord>;

    async fn verify_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<NameRecord>;

    async fn unverify_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<NameRecord>;
}

#[async_trait::async_trait]
pub trait BlacklistUseCase: Send + Sync {
    async fn add_banned_word(&self, caller: Principal, word: String) -> AuthResult<()>;

    async fn remove_banned_word(&self, caller: Principal, word: String) -> AuthResult<()>;

    async fn banned_words(&self, caller: Principal)
    -> AuthResult<Vec<(String, BannedWordEntry)>>;
}

#[async_trait::async_trait]
pub trait NameSettingsUseCase: Send + Sync {
    async fn set_name_settings(&self, caller: Principal, settings: NameSettings)
    -> AuthResult<()>;

    async fn name_settings(&self) -> AuthResult<NameSettings>;
}

pub type DynNameUseCase = Arc<dyn NameUseCase>;
pub type DynNameQueryUseCase = Arc<dyn NameQueryUseCase>;
pub type DynNameVerifyUseCase = Arc<dyn NameVerifyUseCase>;
pub type DynBlacklistUseCase = Arc<dyn BlacklistUseCase>;
pub type DynNameSettingsUseCase = Arc<dyn NameSettingsUseCase>;
