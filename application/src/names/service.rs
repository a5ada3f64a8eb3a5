use std::sync::Arc;

use domain::identity::{NeuronId, SubjectIndex};
use domain::name::{
    BannedWordEntry, NameClaim, NameError, NameRecord, NameSettings, ResolvedName,
};
use domain::permission::{PermissionCheck, well_known};
use domain::principal::{Account, Principal};

use crate::error::{AuthError, AuthResult};
use crate::names::name_validator::NameValidator;
use crate::ports::incoming::names::{
    BlacklistUseCase, NameQueryUseCase, NameSettingsUseCase, NameUseCase, NameVerifyUseCase,
};
use crate::ports::incoming::permissions::PermissionCheckUseCase;
use crate::ports::incoming::sns::DynSnsUseCase;
use crate::ports::outgoing::clock::DynClockPort;
use crate::ports::outgoing::identity_index::DynIdentityIndexPort;
use crate::ports::outgoing::name_store::DynNameStorePort;

pub struct NameService {
    name_store: DynNameStorePort,
    identity_index: DynIdentityIndexPort,
    clock: DynClockPort,
    permission_checks: Arc<dyn PermissionCheckUseCase>,
    sns: Option<DynSnsUseCase>,
    validator: NameValidator,
}

impl NameService {
    pub fn new(
        name_store: DynNameStorePort,
        identity_index: DynIdentityIndexPort,
        clock: DynClockPort,
        permission_checks: Arc<dyn PermissionCheckUseCase>,
        sns: Option<DynSnsUseCase>,
    ) -> Self {
        Self {
            name_store,
            identity_index,
            clock,
            permission_checks,
            sns,
            validator: NameValidator::new(),
        }
    }

    async fn check(&self, caller: &Principal, permission: &str) -> AuthResult<PermissionCheck> {
        self.permission_checks
            .check_permission_detailed(caller, permission)
            .await
    }

    async fn require(&self, caller: &Principal, permission: &str) -> AuthResult<()> {
        match self.check(caller, permission).await? {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                Err(AuthError::Banned { reason, expires_at })
            }
            _ => Err(NameError::NotAuthorized {
                required: permission.to_string(),
            }
            .into()),
        }
    }

    async fn authorize_principal_edit(
        &self,
        caller: &Principal,
        subject: &Principal,
    ) -> AuthResult<()> {
        match self.check(caller, well_known::EDIT_ANY_NAME).await? {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                Err(AuthError::Banned { reason, expires_at })
            }
            _ if caller == subject => Ok(()),
            _ => Err(NameError::NotAuthorized {
                required: well_known::EDIT_ANY_NAME.to_string(),
            }
            .into()),
        }
    }

    async fn authorize_account_edit(
        &self,
        caller: &Principal,
        account: &Account,
        required: &str,
    ) -> AuthResult<()> {
        match self.check(caller, required).await? {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                Err(AuthError::Banned { reason, expires_at })
            }
            _ if *caller == account.owner => Ok(()),
            _ => Err(NameError::NotAuthorized {
                required: required.to_string(),
            }
            .into()),
        }
    }

    async fn authorize_neuron_edit(
        &self,
        caller: &Principal,
        governance: &Principal,
        neuron_id: &NeuronId,
        required: &str,
    ) -> AuthResult<()> {
        match self.check(caller, required).await? {
            PermissionCheck::Allowed => return Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                return Err(AuthError::Banned { reason, expires_at });
            }
            _ => {}
        }

        if let Some(sns) = &self.sns {
            if sns
                .check_sns_permission(caller, required, governance)
                .await?
            {
                return Ok(());
            }
            if sns.has_neuron_access(caller, neuron_id, governance).await? {
                return Ok(());
            }
        }

        Err(NameError::NotAuthorized {
            required: required.to_string(),
        }
        .into())
    }

    async fn authorize_sns_principal_edit(
        &self,
        caller: &Principal,
        governance: &Principal,
        subject: &Principal,
        required: &str,
    ) -> AuthResult<()> {
        match self.check(caller, required).await? {
            PermissionCheck::Allowed => return Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                return Err(AuthError::Banned { reason, expires_at });
            }
            _ => {}
        }

        if caller == subject || caller == governance {
            return Ok(());
        }

        if let Some(sns) = &self.sns {
            if sns
                .check_sns_permission(caller, required, governance)
                .await?
            {
                return Ok(());
            }
            if sns
                .find_reachable_principals(caller, governance)
                .await?
                .contains(subject)
            {
                return Ok(());
            }
        }

        Err(NameError::NotAuthorized {
            required: required.to_string(),
        }
        .into())
    }

    async fn validate_candidate(&self, name: &str) -> AuthResult<()> {
        let settings = self.name_store.settings().await?;
        self.validator.validate(name, &settings)?;

        if let Some(word) = self
            .name_store
            .matching_banned_word(&name.to_lowercase())
            .await?
        {
            return Err(NameError::BannedWord { word }.into());
        }

        Ok(())
    }

    async fn set_name(
        &self,
        caller: &Principal,
        subject: SubjectIndex,
        name: String,
    ) -> AuthResult<NameRecord> {
        self.validate_candidate(&name).await?;

        let now = self.clock.now();
        let record = match self.name_store.record(subject).await? {
            Some(existing) => existing.renamed(name.clone(), now, caller.clone()),
            None => NameRecord::new(name.clone(), now, caller.clone()),
        };

        match self.name_store.claim_name(subject, record.clone()).await? {
            NameClaim::Claimed { .. } => {
                tracing::info!(subject = %subject, name = %record.name, set_by = %caller, "Name set");
                Ok(record)
            }
            NameClaim::Taken { holder } => {
                let taken_by = self.identity_index.principal_of(holder).await?;
                Err(NameError::NameAlreadyTaken { name, taken_by }.into())
            }
        }
    }

    async fn remove_name(&self, caller: &Principal, subject: SubjectIndex) -> AuthResult<()> {
        match self.name_store.remove_record(subject).await? {
            Some(record) => {
                tracing::info!(subject = %subject, name = %record.name, removed_by = %caller, "Name removed");
                Ok(())
            }
            None => Err(NameError::NameNotFound.into()),
        }
    }

    async fn set_verified(
        &self,
        caller: &Principal,
        subject: SubjectIndex,
        verified: bool,
        missing: NameError,
    ) -> AuthResult<NameRecord> {
        let Some(record) = self.name_store.record(subject).await? else {
            return Err(missing.into());
        };

        let updated = record.with_verified(verified, self.clock.now(), caller.clone());
        self.name_store.update_record(subject, updated.clone()).await?;

        tracing::info!(subject = %subject, name = %updated.name, verified, "Name verification updated");
        Ok(updated)
    }

    async fn verified_by_name(
        &self,
        caller: &Principal,
        name: &str,
        verified: bool,
    ) -> AuthResult<NameRecord> {
        let Some(holder) = self.name_store.holder_of(&name.to_lowercase()).await? else {
            return Err(NameError::NameNotFound.into());
        };
        self.set_verified(caller, holder, verified, NameError::NameNotFound)
            .await
    }

    async fn verified_by_neuron(
        &self,
        caller: &Principal,
        governance: &Principal,
        neuron_id: &NeuronId,
        verified: bool,
        required: &str,
    ) -> AuthResult<NameRecord> {
        if caller != governance {
            self.require(caller, required).await?;
        }

        let Some(subject) = self.identity_index.lookup_bytes(neuron_id.as_bytes()).await? else {
            return Err(NameError::NeuronNotFound.into());
        };
        self.set_verified(caller, subject, verified, NameError::NeuronNotFound)
            .await
    }

    async fn record_for_bytes(&self, bytes: &[u8]) -> AuthResult<Option<NameRecord>> {
        let Some(index) = self.identity_index.lookup_bytes(bytes).await? else {
            return Ok(None);
        };
        self.name_store.record(index).await
    }
}

#[async_trait::async_trait]
impl NameUseCase for NameService {
    async fn set_principal_name(
        &self,
        caller: Principal,
        subject: Principal,
        name: String,
    ) -> AuthResult<NameRecord> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_principal_edit(&caller, &subject).await?;

        let index = self.identity_index.index_of_principal(&subject).await?;
        self.set_name(&caller, index, name).await
    }

    async fn remove_principal_name(
        &self,
        caller: Principal,
        subject: Principal,
    ) -> AuthResult<()> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_principal_edit(&caller, &subject).await?;

        let Some(index) = self.identity_index.lookup_bytes(subject.as_bytes()).await? else {
            return Err(NameError::NameNotFound.into());
        };
        self.remove_name(&caller, index).await
    }

    async fn set_account_name(
        &self,
        caller: Principal,
        account: Account,
        name: String,
    ) -> AuthResult<NameRecord> {
        if account.has_default_subaccount() {
            return self.set_principal_name(caller, account.owner, name).await;
        }

        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_account_edit(&caller, &account, well_known::SET_ACCOUNT_NAME)
            .await?;

        let index = self
            .identity_index
            .index_of_bytes(&account.canonical_bytes())
            .await?;
        self.set_name(&caller, index, name).await
    }

    async fn remove_account_name(&self, caller: Principal, account: Account) -> AuthResult<()> {
        if account.has_default_subaccount() {
            return self.remove_principal_name(caller, account.owner).await;
        }

        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_account_edit(&caller, &account, well_known::REMOVE_ACCOUNT_NAME)
            .await?;

        let Some(index) = self
            .identity_index
            .lookup_bytes(&account.canonical_bytes())
            .await?
        else {
            return Err(NameError::NameNotFound.into());
        };
        self.remove_name(&caller, index).await
    }

    async fn set_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
        name: String,
    ) -> AuthResult<NameRecord> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_neuron_edit(
            &caller,
            &governance,
            &neuron_id,
            well_known::SET_SNS_NEURON_NAME,
        )
        .await?;

        let index = self
            .identity_index
            .index_of_bytes(neuron_id.as_bytes())
            .await?;
        self.set_name(&caller, index, name).await
    }

    async fn remove_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<()> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_neuron_edit(
            &caller,
            &governance,
            &neuron_id,
            well_known::REMOVE_SNS_NEURON_NAME,
        )
        .await?;

        let Some(index) = self.identity_index.lookup_bytes(neuron_id.as_bytes()).await? else {
            return Err(NameError::NameNotFound.into());
        };
        self.remove_name(&caller, index).await
    }

    async fn set_sns_principal_name(
        &self,
        caller: Principal,
        governance: Principal,
        subject: Principal,
        name: String,
    ) -> AuthResult<NameRecord> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_sns_principal_edit(
            &caller,
            &governance,
            &subject,
            well_known::SET_SNS_PRINCIPAL_NAME,
        )
        .await?;

        let index = self.identity_index.index_of_principal(&subject).await?;
        self.set_name(&caller, index, name).await
    }

    async fn remove_sns_principal_name(
        &self,
        caller: Principal,
        governance: Principal,
        subject: Principal,
    ) -> AuthResult<()> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.authorize_sns_principal_edit(
            &caller,
            &governance,
            &subject,
            well_known::REMOVE_SNS_PRINCIPAL_NAME,
        )
        .await?;

        let Some(index) = self.identity_index.lookup_bytes(subject.as_bytes()).await? else {
            return Err(NameError::NameNotFound.into());
        };
        self.remove_name(&caller, index).await
    }
}

#[async_trait::async_trait]
impl NameQueryUseCase for NameService {
    async fn get_principal_name(&self, subject: &Principal) -> AuthResult<Option<NameRecord>> {
        self.record_for_bytes(subject.as_bytes()).await
    }

    async fn get_account_name(&self, account: &Account) -> AuthResult<Option<NameRecord>> {
        if account.has_default_subaccount() {
            return self.get_principal_name(&account.owner).await;
        }
        self.record_for_bytes(&account.canonical_bytes()).await
    }

    async fn get_neuron_name(&self, neuron_id: &NeuronId) -> AuthResult<Option<NameRecord>> {
        self.record_for_bytes(neuron_id.as_bytes()).await
    }

    async fn resolve_name(&self, name: &str) -> AuthResult<Option<ResolvedName>> {
        let Some(holder) = self.name_store.holder_of(&name.to_lowercase()).await? else {
            return Ok(None);
        };
        let Some(record) = self.name_store.record(holder).await? else {
            return Ok(None);
        };

        Ok(Some(ResolvedName {
            holder: self.identity_index.principal_of(holder).await?,
            record,
        }))
    }
}

#[async_trait::async_trait]
impl NameVerifyUseCase for NameService {
    async fn verify_name(&self, caller: Principal, name: String) -> AuthResult<NameRecord> {
        self.require(&caller, well_known::VERIFY_NAME).await?;
        self.verified_by_name(&caller, &name, true).await
    }

    async fn unverify_name(&self, caller: Principal, name: String) -> AuthResult<NameRecord> {
        self.require(&caller, well_known::UNVERIFY_NAME).await?;
        self.verified_by_name(&caller, &name, false).await
    }

    async fn verify_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<NameRecord> {
        self.verified_by_neuron(
            &caller,
            &governance,
            &neuron_id,
            true,
            well_known::VERIFY_SNS_NEURON_NAME,
        )
        .await
    }

    async fn unverify_neuron_name(
        &self,
        caller: Principal,
        governance: Principal,
        neuron_id: NeuronId,
    ) -> AuthResult<NameRecord> {
        self.verified_by_neuron(
            &caller,
            &governance,
            &neuron_id,
            false,
            well_known::UNVERIFY_SNS_NEURON_NAME,
        )
        .await
    }
}

#[async_trait::async_trait]
impl BlacklistUseCase for NameService {
    async fn add_banned_word(&self, caller: Principal, word: String) -> AuthResult<()> {
        self.require(&caller, well_known::ADD_BANNED_WORD).await?;

        let word = word.to_lowercase();
        let entry = BannedWordEntry {
            added_by: caller.clone(),
            added_at: self.clock.now(),
        };
        if self.name_store.add_banned_word(word.clone(), entry).await? {
            tracing::info!(word = %word, added_by = %caller, "Banned word added");
        }
        Ok(())
    }

    async fn remove_banned_word(&self, caller: Principal, word: String) -> AuthResult<()> {
        self.require(&caller, well_known::REMOVE_BANNED_WORD)
            .await?;

        let word = word.to_lowercase();
        if self.name_store.remove_banned_word(&word).await? {
            tracing::info!(word = %word, removed_by = %caller, "Banned word removed");
        }
        Ok(())
    }

    async fn banned_words(
        &self,
        caller: Principal,
    ) -> AuthResult<Vec<(String, BannedWordEntry)>> {
        self.require(&caller, well_known::VIEW_BANNED_WORDS).await?;
        self.name_store.banned_words().await
    }
}

#[async_trait::async_trait]
impl NameSettingsUseCase for NameService {
    async fn set_name_settings(
        &self,
        caller: Principal,
        settings: NameSettings,
    ) -> AuthResult<()> {
        self.require(&caller, well_known::MANAGE_NAME_SETTINGS)
            .await?;
        settings.validate()?;
        self.name_store.update_settings(settings).await?;

        tracing::info!(updated_by = %caller, "Name settings updated");
        Ok(())
    }

    async fn name_settings(&self) -> AuthResult<NameSettings> {
        self.name_store.settings().await
    }
}
