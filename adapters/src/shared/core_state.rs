use std::sync::Arc;

use domain::principal::Principal;
use namehub_application::bans::service::BanService;
use namehub_application::config::CoreConfig;
use namehub_application::error::AuthResult;
use namehub_application::names::service::NameService;
use namehub_application::permissions::service::PermissionService;
use namehub_application::ports::incoming::admins::DynAdminUseCase;
use namehub_application::ports::incoming::bans::{DynBanQueryUseCase, DynBanUseCase};
use namehub_application::ports::incoming::maintenance::{CleanupReport, DynMaintenanceUseCase};
use namehub_application::ports::incoming::names::{
    DynBlacklistUseCase, DynNameQueryUseCase, DynNameSettingsUseCase, DynNameUseCase,
    DynNameVerifyUseCase,
};
use namehub_application::ports::incoming::permissions::{
    DynPermissionCheckUseCase, DynPermissionUseCase, PermissionCheckUseCase,
};
use namehub_application::ports::incoming::sns::DynSnsUseCase;
use namehub_application::ports::outgoing::ban_store::DynBanStorePort;
use namehub_application::ports::outgoing::clock::DynClockPort;
use namehub_application::ports::outgoing::identity_index::DynIdentityIndexPort;
use namehub_application::ports::outgoing::name_store::DynNameStorePort;
use namehub_application::ports::outgoing::neuron_oracle::DynNeuronOraclePort;
use namehub_application::ports::outgoing::permission_store::DynPermissionStorePort;
use namehub_application::ports::outgoing::sns_store::DynSnsThresholdStorePort;
use namehub_application::sns::service::SnsService;

use crate::outgoing::memory::ban_store::MemoryBanStore;
use crate::outgoing::memory::identity_index::MemoryIdentityIndex;
use crate::outgoing::memory::name_store::MemoryNameStore;
use crate::outgoing::memory::permission_store::MemoryPermissionStore;
use crate::outgoing::memory::snapshot::StableSnapshot;
use crate::outgoing::memory::sns_store::MemorySnsThresholdStore;

pub struct AuthCore {
    config: Arc<CoreConfig>,
    identity_index: Arc<MemoryIdentityIndex>,
    permission_store: Arc<MemoryPermissionStore>,
    ban_store: Arc<MemoryBanStore>,
    name_store: Arc<MemoryNameStore>,
    threshold_store: Arc<MemorySnsThresholdStore>,
    pub admins: DynAdminUseCase,
    pub permissions: DynPermissionUseCase,
    pub checks: DynPermissionCheckUseCase,
    pub maintenance: DynMaintenanceUseCase,
    pub bans: DynBanUseCase,
    pub ban_queries: DynBanQueryUseCase,
    pub sns: Option<DynSnsUseCase>,
    pub names: DynNameUseCase,
    pub name_queries: DynNameQueryUseCase,
    pub name_verification: DynNameVerifyUseCase,
    pub blacklist: DynBlacklistUseCase,
    pub name_settings: DynNameSettingsUseCase,
}

impl AuthCore {
    pub fn new(
        config: CoreConfig,
        oracle: Option<DynNeuronOraclePort>,
        clock: DynClockPort,
    ) -> AuthResult<Self> {
        config.validate()?;

        let identity_index = Arc::new(MemoryIdentityIndex::new());
        let permission_store = Arc::new(MemoryPermissionStore::new());
        let ban_store = Arc::new(MemoryBanStore::new(config.ban.clone()));
        let name_store = Arc::new(MemoryNameStore::new(config.names));
        let threshold_store = Arc::new(MemorySnsThresholdStore::new());

        Ok(Self::wire(
            config,
            identity_index,
            permission_store,
            ban_store,
            name_store,
            threshold_store,
            oracle,
            clock,
        ))
    }

    pub fn restore(
        snapshot: StableSnapshot,
        config: CoreConfig,
        oracle: Option<DynNeuronOraclePort>,
        clock: DynClockPort,
    ) -> AuthResult<Self> {
        config.validate()?;

        let snapshot_identity_count = snapshot.identity.entries.len();
        let identity_index = Arc::new(MemoryIdentityIndex::restore(snapshot.identity)?);
        let permission_store = Arc::new(MemoryPermissionStore::restore(
            snapshot.admins,
            snapshot.grants,
        ));
        let ban_store = Arc::new(MemoryBanStore::restore(
            snapshot.ban_log,
            snapshot.active_bans,
            snapshot.ban_settings,
        ));
        let name_store = Arc::new(MemoryNameStore::restore(
            snapshot.name_records,
            snapshot.name_index,
            snapshot.banned_words,
            snapshot.name_settings,
        )?);
        let threshold_store = Arc::new(MemorySnsThresholdStore::restore(snapshot.thresholds));

        tracing::info!(
            identities = snapshot_identity_count,
            "Core state restored from snapshot"
        );

        Ok(Self::wire(
            config,
            identity_index,
            permission_store,
            ban_store,
            name_store,
            threshold_store,
            oracle,
            clock,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn wire(
        config: CoreConfig,
        identity_index: Arc<MemoryIdentityIndex>,
        permission_store: Arc<MemoryPermissionStore>,
        ban_store: Arc<MemoryBanStore>,
        name_store: Arc<MemoryNameStore>,
        threshold_store: Arc<MemorySnsThresholdStore>,
        oracle: Option<DynNeuronOraclePort>,
        clock: DynClockPort,
    ) -> Self {
        let config = Arc::new(config);

        let identity_port: DynIdentityIndexPort = Arc::clone(&identity_index) as DynIdentityIndexPort;
        let permission_store_port: DynPermissionStorePort = Arc::clone(&permission_store) as DynPermissionStorePort;
        let ban_store_port: DynBanStorePort = Arc::clone(&ban_store) as DynBanStorePort;
        let name_store_port: DynNameStorePort = Arc::clone(&name_store) as DynNameStorePort;
        let threshold_store_port: DynSnsThresholdStorePort = Arc::clone(&threshold_store) as DynSnsThresholdStorePort;

        let permission_service = Arc::new(PermissionService::new(
            Arc::clone(&permission_store_port),
            Arc::clone(&ban_store_port),
            Arc::clone(&identity_port),
            Arc::clone(&clock),
            config.controller.clone(),
        ));
        let permission_checks: Arc<dyn PermissionCheckUseCase> = Arc::clone(&permission_service) as Arc<dyn PermissionCheckUseCase>;

        let ban_service = Arc::new(BanService::new(
            Arc::clone(&ban_store_port),
            Arc::clone(&identity_port),
            Arc::clone(&clock),
            Arc::clone(&permission_checks),
            config.controller.clone(),
        ));

        let sns_service: Option<DynSnsUseCase> = oracle.map(|oracle| {
            Arc::new(SnsService::new(
                Arc::clone(&threshold_store_port),
                Arc::clone(&identity_port),
                Arc::clone(&permission_checks),
                oracle,
            )) as DynSnsUseCase
        });

        let name_service = Arc::new(NameService::new(
            Arc::clone(&name_store_port),
            Arc::clone(&identity_port),
            Arc::clone(&clock),
            Arc::clone(&permission_checks),
            sns_service.clone(),
        ));

        Self {
            config,
            identity_index,
            permission_store,
            ban_store,
            name_store,
            threshold_store,
            admins: Arc::clone(&permission_service) as DynAdminUseCase,
            permissions: Arc::clone(&permission_service) as DynPermissionUseCase,
            checks: permission_checks,
            maintenance: Arc::clone(&permission_service) as DynMaintenanceUseCase,
            bans: Arc::clone(&ban_service) as DynBanUseCase,
            ban_queries: ban_service as DynBanQueryUseCase,
            sns: sns_service,
            names: Arc::clone(&name_service) as DynNameUseCase,
            name_queries: Arc::clone(&name_service) as DynNameQueryUseCase,
            name_verification: Arc::clone(&name_service) as DynNameVerifyUseCase,
            blacklist: Arc::clone(&name_service) as DynBlacklistUseCase,
            name_settings: name_service as DynNameSettingsUseCase,
        }
    }

    pub fn controller(&self) -> &Principal {
        &self.config.controller
    }

    pub async fn register_permission_type(
        &self,
        name: &str,
        description: &str,
        max_duration: Option<u64>,
        default_duration: Option<u64>,
    ) -> AuthResult<()> {
        self.permissions
            .add_permission_type(
                self.config.controller.clone(),
                name.to_string(),
                description.to_string(),
                max_duration,
                default_duration,
            )
            .await
    }

    pub async fn cleanup_expired(&self) -> AuthResult<CleanupReport> {
        self.maintenance.cleanup_expired().await
    }

    pub fn snapshot(&self) -> AuthResult<StableSnapshot> {
        Ok(StableSnapshot {
            identity: self.identity_index.snapshot()?,
            admins: self.permission_store.admin_snapshot(),
            grants: self.permission_store.grant_snapshot(),
            ban_log: self.ban_store.log_snapshot()?,
            active_bans: self.ban_store.active_snapshot(),
            ban_settings: self.ban_store.settings_snapshot()?,
            thresholds: self.threshold_store.threshold_snapshot(),
            name_records: self.name_store.record_snapshot()?,
            name_index: self.name_store.name_index_snapshot()?,
            banned_words: self.name_store.blacklist_snapshot()?,
            name_settings: self.name_store.settings_snapshot()?,
        })
    }
}
