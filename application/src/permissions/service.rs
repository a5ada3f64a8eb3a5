use domain::admin::{AdminError, AdminGrant};
use domain::ban::BanRecord;
use domain::identity::SubjectIndex;
use domain::permission::{
    GrantLookup, PermissionCheck, PermissionError, PermissionGrant, PermissionType, well_known,
};
use domain::principal::Principal;
use domain::time::Timestamp;

use crate::error::{AuthError, AuthResult};
use crate::ports::incoming::admins::AdminUseCase;
use crate::ports::incoming::maintenance::{CleanupReport, MaintenanceUseCase};
use crate::ports::incoming::permissions::{PermissionCheckUseCase, PermissionUseCase};
use crate::ports::outgoing::ban_store::DynBanStorePort;
use crate::ports::outgoing::clock::DynClockPort;
use crate::ports::outgoing::identity_index::DynIdentityIndexPort;
use crate::ports::outgoing::permission_store::DynPermissionStorePort;

pub struct PermissionService {
    permission_store: DynPermissionStorePort,
    ban_store: DynBanStorePort,
    identity_index: DynIdentityIndexPort,
    clock: DynClockPort,
    controller: Principal,
}

impl PermissionService {
    pub fn new(
        permission_store: DynPermissionStorePort,
        ban_store: DynBanStorePort,
        identity_index: DynIdentityIndexPort,
        clock: DynClockPort,
        controller: Principal,
    ) -> Self {
        Self {
            permission_store,
            ban_store,
            identity_index,
            clock,
            controller,
        }
    }

    async fn active_ban(&self, subject: SubjectIndex) -> AuthResult<Option<BanRecord>> {
        self.ban_store.active_ban(subject, self.clock.now()).await
    }

    async fn admin_active(&self, principal: &Principal, now: Timestamp) -> AuthResult<bool> {
        if *principal == self.controller {
            return Ok(true);
        }

        let index = self.identity_index.index_of_principal(principal).await?;
        match self.permission_store.admin_grant(index).await? {
            Some(grant) => Ok(grant.is_active(now)),
            None => Ok(false),
        }
    }

    async fn require_permission(&self, caller: &Principal, permission: &str) -> AuthResult<()> {
        match self.check_permission_detailed(caller, permission).await? {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                Err(AuthError::Banned { reason, expires_at })
            }
            _ => Err(PermissionError::NotAuthorized {
                required: permission.to_string(),
            }
            .into()),
        }
    }

    async fn registered_permission_index(&self, name: &str) -> AuthResult<Option<SubjectIndex>> {
        let Some(index) = self.identity_index.lookup_bytes(name.as_bytes()).await? else {
            return Ok(None);
        };
        match self.permission_store.permission_type(index).await? {
            Some(_) => Ok(Some(index)),
            None => Ok(None),
        }
    }

    async fn permission_name(&self, index: SubjectIndex) -> AuthResult<String> {
        let bytes = self.identity_index.bytes_of(index).await?.unwrap_or_default();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait::async_trait]
impl PermissionCheckUseCase for PermissionService {
    async fn check_permission_detailed(
        &self,
        principal: &Principal,
        permission: &str,
    ) -> AuthResult<PermissionCheck> {
        let now = self.clock.now();
        let subject = self.identity_index.index_of_principal(principal).await?;

        if let Some(ban) = self.active_ban(subject).await? {
            return Ok(PermissionCheck::Banned {
                reason: ban.reason,
                expires_at: Some(ban.expires_at),
            });
        }

        if self.admin_active(principal, now).await? {
            return Ok(PermissionCheck::Allowed);
        }

        let Some(permission_index) = self.registered_permission_index(permission).await? else {
            return Ok(PermissionCheck::PermissionTypeNotFound {
                name: permission.to_string(),
            });
        };

        match self
            .permission_store
            .grant_lookup(subject, permission_index)
            .await?
        {
            GrantLookup::NoTable => Ok(PermissionCheck::NoPrincipalPermissions),
            GrantLookup::NotGranted => Ok(PermissionCheck::PermissionNotGranted),
            GrantLookup::Granted(grant) => match grant.expires_at {
                Some(expires_at) if expires_at.is_past(now) => {
                    Ok(PermissionCheck::PermissionExpired {
                        expired_at: expires_at,
                    })
                }
                _ => Ok(PermissionCheck::Allowed),
            },
        }
    }

    async fn check_permission(&self, principal: &Principal, permission: &str) -> AuthResult<bool> {
        Ok(self
            .check_permission_detailed(principal, permission)
            .await?
            .allowed())
    }

    async fn is_admin(&self, principal: &Principal) -> AuthResult<bool> {
        self.admin_active(principal, self.clock.now()).await
    }

    async fn ensure_admin(&self, caller: &Principal) -> AuthResult<()> {
        let subject = self.identity_index.index_of_principal(caller).await?;
        if let Some(ban) = self.active_ban(subject).await? {
            return Err(AuthError::Banned {
                reason: ban.reason,
                expires_at: Some(ban.expires_at),
            });
        }

        if self.admin_active(caller, self.clock.now()).await? {
            Ok(())
        } else {
            Err(PermissionError::NotAuthorized {
                required: "admin".to_string(),
            }
            .into())
        }
    }
}

#[async_trait::async_trait]
impl AdminUseCase for PermissionService {
    async fn add_admin(
        &self,
        caller: Principal,
        new_admin: Principal,
        expires_at: Option<Timestamp>,
    ) -> AuthResult<()> {
        self.require_permission(&caller, well_known::ADD_ADMIN)
            .await?;

        if new_admin == self.controller {
            return Err(AdminError::AlreadyAdmin(new_admin).into());
        }

        let now = self.clock.now();
        let index = self.identity_index.index_of_principal(&new_admin).await?;
        if let Some(existing) = self.permission_store.admin_grant(index).await? {
            if existing.is_active(now) {
                return Err(AdminError::AlreadyAdmin(new_admin).into());
            }
        }

        self.permission_store
            .insert_admin(index, AdminGrant::new(caller.clone(), now, expires_at))
            .await?;

        tracing::info!(admin = %new_admin, added_by = %caller, "Admin added");
        Ok(())
    }

    async fn remove_admin(&self, caller: Principal, admin: Principal) -> AuthResult<()> {
        self.require_permission(&caller, well_known::REMOVE_ADMIN)
            .await?;

        if admin == self.controller {
            return Err(AdminError::CannotRemoveController.into());
        }
        if admin == caller {
            return Err(AdminError::CannotRemoveSelf.into());
        }

        let index = self.identity_index.index_of_principal(&admin).await?;
        if !self.permission_store.remove_admin(index).await? {
            return Err(AdminError::AdminNotFound(admin).into());
        }

        tracing::info!(admin = %admin, removed_by = %caller, "Admin removed");
        Ok(())
    }

    async fn list_admins(&self, caller: Principal) -> AuthResult<Vec<(Principal, AdminGrant)>> {
        self.ensure_admin(&caller).await?;

        let now = self.clock.now();
        let mut admins = Vec::new();
        for (index, grant) in self.permission_store.admins().await? {
            if grant.is_expired(now) {
                continue;
            }
            let Some(principal) = self.identity_index.principal_of(index).await? else {
                continue;
            };
            admins.push((principal, grant));
        }
        Ok(admins)
    }
}

#[async_trait::async_trait]
impl PermissionUseCase for PermissionService {
    async fn add_permission_type(
        &self,
        caller: Principal,
        name: String,
        description: String,
        max_duration: Option<u64>,
        default_duration: Option<u64>,
    ) -> AuthResult<()> {
        self.ensure_admin(&caller).await?;

        let permission_type = PermissionType::new(description, max_duration, default_duration);
        if !permission_type.durations_consistent() {
            return Err(PermissionError::InvalidDurations.into());
        }

        let index = self.identity_index.index_of_bytes(name.as_bytes()).await?;
        if !self
            .permission_store
            .insert_permission_type(index, permission_type)
            .await?
        {
            return Err(PermissionError::PermissionTypeExists { name }.into());
        }

        tracing::info!(permission = %name, "Permission type registered");
        Ok(())
    }

    async fn permission_types(&self) -> AuthResult<Vec<(String, PermissionType)>> {
        let mut types = Vec::new();
        for (index, permission_type) in self.permission_store.permission_types().await? {
            types.push((self.permission_name(index).await?, permission_type));
        }
        Ok(types)
    }

    async fn grant_permission(
        &self,
        caller: Principal,
        target: Principal,
        permission: String,
        expires_at: Option<Timestamp>,
    ) -> AuthResult<()> {
        self.ensure_admin(&caller).await?;

        let Some(permission_index) = self.registered_permission_index(&permission).await? else {
            return Err(PermissionError::PermissionTypeNotFound { name: permission }.into());
        };
        let Some(permission_type) = self.permission_store.permission_type(permission_index).await?
        else {
            return Err(PermissionError::PermissionTypeNotFound { name: permission }.into());
        };

        let now = self.clock.now();
        let expires_at = match expires_at {
            Some(requested) => {
                if let Some(max_duration) = permission_type.max_duration {
                    let max_expiry = now.plus_nanos(max_duration);
                    if requested > max_expiry {
                        return Err(PermissionError::ExpiryExceedsMax { max_expiry }.into());
                    }
                }
                Some(requested)
            }
            None => permission_type
                .default_duration
                .map(|duration| now.plus_nanos(duration)),
        };

        let target_index = self.identity_index.index_of_principal(&target).await?;
        self.permission_store
            .insert_grant(
                target_index,
                permission_index,
                PermissionGrant::new(caller.clone(), now, expires_at),
            )
            .await?;

        tracing::info!(
            target = %target,
            permission = %permission,
            granted_by = %caller,
            "Permission granted"
        );
        Ok(())
    }

    async fn revoke_permission(
        &self,
        caller: Principal,
        target: Principal,
        permission: String,
    ) -> AuthResult<()> {
        self.ensure_admin(&caller).await?;

        let Some(permission_index) = self.registered_permission_index(&permission).await? else {
            return Err(PermissionError::PermissionNotFound.into());
        };

        let target_index = self.identity_index.index_of_principal(&target).await?;
        if !self
            .permission_store
            .remove_grant(target_index, permission_index)
            .await?
        {
            return Err(PermissionError::PermissionNotFound.into());
        }

        tracing::info!(
            target = %target,
            permission = %permission,
            revoked_by = %caller,
            "Permission revoked"
        );
        Ok(())
    }

    async fn permissions_of(
        &self,
        caller: Principal,
        target: Principal,
    ) -> AuthResult<Vec<(String, PermissionGrant)>> {
        if caller != target {
            self.ensure_admin(&caller).await?;
        }

        let target_index = self.identity_index.index_of_principal(&target).await?;
        let mut grants = Vec::new();
        for (permission_index, grant) in self.permission_store.grants_of(target_index).await? {
            grants.push((self.permission_name(permission_index).await?, grant));
        }
        Ok(grants)
    }
}

#[async_trait::async_trait]
impl MaintenanceUseCase for PermissionService {
    async fn cleanup_expired(&self) -> AuthResult<CleanupReport> {
        let now = self.clock.now();

        let report = CleanupReport {
            expired_admins: self.permission_store.remove_expired_admins(now).await?,
            expired_grants: self.permission_store.remove_expired_grants(now).await?,
            expired_bans: self.ban_store.remove_expired(now).await?,
        };

        tracing::debug!(
            expired_admins = report.expired_admins,
            expired_grants = report.expired_grants,
            expired_bans = report.expired_bans,
            "Expired entries swept"
        );
        Ok(report)
    }
}
