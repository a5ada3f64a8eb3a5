use std::sync::Arc;

use domain::ban::{BanError, BanLogEntry, BanLogRecord, BanRecord, BanSettings};
use domain::identity::SubjectIndex;
use domain::permission::{PermissionCheck, well_known};
use domain::principal::Principal;

use crate::error::{AuthError, AuthResult};
use crate::ports::incoming::bans::{BanQueryUseCase, BanUseCase};
use crate::ports::incoming::permissions::PermissionCheckUseCase;
use crate::ports::outgoing::ban_store::DynBanStorePort;
use crate::ports::outgoing::clock::DynClockPort;
use crate::ports::outgoing::identity_index::DynIdentityIndexPort;

const UNBAN_REASON: &str = "unban";

pub struct BanService {
    ban_store: DynBanStorePort,
    identity_index: DynIdentityIndexPort,
    clock: DynClockPort,
    permission_checks: Arc<dyn PermissionCheckUseCase>,
    controller: Principal,
}

impl BanService {
    pub fn new(
        ban_store: DynBanStorePort,
        identity_index: DynIdentityIndexPort,
        clock: DynClockPort,
        permission_checks: Arc<dyn PermissionCheckUseCase>,
        controller: Principal,
    ) -> Self {
        Self {
            ban_store,
            identity_index,
            clock,
            permission_checks,
            controller,
        }
    }

    async fn require(&self, caller: &Principal, permission: &str) -> AuthResult<()> {
        match self
            .permission_checks
            .check_permission_detailed(caller, permission)
            .await?
        {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Banned { reason, expires_at } => {
                Err(AuthError::Banned { reason, expires_at })
            }
            _ => Err(BanError::NotAuthorized {
                required: permission.to_string(),
            }
            .into()),
        }
    }

    async fn apply_ban(
        &self,
        admin: SubjectIndex,
        target: Principal,
        duration_hours: Option<u64>,
        reason: String,
    ) -> AuthResult<BanRecord> {
        if target == self.controller {
            return Err(BanError::CannotBanController.into());
        }
        if self.permission_checks.is_admin(&target).await? {
            return Err(BanError::CannotBanAdmin.into());
        }

        let now = self.clock.now();
        let target_index = self.identity_index.index_of_principal(&target).await?;

        let hours = match duration_hours {
            Some(hours) => hours,
            None => {
                let offenses = self.ban_store.offense_count(target_index).await?;
                self.ban_store.settings().await?.duration_hours_for(offenses)
            }
        };
        let expires_at = now.plus_hours(hours);

        self.ban_store
            .append_log_entry(BanLogEntry {
                user: target_index,
                admin,
                banned_at: now,
                expires_at,
                reason: reason.clone(),
            })
            .await?;

        let record = BanRecord::new(expires_at, reason);
        self.ban_store
            .insert_ban(target_index, record.clone())
            .await?;

        tracing::info!(user = %target, hours, "User banned");
        Ok(record)
    }

    async fn materialize(&self, entries: Vec<BanLogEntry>) -> AuthResult<Vec<BanLogRecord>> {
        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(user) = self.identity_index.principal_of(entry.user).await? else {
                continue;
            };
            let Some(admin) = self.identity_index.principal_of(entry.admin).await? else {
                continue;
            };
            records.push(BanLogRecord {
                user,
                admin,
                banned_at: entry.banned_at,
                expires_at: entry.expires_at,
                reason: entry.reason,
            });
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl BanUseCase for BanService {
    async fn ban_user(
        &self,
        caller: Principal,
        target: Principal,
        duration_hours: Option<u64>,
        reason: String,
    ) -> AuthResult<BanRecord> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.require(&caller, well_known::BAN_USER).await?;

        let admin = self.identity_index.index_of_principal(&caller).await?;
        self.apply_ban(admin, target, duration_hours, reason).await
    }

    async fn auto_ban_user(&self, target: Principal, reason: String) -> AuthResult<BanRecord> {
        let admin = self
            .identity_index
            .index_of_principal(&self.controller)
            .await?;
        self.apply_ban(admin, target, None, reason).await
    }

    async fn unban_user(&self, caller: Principal, target: Principal) -> AuthResult<()> {
        if caller.is_anonymous() {
            return Err(AuthError::AnonymousCaller);
        }
        self.require(&caller, well_known::UNBAN_USER).await?;

        let now = self.clock.now();
        let target_index = self.identity_index.index_of_principal(&target).await?;
        let admin = self.identity_index.index_of_principal(&caller).await?;

        self.ban_store
            .append_log_entry(BanLogEntry {
                user: target_index,
                admin,
                banned_at: now,
                expires_at: now,
                reason: UNBAN_REASON.to_string(),
            })
            .await?;
        self.ban_store.remove_ban(target_index).await?;

        tracing::info!(user = %target, unbanned_by = %caller, "User unbanned");
        Ok(())
    }

    async fn is_banned(&self, principal: &Principal) -> AuthResult<bool> {
        let index = self.identity_index.index_of_principal(principal).await?;
        let ban = self.ban_store.active_ban(index, self.clock.now()).await?;
        Ok(ban.is_some())
    }

    async fn check_ban_status(&self, target: &Principal) -> AuthResult<BanRecord> {
        let index = self.identity_index.index_of_principal(target).await?;
        self.ban_store
            .active_ban(index, self.clock.now())
            .await?
            .ok_or_else(|| BanError::UserNotBanned.into())
    }
}

#[async_trait::async_trait]
impl BanQueryUseCase for BanService {
    async fn ban_log(&self, caller: Principal) -> AuthResult<Vec<BanLogRecord>> {
        self.require(&caller, well_known::MANAGE_BAN_SETTINGS)
            .await?;

        let entries = self.ban_store.log_entries().await?;
        self.materialize(entries).await
    }

    async fn banned_users(&self, caller: Principal) -> AuthResult<Vec<(Principal, BanRecord)>> {
        self.require(&caller, well_known::MANAGE_BAN_SETTINGS)
            .await?;

        let mut users = Vec::new();
        for (index, record) in self.ban_store.active_bans(self.clock.now()).await? {
            let Some(principal) = self.identity_index.principal_of(index).await? else {
                continue;
            };
            users.push((principal, record));
        }
        Ok(users)
    }

    async fn user_ban_history(
        &self,
        caller: Principal,
        target: Principal,
    ) -> AuthResult<Vec<BanLogRecord>> {
        self.require(&caller, well_known::MANAGE_BAN_SETTINGS)
            .await?;

        let target_index = self.identity_index.index_of_principal(&target).await?;
        let entries = self.ban_store.user_log_entries(target_index).await?;
        self.materialize(entries).await
    }

    async fn ban_settings(&self, caller: Principal) -> AuthResult<BanSettings> {
        self.require(&caller, well_known::MANAGE_BAN_SETTINGS)
            .await?;
        self.ban_store.settings().await
    }

    async fn update_ban_settings(
        &self,
        caller: Principal,
        settings: BanSettings,
    ) -> AuthResult<()> {
        self.require(&caller, well_known::MANAGE_BAN_SETTINGS)
            .await?;
        settings.validate()?;
        self.ban_store.update_settings(settings).await?;

        tracing::info!(updated_by = %caller, "Ban settings updated");
        Ok(())
    }
}
