use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    ban::{BanLogRecord, BanRecord, BanSettings},
    principal::Principal,
};

#[async_trait::async_trait]
pub trait BanUseCase: Send + Sync {
    async fn ban_user(
        &self,
        caller: Principal,
        target: Principal,
        duration_hours: Option<u64>,
        reason: String,
    ) -> AuthResult<BanRecord>;

    async fn auto_ban_user(&self, target: Principal, reason: String) -> AuthResult<BanRecord>;

    async fn unban_user(&self, caller: Principal, target: Principal) -> AuthResult<()>;

    async fn is_banned(&self, principal: &Principal) -> AuthResult<bool>;

    async fn check_ban_status(&self, target: &Principal) -> AuthResult<BanRecord>;
}

#[async_trait::async_trait]
pub trait BanQueryUseCase: Send + Sync {
    async fn ban_log(&self, caller: Principal) -> AuthResult<Vec<BanLogRecord>>;

    async fn banned_users(&self, caller: Principal) -> AuthResult<Vec<(Principal, BanRecord)>>;

    async fn user_ban_history(
        &self,
        caller: Principal,
        target: Principal,
    ) -> AuthResult<Vec<BanLogRecord>>;

    async fn ban_settings(&self, caller: Principal) -> AuthResult<BanSettings>;

    async fn update_ban_settings(&self, caller: Principal, settings: BanSettings)
    -> AuthResult<()>;
}

pub type DynBanUseCase = Arc<dyn BanUseCase>;
pub type DynBanQueryUseCase = Arc<dyn BanQueryUseCase>;
