use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    permission::{PermissionCheck, PermissionGrant, PermissionType},
    principal::Principal,
    time::Timestamp,
};

#[async_trait::async_trait]
pub trait PermissionUseCase: Send + Sync {
    async fn add_permission_type(
        &self,
        caller: Principal,
        name: String,
        description: String,
        max_duration: Option<u64>,
        default_duration: Option<u64>,
    ) -> AuthResult<()>;

    async fn permission_types(&self) -> AuthResult<Vec<(String, PermissionType)>>;

    async fn grant_permission(
        &self,
        caller: Principal,
        target: Principal,
        permission: String,
        expires_at: Option<Timestamp>,
    ) -> AuthResult<()>;

    async fn revoke_permission(
        &self,
        caller: Principal,
        target: Principal,
        permission: String,
    ) -> AuthResult<()>;

    async fn permissions_of(
        &self,
        caller: Principal,
        target: Principal,
    ) -> AuthResult<Vec<(String, PermissionGrant)>>;
}

#[async_trait::async_trait]
pub trait PermissionCheckUseCase: Send + Sync {
    async fn check_permission_detailed(
        &self,
        principal: &Principal,
        permission: &str,
    ) -> AuthResult<PermissionCheck>;

    async fn check_permission(&self, principal: &Principal, permission: &str) -> AuthResult<bool>;

    async fn is_admin(&self, principal: &Principal) -> AuthResult<bool>;

    async fn ensure_admin(&self, caller: &Principal) -> AuthResult<()>;
}

pub type DynPermissionUseCase = Arc<dyn PermissionUseCase>;
pub type DynPermissionCheckUseCase = Arc<dyn PermissionCheckUseCase>;
