use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    admin::AdminGrant,
    identity::SubjectIndex,
    permission::{GrantLookup, PermissionGrant, PermissionType},
    time::Timestamp,
};

#[async_trait::async_trait]
pub trait PermissionStorePort: Send + Sync {
    async fn admin_grant(&self, admin: SubjectIndex) -> AuthResult<Option<AdminGrant>>;

    async fn insert_admin(&self, admin: SubjectIndex, grant: AdminGrant) -> AuthResult<()>;

    async fn remove_admin(&self, admin: SubjectIndex) -> AuthResult<bool>;

    async fn admins(&self) -> AuthResult<Vec<(SubjectIndex, AdminGrant)>>;

    async fn remove_expired_admins(&self, now: Timestamp) -> AuthResult<usize>;

    async fn permission_type(&self, permission: SubjectIndex)
    -> AuthResult<Option<PermissionType>>;

    async fn insert_permission_type(
        &self,
        permission: SubjectIndex,
        permission_type: PermissionType,
    ) -> AuthResult<bool>;

    async fn permission_types(&self) -> AuthResult<Vec<(SubjectIndex, PermissionType)>>;

    async fn grant_lookup(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<GrantLookup>;

    async fn insert_grant(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
        grant: PermissionGrant,
    ) -> AuthResult<()>;

    async fn remove_grant(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<bool>;

    async fn grants_of(
        &self,
        principal: SubjectIndex,
    ) -> AuthResult<Vec<(SubjectIndex, PermissionGrant)>>;

    async fn remove_expired_grants(&self, now: Timestamp) -> AuthResult<usize>;
}

pub type DynPermissionStorePort = Arc<dyn PermissionStorePort>;
