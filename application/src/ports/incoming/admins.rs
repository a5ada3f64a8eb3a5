use std::sync::Arc;

use crate::error::AuthResult;
use domain::{admin::AdminGrant, principal::Principal, time::Timestamp};

#[async_trait::async_trait]
pub trait AdminUseCase: Send + Sync {
    async fn add_admin(
        &self,
        caller: Principal,
        new_admin: Principal,
        expires_at: Option<Timestamp>,
    ) -> AuthResult<()>;

    async fn remove_admin(&self, caller: Principal, admin: Principal) -> AuthResult<()>;

    async fn list_admins(&self, caller: Principal) -> AuthResult<Vec<(Principal, AdminGrant)>>;
}

pub type DynAdminUseCase = Arc<dyn AdminUseCase>;
