use std::sync::Arc;

use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupReport {
    pub expired_admins: usize,
    pub expired_grants: usize,
    pub expired_bans: usize,
}

#[async_trait::async_trait]
pub trait MaintenanceUseCase: Send + Sync {
    async fn cleanup_expired(&self) -> AuthResult<CleanupReport>;
}

pub type DynMaintenanceUseCase = Arc<dyn MaintenanceUseCase>;
