use std::sync::Arc;

use crate::error::AuthResult;
use domain::{identity::SubjectIndex, principal::Principal};

#[async_trait::async_trait]
pub trait IdentityIndexPort: Send + Sync {
    async fn index_of_bytes(&self, bytes: &[u8]) -> AuthResult<SubjectIndex>;

    async fn index_of_principal(&self, principal: &Principal) -> AuthResult<SubjectIndex>;

    async fn lookup_bytes(&self, bytes: &[u8]) -> AuthResult<Option<SubjectIndex>>;

    async fn bytes_of(&self, index: SubjectIndex) -> AuthResult<Option<Vec<u8>>>;

    async fn principal_of(&self, index: SubjectIndex) -> AuthResult<Option<Principal>>;

    async fn entry_count(&self) -> AuthResult<usize>;
}

pub type DynIdentityIndexPort = Arc<dyn IdentityIndexPort>;
