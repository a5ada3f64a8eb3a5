use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    identity::SubjectIndex,
    name::{BannedWordEntry, NameClaim, NameRecord, NameSettings},
};

#[async_trait::async_trait]
pub trait NameStorePort: Send + Sync {
    async fn record(&self, subject: SubjectIndex) -> AuthResult<Option<NameRecord>>;

    async fn holder_of(&self, lowercase_name: &str) -> AuthResult<Option<SubjectIndex>>;

    async fn claim_name(&self, subject: SubjectIndex, record: NameRecord)
    -> AuthResult<NameClaim>;

    async fn update_record(&self, subject: SubjectIndex, record: NameRecord) -> AuthResult<()>;

    async fn remove_record(&self, subject: SubjectIndex) -> AuthResult<Option<NameRecord>>;

    async fn records(&self) -> AuthResult<Vec<(SubjectIndex, NameRecord)>>;

    async fn add_banned_word(&self, word: String, entry: BannedWordEntry) -> AuthResult<bool>;

    async fn remove_banned_word(&self, word: &str) -> AuthResult<bool>;

    async fn banned_words(&self) -> AuthResult<Vec<(String, BannedWordEntry)>>;

    async fn matching_banned_word(&self, lowercase_name: &str) -> AuthResult<Option<String>>;

    async fn settings(&self) -> AuthResult<NameSettings>;

    async fn update_settings(&self, settings: NameSettings) -> AuthResult<()>;
}

pub type DynNameStorePort = Arc<dyn NameStorePort>;
