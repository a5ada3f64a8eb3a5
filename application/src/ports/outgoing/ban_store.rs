use std::sync::Arc;

use crate::error::AuthResult;
use domain::{
    ban::{BanLogEntry, BanRecord, BanSettings},
    identity::SubjectIndex,
    time::Timestamp,
};

#[async_trait::async_trait]
pub trait BanStorePort: Send + Sync {
    async fn active_ban(&self, user: SubjectIndex, now: Timestamp)
    -> AuthResult<Option<BanRecord>>;

    async fn insert_ban(&self, user: SubjectIndex, record: BanRecord) -> AuthResult<()>;

    async fn remove_ban(&self, user: SubjectIndex) -> AuthResult<bool>;

    async fn active_bans(&self, now: Timestamp) -> AuthResult<Vec<(SubjectIndex, BanRecord)>>;

    async fn append_log_entry(&self, entry: BanLogEntry) -> AuthResult<()>;

    async fn log_entries(&self) -> AuthResult<Vec<BanLogEntry>>;

    async fn user_log_entries(&self, user: SubjectIndex) -> AuthResult<Vec<BanLogEntry>>;

    async fn offense_count(&self, user: SubjectIndex) -> AuthResult<u32>;

    async fn settings(&self) -> AuthResult<BanSettings>;

    async fn update_settings(&self, settings: BanSettings) -> AuthResult<()>;

    async fn remove_expired(&self, now: Timestamp) -> AuthResult<usize>;
}

pub type DynBanStorePort = Arc<dyn BanStorePort>;
