use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;

use domain::{
    ban::{BanLogEntry, BanRecord, BanSettings},
    identity::SubjectIndex,
    time::Timestamp,
};
use namehub_application::error::{AuthError, AuthResult};
use namehub_application::ports::outgoing::ban_store::BanStorePort;

#[derive(Debug)]
pub struct MemoryBanStore {
    active: DashMap<SubjectIndex, BanRecord>,
    log: RwLock<Vec<BanLogEntry>>,
    settings: RwLock<BanSettings>,
}

impl MemoryBanStore {
    pub fn new(settings: BanSettings) -> Self {
        Self {
            active: DashMap::new(),
            log: RwLock::new(Vec::new()),
            settings: RwLock::new(settings),
        }
    }

    pub fn restore(
        log: Vec<BanLogEntry>,
        active: Vec<(SubjectIndex, BanRecord)>,
        settings: BanSettings,
    ) -> Self {
        let store = Self::new(settings);
        for (user, record) in active {
            store.active.insert(user, record);
        }
        if let Ok(mut stored_log) = store.log.write() {
            *stored_log = log;
        }
        store
    }

    pub fn log_snapshot(&self) -> AuthResult<Vec<BanLogEntry>> {
        Ok(self.read_log()?.clone())
    }

    pub fn active_snapshot(&self) -> Vec<(SubjectIndex, BanRecord)> {
        let mut active: Vec<_> = self
            .active
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        active.sort_by_key(|(user, _)| *user);
        active
    }

    pub fn settings_snapshot(&self) -> AuthResult<BanSettings> {
        Ok(self.read_settings()?.clone())
    }

    fn read_log(&self) -> AuthResult<RwLockReadGuard<'_, Vec<BanLogEntry>>> {
        self.log.read().map_err(|_| AuthError::Storage {
            message: "ban log lock poisoned".to_string(),
        })
    }

    fn write_log(&self) -> AuthResult<RwLockWriteGuard<'_, Vec<BanLogEntry>>> {
        self.log.write().map_err(|_| AuthError::Storage {
            message: "ban log lock poisoned".to_string(),
        })
    }

    fn read_settings(&self) -> AuthResult<RwLockReadGuard<'_, BanSettings>> {
        self.settings.read().map_err(|_| AuthError::Storage {
            message: "ban settings lock poisoned".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl BanStorePort for MemoryBanStore {
    async fn active_ban(
        &self,
        user: SubjectIndex,
        now: Timestamp,
    ) -> AuthResult<Option<BanRecord>> {
        let expired = match self.active.get(&user) {
            Some(record) if record.value().is_expired(now) => true,
            Some(record) => return Ok(Some(record.value().clone())),
            None => return Ok(None),
        };

        if expired {
            self.active.remove(&user);
        }
        Ok(None)
    }

    async fn insert_ban(&self, user: SubjectIndex, record: BanRecord) -> AuthResult<()> {
        self.active.insert(user, record);
        Ok(())
    }

    async fn remove_ban(&self, user: SubjectIndex) -> AuthResult<bool> {
        Ok(self.active.remove(&user).is_some())
    }

    async fn active_bans(&self, now: Timestamp) -> AuthResult<Vec<(SubjectIndex, BanRecord)>> {
        self.remove_expired(now).await?;
        Ok(self.active_snapshot())
    }

    async fn append_log_entry(&self, entry: BanLogEntry) -> AuthResult<()> {
        self.write_log()?.push(entry);
        Ok(())
    }

    async fn log_entries(&self) -> AuthResult<Vec<BanLogEntry>> {
        self.log_snapshot()
    }

    async fn user_log_entries(&self, user: SubjectIndex) -> AuthResult<Vec<BanLogEntry>> {
        Ok(self
            .read_log()?
            .iter()
            .filter(|entry| entry.user == user)
            .cloned()
            .collect())
    }

    async fn offense_count(&self, user: SubjectIndex) -> AuthResult<u32> {
        let count = self
            .read_log()?
            .iter()
            .filter(|entry| entry.user == user && entry.is_offense())
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn settings(&self) -> AuthResult<BanSettings> {
        self.settings_snapshot()
    }

    async fn update_settings(&self, settings: BanSettings) -> AuthResult<()> {
        let mut stored = self.settings.write().map_err(|_| AuthError::Storage {
            message: "ban settings lock poisoned".to_string(),
        })?;
        *stored = settings;
        Ok(())
    }

    async fn remove_expired(&self, now: Timestamp) -> AuthResult<usize> {
        let expired: Vec<SubjectIndex> = self
            .active
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| *entry.key())
            .collect();

        for user in &expired {
            self.active.remove(user);
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: u32, banned_at: u64, expires_at: u64) -> BanLogEntry {
        BanLogEntry {
            user: SubjectIndex(user),
            admin: SubjectIndex(99),
            banned_at: Timestamp::from_nanos(banned_at),
            expires_at: Timestamp::from_nanos(expires_at),
            reason: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn expired_bans_are_dropped_on_read() {
        let store = MemoryBanStore::new(BanSettings::default());
        let user = SubjectIndex(1);

        store
            .insert_ban(user, BanRecord::new(Timestamp::from_nanos(100), "spam"))
            .await
            .unwrap();

        assert!(
            store
                .active_ban(user, Timestamp::from_nanos(50))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .active_ban(user, Timestamp::from_nanos(100))
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.active.get(&user).is_none());
    }

    #[tokio::test]
    async fn offense_count_skips_unban_entries() {
        let store = MemoryBanStore::new(BanSettings::default());

        store.append_log_entry(entry(1, 10, 20)).await.unwrap();
        store.append_log_entry(entry(1, 30, 30)).await.unwrap();
        store.append_log_entry(entry(1, 40, 90)).await.unwrap();
        store.append_log_entry(entry(2, 40, 90)).await.unwrap();

        assert_eq!(store.offense_count(SubjectIndex(1)).await.unwrap(), 2);
        assert_eq!(store.offense_count(SubjectIndex(2)).await.unwrap(), 1);
        assert_eq!(store.offense_count(SubjectIndex(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn log_is_append_only_across_cleanup() {
        let store = MemoryBanStore::new(BanSettings::default());
        let user = SubjectIndex(1);

        store.append_log_entry(entry(1, 10, 20)).await.unwrap();
        store
            .insert_ban(user, BanRecord::new(Timestamp::from_nanos(20), "spam"))
            .await
            .unwrap();

        assert_eq!(
            store.remove_expired(Timestamp::from_nanos(30)).await.unwrap(),
            1
        );
        assert_eq!(store.log_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let store = MemoryBanStore::new(BanSettings::default());
        store.append_log_entry(entry(1, 10, 20)).await.unwrap();
        store
            .insert_ban(SubjectIndex(1), BanRecord::new(Timestamp::from_nanos(20), "x"))
            .await
            .unwrap();

        let restored = MemoryBanStore::restore(
            store.log_snapshot().unwrap(),
            store.active_snapshot(),
            store.settings_snapshot().unwrap(),
        );

        assert_eq!(restored.log_entries().await.unwrap().len(), 1);
        assert!(
            restored
                .active_ban(SubjectIndex(1), Timestamp::from_nanos(5))
                .await
                .unwrap()
                .is_some()
        );
    }
}
