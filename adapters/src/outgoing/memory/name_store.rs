use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use domain::{
    identity::SubjectIndex,
    name::{BannedWordEntry, NameClaim, NameRecord, NameSettings},
};
use namehub_application::error::{AuthError, AuthResult};
use namehub_application::ports::outgoing::name_store::NameStorePort;

#[derive(Debug)]
struct NameTables {
    records: HashMap<SubjectIndex, NameRecord>,
    by_name: HashMap<String, SubjectIndex>,
    blacklist: BTreeMap<String, BannedWordEntry>,
    settings: NameSettings,
}

#[derive(Debug)]
pub struct MemoryNameStore {
    tables: RwLock<NameTables>,
}

impl MemoryNameStore {
    pub fn new(settings: NameSettings) -> Self {
        Self {
            tables: RwLock::new(NameTables {
                records: HashMap::new(),
                by_name: HashMap::new(),
                blacklist: BTreeMap::new(),
                settings,
            }),
        }
    }

    pub fn restore(
        records: Vec<(SubjectIndex, NameRecord)>,
        name_index: Vec<(String, SubjectIndex)>,
        banned_words: Vec<(String, BannedWordEntry)>,
        settings: NameSettings,
    ) -> AuthResult<Self> {
        let records: HashMap<SubjectIndex, NameRecord> = records.into_iter().collect();
        let mut by_name = HashMap::new();

        for (name, subject) in name_index {
            let Some(record) = records.get(&subject) else {
                return Err(AuthError::Storage {
                    message: format!("name index points at missing record {subject}"),
                });
            };
            if record.name.to_lowercase() != name {
                return Err(AuthError::Storage {
                    message: format!("name index entry {name} does not match its record"),
                });
            }
            if by_name.insert(name.clone(), subject).is_some() {
                return Err(AuthError::Storage {
                    message: format!("name index maps {name} twice"),
                });
            }
        }

        if by_name.len() != records.len() {
            return Err(AuthError::Storage {
                message: "name records and name index are out of sync".to_string(),
            });
        }

        Ok(Self {
            tables: RwLock::new(NameTables {
                records,
                by_name,
                blacklist: banned_words.into_iter().collect(),
                settings,
            }),
        })
    }

    pub fn record_snapshot(&self) -> AuthResult<Vec<(SubjectIndex, NameRecord)>> {
        let tables = self.read_tables()?;
        let mut records: Vec<_> = tables
            .records
            .iter()
            .map(|(subject, record)| (*subject, record.clone()))
            .collect();
        records.sort_by_key(|(subject, _)| *subject);
        Ok(records)
    }

    pub fn name_index_snapshot(&self) -> AuthResult<Vec<(String, SubjectIndex)>> {
        let tables = self.read_tables()?;
        let mut index: Vec<_> = tables
            .by_name
            .iter()
            .map(|(name, subject)| (name.clone(), *subject))
            .collect();
        index.sort();
        Ok(index)
    }

    pub fn blacklist_snapshot(&self) -> AuthResult<Vec<(String, BannedWordEntry)>> {
        let tables = self.read_tables()?;
        Ok(tables
            .blacklist
            .iter()
            .map(|(word, entry)| (word.clone(), entry.clone()))
            .collect())
    }

    pub fn settings_snapshot(&self) -> AuthResult<NameSettings> {
        Ok(self.read_tables()?.settings)
    }

    fn read_tables(&self) -> AuthResult<RwLockReadGuard<'_, NameTables>> {
        self.tables.read().map_err(|_| AuthError::Storage {
            message: "name tables lock poisoned".to_string(),
        })
    }

    fn write_tables(&self) -> AuthResult<RwLockWriteGuard<'_, NameTables>> {
        self.tables.write().map_err(|_| AuthError::Storage {
            message: "name tables lock poisoned".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl NameStorePort for MemoryNameStore {
    async fn record(&self, subject: SubjectIndex) -> AuthResult<Option<NameRecord>> {
        Ok(self.read_tables()?.records.get(&subject).cloned())
    }

    async fn holder_of(&self, lowercase_name: &str) -> AuthResult<Option<SubjectIndex>> {
        Ok(self.read_tables()?.by_name.get(lowercase_name).copied())
    }

    async fn claim_name(
        &self,
        subject: SubjectIndex,
        record: NameRecord,
    ) -> AuthResult<NameClaim> {
        let mut tables = self.write_tables()?;
        let lowercase = record.name.to_lowercase();

        if let Some(holder) = tables.by_name.get(&lowercase).copied() {
            if holder != subject {
                return Ok(NameClaim::Taken { holder });
            }
        }

        let previous = tables.records.get(&subject).cloned();
        if let Some(previous_record) = &previous {
            let previous_key = previous_record.name.to_lowercase();
            if previous_key != lowercase {
                tables.by_name.remove(&previous_key);
            }
        }

        tables.by_name.insert(lowercase, subject);
        tables.records.insert(subject, record);
        Ok(NameClaim::Claimed { previous })
    }

    async fn update_record(&self, subject: SubjectIndex, record: NameRecord) -> AuthResult<()> {
        let mut tables = self.write_tables()?;
        let Some(existing) = tables.records.get(&subject) else {
            return Err(AuthError::Storage {
                message: format!("no name record for subject {subject}"),
            });
        };
        if existing.name.to_lowercase() != record.name.to_lowercase() {
            return Err(AuthError::Storage {
                message: "record updates must not change the name key".to_string(),
            });
        }

        tables.records.insert(subject, record);
        Ok(())
    }

    async fn remove_record(&self, subject: SubjectIndex) -> AuthResult<Option<NameRecord>> {
        let mut tables = self.write_tables()?;
        let Some(record) = tables.records.remove(&subject) else {
            return Ok(None);
        };
        tables.by_name.remove(&record.name.to_lowercase());
        Ok(Some(record))
    }

    async fn records(&self) -> AuthResult<Vec<(SubjectIndex, NameRecord)>> {
        self.record_snapshot()
    }

    async fn add_banned_word(&self, word: String, entry: BannedWordEntry) -> AuthResult<bool> {
        let mut tables = self.write_tables()?;
        if tables.blacklist.contains_key(&word) {
            return Ok(false);
        }
        tables.blacklist.insert(word, entry);
        Ok(true)
    }

    async fn remove_banned_word(&self, word: &str) -> AuthResult<bool> {
        Ok(self.write_tables()?.blacklist.remove(word).is_some())
    }

    async fn banned_words(&self) -> AuthResult<Vec<(String, BannedWordEntry)>> {
        self.blacklist_snapshot()
    }

    async fn matching_banned_word(&self, lowercase_name: &str) -> AuthResult<Option<String>> {
        let tables = self.read_tables()?;
        Ok(tables
            .blacklist
            .keys()
            .find(|word| lowercase_name.contains(word.as_str()))
            .cloned())
    }

    async fn settings(&self) -> AuthResult<NameSettings> {
        self.settings_snapshot()
    }

    async fn update_settings(&self, settings: NameSettings) -> AuthResult<()> {
        self.write_tables()?.settings = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::principal::Principal;
    use domain::time::Timestamp;

    fn record(name: &str) -> NameRecord {
        NameRecord::new(
            name,
            Timestamp::from_nanos(1),
            Principal::from_bytes(vec![1]).unwrap(),
        )
    }

    #[tokio::test]
    async fn claims_are_case_insensitive() {
        let store = MemoryNameStore::new(NameSettings::default());

        assert!(matches!(
            store.claim_name(SubjectIndex(1), record("Alice")).await.unwrap(),
            NameClaim::Claimed { .. }
        ));
        assert_eq!(
            store.claim_name(SubjectIndex(2), record("ALICE")).await.unwrap(),
            NameClaim::Taken {
                holder: SubjectIndex(1)
            }
        );
        assert_eq!(
            store.holder_of("alice").await.unwrap(),
            Some(SubjectIndex(1))
        );
    }

    #[tokio::test]
    async fn renaming_frees_the_previous_key() {
        let store = MemoryNameStore::new(NameSettings::default());

        store.claim_name(SubjectIndex(1), record("first")).await.unwrap();
        store.claim_name(SubjectIndex(1), record("second")).await.unwrap();

        assert!(store.holder_of("first").await.unwrap().is_none());
        assert_eq!(
            store.holder_of("second").await.unwrap(),
            Some(SubjectIndex(1))
        );
        assert!(matches!(
            store.claim_name(SubjectIndex(2), record("first")).await.unwrap(),
            NameClaim::Claimed { .. }
        ));
    }

    #[tokio::test]
    async fn reclaiming_your_own_name_is_allowed() {
        let store = MemoryNameStore::new(NameSettings::default());

        store.claim_name(SubjectIndex(1), record("same")).await.unwrap();
        assert!(matches!(
            store.claim_name(SubjectIndex(1), record("Same")).await.unwrap(),
            NameClaim::Claimed { previous: Some(_) }
        ));
    }

    #[tokio::test]
    async fn removal_clears_both_tables() {
        let store = MemoryNameStore::new(NameSettings::default());

        store.claim_name(SubjectIndex(1), record("gone")).await.unwrap();
        assert!(store.remove_record(SubjectIndex(1)).await.unwrap().is_some());

        assert!(store.record(SubjectIndex(1)).await.unwrap().is_none());
        assert!(store.holder_of("gone").await.unwrap().is_none());
        assert!(store.remove_record(SubjectIndex(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn banned_words_match_as_substrings() {
        let store = MemoryNameStore::new(NameSettings::default());
        let entry = BannedWordEntry {
            added_by: Principal::from_bytes(vec![1]).unwrap(),
            added_at: Timestamp::from_nanos(1),
        };

        assert!(store.add_banned_word("spam".to_string(), entry.clone()).await.unwrap());
        assert!(!store.add_banned_word("spam".to_string(), entry).await.unwrap());

        assert_eq!(
            store.matching_banned_word("spammer").await.unwrap(),
            Some("spam".to_string())
        );
        assert!(store.matching_banned_word("clean").await.unwrap().is_none());

        assert!(store.remove_banned_word("spam").await.unwrap());
        assert!(store.matching_banned_word("spammer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_rejects_incoherent_snapshots() {
        let result = MemoryNameStore::restore(
            vec![(SubjectIndex(1), record("alice"))],
            vec![("bob".to_string(), SubjectIndex(1))],
            Vec::new(),
            NameSettings::default(),
        );
        assert!(result.is_err());

        let result = MemoryNameStore::restore(
            vec![(SubjectIndex(1), record("alice"))],
            vec![("alice".to_string(), SubjectIndex(2))],
            Vec::new(),
            NameSettings::default(),
        );
        assert!(result.is_err());
    }
}
