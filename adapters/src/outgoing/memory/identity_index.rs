use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use domain::{identity::SubjectIndex, principal::Principal};
use namehub_application::error::{AuthError, AuthResult};
use namehub_application::ports::outgoing::identity_index::IdentityIndexPort;

use super::snapshot::{IdentityEntry, IdentityIndexSnapshot};

#[derive(Debug, Clone)]
struct IndexedBytes {
    bytes: Vec<u8>,
    principal: bool,
}

#[derive(Debug, Default)]
struct Tables {
    by_bytes: HashMap<Vec<u8>, SubjectIndex>,
    by_index: HashMap<u32, IndexedBytes>,
    next: u32,
}

#[derive(Debug, Default)]
pub struct MemoryIdentityIndex {
    tables: RwLock<Tables>,
}

impl MemoryIdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(snapshot: IdentityIndexSnapshot) -> AuthResult<Self> {
        let mut tables = Tables {
            next: snapshot.next,
            ..Tables::default()
        };

        for entry in snapshot.entries {
            if entry.index.value() >= snapshot.next {
                return Err(AuthError::Storage {
                    message: format!(
                        "identity snapshot entry {} is beyond the allocation counter",
                        entry.index
                    ),
                });
            }
            if tables
                .by_bytes
                .insert(entry.bytes.clone(), entry.index)
                .is_some()
            {
                return Err(AuthError::Storage {
                    message: "identity snapshot maps the same bytes twice".to_string(),
                });
            }
            if tables
                .by_index
                .insert(
                    entry.index.value(),
                    IndexedBytes {
                        bytes: entry.bytes,
                        principal: entry.principal,
                    },
                )
                .is_some()
            {
                return Err(AuthError::Storage {
                    message: format!("identity snapshot maps index {} twice", entry.index),
                });
            }
        }

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub fn snapshot(&self) -> AuthResult<IdentityIndexSnapshot> {
        let tables = self.read_tables()?;
        let mut entries: Vec<IdentityEntry> = tables
            .by_index
            .iter()
            .map(|(index, indexed)| IdentityEntry {
                index: SubjectIndex(*index),
                bytes: indexed.bytes.clone(),
                principal: indexed.principal,
            })
            .collect();
        entries.sort_by_key(|entry| entry.index);

        Ok(IdentityIndexSnapshot {
            entries,
            next: tables.next,
        })
    }

    fn read_tables(&self) -> AuthResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| AuthError::Storage {
            message: "identity index lock poisoned".to_string(),
        })
    }

    fn write_tables(&self) -> AuthResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| AuthError::Storage {
            message: "identity index lock poisoned".to_string(),
        })
    }

    fn index_of(&self, bytes: &[u8], principal: bool) -> AuthResult<SubjectIndex> {
        let mut tables = self.write_tables()?;

        if let Some(index) = tables.by_bytes.get(bytes).copied() {
            if principal {
                if let Some(indexed) = tables.by_index.get_mut(&index.value()) {
                    indexed.principal = true;
                }
            }
            return Ok(index);
        }

        let index = SubjectIndex(tables.next);
        tables.next = tables.next.checked_add(1).ok_or_else(|| AuthError::Storage {
            message: "identity index exhausted".to_string(),
        })?;
        tables.by_bytes.insert(bytes.to_vec(), index);
        tables.by_index.insert(
            index.value(),
            IndexedBytes {
                bytes: bytes.to_vec(),
                principal,
            },
        );
        Ok(index)
    }
}

#[async_trait::async_trait]
impl IdentityIndexPort for MemoryIdentityIndex {
    async fn index_of_bytes(&self, bytes: &[u8]) -> AuthResult<SubjectIndex> {
        self.index_of(bytes, false)
    }

    async fn index_of_principal(&self, principal: &Principal) -> AuthResult<SubjectIndex> {
        self.index_of(principal.as_bytes(), true)
    }

    async fn lookup_bytes(&self, bytes: &[u8]) -> AuthResult<Option<SubjectIndex>> {
        Ok(self.read_tables()?.by_bytes.get(bytes).copied())
    }

    async fn bytes_of(&self, index: SubjectIndex) -> AuthResult<Option<Vec<u8>>> {
        Ok(self
            .read_tables()?
            .by_index
            .get(&index.value())
            .map(|indexed| indexed.bytes.clone()))
    }

    async fn principal_of(&self, index: SubjectIndex) -> AuthResult<Option<Principal>> {
        let tables = self.read_tables()?;
        let Some(indexed) = tables.by_index.get(&index.value()) else {
            return Ok(None);
        };
        if !indexed.principal {
            return Ok(None);
        }
        Ok(Principal::from_slice(&indexed.bytes).ok())
    }

    async fn entry_count(&self) -> AuthResult<usize> {
        Ok(self.read_tables()?.by_index.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(tag: u8) -> Principal {
        Principal::from_bytes(vec![tag, tag]).unwrap()
    }

    #[tokio::test]
    async fn indices_are_dense_and_stable() {
        let index = MemoryIdentityIndex::new();

        let first = index.index_of_bytes(b"alpha").await.unwrap();
        let second = index.index_of_bytes(b"beta").await.unwrap();
        let repeat = index.index_of_bytes(b"alpha").await.unwrap();

        assert_eq!(first, SubjectIndex(0));
        assert_eq!(second, SubjectIndex(1));
        assert_eq!(repeat, first);
        assert_eq!(index.entry_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn principal_round_trips_through_its_index() {
        let index = MemoryIdentityIndex::new();
        let subject = principal(7);

        let allocated = index.index_of_principal(&subject).await.unwrap();
        let resolved = index.principal_of(allocated).await.unwrap().unwrap();

        assert_eq!(resolved.as_bytes(), subject.as_bytes());
    }

    #[tokio::test]
    async fn plain_bytes_do_not_resolve_to_principals() {
        let index = MemoryIdentityIndex::new();

        let allocated = index.index_of_bytes(b"edit_any_name").await.unwrap();
        assert!(index.principal_of(allocated).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn principal_flag_upgrades_but_never_downgrades() {
        let index = MemoryIdentityIndex::new();
        let subject = principal(3);

        let as_bytes = index.index_of_bytes(subject.as_bytes()).await.unwrap();
        assert!(index.principal_of(as_bytes).await.unwrap().is_none());

        let as_principal = index.index_of_principal(&subject).await.unwrap();
        assert_eq!(as_bytes, as_principal);
        assert!(index.principal_of(as_bytes).await.unwrap().is_some());

        let again = index.index_of_bytes(subject.as_bytes()).await.unwrap();
        assert_eq!(again, as_bytes);
        assert!(index.principal_of(as_bytes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn snapshot_round_trip_preserves_allocation() {
        let index = MemoryIdentityIndex::new();
        index.index_of_principal(&principal(1)).await.unwrap();
        index.index_of_bytes(b"ban_user").await.unwrap();

        let restored = MemoryIdentityIndex::restore(index.snapshot().unwrap()).unwrap();

        assert_eq!(
            restored.lookup_bytes(b"ban_user").await.unwrap(),
            Some(SubjectIndex(1))
        );
        let next = restored.index_of_bytes(b"fresh").await.unwrap();
        assert_eq!(next, SubjectIndex(2));
    }

    #[tokio::test]
    async fn restore_rejects_duplicate_entries() {
        let snapshot = IdentityIndexSnapshot {
            entries: vec![
                IdentityEntry {
                    index: SubjectIndex(0),
                    bytes: b"dup".to_vec(),
                    principal: false,
                },
                IdentityEntry {
                    index: SubjectIndex(1),
                    bytes: b"dup".to_vec(),
                    principal: false,
                },
            ],
            next: 2,
        };
        assert!(MemoryIdentityIndex::restore(snapshot).is_err());
    }
}
