use std::collections::HashMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use domain::{
    admin::AdminGrant,
    identity::SubjectIndex,
    permission::{GrantLookup, PermissionGrant, PermissionType},
    time::Timestamp,
};
use namehub_application::error::AuthResult;
use namehub_application::ports::outgoing::permission_store::PermissionStorePort;

#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    admins: DashMap<SubjectIndex, AdminGrant>,
    types: DashMap<SubjectIndex, PermissionType>,
    grants: DashMap<SubjectIndex, HashMap<SubjectIndex, PermissionGrant>>,
}

impl MemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(
        admins: Vec<(SubjectIndex, AdminGrant)>,
        grants: Vec<(SubjectIndex, Vec<(SubjectIndex, PermissionGrant)>)>,
    ) -> Self {
        let store = Self::new();
        for (index, grant) in admins {
            store.admins.insert(index, grant);
        }
        for (principal, table) in grants {
            store.grants.insert(principal, table.into_iter().collect());
        }
        store
    }

    pub fn admin_snapshot(&self) -> Vec<(SubjectIndex, AdminGrant)> {
        let mut admins: Vec<_> = self
            .admins
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        admins.sort_by_key(|(index, _)| *index);
        admins
    }

    pub fn grant_snapshot(&self) -> Vec<(SubjectIndex, Vec<(SubjectIndex, PermissionGrant)>)> {
        let mut grants: Vec<_> = self
            .grants
            .iter()
            .map(|entry| {
                let mut table: Vec<_> = entry
                    .value()
                    .iter()
                    .map(|(permission, grant)| (*permission, grant.clone()))
                    .collect();
                table.sort_by_key(|(permission, _)| *permission);
                (*entry.key(), table)
            })
            .collect();
        grants.sort_by_key(|(principal, _)| *principal);
        grants
    }
}

#[async_trait::async_trait]
impl PermissionStorePort for MemoryPermissionStore {
    async fn admin_grant(&self, admin: SubjectIndex) -> AuthResult<Option<AdminGrant>> {
        Ok(self.admins.get(&admin).map(|grant| grant.value().clone()))
    }

    async fn insert_admin(&self, admin: SubjectIndex, grant: AdminGrant) -> AuthResult<()> {
        self.admins.insert(admin, grant);
        Ok(())
    }

    async fn remove_admin(&self, admin: SubjectIndex) -> AuthResult<bool> {
        Ok(self.admins.remove(&admin).is_some())
    }

    async fn admins(&self) -> AuthResult<Vec<(SubjectIndex, AdminGrant)>> {
        Ok(self.admin_snapshot())
    }

    async fn remove_expired_admins(&self, now: Timestamp) -> AuthResult<usize> {
        let expired: Vec<SubjectIndex> = self
            .admins
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| *entry.key())
            .collect();

        for index in &expired {
            self.admins.remove(index);
        }
        Ok(expired.len())
    }

    async fn permission_type(
        &self,
        permission: SubjectIndex,
    ) -> AuthResult<Option<PermissionType>> {
        Ok(self
            .types
            .get(&permission)
            .map(|permission_type| permission_type.value().clone()))
    }

    async fn insert_permission_type(
        &self,
        permission: SubjectIndex,
        permission_type: PermissionType,
    ) -> AuthResult<bool> {
        match self.types.entry(permission) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(permission_type);
                Ok(true)
            }
        }
    }

    async fn permission_types(&self) -> AuthResult<Vec<(SubjectIndex, PermissionType)>> {
        let mut types: Vec<_> = self
            .types
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        types.sort_by_key(|(index, _)| *index);
        Ok(types)
    }

    async fn grant_lookup(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<GrantLookup> {
        let Some(table) = self.grants.get(&principal) else {
            return Ok(GrantLookup::NoTable);
        };
        match table.get(&permission) {
            Some(grant) => Ok(GrantLookup::Granted(grant.clone())),
            None => Ok(GrantLookup::NotGranted),
        }
    }

    async fn insert_grant(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
        grant: PermissionGrant,
    ) -> AuthResult<()> {
        self.grants
            .entry(principal)
            .or_default()
            .insert(permission, grant);
        Ok(())
    }

    async fn remove_grant(
        &self,
        principal: SubjectIndex,
        permission: SubjectIndex,
    ) -> AuthResult<bool> {
        let Some(mut table) = self.grants.get_mut(&principal) else {
            return Ok(false);
        };

        let removed = table.remove(&permission).is_some();
        let emptied = table.is_empty();
        drop(table);

        if emptied {
            self.grants.remove(&principal);
        }
        Ok(removed)
    }

    async fn grants_of(
        &self,
        principal: SubjectIndex,
    ) -> AuthResult<Vec<(SubjectIndex, PermissionGrant)>> {
        let Some(table) = self.grants.get(&principal) else {
            return Ok(Vec::new());
        };
        let mut grants: Vec<_> = table
            .iter()
            .map(|(permission, grant)| (*permission, grant.clone()))
            .collect();
        grants.sort_by_key(|(permission, _)| *permission);
        Ok(grants)
    }

    async fn remove_expired_grants(&self, now: Timestamp) -> AuthResult<usize> {
        let mut removed = 0;
        for mut entry in self.grants.iter_mut() {
            let before = entry.value().len();
            entry.value_mut().retain(|_, grant| grant.is_active(now));
            removed += before - entry.value().len();
        }
        self.grants.retain(|_, table| !table.is_empty());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::principal::Principal;

    fn grant(expires_at: Option<u64>) -> PermissionGrant {
        PermissionGrant::new(
            Principal::from_bytes(vec![1]).unwrap(),
            Timestamp::from_nanos(1),
            expires_at.map(Timestamp::from_nanos),
        )
    }

    #[tokio::test]
    async fn grant_lookup_distinguishes_missing_table_from_missing_grant() {
        let store = MemoryPermissionStore::new();
        let principal = SubjectIndex(1);
        let permission = SubjectIndex(2);

        assert_eq!(
            store.grant_lookup(principal, permission).await.unwrap(),
            GrantLookup::NoTable
        );

        store
            .insert_grant(principal, SubjectIndex(3), grant(None))
            .await
            .unwrap();
        assert_eq!(
            store.grant_lookup(principal, permission).await.unwrap(),
            GrantLookup::NotGranted
        );

        store
            .insert_grant(principal, permission, grant(None))
            .await
            .unwrap();
        assert!(matches!(
            store.grant_lookup(principal, permission).await.unwrap(),
            GrantLookup::Granted(_)
        ));
    }

    #[tokio::test]
    async fn removing_the_last_grant_drops_the_inner_table() {
        let store = MemoryPermissionStore::new();
        let principal = SubjectIndex(1);
        let permission = SubjectIndex(2);

        store
            .insert_grant(principal, permission, grant(None))
            .await
            .unwrap();
        assert!(store.remove_grant(principal, permission).await.unwrap());

        assert_eq!(
            store.grant_lookup(principal, permission).await.unwrap(),
            GrantLookup::NoTable
        );
        assert!(!store.remove_grant(principal, permission).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_permission_types_are_rejected() {
        let store = MemoryPermissionStore::new();
        let permission = SubjectIndex(0);

        assert!(
            store
                .insert_permission_type(permission, PermissionType::new("first", None, None))
                .await
                .unwrap()
        );
        assert!(
            !store
                .insert_permission_type(permission, PermissionType::new("second", None, None))
                .await
                .unwrap()
        );

        let stored = store.permission_type(permission).await.unwrap().unwrap();
        assert_eq!(stored.description, "first");
    }

    #[tokio::test]
    async fn expired_grants_and_empty_tables_are_swept() {
        let store = MemoryPermissionStore::new();
        let now = Timestamp::from_nanos(100);

        store
            .insert_grant(SubjectIndex(1), SubjectIndex(10), grant(Some(50)))
            .await
            .unwrap();
        store
            .insert_grant(SubjectIndex(2), SubjectIndex(10), grant(Some(500)))
            .await
            .unwrap();

        assert_eq!(store.remove_expired_grants(now).await.unwrap(), 1);
        assert_eq!(
            store
                .grant_lookup(SubjectIndex(1), SubjectIndex(10))
                .await
                .unwrap(),
            GrantLookup::NoTable
        );
        assert!(matches!(
            store
                .grant_lookup(SubjectIndex(2), SubjectIndex(10))
                .await
                .unwrap(),
            GrantLookup::Granted(_)
        ));
    }

    #[tokio::test]
    async fn expired_admins_are_swept() {
        let store = MemoryPermissionStore::new();
        let author = Principal::from_bytes(vec![9]).unwrap();

        store
            .insert_admin(
                SubjectIndex(1),
                AdminGrant::new(author.clone(), Timestamp::from_nanos(1), None),
            )
            .await
            .unwrap();
        store
            .insert_admin(
                SubjectIndex(2),
                AdminGrant::new(author, Timestamp::from_nanos(1), Some(Timestamp::from_nanos(10))),
            )
            .await
            .unwrap();

        assert_eq!(
            store
                .remove_expired_admins(Timestamp::from_nanos(100))
                .await
                .unwrap(),
            1
        );
        assert!(store.admin_grant(SubjectIndex(1)).await.unwrap().is_some());
        assert!(store.admin_grant(SubjectIndex(2)).await.unwrap().is_none());
    }
}
