use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::Principal;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGrant {
    pub created_by: Principal,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl AdminGrant {
    pub fn new(created_by: Principal, created_at: Timestamp, expires_at: Option<Timestamp>) -> Self {
        Self {
            created_by,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at.is_past(now),
            None => false,
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.is_expired(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("Principal {0} is already an admin")]
    AlreadyAdmin(Principal),

    #[error("Principal {0} is not an admin")]
    AdminNotFound(Principal),

    #[error("Admins cannot remove themselves")]
    CannotRemoveSelf,

    #[error("The controller cannot be removed from the admin set")]
    CannotRemoveController,

    #[error("Caller lacks the {required} permission")]
    NotAuthorized { required: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_grant(expires_at: Option<u64>) -> AdminGrant {
        AdminGrant::new(
            Principal::from_bytes(vec![1]).unwrap(),
            Timestamp::from_nanos(10),
            expires_at.map(Timestamp::from_nanos),
        )
    }

    #[test]
    fn permanent_grants_never_expire() {
        assert!(admin_grant(None).is_active(Timestamp::from_nanos(u64::MAX)));
    }

    #[test]
    fn grants_expire_at_their_deadline() {
        let grant = admin_grant(Some(100));
        assert!(grant.is_active(Timestamp::from_nanos(99)));
        assert!(grant.is_expired(Timestamp::from_nanos(100)));
        assert!(grant.is_expired(Timestamp::from_nanos(101)));
    }
}
