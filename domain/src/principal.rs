use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use thiserror::Error;

pub const MAX_PRINCIPAL_BYTES: usize = 29;
pub const SUBACCOUNT_BYTES: usize = 32;

const ANONYMOUS_TAG: u8 = 0x04;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal {
    bytes: Vec<u8>,
}

impl Principal {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, InvalidPrincipalError> {
        if bytes.is_empty() || bytes.len() > MAX_PRINCIPAL_BYTES {
            return Err(InvalidPrincipalError {
                length: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidPrincipalError> {
        Self::from_bytes(bytes.to_vec())
    }

    pub fn anonymous() -> Self {
        Self {
            bytes: vec![ANONYMOUS_TAG],
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.bytes == [ANONYMOUS_TAG]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.bytes.len() * 2);
        for byte in &self.bytes {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    pub fn from_hex(text: &str) -> Result<Self, InvalidPrincipalError> {
        let stripped = text.trim();
        if stripped.len() % 2 != 0 {
            return Err(InvalidPrincipalError {
                length: stripped.len(),
            });
        }
        let mut bytes = Vec::with_capacity(stripped.len() / 2);
        for chunk in stripped.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(chunk).map_err(|_| InvalidPrincipalError {
                length: stripped.len(),
            })?;
            let byte = u8::from_str_radix(pair, 16).map_err(|_| InvalidPrincipalError {
                length: stripped.len(),
            })?;
            bytes.push(byte);
        }
        Self::from_bytes(bytes)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Principal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Principal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid principal encoding of length {length}")]
pub struct InvalidPrincipalError {
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subaccount {
    bytes: [u8; SUBACCOUNT_BYTES],
}

impl Subaccount {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvalidSubaccountError> {
        let bytes: [u8; SUBACCOUNT_BYTES] =
            bytes
                .try_into()
                .map_err(|_| InvalidSubaccountError {
                    length: bytes.len(),
                })?;
        Ok(Self { bytes })
    }

    pub fn default_subaccount() -> Self {
        Self {
            bytes: [0; SUBACCOUNT_BYTES],
        }
    }

    pub fn is_default(&self) -> bool {
        self.bytes.iter().all(|byte| *byte == 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Subaccounts must be exactly {SUBACCOUNT_BYTES} bytes, got {length}")]
pub struct InvalidSubaccountError {
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    pub owner: Principal,
    pub subaccount: Option<Subaccount>,
}

impl Account {
    pub fn new(owner: Principal, subaccount: Option<Subaccount>) -> Self {
        Self { owner, subaccount }
    }

    pub fn has_default_subaccount(&self) -> bool {
        match &self.subaccount {
            Some(subaccount) => subaccount.is_default(),
            None => true,
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let subaccount = self.subaccount.unwrap_or_else(Subaccount::default_subaccount);
        let mut bytes = Vec::with_capacity(self.owner.as_bytes().len() + SUBACCOUNT_BYTES);
        bytes.extend_from_slice(self.owner.as_bytes());
        bytes.extend_from_slice(subaccount.as_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let principal = Principal::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]).unwrap();
        let parsed = Principal::from_hex(&principal.to_hex()).unwrap();
        assert_eq!(principal, parsed);
    }

    #[test]
    fn rejects_empty_and_oversized_principals() {
        assert!(Principal::from_bytes(Vec::new()).is_err());
        assert!(Principal::from_bytes(vec![1; MAX_PRINCIPAL_BYTES + 1]).is_err());
        assert!(Principal::from_bytes(vec![1; MAX_PRINCIPAL_BYTES]).is_ok());
    }

    #[test]
    fn anonymous_is_the_reserved_tag() {
        let anonymous = Principal::anonymous();
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.as_bytes(), [0x04]);
        assert!(!Principal::from_bytes(vec![0x04, 0x01]).unwrap().is_anonymous());
    }

    #[test]
    fn subaccount_length_is_enforced() {
        assert!(Subaccount::from_bytes(&[0; 31]).is_err());
        assert!(Subaccount::from_bytes(&[0; 33]).is_err());
        assert!(Subaccount::from_bytes(&[0; 32]).is_ok());
    }

    #[test]
    fn zero_subaccount_matches_absent_subaccount() {
        let owner = Principal::from_bytes(vec![7; 4]).unwrap();
        let implicit = Account::new(owner.clone(), None);
        let explicit = Account::new(owner, Some(Subaccount::default_subaccount()));

        assert!(implicit.has_default_subaccount());
        assert!(explicit.has_default_subaccount());
        assert_eq!(implicit.canonical_bytes(), explicit.canonical_bytes());
    }

    #[test]
    fn distinct_subaccounts_produce_distinct_keys() {
        let owner = Principal::from_bytes(vec![7; 4]).unwrap();
        let mut raw = [0_u8; 32];
        raw[31] = 1;
        let account = Account::new(owner.clone(), Some(Subaccount::from_bytes(&raw).unwrap()));
        let default = Account::new(owner, None);

        assert!(!account.has_default_subaccount());
        assert_ne!(account.canonical_bytes(), default.canonical_bytes());
    }
}
