use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct SubjectIndex(pub u32);

impl SubjectIndex {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for SubjectIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Display for SubjectIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId {
    bytes: Vec<u8>,
}

impl NeuronId {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
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
}

impl Display for NeuronId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for NeuronId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for NeuronId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        if text.len() % 2 != 0 {
            return Err(serde::de::Error::custom("odd-length neuron id encoding"));
        }
        let mut bytes = Vec::with_capacity(text.len() / 2);
        for chunk in text.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| serde::de::Error::custom("invalid neuron id encoding"))?;
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| serde::de::Error::custom("invalid neuron id encoding"))?;
            bytes.push(byte);
        }
        Ok(Self { bytes })
    }
}
