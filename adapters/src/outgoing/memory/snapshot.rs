use serde::{Deserialize, Serialize};

use domain::{
    admin::AdminGrant,
    ban::{BanLogEntry, BanRecord, BanSettings},
    identity::SubjectIndex,
    name::{BannedWordEntry, NameRecord, NameSettings},
    neuron::SnsThreshold,
    permission::PermissionGrant,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    pub index: SubjectIndex,
    pub bytes: Vec<u8>,
    pub principal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityIndexSnapshot {
    pub entries: Vec<IdentityEntry>,
    pub next: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableSnapshot {
    pub identity: IdentityIndexSnapshot,
    pub admins: Vec<(SubjectIndex, AdminGrant)>,
    pub grants: Vec<(SubjectIndex, Vec<(SubjectIndex, PermissionGrant)>)>,
    pub ban_log: Vec<BanLogEntry>,
    pub active_bans: Vec<(SubjectIndex, BanRecord)>,
    pub ban_settings: BanSettings,
    pub thresholds: Vec<(SubjectIndex, SubjectIndex, SnsThreshold)>,
    pub name_records: Vec<(SubjectIndex, NameRecord)>,
    pub name_index: Vec<(String, SubjectIndex)>,
    pub banned_words: Vec<(String, BannedWordEntry)>,
    pub name_settings: NameSettings,
}
