pub mod admins;
pub mod bans;
pub mod maintenance;
pub mod names;
pub mod permissions;
pub mod sns;
