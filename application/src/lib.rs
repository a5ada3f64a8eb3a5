#[cfg(any(feature = "adapters", feature = "axum", feature = "sqlx"))]
compile_error!("application must not depend on adapters/framework crates");

pub mod bans;
pub mod config;
pub mod error;
pub mod names;
pub mod permissions;
pub mod ports;
pub mod sns;
