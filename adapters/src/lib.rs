pub mod outgoing;
pub mod shared;
