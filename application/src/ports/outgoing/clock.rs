use std::sync::Arc;

use domain::time::Timestamp;

pub trait ClockPort: Send + Sync {
    fn now(&self) -> Timestamp;
}

pub type DynClockPort = Arc<dyn ClockPort>;
