//! Countdown engine and tick scheduling.
//!
//! - `clock`: clock sources (system and manual)
//! - `countdown`: the phase state machine and event subscription list
//! - `scheduler`: the 100 ms tick driver

pub mod clock;
pub mod countdown;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{CountdownEngine, EngineEvent, Snapshot, MAX_RUN};
pub use scheduler::{TickOutcome, TickScheduler};
