pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod schedule;
pub mod session;
pub mod time;
pub mod types;
pub mod views;

pub use error::{NiyyahError, Result};
pub use schedule::{block_progress, day_progress, resolve_active_block, ScheduleBlock};
pub use time::TimeOfDay;
