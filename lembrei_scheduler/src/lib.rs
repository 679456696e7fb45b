mod alarm_scheduler;
mod clock;
mod countdown;
mod engine;
mod notification;
mod task;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use alarm_scheduler::AlarmScheduler;
pub use clock::{Clock, SystemClock};
pub use countdown::{compute_countdown, next_trigger};
pub use engine::CountdownEngine;
pub use notification::AlarmNotifier;
pub use task::ScheduledTask;
