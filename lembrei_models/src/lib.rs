pub mod alarm;
pub mod countdown;
pub mod settings;

pub use chrono;
