use chrono::{DateTime, Utc};

/// Snapshot of the countdown towards the next alert.
///
/// Not running is always `{ None, 0 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownState {
    pub next_alarm_date: Option<DateTime<Utc>>,
    pub remaining_seconds: u64,
}

impl CountdownState {
    pub fn inactive() -> Self {
        Self {
            next_alarm_date: None,
            remaining_seconds: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_alarm_date.is_some()
    }

    pub fn remaining_display(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_state_has_no_date() {
        let state = CountdownState::inactive();
        assert!(!state.is_running());
        assert_eq!(state.remaining_seconds, 0);
        assert_eq!(state, CountdownState::default());
    }

    #[test]
    fn remaining_is_rendered_as_clock() {
        let state = CountdownState {
            next_alarm_date: Some(Utc::now()),
            remaining_seconds: 3 * 3600 + 5 * 60 + 9,
        };
        assert_eq!(state.remaining_display(), "03:05:09");
        assert_eq!(CountdownState::inactive().remaining_display(), "00:00:00");
    }
}
