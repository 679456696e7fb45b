use chrono::{DateTime, TimeDelta, Utc};
use lembrei_models::{alarm::AlarmInterval, countdown::CountdownState};

/// Computes the countdown for a recurring interval that started at `start`.
///
/// Returns [`CountdownState::inactive`] when not active or when there is no
/// start timestamp. Otherwise the next trigger is the first cycle boundary
/// strictly after `now`, however many cycles were missed.
pub fn compute_countdown(
    start: Option<DateTime<Utc>>,
    interval: AlarmInterval,
    is_active: bool,
    now: DateTime<Utc>,
) -> CountdownState {
    let Some(start) = start.filter(|_| is_active) else {
        return CountdownState::inactive();
    };

    let next_alarm_date = next_trigger(start, interval, now);
    let remaining_seconds = u64::try_from((next_alarm_date - now).num_seconds()).unwrap_or(0);

    CountdownState {
        next_alarm_date: Some(next_alarm_date),
        remaining_seconds,
    }
}

/// `start + (cycles_elapsed + 1) * interval`, with elapsed time before
/// `start` counted as zero.
pub fn next_trigger(
    start: DateTime<Utc>,
    interval: AlarmInterval,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let interval_ms = i64::from(interval.seconds()) * 1000;
    let elapsed_ms = (now - start).num_milliseconds().max(0);
    let cycles_elapsed = elapsed_ms / interval_ms;

    cycles_elapsed
        .checked_add(1)
        .and_then(|cycles| cycles.checked_mul(interval_ms))
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
