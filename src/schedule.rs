// Daily run scheduling: a random minute inside the configured window, next day
use crate::config::ScheduleConfig;
use chrono::{DateTime, Days, NaiveDateTime, TimeDelta, TimeZone};
use rand::Rng;
use std::time::Duration;

/// Longest daylight-saving gap skipped when resolving a wall-clock time.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Picks the next run time on the calendar day after `now`.
///
/// A time that falls into a daylight-saving gap moves forward to the first
/// minute that exists. `None` only on calendar overflow.
pub fn next_run_at<Tz: TimeZone, R: Rng>(
    now: &DateTime<Tz>,
    schedule: &ScheduleConfig,
    rng: &mut R,
) -> Option<DateTime<Tz>> {
    let hour = rng.random_range(schedule.start_hour..=schedule.end_hour);
    let minute = rng.random_range(0..=59);
    let tomorrow = now.date_naive().checked_add_days(Days::new(1))?;
    resolve_local(tomorrow.and_hms_opt(hour, minute, 0)?, &now.timezone())
}

/// Earliest instant for `local` in `tz`, or for the first later minute that
/// exists when `local` is skipped by a clock change.
fn resolve_local<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES).find_map(|offset| {
        let candidate = local.checked_add_signed(TimeDelta::minutes(offset))?;
        tz.from_local_datetime(&candidate).earliest()
    })
}

/// Time to wait from `now` until `next`, zero if `next` has passed.
pub fn delay_until<Tz: TimeZone>(now: &DateTime<Tz>, next: &DateTime<Tz>) -> Duration {
    next.clone()
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or(Duration::ZERO)
}
