//! Date, time and duration types.
//!
//! Dates and times accept ISO 8601 / RFC 3339 timestamps and a small
//! natural-language grammar (`tomorrow`, `today at 07:15`,
//! `11/05/1955 06:00`, `March 3, 2021`). Components left out round to
//! the beginning: a date without a clock time is midnight.
//!
//! Durations accept `2 weeks, 1 day`, `1.5 days`, `1h30m`, `1:30:00` and
//! ISO 8601 periods such as `P2W1DT3H`.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{
    Datelike, DateTime, Days, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeDelta, TimeZone,
};
use regex::{Captures, Regex};

use crate::error::{CastError, CastResult};
use crate::registry::TypeSpec;
use crate::value::Value;

pub(crate) fn specs() -> Vec<TypeSpec> {
    vec![
        TypeSpec::new("date").parser(|raw| {
            parse_date_at(raw, Local::now().naive_local()).map(Value::Date)
        }),
        TypeSpec::new("time").alias("datetime").parser(|raw| {
            parse_time_at(raw, Local::now().naive_local()).map(Value::Time)
        }),
        TypeSpec::new("duration").parser(|raw| parse_duration(raw).map(Value::Duration)),
    ]
}

// ============================================================================
// DATES AND TIMES
// ============================================================================

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(now|today|tomorrow|yesterday|noon|midnight)(?:\s+(?:at\s+)?(.+))?$")
        .expect("keyword pattern is valid")
});

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:(?:t|\s+)(.+))?$").expect("ISO date pattern is valid")
});

static YMD_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})(?:\s+(?:at\s+)?(.+))?$")
        .expect("y/m/d pattern is valid")
});

static MDY_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?(?:\s+(?:at\s+)?(.+))?$")
        .expect("m/d/y pattern is valid")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?(?:,?\s+(?:at\s+)?(.+))?$"
    ))
    .expect("month-day pattern is valid")
});

static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})\.?(?:,?\s+(\d{{4}}))?(?:,?\s+(?:at\s+)?(.+))?$"
    ))
    .expect("day-month pattern is valid")
});

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2})(?::(\d{2}))?(?::(\d{2})(?:\.(\d{1,9}))?)?\s*(am|pm|a\.m\.|p\.m\.)?\s*(z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("clock pattern is valid")
});

/// A parsed point in time: either carrying its own offset, or a wall
/// clock reading in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Moment {
    Fixed(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    time: NaiveTime,
    offset: Option<FixedOffset>,
}

/// Parses a date relative to `now` (used for `today`, `tomorrow` and
/// dates without a year).
pub fn parse_date_at(raw: &str, now: NaiveDateTime) -> CastResult<NaiveDate> {
    match parse_moment(raw, now) {
        Some(Moment::Fixed(dt)) => Ok(dt.date_naive()),
        Some(Moment::Local(ndt)) => Ok(ndt.date()),
        None => Err(CastError::not_convertible("date", "non-date value")),
    }
}

/// Parses a full timestamp relative to `now`. Readings without an
/// explicit offset are taken as local time.
pub fn parse_time_at(raw: &str, now: NaiveDateTime) -> CastResult<DateTime<FixedOffset>> {
    let not_a_time = || CastError::not_convertible("time", "non-time value");
    match parse_moment(raw, now).ok_or_else(not_a_time)? {
        Moment::Fixed(dt) => Ok(dt),
        Moment::Local(ndt) => localize(&Local, ndt).ok_or_else(not_a_time),
    }
}

/// Places a wall-clock reading in `tz`. A reading that falls in a
/// daylight-saving gap is moved forward by the length of the gap.
fn localize<Tz: TimeZone>(tz: &Tz, ndt: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(&ndt) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.fixed_offset()),
        LocalResult::None => {
            let before = ndt.checked_sub_signed(TimeDelta::days(1))?;
            let offset = tz.offset_from_local_datetime(&before).earliest()?.fix();
            let utc = ndt.checked_sub_offset(offset)?;
            Some(tz.from_utc_datetime(&utc).fixed_offset())
        }
    }
}

fn parse_moment(raw: &str, now: NaiveDateTime) -> Option<Moment> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(Moment::Fixed(dt));
    }

    let input = trimmed.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let today = now.date();

    if let Some(caps) = KEYWORD.captures(&input) {
        let (date, default_time) = match &caps[1] {
            "now" if caps.get(2).is_none() => return Some(Moment::Local(now)),
            "now" | "today" => (today, NaiveTime::MIN),
            "tomorrow" => (today.checked_add_days(Days::new(1))?, NaiveTime::MIN),
            "yesterday" => (today.checked_sub_days(Days::new(1))?, NaiveTime::MIN),
            "noon" if caps.get(2).is_none() => (today, NaiveTime::from_hms_opt(12, 0, 0)?),
            "midnight" if caps.get(2).is_none() => (today, NaiveTime::MIN),
            _ => return None,
        };
        return combine(date, caps.get(2).map(|m| m.as_str()), default_time, false);
    }

    if let Some(caps) = ISO_DATE.captures(&input) {
        let date = ymd(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
        return combine(date, caps.get(4).map(|m| m.as_str()), NaiveTime::MIN, true);
    }

    if let Some(caps) = YMD_SLASH.captures(&input) {
        let date = ymd(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
        return combine(date, caps.get(4).map(|m| m.as_str()), NaiveTime::MIN, true);
    }

    if let Some(caps) = MDY_SLASH.captures(&input) {
        let year = match caps.get(3) {
            Some(y) if y.as_str().len() == 2 => expand_two_digit_year(y.as_str().parse().ok()?),
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        let date = ymd(year, number(&caps, 1)?, number(&caps, 2)?)?;
        return combine(date, caps.get(4).map(|m| m.as_str()), NaiveTime::MIN, true);
    }

    if let Some(caps) = MONTH_DAY.captures(&input) {
        let year = caps.get(3).map_or(Some(today.year()), |y| {
            y.as_str().parse().ok()
        })?;
        let date = ymd(year, month_number(&caps[1])?, number(&caps, 2)?)?;
        return combine(date, caps.get(4).map(|m| m.as_str()), NaiveTime::MIN, true);
    }

    if let Some(caps) = DAY_MONTH.captures(&input) {
        let year = caps.get(3).map_or(Some(today.year()), |y| {
            y.as_str().parse().ok()
        })?;
        let date = ymd(year, month_number(&caps[2])?, number(&caps, 1)?)?;
        return combine(date, caps.get(4).map(|m| m.as_str()), NaiveTime::MIN, true);
    }

    // A clock reading on its own means today. A bare number is not a time.
    let clock = parse_clock(&input)?;
    if !(input.contains(':') || input.contains('m')) {
        return None;
    }
    Some(at(today, clock))
}

fn combine(
    date: NaiveDate,
    clock: Option<&str>,
    default_time: NaiveTime,
    allow_offset: bool,
) -> Option<Moment> {
    match clock {
        None => Some(Moment::Local(date.and_time(default_time))),
        Some(text) => {
            let clock = parse_clock(text)?;
            if clock.offset.is_some() && !allow_offset {
                return None;
            }
            Some(at(date, clock))
        }
    }
}

fn at(date: NaiveDate, clock: Clock) -> Moment {
    let ndt = date.and_time(clock.time);
    match clock.offset {
        Some(offset) => match offset.from_local_datetime(&ndt).single() {
            Some(dt) => Moment::Fixed(dt),
            None => Moment::Local(ndt),
        },
        None => Moment::Local(ndt),
    }
}

fn parse_clock(text: &str) -> Option<Clock> {
    let caps = CLOCK.captures(text.trim())?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let nanos = match caps.get(4) {
        Some(frac) => {
            let digits = frac.as_str();
            let scale = 10u32.pow(9 - u32::try_from(digits.len()).ok()?);
            digits.parse::<u32>().ok()? * scale
        }
        None => 0,
    };

    if let Some(meridiem) = caps.get(5) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let afternoon = meridiem.as_str().starts_with('p');
        hour = match (hour, afternoon) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;

    let offset = match caps.get(6).map(|m| m.as_str()) {
        None => None,
        Some("z") => FixedOffset::east_opt(0),
        Some(spec) => {
            let sign = if spec.starts_with('-') { -1 } else { 1 };
            let digits: String = spec[1..].chars().filter(char::is_ascii_digit).collect();
            let hours: i32 = digits[..2].parse().ok()?;
            let minutes: i32 = digits[2..].parse().ok()?;
            if minutes > 59 {
                return None;
            }
            Some(FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?)
        }
    };

    Some(Clock { time, offset })
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `69..=99` land in the 1900s, `00..=68` in the 2000s.
fn expand_two_digit_year(year: i32) -> i32 {
    if year >= 69 { 1900 + year } else { 2000 + year }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

// ============================================================================
// DURATIONS
// ============================================================================

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAYS_PER_MONTH: u64 = 30;

static ISO_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*P(?:([0-9.]+)Y)?(?:([0-9.]+)M)?(?:([0-9.]+)W)?(?:([0-9.]+)D)?(?:T(?:([0-9.]+)H)?(?:([0-9.]+)M)?(?:([0-9.]+)S)?)?\s*$",
    )
    .expect("ISO period pattern is valid")
});

static CONNECTIVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",|\band\b").expect("connective pattern is valid"));

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?|\.\d+)\s*([a-z]+)?\.?").expect("duration term pattern is valid")
});

static CLOCK_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?$").expect("clock duration pattern is valid")
});

/// Parses a duration into its total length.
///
/// Unit terms are read by `humantime` once commas and `and` are dropped;
/// a month is 30 days and a number without a unit is seconds. Fractional
/// amounts (`1.5 days`) scale the length of one unit. ISO 8601 periods
/// have their `P`/`T` designators stripped first, so a date-part `M` is
/// months and a time-part `M` is minutes.
pub fn parse_duration(raw: &str) -> CastResult<Duration> {
    let not_a_duration = || CastError::not_convertible("duration", "non-duration value");

    let text = match ISO_PERIOD.captures(raw) {
        Some(caps) => strip_period_designators(&caps),
        None => raw.trim().to_lowercase(),
    };

    if let Some(caps) = CLOCK_DURATION.captures(&text) {
        let seconds = clock_seconds(&caps).ok_or_else(not_a_duration)?;
        return Duration::try_from_secs_f64(seconds).map_err(|_| not_a_duration());
    }

    sum_terms(&CONNECTIVES.replace_all(&text, " ")).ok_or_else(not_a_duration)
}

fn strip_period_designators(caps: &Captures<'_>) -> String {
    const UNITS: [&str; 7] = ["y", "mo", "w", "d", "h", "m", "s"];
    UNITS
        .iter()
        .enumerate()
        .filter_map(|(index, unit)| caps.get(index + 1).map(|n| format!("{}{unit}", n.as_str())))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `M:SS` or `H:MM:SS`.
fn clock_seconds(caps: &Captures<'_>) -> Option<f64> {
    let first: f64 = caps[1].parse().ok()?;
    let second: f64 = caps[2].parse().ok()?;
    match caps.get(3) {
        Some(third) => Some(first * HOUR + second * MINUTE + third.as_str().parse::<f64>().ok()?),
        None => Some(first * MINUTE + second),
    }
}

/// Adds up `<amount> <unit>` terms. Whole amounts are handed to
/// humantime as one expression; fractional ones scale a single unit.
fn sum_terms(text: &str) -> Option<Duration> {
    let mut whole = Vec::new();
    let mut fractional = Duration::ZERO;
    let mut consumed = 0;

    for caps in TERM.captures_iter(text) {
        let term = caps.get(0)?;
        if !text[consumed..term.start()].trim().is_empty() {
            return None;
        }
        consumed = term.end();

        let (unit, count) = humantime_unit(caps.get(2).map_or("s", |unit| unit.as_str()));
        match caps[1].parse::<u64>() {
            Ok(amount) => whole.push(format!("{}{unit}", amount.checked_mul(count)?)),
            Err(_) => {
                let amount: f64 = caps[1].parse().ok()?;
                let one = humantime::parse_duration(&format!("{count}{unit}")).ok()?;
                let scaled = Duration::try_from_secs_f64(one.as_secs_f64() * amount).ok()?;
                fractional = fractional.checked_add(scaled)?;
            }
        }
    }

    if consumed == 0 || !text[consumed..].trim().is_empty() {
        return None;
    }
    let whole = if whole.is_empty() {
        Duration::ZERO
    } else {
        humantime::parse_duration(&whole.join(" ")).ok()?
    };
    whole.checked_add(fractional)
}

/// The unit name humantime reads, and how many of it `unit` stands for.
fn humantime_unit(unit: &str) -> (&str, u64) {
    match unit {
        "mo" | "mos" | "mon" | "mons" | "month" | "months" => ("days", DAYS_PER_MONTH),
        "wk" | "wks" => ("weeks", 1),
        "yr" | "yrs" => ("years", 1),
        "secs" => ("seconds", 1),
        "mins" => ("minutes", 1),
        "hrs" => ("hours", 1),
        other => (other, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(15, 45, 30)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn parses_common_date_shapes() {
        assert_eq!(parse_date_at("11/05/1955 06:00", now()).unwrap(), date(1955, 11, 5));
        assert_eq!(parse_date_at("11/12/1955 22:04", now()).unwrap(), date(1955, 11, 12));
        assert_eq!(parse_date_at("1885-09-02 08:00", now()).unwrap(), date(1885, 9, 2));
        assert_eq!(parse_date_at("1885-09-07", now()).unwrap(), date(1885, 9, 7));
        assert_eq!(parse_date_at("2021/03/04", now()).unwrap(), date(2021, 3, 4));
        assert_eq!(parse_date_at("March 3, 2021", now()).unwrap(), date(2021, 3, 3));
        assert_eq!(parse_date_at("3rd mar 2021", now()).unwrap(), date(2021, 3, 3));
        assert_eq!(parse_date_at("12/25", now()).unwrap(), date(2024, 12, 25));
        assert_eq!(parse_date_at("1/2/99", now()).unwrap(), date(1999, 1, 2));
    }

    #[test]
    fn relative_keywords_use_now() {
        assert_eq!(parse_date_at("tomorrow", now()).unwrap(), date(2024, 3, 11));
        assert_eq!(parse_date_at("Yesterday", now()).unwrap(), date(2024, 3, 9));
        assert_eq!(parse_date_at("now", now()).unwrap(), date(2024, 3, 10));
        assert_eq!(
            parse_time_at("today at 07:15", now()).unwrap(),
            local(2024, 3, 10, 7, 15)
        );
        assert_eq!(
            parse_time_at("tomorrow 5pm", now()).unwrap(),
            local(2024, 3, 11, 17, 0)
        );
        assert_eq!(parse_time_at("noon", now()).unwrap(), local(2024, 3, 10, 12, 0));
    }

    #[test]
    fn times_round_to_the_beginning() {
        assert_eq!(
            parse_time_at("1885-09-07", now()).unwrap(),
            local(1885, 9, 7, 0, 0)
        );
        assert_eq!(
            parse_time_at("11/05/1955 06:00", now()).unwrap(),
            local(1955, 11, 5, 6, 0)
        );
        assert_eq!(
            parse_time_at("12:30 am", now()).unwrap(),
            local(2024, 3, 10, 0, 30)
        );
    }

    #[test]
    fn explicit_offsets_are_kept() {
        let parsed = parse_time_at("2018-02-28T10:00:00+02:00", now()).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 7200);
        assert_eq!(parsed.to_rfc3339(), "2018-02-28T10:00:00+02:00");

        let parsed = parse_time_at("2018-02-28 10:00z", now()).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    /// UTC-5 that springs forward to UTC-4 at 02:00 local on 2024-03-10.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        const STANDARD: i32 = -5 * 3600;
        const DAYLIGHT: i32 = -4 * 3600;

        fn offset(secs: i32) -> FixedOffset {
            FixedOffset::east_opt(secs).unwrap()
        }

        fn switch() -> NaiveDateTime {
            date(2024, 3, 10).and_hms_opt(7, 0, 0).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, _: &NaiveDate) -> LocalResult<FixedOffset> {
            LocalResult::Single(Self::offset(Self::STANDARD))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let standard = Self::offset(Self::STANDARD);
            let daylight = Self::offset(Self::DAYLIGHT);
            if local.checked_sub_offset(standard).unwrap() < Self::switch() {
                LocalResult::Single(standard)
            } else if local.checked_sub_offset(daylight).unwrap() >= Self::switch() {
                LocalResult::Single(daylight)
            } else {
                LocalResult::None
            }
        }

        fn offset_from_utc_date(&self, _: &NaiveDate) -> FixedOffset {
            Self::offset(Self::STANDARD)
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::offset(Self::STANDARD)
            } else {
                Self::offset(Self::DAYLIGHT)
            }
        }
    }

    #[test]
    fn times_in_a_daylight_saving_gap_move_forward() {
        let at = |h, m| date(2024, 3, 10).and_hms_opt(h, m, 0).unwrap();

        let shifted = localize(&SpringForward, at(2, 30)).unwrap();
        assert_eq!(shifted.to_rfc3339(), "2024-03-10T03:30:00-04:00");

        let before = localize(&SpringForward, at(1, 30)).unwrap();
        assert_eq!(before.to_rfc3339(), "2024-03-10T01:30:00-05:00");
        let after = localize(&SpringForward, at(3, 30)).unwrap();
        assert_eq!(after, shifted);
    }

    #[test]
    fn rejects_invalid_calendar_and_clock_values() {
        assert!(parse_date_at("2018-02-29", now()).is_err());
        assert!(parse_date_at("13/01/2020", now()).is_err());
        assert!(parse_time_at("today at 33:25", now()).is_err());
        assert!(parse_time_at("today at 10:61", now()).is_err());
        assert!(parse_time_at("13pm", now()).is_err());
        assert!(parse_date_at("not a date", now()).is_err());
        assert!(parse_date_at("25", now()).is_err());
    }

    #[test]
    fn durations_in_words() {
        let secs = |raw: &str| parse_duration(raw).unwrap().as_secs_f64();
        assert_eq!(secs("12 seconds"), 12.0);
        assert_eq!(secs("5 minutes"), 300.0);
        assert_eq!(secs("24 hours"), 86_400.0);
        assert_eq!(secs("1.5 days"), 129_600.0);
        assert_eq!(secs("2 weeks, 1 day"), 1_296_000.0);
        assert_eq!(secs("1h30m"), 5_400.0);
        assert_eq!(secs("1 hour and 10 mins"), 4_200.0);
        assert_eq!(secs("90"), 90.0);
        assert_eq!(secs("0 seconds"), 0.0);
        assert_eq!(secs("1:30"), 90.0);
        assert_eq!(secs("1:00:05"), 3_605.0);
    }

    #[test]
    fn duration_units_follow_humantime() {
        let secs = |raw: &str| parse_duration(raw).unwrap().as_secs_f64();
        assert_eq!(secs("250ms"), 0.25);
        assert_eq!(secs("2 wks 3 hrs"), 1_220_400.0);
        assert_eq!(secs("1 yr"), 31_557_600.0);
        assert_eq!(secs("3 months"), 7_776_000.0);
        assert_eq!(secs("1.5 mo"), 3_888_000.0);
        assert_eq!(secs("1h 30"), 3_630.0);
    }

    #[test]
    fn iso_periods_strip_designators() {
        let secs = |raw: &str| parse_duration(raw).unwrap().as_secs_f64();
        assert_eq!(secs("P2W1DT3H"), secs("2 weeks, 1 day, 3 hours"));
        assert_eq!(secs("PT5M"), 300.0);
        assert_eq!(secs("P1M"), 2_592_000.0);
        assert_eq!(secs("P12DT0.5S"), 1_036_800.5);
    }

    #[test]
    fn rejects_unknown_durations() {
        assert!(parse_duration("not a duration").is_err());
        assert!(parse_duration("37 dinglebops").is_err());
        assert!(parse_duration("P").is_err());
        assert!(parse_duration("5 days ago").is_err());
    }
}
