//! Display formatting for templates: timestamps, relative times and sizes.

use chrono::{DateTime, Utc};
use std::fmt;

/// `strftime` pattern of the canonical UTC timestamp.
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const BINARY_THOUSAND: u64 = 1024;

/// Size unit labels, indexed by power of 1024.
pub const SIZE_UNITS: [&str; 9] = ["байт", "Кб", "Мб", "Гб", "Тб", "Пб", "Эб", "Зб", "Йб"];

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_datetime_utc(dt: &DateTime<Utc>) -> String {
    dt.format(UTC_FORMAT).to_string()
}

/// Pick the word form agreeing with `number`.
///
/// `one` is used for 1, 21, 31… (but not 11), `few` for 2–4, 22–24…
/// (but not 12–14), `many` for everything else.
pub fn declension<'a>(number: u64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let last_digit = number % 10;
    let last_two_digits = number % 100;
    if last_digit == 1 && last_two_digits != 11 {
        return one;
    }
    if (2..=4).contains(&last_digit) && !(12..=14).contains(&last_two_digits) {
        return few;
    }
    many
}

/// Elapsed time bucketed into the unit shown to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeTime {
    /// The timestamp lies in the future.
    JustNow,
    Seconds(u64),
    Minute,
    Minutes(u64),
    Hour,
    Hours(u64),
    Yesterday,
    Days(u64),
    Months(u64),
    Years(u64),
}

impl RelativeTime {
    /// Bucket the time elapsed from `then` to `now`.
    pub fn between(then: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = (now - then).num_seconds();
        if seconds < 0 {
            return RelativeTime::JustNow;
        }
        let whole = |unit: i64| (seconds / unit) as u64;
        match seconds {
            s if s < MINUTE => RelativeTime::Seconds(s as u64),
            s if s < 2 * MINUTE => RelativeTime::Minute,
            s if s < 45 * MINUTE => RelativeTime::Minutes(whole(MINUTE)),
            s if s < 90 * MINUTE => RelativeTime::Hour,
            s if s < DAY => RelativeTime::Hours(whole(HOUR)),
            s if s < 2 * DAY => RelativeTime::Yesterday,
            s if s < 30 * DAY => RelativeTime::Days(whole(DAY)),
            s if s < YEAR => RelativeTime::Months(whole(MONTH)),
            _ => RelativeTime::Years(whole(YEAR)),
        }
    }
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, word) = match *self {
            RelativeTime::JustNow => return f.write_str("только что"),
            RelativeTime::Minute => return f.write_str("минуту назад"),
            RelativeTime::Hour => return f.write_str("час назад"),
            RelativeTime::Yesterday => return f.write_str("вчера"),
            RelativeTime::Seconds(n) => (n, declension(n, "секунду", "секунды", "секунд")),
            RelativeTime::Minutes(n) => (n, declension(n, "минуту", "минуты", "минут")),
            RelativeTime::Hours(n) => (n, declension(n, "час", "часа", "часов")),
            RelativeTime::Days(n) => (n, declension(n, "день", "дня", "дней")),
            RelativeTime::Months(n) => (n, declension(n, "месяц", "месяца", "месяцев")),
            RelativeTime::Years(n) => (n, declension(n, "год", "года", "лет")),
        };
        write!(f, "{} {} назад", n, word)
    }
}

/// Describe how long ago `then` was, as seen at `now`.
pub fn format_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    RelativeTime::between(then, now).to_string()
}

/// A byte count scaled to its largest whole power of 1024.
///
/// Only built by [`HumanSize::from_bytes`], so the unit always indexes
/// [`SIZE_UNITS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanSize {
    unit: usize,
    value: f64,
}

impl HumanSize {
    /// Scale `bytes`. The unit is `floor(log2(bytes) / log2(1024))`, taken
    /// from the bit length so powers of 1024 never round down a unit.
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes == 0 {
            return Self {
                unit: 0,
                value: 0.0,
            };
        }
        let unit = (bytes.ilog2() / BINARY_THOUSAND.ilog2()) as usize;
        let value = if unit == 0 {
            bytes as f64
        } else {
            bytes as f64 / (BINARY_THOUSAND as f64).powi(unit as i32)
        };
        Self { unit, value }
    }

    /// Index into [`SIZE_UNITS`].
    pub fn unit(&self) -> usize {
        self.unit
    }

    /// The byte count in units of [`HumanSize::unit_name`].
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit_name(&self) -> &'static str {
        SIZE_UNITS.get(self.unit).copied().unwrap_or(SIZE_UNITS[0])
    }

    /// Render with `precision` decimals; plain bytes render as an integer.
    pub fn format(&self, precision: usize) -> String {
        if self.unit == 0 {
            format!("{} {}", self.value as u64, self.unit_name())
        } else {
            format!("{:.*} {}", precision, self.value, self.unit_name())
        }
    }
}

/// Human-readable size of `bytes`.
pub fn format_size(bytes: u64, precision: usize) -> String {
    HumanSize::from_bytes(bytes).format(precision)
}
