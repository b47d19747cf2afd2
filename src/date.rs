use std::fmt;

use jiff::civil;
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use serde::{Deserialize, Serialize};

/// String form of a valid instant, matching the page clock's long format,
/// e.g. `Wed Sep 15 2021 12:34:56 GMT+0000`.
const LONG_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
const UTC_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

// Bounds on component arithmetic before it is handed to span math. Inputs
// beyond these produce the invalid instant.
const MAX_DAY_OFFSET: i64 = 3_000_000;
const MAX_CLOCK_MS: i64 = 300_000_000_000_000;

/// A date value with the page clock's semantics: epoch milliseconds inside,
/// zero-based months, Sunday-zero weekdays, and a distinguished invalid
/// instant instead of errors for unparsable input.
///
/// Everything here is pass-through behavior delegating to `jiff`; nothing in
/// this type consults the fake-clock state. The no-argument "now" entry points
/// live on [`crate::ClockOverride`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDate {
    timestamp: Option<Timestamp>,
}

impl PageDate {
    /// The real current instant, straight from the system clock.
    pub fn now_real() -> Self {
        Self {
            timestamp: Some(Timestamp::now()),
        }
    }

    /// The invalid instant: every getter returns `None` and the string form
    /// is `Invalid Date`.
    pub fn invalid() -> Self {
        Self { timestamp: None }
    }

    /// Constructs from milliseconds since the epoch, unaltered. Values
    /// outside the representable range yield the invalid instant.
    pub fn from_epoch_millis(millis: i64) -> Self {
        Self {
            timestamp: Timestamp::from_millisecond(millis).ok(),
        }
    }

    /// Parses a datetime string with the page clock's disambiguation rules:
    /// an explicit offset is honored, a date-time without offset is
    /// system-local, and a date-only string is UTC midnight. A single space
    /// may stand in for the `T` separator. Unparsable input yields the
    /// invalid instant, never an error.
    pub fn parse(input: &str) -> Self {
        Self {
            timestamp: Self::parse_timestamp(input),
        }
    }

    /// The parse-to-number static helper. `None` where the page clock would
    /// report an unparsable string.
    pub fn parse_epoch_millis(input: &str) -> Option<i64> {
        Self::parse(input).epoch_millis()
    }

    fn parse_timestamp(input: &str) -> Option<Timestamp> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let normalized = if !input.contains('T') && input.contains(' ') {
            input.replacen(' ', "T", 1)
        } else {
            input.to_string()
        };

        if let Ok(ts) = normalized.parse::<Timestamp>() {
            return Some(ts);
        }
        if let Ok(dt) = normalized.parse::<civil::DateTime>() {
            return dt.to_zoned(TimeZone::system()).ok().map(|z| z.timestamp());
        }
        if let Ok(date) = normalized.parse::<civil::Date>() {
            return date
                .at(0, 0, 0, 0)
                .to_zoned(TimeZone::UTC)
                .ok()
                .map(|z| z.timestamp());
        }
        // The long form this type itself prints.
        strtime::parse(LONG_FORMAT, input)
            .ok()
            .and_then(|broken| broken.to_timestamp().ok())
    }

    /// Component-based construction in local time: zero-based month, calendar
    /// rollover for out-of-range components, years 0–99 mapped to 1900–1999.
    /// Out-of-range results yield the invalid instant.
    pub fn from_components(
        year: i64,
        month0: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
    ) -> Self {
        Self {
            timestamp: Self::components_timestamp(
                year,
                month0,
                day,
                hour,
                minute,
                second,
                millisecond,
                TimeZone::system(),
            ),
        }
    }

    /// The UTC component-construction static helper.
    pub fn utc_epoch_millis(
        year: i64,
        month0: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
    ) -> Option<i64> {
        Self::components_timestamp(
            year,
            month0,
            day,
            hour,
            minute,
            second,
            millisecond,
            TimeZone::UTC,
        )
        .map(|ts| ts.as_millisecond())
    }

    fn components_timestamp(
        year: i64,
        month0: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
        tz: TimeZone,
    ) -> Option<Timestamp> {
        let year = if (0..=99).contains(&year) {
            year + 1900
        } else {
            year
        };
        // Months normalize into the year; days and clock fields roll over
        // via calendar arithmetic from the first of the month.
        let year = year.checked_add(month0.div_euclid(12))?;
        let month = (month0.rem_euclid(12) + 1) as i8;
        let date = civil::Date::new(i16::try_from(year).ok()?, month, 1).ok()?;

        let day_offset = day.checked_sub(1)?;
        if day_offset.abs() > MAX_DAY_OFFSET {
            return None;
        }
        let date = date.checked_add(Span::new().days(day_offset)).ok()?;

        let clock_ms = hour
            .checked_mul(3_600_000)?
            .checked_add(minute.checked_mul(60_000)?)?
            .checked_add(second.checked_mul(1_000)?)?
            .checked_add(millisecond)?;
        if clock_ms.abs() > MAX_CLOCK_MS {
            return None;
        }
        let dt = date
            .at(0, 0, 0, 0)
            .checked_add(Span::new().milliseconds(clock_ms))
            .ok()?;

        Some(dt.to_zoned(tz).ok()?.timestamp())
    }

    pub fn is_valid(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn is_invalid(&self) -> bool {
        self.timestamp.is_none()
    }

    /// Milliseconds since the epoch; `None` for the invalid instant. Also the
    /// numeric-conversion hook (`value_of`/`get_time` in page terms).
    pub fn epoch_millis(&self) -> Option<i64> {
        self.timestamp.map(|ts| ts.as_millisecond())
    }

    /// Rewrites the instant to the given epoch milliseconds.
    pub fn set_epoch_millis(&mut self, millis: i64) -> Option<i64> {
        self.timestamp = Timestamp::from_millisecond(millis).ok();
        self.epoch_millis()
    }

    fn with_zoned<T>(&self, tz: TimeZone, f: impl FnOnce(&jiff::Zoned) -> T) -> Option<T> {
        self.timestamp.map(|ts| f(&ts.to_zoned(tz)))
    }

    fn rewrite(
        &mut self,
        tz: TimeZone,
        f: impl FnOnce(jiff::ZonedWith) -> jiff::ZonedWith,
    ) -> Option<i64> {
        let Some(ts) = self.timestamp else {
            return None;
        };
        match f(ts.to_zoned(tz).with()).build() {
            Ok(zoned) => self.timestamp = Some(zoned.timestamp()),
            Err(_) => self.timestamp = None,
        }
        self.epoch_millis()
    }

    // ---- local-time component getters ----

    pub fn year(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.year()))
    }

    /// Zero-based month, per the page clock's convention.
    pub fn month0(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.month()) - 1)
    }

    pub fn day_of_month(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.day()))
    }

    /// Day of the week with Sunday as zero.
    pub fn weekday0(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| {
            i32::from(z.weekday().to_sunday_zero_offset())
        })
    }

    pub fn hour(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.hour()))
    }

    pub fn minute(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.minute()))
    }

    pub fn second(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.second()))
    }

    pub fn millisecond(&self) -> Option<i32> {
        self.with_zoned(TimeZone::system(), |z| i32::from(z.millisecond()))
    }

    // ---- UTC component getters ----

    pub fn utc_year(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.year()))
    }

    pub fn utc_month0(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.month()) - 1)
    }

    pub fn utc_day_of_month(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.day()))
    }

    pub fn utc_weekday0(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| {
            i32::from(z.weekday().to_sunday_zero_offset())
        })
    }

    pub fn utc_hour(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.hour()))
    }

    pub fn utc_minute(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.minute()))
    }

    pub fn utc_second(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.second()))
    }

    pub fn utc_millisecond(&self) -> Option<i32> {
        self.with_zoned(TimeZone::UTC, |z| i32::from(z.millisecond()))
    }

    // ---- local-time component setters ----
    // Setters return the new epoch milliseconds; on the invalid instant they
    // are no-ops returning None, and an out-of-range value invalidates.

    pub fn set_year(&mut self, year: i64) -> Option<i64> {
        match i16::try_from(year) {
            Ok(y) => self.rewrite(TimeZone::system(), |w| w.year(y)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_month0(&mut self, month0: i64) -> Option<i64> {
        match u8::try_from(month0).ok().filter(|m| *m <= 11) {
            Some(m) => self.rewrite(TimeZone::system(), |w| w.month(m as i8 + 1)),
            None => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_day_of_month(&mut self, day: i64) -> Option<i64> {
        match i8::try_from(day) {
            Ok(d) => self.rewrite(TimeZone::system(), |w| w.day(d)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_hour(&mut self, hour: i64) -> Option<i64> {
        match i8::try_from(hour) {
            Ok(h) => self.rewrite(TimeZone::system(), |w| w.hour(h)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_minute(&mut self, minute: i64) -> Option<i64> {
        match i8::try_from(minute) {
            Ok(m) => self.rewrite(TimeZone::system(), |w| w.minute(m)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_second(&mut self, second: i64) -> Option<i64> {
        match i8::try_from(second) {
            Ok(s) => self.rewrite(TimeZone::system(), |w| w.second(s)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_millisecond(&mut self, millisecond: i64) -> Option<i64> {
        match i16::try_from(millisecond) {
            Ok(ms) => self.rewrite(TimeZone::system(), |w| w.millisecond(ms)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    // ---- UTC component setters ----

    pub fn set_utc_year(&mut self, year: i64) -> Option<i64> {
        match i16::try_from(year) {
            Ok(y) => self.rewrite(TimeZone::UTC, |w| w.year(y)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_month0(&mut self, month0: i64) -> Option<i64> {
        match u8::try_from(month0).ok().filter(|m| *m <= 11) {
            Some(m) => self.rewrite(TimeZone::UTC, |w| w.month(m as i8 + 1)),
            None => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_day_of_month(&mut self, day: i64) -> Option<i64> {
        match i8::try_from(day) {
            Ok(d) => self.rewrite(TimeZone::UTC, |w| w.day(d)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_hour(&mut self, hour: i64) -> Option<i64> {
        match i8::try_from(hour) {
            Ok(h) => self.rewrite(TimeZone::UTC, |w| w.hour(h)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_minute(&mut self, minute: i64) -> Option<i64> {
        match i8::try_from(minute) {
            Ok(m) => self.rewrite(TimeZone::UTC, |w| w.minute(m)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_second(&mut self, second: i64) -> Option<i64> {
        match i8::try_from(second) {
            Ok(s) => self.rewrite(TimeZone::UTC, |w| w.second(s)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    pub fn set_utc_millisecond(&mut self, millisecond: i64) -> Option<i64> {
        match i16::try_from(millisecond) {
            Ok(ms) => self.rewrite(TimeZone::UTC, |w| w.millisecond(ms)),
            Err(_) => {
                self.timestamp = None;
                None
            }
        }
    }

    // ---- string conversions ----

    /// Strict `YYYY-MM-DDTHH:MM:SS.mmmZ`; `None` for the invalid instant.
    pub fn to_iso_string(&self) -> Option<String> {
        self.with_zoned(TimeZone::UTC, |z| {
            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
                z.year(),
                z.month(),
                z.day(),
                z.hour(),
                z.minute(),
                z.second(),
                z.millisecond()
            )
        })
    }

    pub fn to_json(&self) -> Option<String> {
        self.to_iso_string()
    }

    /// E.g. `Wed, 15 Sep 2021 12:34:56 GMT`.
    pub fn to_utc_string(&self) -> Option<String> {
        self.with_zoned(TimeZone::UTC, |z| strtime::format(UTC_FORMAT, z).ok())
            .flatten()
    }
}

impl fmt::Display for PageDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .with_zoned(TimeZone::system(), |z| strtime::format(LONG_FORMAT, z).ok())
            .flatten();
        match rendered {
            Some(s) => f.write_str(&s),
            None => f.write_str("Invalid Date"),
        }
    }
}
