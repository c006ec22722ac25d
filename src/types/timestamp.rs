use crate::result::{illegal_operation, illegal_operation_raw, IonError, IonResult};
use crate::types::Decimal;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::fmt::{Display, Formatter, Write};

/// Indicates the most precise time unit that has been specified in the accompanying [Timestamp].
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Default)]
pub enum Precision {
    /// Year-level precision (e.g. `2020T`)
    #[default]
    Year,
    /// Month-level precision (e.g. `2020-08T`)
    Month,
    /// Day-level precision (e.g. `2020-08-01T`)
    Day,
    /// Minute-level precision (e.g. `2020-08-01T12:34Z`)
    HourAndMinute,
    /// Second-level precision or greater. (e.g. `2020-08-01T12:34:56Z` or `2020-08-01T12:34:56.123456789Z`)
    Second,
}

const NANOSECONDS_SCALE: i64 = 9;
const ZEROS: &str = "0000000000000000";

/// Represents a point in time to a specified degree of precision. Unlike `chrono`'s
/// [NaiveDateTime] and [DateTime], a `Timestamp` has variable precision ranging from a year to
/// fractional seconds of an arbitrary unit.
///
/// The date and time fields are stored as local time. An offset of `None` means the local offset
/// is unknown (`-00:00`), which is distinct from UTC (`Some(0)`).
#[derive(Debug, Clone)]
pub struct Timestamp {
    pub(crate) date_time: NaiveDateTime,
    pub(crate) offset: Option<i32>,
    pub(crate) precision: Precision,
    pub(crate) fractional_seconds: Option<Decimal>,
}

impl Timestamp {
    /// Begins building a Timestamp with the specified year. Further precision can be added
    /// through the returned setter chain.
    pub fn with_year(year: u32) -> MonthSetter {
        MonthSetter {
            builder: TimestampBuilder {
                year,
                ..Default::default()
            },
        }
    }

    /// Shorthand for `Timestamp::with_year(year).with_month(month).with_day(day)`.
    pub fn with_ymd(year: u32, month: u32, day: u32) -> HourAndMinuteSetter {
        Timestamp::with_year(year).with_month(month).with_day(day)
    }

    /// Returns the offset in minutes east of UTC, or `None` if the local offset is unknown.
    /// Timestamps with less than [`Precision::HourAndMinute`] never carry an offset.
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn year(&self) -> i32 {
        self.date_time.year()
    }

    /// Returns the month (1-12); `1` if the precision is [`Precision::Year`].
    pub fn month(&self) -> u32 {
        self.date_time.month()
    }

    /// Returns the day of the month (1-31); `1` if the precision is less than [`Precision::Day`].
    pub fn day(&self) -> u32 {
        self.date_time.day()
    }

    pub fn hour(&self) -> u32 {
        self.date_time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.date_time.minute()
    }

    pub fn second(&self) -> u32 {
        self.date_time.second()
    }

    /// Returns the fractional seconds exactly as they were specified, if present.
    pub fn fractional_seconds(&self) -> Option<&Decimal> {
        self.fractional_seconds.as_ref()
    }

    /// Returns the fractional seconds truncated to nanosecond precision.
    pub fn nanoseconds(&self) -> u32 {
        self.date_time.nanosecond()
    }

    /// Returns a copy of this Timestamp whose fields are expressed in UTC. Timestamps with an
    /// unknown offset or less than minute precision are returned unchanged.
    pub fn to_utc(&self) -> Timestamp {
        let mut utc = self.clone();
        if let Some(offset_minutes) = self.offset {
            utc.date_time = self.date_time - chrono::Duration::minutes(offset_minutes as i64);
            utc.offset = Some(0);
        }
        utc
    }

    fn fractional_seconds_eq(&self, other: &Timestamp) -> bool {
        match (&self.fractional_seconds, &other.fractional_seconds) {
            (None, None) => true,
            // The sign of a zero coefficient does not matter for fractional seconds.
            (Some(d1), Some(d2)) if d1.is_zero() && d2.is_zero() => d1.exponent == d2.exponent,
            (Some(d1), Some(d2)) => d1.ion_eq(d2),
            _ => false,
        }
    }

    fn format_fractional_seconds(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(fractional) = &self.fractional_seconds else {
            return Ok(());
        };
        let scale = fractional.scale();
        if scale <= 0 {
            return Ok(());
        }
        let digits = fractional.coefficient().magnitude().to_string();
        let mut leading_zeros = scale.unsigned_abs().saturating_sub(digits.len() as u64);
        f.write_char('.')?;
        while leading_zeros > 0 {
            let count = leading_zeros.min(ZEROS.len() as u64);
            f.write_str(&ZEROS[..count as usize])?;
            leading_zeros -= count;
        }
        f.write_str(&digits)
    }

    fn format_offset(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.offset {
            None => write!(f, "-00:00"),
            Some(0) => write!(f, "Z"),
            Some(minutes) => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let minutes = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
            }
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.precision == other.precision
            && self.offset == other.offset
            && self.date_time == other.date_time
            && self.fractional_seconds_eq(other)
    }
}

impl Eq for Timestamp {}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let dt = &self.date_time;
        match self.precision {
            Precision::Year => write!(f, "{:04}T", dt.year()),
            Precision::Month => write!(f, "{:04}-{:02}T", dt.year(), dt.month()),
            Precision::Day => write!(f, "{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day()),
            Precision::HourAndMinute => {
                write!(
                    f,
                    "{:04}-{:02}-{:02}T{:02}:{:02}",
                    dt.year(),
                    dt.month(),
                    dt.day(),
                    dt.hour(),
                    dt.minute()
                )?;
                self.format_offset(f)
            }
            Precision::Second => {
                write!(
                    f,
                    "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                    dt.year(),
                    dt.month(),
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second()
                )?;
                self.format_fractional_seconds(f)?;
                self.format_offset(f)
            }
        }
    }
}

/// Converts the local fields of the Timestamp to a [`NaiveDateTime`].
impl From<&Timestamp> for NaiveDateTime {
    fn from(value: &Timestamp) -> Self {
        value.date_time
    }
}

impl TryFrom<&Timestamp> for DateTime<FixedOffset> {
    type Error = IonError;

    /// Fails if the Timestamp's offset is unknown.
    fn try_from(value: &Timestamp) -> Result<Self, Self::Error> {
        let offset_minutes = value.offset.ok_or_else(|| {
            illegal_operation_raw("cannot convert a timestamp with an unknown offset to a DateTime")
        })?;
        let offset = fixed_offset(offset_minutes)?;
        offset
            .from_local_datetime(&value.date_time)
            .single()
            .ok_or_else(|| illegal_operation_raw("timestamp does not map to a single instant"))
    }
}

fn fixed_offset(offset_minutes: i32) -> IonResult<FixedOffset> {
    // chrono expresses offsets in seconds; Ion uses minutes.
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            illegal_operation_raw(format!(
                "specified offset ({offset_minutes} minutes) is invalid"
            ))
        })
}

/// Truncates fractional seconds in the range `[0, 1)` to whole nanoseconds.
fn nanoseconds_from(fractional_seconds: &Decimal) -> u32 {
    if fractional_seconds.is_zero() {
        return 0;
    }
    let scale = fractional_seconds.scale();
    let magnitude: BigUint = fractional_seconds.coefficient().magnitude().clone().into();
    let nanoseconds = if scale <= NANOSECONDS_SCALE {
        // A nonzero value below one has a scale of at least 1.
        let shift = (NANOSECONDS_SCALE - scale).clamp(0, NANOSECONDS_SCALE) as u32;
        magnitude * BigUint::from(10u32).pow(shift)
    } else {
        // Dividing by a power of ten with more digits than the coefficient leaves nothing.
        match u32::try_from(scale - NANOSECONDS_SCALE) {
            Ok(shift) if u64::from(shift) <= fractional_seconds.precision() => {
                magnitude / BigUint::from(10u32).pow(shift)
            }
            _ => return 0,
        }
    };
    // The value is below one second, so it always fits.
    nanoseconds.to_u32().unwrap_or(0)
}

/// Accumulates the fields of a [Timestamp] as the typed setters are called.
#[derive(Debug, Clone, Default)]
struct TimestampBuilder {
    precision: Precision,
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    fractional_seconds: Option<Decimal>,
    offset: Option<i32>,
    fields_are_utc: bool,
}

impl TimestampBuilder {
    fn naive_datetime(&self) -> IonResult<NaiveDateTime> {
        if self.year == 0 || self.year > 9999 {
            return illegal_operation(format!(
                "Timestamp year '{}' out of range (1-9999)",
                self.year
            ));
        }
        let (month, day) = match self.precision {
            Precision::Year => (1, 1),
            Precision::Month => (self.month, 1),
            _ => (self.month, self.day),
        };
        let date = NaiveDate::from_ymd_opt(self.year as i32, month, day).ok_or_else(|| {
            illegal_operation_raw(format!(
                "specified date ('{}-{month}-{day}') is invalid",
                self.year
            ))
        })?;
        let date_time = match self.precision {
            Precision::Year | Precision::Month | Precision::Day => date.and_hms_opt(0, 0, 0),
            Precision::HourAndMinute | Precision::Second => {
                let nanoseconds = self
                    .fractional_seconds
                    .as_ref()
                    .map(nanoseconds_from)
                    .unwrap_or(0);
                date.and_hms_nano_opt(self.hour, self.minute, self.second, nanoseconds)
            }
        };
        date_time.ok_or_else(|| {
            illegal_operation_raw(format!(
                "specified time ('{}:{}:{}') is invalid",
                self.hour, self.minute, self.second
            ))
        })
    }

    fn validate_fractional_seconds(&mut self) -> IonResult<()> {
        let Some(fractional) = &self.fractional_seconds else {
            return Ok(());
        };
        if fractional.is_less_than_zero() {
            return illegal_operation("cannot create a timestamp with negative fractional seconds");
        }
        if fractional.is_greater_than_or_equal_to_one() {
            return illegal_operation("cannot create a timestamp with a fractional seconds >= 1.0");
        }
        let exponent = fractional.exponent();
        if fractional.is_zero() {
            // The sign of a zero coefficient is not meaningful here.
            self.fractional_seconds = if exponent >= 0 {
                None
            } else {
                Some(Decimal::new(0u64, exponent))
            };
        }
        Ok(())
    }

    fn build(mut self) -> IonResult<Timestamp> {
        if self.precision < Precision::Second {
            self.fractional_seconds = None;
        }
        self.validate_fractional_seconds()?;
        let fields = self.naive_datetime()?;
        // Offsets are only meaningful when the timestamp includes a time of day.
        let offset = if self.precision >= Precision::HourAndMinute {
            self.offset
        } else {
            None
        };
        let date_time = match offset {
            Some(offset_minutes) => {
                let fixed = fixed_offset(offset_minutes)?;
                if self.fields_are_utc {
                    fixed.from_utc_datetime(&fields).naive_local()
                } else {
                    fields
                }
            }
            None => fields,
        };
        Ok(Timestamp {
            date_time,
            offset,
            precision: self.precision,
            fractional_seconds: self.fractional_seconds,
        })
    }
}

/// Allows the user to set the `month` field on a builder that has already had its `year`
/// field set. Or, if `Year` is the desired precision, they may build the [Timestamp] instead.
#[derive(Debug, Clone)]
pub struct MonthSetter {
    builder: TimestampBuilder,
}

impl MonthSetter {
    /// Sets the month (1-12).
    pub fn with_month(mut self, month: u32) -> DaySetter {
        self.builder.month = month;
        self.builder.precision = Precision::Month;
        DaySetter {
            builder: self.builder,
        }
    }

    /// Builds a Timestamp with [`Precision::Year`].
    pub fn build(mut self) -> IonResult<Timestamp> {
        self.builder.precision = Precision::Year;
        self.builder.build()
    }
}

/// Allows the user to set the `day` field on a builder that has already had its `month`
/// field set.
#[derive(Debug, Clone)]
pub struct DaySetter {
    builder: TimestampBuilder,
}

impl DaySetter {
    pub fn with_day(mut self, day: u32) -> HourAndMinuteSetter {
        self.builder.day = day;
        self.builder.precision = Precision::Day;
        HourAndMinuteSetter {
            builder: self.builder,
        }
    }

    /// Builds a Timestamp with [`Precision::Month`].
    pub fn build(self) -> IonResult<Timestamp> {
        self.builder.build()
    }
}

/// Allows the user to set the hour and minute on a builder that has already had its `day`
/// field set.
#[derive(Debug, Clone)]
pub struct HourAndMinuteSetter {
    builder: TimestampBuilder,
}

impl HourAndMinuteSetter {
    pub fn with_hour_and_minute(mut self, hour: u32, minute: u32) -> SecondSetter {
        self.builder.hour = hour;
        self.builder.minute = minute;
        self.builder.precision = Precision::HourAndMinute;
        SecondSetter {
            builder: self.builder,
        }
    }

    pub fn with_hms(self, hour: u32, minute: u32, second: u32) -> FractionalSecondSetter {
        self.with_hour_and_minute(hour, minute).with_second(second)
    }

    /// Builds a Timestamp with [`Precision::Day`].
    pub fn build(self) -> IonResult<Timestamp> {
        self.builder.build()
    }
}

/// Allows the user to set the `second` field on a builder that has already had its hour and
/// minute set, or to build a Timestamp with [`Precision::HourAndMinute`].
#[derive(Debug, Clone)]
pub struct SecondSetter {
    builder: TimestampBuilder,
}

impl SecondSetter {
    pub fn with_second(mut self, second: u32) -> FractionalSecondSetter {
        self.builder.second = second;
        self.builder.precision = Precision::Second;
        FractionalSecondSetter {
            builder: self.builder,
        }
    }

    /// Builds a Timestamp whose fields are local time at the given offset.
    pub fn build_at_offset(mut self, offset_minutes: i32) -> IonResult<Timestamp> {
        self.builder.offset = Some(offset_minutes);
        self.builder.build()
    }

    /// Builds a Timestamp whose fields are UTC; they are shifted to local time by the offset.
    pub fn build_utc_fields_at_offset(mut self, offset_minutes: i32) -> IonResult<Timestamp> {
        self.builder.offset = Some(offset_minutes);
        self.builder.fields_are_utc = true;
        self.builder.build()
    }

    pub fn build_at_unknown_offset(mut self) -> IonResult<Timestamp> {
        self.builder.offset = None;
        self.builder.build()
    }
}

/// Allows the user to set fractional seconds on a builder that already has its `second` field
/// set, or to build the Timestamp with [`Precision::Second`].
#[derive(Debug, Clone)]
pub struct FractionalSecondSetter {
    builder: TimestampBuilder,
}

impl FractionalSecondSetter {
    pub fn with_milliseconds(self, milliseconds: u32) -> FractionalSecondSetter {
        self.with_fractional_seconds(Decimal::new(milliseconds, -3))
    }

    pub fn with_nanoseconds(self, nanoseconds: u32) -> FractionalSecondSetter {
        self.with_fractional_seconds(Decimal::new(nanoseconds, -(NANOSECONDS_SCALE)))
    }

    /// Sets the fractional seconds exactly; the value must be in the range `[0, 1)`.
    pub fn with_fractional_seconds(mut self, fractional_seconds: Decimal) -> FractionalSecondSetter {
        self.builder.fractional_seconds = Some(fractional_seconds);
        self
    }

    pub fn build_at_offset(mut self, offset_minutes: i32) -> IonResult<Timestamp> {
        self.builder.offset = Some(offset_minutes);
        self.builder.build()
    }

    pub fn build_utc_fields_at_offset(mut self, offset_minutes: i32) -> IonResult<Timestamp> {
        self.builder.offset = Some(offset_minutes);
        self.builder.fields_are_utc = true;
        self.builder.build()
    }

    pub fn build_at_unknown_offset(mut self) -> IonResult<Timestamp> {
        self.builder.offset = None;
        self.builder.build()
    }
}
