use std::io::Read;
use std::str;

use bigdecimal::BigDecimal;
use delegate::delegate;

use crate::binary::binary_buffer::BinaryBuffer;
use crate::binary::cursor::{AnnotationIds, BinaryCursor, Event, Marker};
use crate::binary::type_descriptor::TypeDescriptor;
use crate::binary::uint::DecodedUInt;
use crate::result::{decoding_error, decoding_error_raw, illegal_operation, IonError};
use crate::types::{
    Coefficient, Decimal, FractionalSecondSetter, Int, IntegerSize, IonType, SecondSetter,
    SymbolId, Timestamp, UInt,
};
use crate::IonResult;

/// Decodes the scalar values that a [BinaryCursor] is positioned on.
///
/// Every typed getter requires that the last event was [Event::StartScalar] (or
/// [Event::ValueReady]) and that the current value has the getter's type. Navigation is
/// forwarded to the wrapped cursor.
#[derive(Debug)]
pub struct ScalarReader {
    cursor: BinaryCursor,
}

impl ScalarReader {
    pub fn new(data: Vec<u8>) -> ScalarReader {
        ScalarReader {
            cursor: BinaryCursor::new(data),
        }
    }

    delegate! {
        to self.cursor {
            pub fn advance(&mut self) -> IonResult<Event>;
            pub fn step_into_container(&mut self) -> IonResult<Event>;
            pub fn step_out_of_container(&mut self) -> IonResult<Event>;
            pub fn fill_value(&mut self) -> IonResult<Event>;
            pub fn depth(&self) -> usize;
            pub fn current_type(&self) -> Option<IonType>;
            pub fn is_null(&self) -> bool;
            pub fn field_id(&self) -> Option<SymbolId>;
            pub fn annotation_ids(&self) -> AnnotationIds<'_>;
            pub fn has_annotations(&self) -> bool;
            pub fn value_marker(&self) -> Option<&Marker>;
            pub fn annotation_marker(&self) -> Option<&Marker>;
            pub fn container_marker(&self) -> Option<&Marker>;
            pub fn last_event(&self) -> Event;
            pub fn ion_version(&self) -> (u8, u8);
            pub fn append_bytes(&mut self, bytes: &[u8]);
            pub fn read_from<R: Read>(&mut self, source: R, length: usize) -> IonResult<usize>;
            pub fn bytes_consumed(&self) -> usize;
            pub fn bytes_available(&self) -> usize;
            pub fn raw_value_bytes(&self) -> Option<&[u8]>;
            pub fn raw_header_bytes(&self) -> Option<&[u8]>;
            pub fn raw_field_id_bytes(&self) -> Option<&[u8]>;
            pub fn raw_annotations_bytes(&self) -> Option<&[u8]>;
            pub(crate) fn take_ivms(&mut self) -> Vec<(u8, u8)>;
            pub(crate) fn has_unfinished_input(&self) -> bool;
        }
    }

    /// If the current value is a null, returns its type.
    pub fn read_null(&self) -> IonResult<IonType> {
        self.expect_scalar("a null")?;
        match self.current_type() {
            Some(ion_type) if self.is_null() => Ok(ion_type),
            _ => illegal_operation("cannot read a null; the current value is not null"),
        }
    }

    pub fn read_bool(&self) -> IonResult<bool> {
        let (type_descriptor, _) = self.value_and_bytes(IonType::Bool)?;
        Ok(type_descriptor.length_code == 1)
    }

    /// Reads the current integer, choosing the narrowest representation that holds it.
    pub fn read_int(&self) -> IonResult<Int> {
        let (type_descriptor, bytes) = self.value_and_bytes(IonType::Int)?;
        let magnitude: UInt = BinaryBuffer::new(bytes).read_uint(bytes.len())?.into();
        if !type_descriptor.is_negative_int() {
            return Ok(magnitude.into());
        }
        if magnitude.is_zero() {
            return decoding_error("found a negative integer with a magnitude of zero");
        }
        Ok(-Int::from(magnitude))
    }

    pub fn read_i64(&self) -> IonResult<i64> {
        if self.integer_size()? == IntegerSize::BigInt {
            return illegal_operation("integer is too large to be read as an i64");
        }
        match self.read_int()?.as_i64() {
            Some(value) => Ok(value),
            None => illegal_operation("integer is too large to be read as an i64"),
        }
    }

    /// Classifies the current integer by the smallest machine representation that can hold it,
    /// without constructing the value.
    pub fn integer_size(&self) -> IonResult<IntegerSize> {
        const FOUR_BYTES: usize = 4;
        const EIGHT_BYTES: usize = 8;
        let (type_descriptor, bytes) = self.value_and_bytes(IonType::Int)?;
        let is_negative = type_descriptor.is_negative_int();
        if is_negative && bytes.iter().all(|byte| *byte == 0) {
            return decoding_error("found a negative integer with a magnitude of zero");
        }
        let size = match bytes.len() {
            0..=3 => IntegerSize::I32,
            FOUR_BYTES => {
                let magnitude = DecodedUInt::small_uint_from_slice(bytes);
                let limit = if is_negative {
                    i32::MIN.unsigned_abs() as u64
                } else {
                    i32::MAX as u64
                };
                if magnitude <= limit {
                    IntegerSize::I32
                } else {
                    IntegerSize::I64
                }
            }
            5..=7 => IntegerSize::I64,
            EIGHT_BYTES => {
                // Magnitudes with the high bit set only fit when they are exactly |i64::MIN|.
                let magnitude = DecodedUInt::small_uint_from_slice(bytes);
                let limit = if is_negative {
                    i64::MIN.unsigned_abs()
                } else {
                    i64::MAX as u64
                };
                if magnitude <= limit {
                    IntegerSize::I64
                } else {
                    IntegerSize::BigInt
                }
            }
            _ => IntegerSize::BigInt,
        };
        Ok(size)
    }

    pub fn read_f64(&self) -> IonResult<f64> {
        let (_, bytes) = self.value_and_bytes(IonType::Float)?;
        match *bytes {
            [] => Ok(0f64),
            [a, b, c, d] => Ok(f32::from_be_bytes([a, b, c, d]) as f64),
            [a, b, c, d, e, f, g, h] => Ok(f64::from_be_bytes([a, b, c, d, e, f, g, h])),
            _ => decoding_error(format!("found a float with a length of {}", bytes.len())),
        }
    }

    /// Reads the current float as an `f32`. Eight-byte floats are narrowed.
    pub fn read_f32(&self) -> IonResult<f32> {
        let (_, bytes) = self.value_and_bytes(IonType::Float)?;
        match *bytes {
            [a, b, c, d] => Ok(f32::from_be_bytes([a, b, c, d])),
            _ => self.read_f64().map(|value| value as f32),
        }
    }

    pub fn read_decimal(&self) -> IonResult<Decimal> {
        let (_, bytes) = self.value_and_bytes(IonType::Decimal)?;
        if bytes.is_empty() {
            return Ok(Decimal::new(0, 0));
        }
        let mut buffer = BinaryBuffer::new(bytes);
        let exponent = within_value("decimal", buffer.read_var_int())?;
        let coefficient = buffer.read_int(buffer.remaining())?;
        Ok(Decimal::new(Coefficient::from(coefficient), exponent.value()))
    }

    /// Reads the current decimal as a [BigDecimal]. Fails for negative zero, which `BigDecimal`
    /// cannot represent.
    pub fn read_big_decimal(&self) -> IonResult<BigDecimal> {
        BigDecimal::try_from(self.read_decimal()?)
    }

    /// Reads the current timestamp. The binary fields are UTC; the returned timestamp holds them
    /// as local time at the encoded offset.
    pub fn read_timestamp(&self) -> IonResult<Timestamp> {
        let (_, bytes) = self.value_and_bytes(IonType::Timestamp)?;
        let mut buffer = BinaryBuffer::new(bytes);

        let offset = within_value("timestamp offset", buffer.read_var_int())?;
        let offset_minutes = if offset.is_negative_zero() {
            None
        } else {
            Some(i32::try_from(offset.value()).map_err(|_| {
                decoding_error_raw(format!("timestamp offset {} is out of range", offset.value()))
            })?)
        };

        let year = read_timestamp_field(&mut buffer, "year")?;
        let builder = Timestamp::with_year(year);
        if buffer.is_empty() {
            return invalid_timestamp(builder.build());
        }

        let month = read_timestamp_field(&mut buffer, "month")?;
        let builder = builder.with_month(month);
        if buffer.is_empty() {
            return invalid_timestamp(builder.build());
        }

        let day = read_timestamp_field(&mut buffer, "day")?;
        let builder = builder.with_day(day);
        if buffer.is_empty() {
            return invalid_timestamp(builder.build());
        }

        let hour = read_timestamp_field(&mut buffer, "hour")?;
        if buffer.is_empty() {
            return decoding_error("found a timestamp with an hour but no minute");
        }
        let minute = read_timestamp_field(&mut buffer, "minute")?;
        let builder = builder.with_hour_and_minute(hour, minute);
        if buffer.is_empty() {
            return invalid_timestamp(BuildAtOffset::build(builder, offset_minutes));
        }

        let second = read_timestamp_field(&mut buffer, "second")?;
        let builder = builder.with_second(second);
        if buffer.is_empty() {
            return invalid_timestamp(BuildAtOffset::build(builder, offset_minutes));
        }

        let exponent = within_value("fractional seconds", buffer.read_var_int())?;
        let coefficient = buffer.read_int(buffer.remaining())?;
        let fractional_seconds = Decimal::new(Coefficient::from(coefficient), exponent.value());
        let builder = builder.with_fractional_seconds(fractional_seconds);
        invalid_timestamp(BuildAtOffset::build(builder, offset_minutes))
    }

    pub fn read_str(&self) -> IonResult<&str> {
        let bytes = self.read_str_bytes()?;
        str::from_utf8(bytes)
            .map_err(|e| decoding_error_raw(format!("found a string with invalid UTF-8: {e}")))
    }

    /// Returns the current string's UTF-8 bytes without validating them.
    pub fn read_str_bytes(&self) -> IonResult<&[u8]> {
        self.value_and_bytes(IonType::String).map(|(_, bytes)| bytes)
    }

    pub fn read_symbol_id(&self) -> IonResult<SymbolId> {
        let (_, bytes) = self.value_and_bytes(IonType::Symbol)?;
        if bytes.len() > std::mem::size_of::<u64>() {
            return decoding_error(format!("found a {}-byte symbol ID", bytes.len()));
        }
        let sid = DecodedUInt::small_uint_from_slice(bytes);
        usize::try_from(sid)
            .map_err(|_| decoding_error_raw(format!("symbol ID {sid} is too large")))
    }

    pub fn read_blob_bytes(&self) -> IonResult<&[u8]> {
        self.value_and_bytes(IonType::Blob).map(|(_, bytes)| bytes)
    }

    pub fn read_clob_bytes(&self) -> IonResult<&[u8]> {
        self.value_and_bytes(IonType::Clob).map(|(_, bytes)| bytes)
    }

    /// The number of bytes in the current blob or clob.
    pub fn lob_size(&self) -> IonResult<usize> {
        self.lob_bytes().map(<[u8]>::len)
    }

    /// Copies the current blob or clob's bytes, starting at `offset`, into `destination`. Returns
    /// the number of bytes copied, which is `0` once `offset` reaches the end of the lob.
    pub fn read_lob_chunk(&self, offset: usize, destination: &mut [u8]) -> IonResult<usize> {
        let bytes = self.lob_bytes()?;
        let Some(remaining) = bytes.get(offset..) else {
            return Ok(0);
        };
        let length = remaining.len().min(destination.len());
        destination[..length].copy_from_slice(&remaining[..length]);
        Ok(length)
    }

    fn lob_bytes(&self) -> IonResult<&[u8]> {
        match self.current_type() {
            Some(IonType::Clob) => self.read_clob_bytes(),
            _ => self.read_blob_bytes(),
        }
    }

    fn expect_scalar(&self, label: &str) -> IonResult<()> {
        match self.last_event() {
            Event::StartScalar | Event::ValueReady => Ok(()),
            event => illegal_operation(format!(
                "cannot read {label}; the cursor is not on a scalar (last event: {event:?})"
            )),
        }
    }

    /// Confirms that the current value is a non-null scalar of the expected type and returns its
    /// type descriptor and body.
    fn value_and_bytes(&self, expected: IonType) -> IonResult<(&TypeDescriptor, &[u8])> {
        self.expect_scalar("a value")?;
        let marker = match self.value_marker() {
            Some(marker) => marker,
            None => return illegal_operation("the cursor is not positioned on a value"),
        };
        match marker.ion_type() {
            Some(ion_type) if ion_type == expected => {}
            Some(ion_type) => {
                return illegal_operation(format!(
                    "type mismatch: expected a(n) {expected} but positioned over a(n) {ion_type}"
                ))
            }
            None => return illegal_operation("the cursor is not positioned on a value"),
        }
        if marker.type_descriptor().is_null() {
            return illegal_operation(format!("cannot read a null.{expected} as a(n) {expected}"));
        }
        let bytes = self
            .raw_value_bytes()
            .ok_or_else(|| decoding_error_raw("the current value's bytes are not buffered"))?;
        Ok((marker.type_descriptor(), bytes))
    }
}

/// Reports a short read inside a value whose bytes are all buffered as a malformed value.
fn within_value<T>(label: &str, result: IonResult<T>) -> IonResult<T> {
    match result {
        Err(IonError::Incomplete(_)) => {
            decoding_error(format!("found a {label} that ends before its value does"))
        }
        other => other,
    }
}

fn read_timestamp_field(buffer: &mut BinaryBuffer<&[u8]>, label: &str) -> IonResult<u32> {
    let field = within_value(label, buffer.read_var_uint())?;
    u32::try_from(field.value())
        .map_err(|_| decoding_error_raw(format!("timestamp {label} {} is out of range", field.value())))
}

/// The builder rejects field combinations that are not a real date or time; in a stream those
/// are malformed values.
fn invalid_timestamp(result: IonResult<Timestamp>) -> IonResult<Timestamp> {
    result.map_err(|e| match e {
        IonError::IllegalOperation(e) => {
            decoding_error_raw(format!("found an invalid timestamp: {}", e.operation()))
        }
        other => other,
    })
}

/// The two timestamp setters that can be finished with an offset.
trait BuildAtOffset {
    fn build(self, offset_minutes: Option<i32>) -> IonResult<Timestamp>;
}

macro_rules! impl_build_at_offset {
    ($($setter:ty),*) => ($(
        impl BuildAtOffset for $setter {
            fn build(self, offset_minutes: Option<i32>) -> IonResult<Timestamp> {
                match offset_minutes {
                    Some(offset) => self.build_utc_fields_at_offset(offset),
                    None => self.build_at_unknown_offset(),
                }
            }
        }
    )*)
}
impl_build_at_offset!(SecondSetter, FractionalSecondSetter);
