//! A continuable navigator over binary Ion 1.0 data.
//!
//! [BinaryCursor] never blocks and never re-parses bytes it has already accepted. When the
//! buffered input ends in the middle of a token, [BinaryCursor::advance] reports
//! [Event::NeedsData] and leaves every piece of visible state untouched; the same call can be
//! repeated after more bytes have been appended.

use std::io::Read;

use tracing::{debug, trace};

use crate::binary::binary_buffer::BinaryBuffer;
use crate::binary::type_descriptor::{EncodingVersion, TypeDescriptor};
use crate::result::{decoding_error, illegal_operation, incomplete_error_raw, IonError};
use crate::types::{IonType, SymbolId};
use crate::IonResult;

/// The outcome of a navigation request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// The buffered input ends before the next token is complete. Supply more bytes and repeat
    /// the call that produced this event.
    NeedsData,
    /// The cursor is positioned just inside or just outside a container and has no current value.
    NeedsInstruction,
    /// The cursor is positioned on a container header. The container's body may not be buffered
    /// yet.
    StartContainer,
    /// The cursor is positioned on a scalar (or a typed null) whose bytes are all buffered.
    StartScalar,
    /// There are no more values in the current container.
    EndContainer,
    /// The current scalar is ready to be read. Produced by [BinaryCursor::fill_value].
    ValueReady,
}

/// A view of a byte range within the stream. Offsets are absolute: they count bytes from the
/// beginning of the stream, so they stay valid when the input buffer is compacted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Marker {
    start: usize,
    end: usize,
    type_descriptor: TypeDescriptor,
}

impl Marker {
    const EMPTY: Marker = Marker::new(0, 0, TypeDescriptor::from_byte(0));

    const fn new(start: usize, end: usize, type_descriptor: TypeDescriptor) -> Marker {
        Marker {
            start,
            end,
            type_descriptor,
        }
    }

    /// The offset of the first byte in the range. For values, this is the first byte after the
    /// header.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The offset one past the last byte in the range, or `None` if the range ends at a
    /// terminator that has not been found yet.
    pub fn end(&self) -> Option<usize> {
        if self.is_delimited() {
            None
        } else {
            Some(self.end)
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }

    pub fn ion_type(&self) -> Option<IonType> {
        self.type_descriptor.ion_type
    }

    pub fn is_delimited(&self) -> bool {
        self.type_descriptor.is_delimited()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CursorState {
    /// Positioned at the beginning of the next token (or the end of the container).
    Ready,
    /// Positioned on the value described by the value marker. Nothing belonging to it has been
    /// consumed yet.
    OnValue,
    /// This many bytes must be discarded before the next token begins.
    Skipping(usize),
}

/// Whether the header parser is looking at a top-level token or at the value inside an
/// annotation wrapper.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum HeaderPhase {
    Unwrapped,
    Wrapped { wrapper_end: usize },
}

/// Everything learned about the next value while parsing its header.
#[derive(Debug, Copy, Clone)]
struct ValueHeader {
    field_id: Option<SymbolId>,
    field_id_offset: usize,
    wrapper_offset: usize,
    annotations: Marker,
    header_offset: usize,
    value: Marker,
}

#[derive(Debug, Copy, Clone)]
enum Token {
    VersionMarker { major: u8, minor: u8 },
    Nop { end: usize },
    Value(ValueHeader),
}

/// A pull-based navigator over a growable buffer of binary Ion.
///
/// The cursor exposes byte ranges rather than values; [ScalarReader](crate::ScalarReader)
/// decodes the ranges it reports.
#[derive(Debug)]
pub struct BinaryCursor {
    buffer: BinaryBuffer<Vec<u8>>,
    encoding: EncodingVersion,
    seen_ivm: bool,
    state: CursorState,
    last_event: Event,
    // The current value's item, from its field ID (if any) to the end of its body.
    field_id: Option<SymbolId>,
    field_id_offset: usize,
    wrapper_offset: usize,
    annotations: Marker,
    header_offset: usize,
    value: Marker,
    // Markers for the open containers. Slots beyond `depth` are stale and get overwritten.
    containers: Vec<Marker>,
    depth: usize,
    pending_ivms: Vec<(u8, u8)>,
}

impl BinaryCursor {
    /// Constructs a cursor whose buffer initially holds `data`.
    pub fn new(data: Vec<u8>) -> BinaryCursor {
        BinaryCursor {
            buffer: BinaryBuffer::new(data),
            encoding: EncodingVersion::Ion_1_0,
            seen_ivm: false,
            state: CursorState::Ready,
            last_event: Event::NeedsInstruction,
            field_id: None,
            field_id_offset: 0,
            wrapper_offset: 0,
            annotations: Marker::EMPTY,
            header_offset: 0,
            value: Marker::EMPTY,
            containers: Vec::new(),
            depth: 0,
            pending_ivms: Vec::new(),
        }
    }

    /// Moves to the next token at the current depth, skipping whatever remains of the current
    /// value.
    pub fn advance(&mut self) -> IonResult<Event> {
        if self.state == CursorState::OnValue {
            let remaining = self.value.end - self.buffer.total_consumed();
            self.clear_value();
            self.state = CursorState::Skipping(remaining);
        }
        loop {
            if let CursorState::Skipping(remaining) = self.state {
                if !self.skip_buffered(remaining) {
                    return Ok(self.needs_data());
                }
            }

            if let Some(parent) = self.container_marker() {
                if self.buffer.total_consumed() == parent.end {
                    return Ok(self.emit(Event::EndContainer));
                }
            }

            if self.buffer.is_empty() {
                return Ok(self.needs_data());
            }

            let mut input = self.buffer.slice();
            let token = match read_token(&mut input, self.encoding, self.container_marker()) {
                Ok(token) => token,
                Err(IonError::Incomplete(_)) => return Ok(self.needs_data()),
                Err(e) => return Err(e),
            };
            let token_offset = self.buffer.total_consumed();
            let header_length = input.total_consumed() - token_offset;

            if !self.seen_ivm && !matches!(token, Token::VersionMarker { .. }) {
                return decoding_error(format!(
                    "binary Ion stream does not begin with an IVM (offset {token_offset})"
                ));
            }

            match token {
                Token::VersionMarker { major, minor } => {
                    self.encoding = EncodingVersion::from_ivm(major, minor)?;
                    debug!(major, minor, offset = token_offset, "found Ion version marker");
                    self.seen_ivm = true;
                    self.pending_ivms.push((major, minor));
                    self.buffer.consume(header_length);
                }
                Token::Nop { end } => {
                    self.check_within_container("NOP pad", end)?;
                    self.buffer.consume(header_length);
                    self.state = CursorState::Skipping(end - self.buffer.total_consumed());
                }
                Token::Value(header) => {
                    self.check_within_container("value", header.value.end)?;
                    let type_descriptor = header.value.type_descriptor;
                    let is_container = type_descriptor.is_container() && !type_descriptor.is_null();
                    // Scalars are only surfaced once every byte of their body is available.
                    if !is_container && header.value.end > self.buffer.available_end() {
                        return Ok(self.needs_data());
                    }
                    self.set_value(header);
                    self.state = CursorState::OnValue;
                    let event = if is_container {
                        Event::StartContainer
                    } else {
                        Event::StartScalar
                    };
                    return Ok(self.emit(event));
                }
            }
        }
    }

    /// Positions the cursor just inside the container it is currently on.
    pub fn step_into_container(&mut self) -> IonResult<Event> {
        if self.state != CursorState::OnValue || self.last_event != Event::StartContainer {
            return illegal_operation("step_into_container requires the cursor to be on a container");
        }
        let container = self.value;
        if self.depth == self.containers.len() {
            self.containers.push(container);
        } else {
            self.containers[self.depth] = container;
        }
        self.depth += 1;
        // The container's header was buffered when it was parsed.
        self.buffer
            .consume(container.start - self.buffer.total_consumed());
        self.clear_value();
        self.state = CursorState::Ready;
        Ok(self.emit(Event::NeedsInstruction))
    }

    /// Skips the rest of the current container and positions the cursor just after it. If the
    /// rest of the container has not been buffered yet, consumes what is available and returns
    /// [Event::NeedsData]; the next call to [advance](Self::advance) finishes the skip.
    pub fn step_out_of_container(&mut self) -> IonResult<Event> {
        if self.depth == 0 {
            return illegal_operation("cannot step out of the top level");
        }
        self.depth -= 1;
        let container_end = self.containers[self.depth].end;
        let remaining = container_end.saturating_sub(self.buffer.total_consumed());
        self.clear_value();
        if self.skip_buffered(remaining) {
            Ok(self.emit(Event::NeedsInstruction))
        } else {
            Ok(self.needs_data())
        }
    }

    /// Declares that the current scalar is about to be read. Every scalar is fully buffered
    /// before [Event::StartScalar] is reported, so this only validates the cursor's position.
    /// Calling it more than once has no further effect.
    pub fn fill_value(&mut self) -> IonResult<Event> {
        match self.last_event {
            Event::StartScalar | Event::ValueReady => Ok(self.emit(Event::ValueReady)),
            _ => illegal_operation("fill_value requires the cursor to be on a scalar"),
        }
    }

    /// The number of containers the cursor has stepped into.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn current_type(&self) -> Option<IonType> {
        self.value_marker().and_then(Marker::ion_type)
    }

    pub fn is_null(&self) -> bool {
        self.value_marker()
            .map(|marker| marker.type_descriptor.is_null())
            .unwrap_or(false)
    }

    /// The symbol ID of the current value's field name, if it is in a struct.
    pub fn field_id(&self) -> Option<SymbolId> {
        if self.state == CursorState::OnValue {
            self.field_id
        } else {
            None
        }
    }

    /// Iterates over the symbol IDs of the current value's annotations.
    pub fn annotation_ids(&self) -> AnnotationIds<'_> {
        let bytes = self
            .annotation_marker()
            .and_then(|marker| self.buffer.bytes_at(marker.start, marker.end))
            .unwrap_or(&[]);
        AnnotationIds {
            buffer: BinaryBuffer::new(bytes),
        }
    }

    pub fn has_annotations(&self) -> bool {
        self.annotation_marker().is_some()
    }

    /// The byte range of the current value's body.
    pub fn value_marker(&self) -> Option<&Marker> {
        if self.state == CursorState::OnValue {
            Some(&self.value)
        } else {
            None
        }
    }

    /// The byte range of the current value's annotation symbol IDs.
    pub fn annotation_marker(&self) -> Option<&Marker> {
        if self.state == CursorState::OnValue && !self.annotations.is_empty() {
            Some(&self.annotations)
        } else {
            None
        }
    }

    /// The byte range of the innermost container the cursor has stepped into.
    pub fn container_marker(&self) -> Option<&Marker> {
        self.depth.checked_sub(1).map(|index| &self.containers[index])
    }

    pub fn last_event(&self) -> Event {
        self.last_event
    }

    /// The `(major, minor)` version from the most recent IVM.
    pub fn ion_version(&self) -> (u8, u8) {
        self.encoding.version()
    }

    /// Copies `bytes` to the end of the input buffer.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.buffer.append_bytes(bytes)
    }

    /// Reads up to `length` bytes from `source` directly into the input buffer, returning the
    /// number of bytes that were read.
    pub fn read_from<R: Read>(&mut self, source: R, length: usize) -> IonResult<usize> {
        self.buffer.read_from(source, length)
    }

    /// The number of bytes of the stream that the cursor has moved past.
    pub fn bytes_consumed(&self) -> usize {
        self.buffer.total_consumed()
    }

    /// The number of buffered bytes that the cursor has not moved past yet.
    pub fn bytes_available(&self) -> usize {
        self.buffer.remaining()
    }

    /// Returns `true` if the cursor holds bytes it has not finished with: a partial header, the
    /// unbuffered rest of the current value, or a skip that is still in progress.
    pub(crate) fn has_unfinished_input(&self) -> bool {
        match self.state {
            CursorState::Ready => !self.buffer.is_empty(),
            CursorState::OnValue => self.value.end != self.buffer.available_end(),
            CursorState::Skipping(remaining) => remaining > 0 || !self.buffer.is_empty(),
        }
    }

    /// Removes and returns the versions of the IVMs consumed since the last call.
    pub(crate) fn take_ivms(&mut self) -> Vec<(u8, u8)> {
        std::mem::take(&mut self.pending_ivms)
    }

    pub(crate) fn raw_value_bytes(&self) -> Option<&[u8]> {
        let value = self.value_marker()?;
        self.buffer.bytes_at(value.start, value.end)
    }

    pub(crate) fn raw_header_bytes(&self) -> Option<&[u8]> {
        let value = self.value_marker()?;
        self.buffer.bytes_at(self.header_offset, value.start)
    }

    pub(crate) fn raw_field_id_bytes(&self) -> Option<&[u8]> {
        self.field_id()?;
        self.buffer
            .bytes_at(self.field_id_offset, self.wrapper_offset)
    }

    pub(crate) fn raw_annotations_bytes(&self) -> Option<&[u8]> {
        self.annotation_marker()?;
        self.buffer.bytes_at(self.wrapper_offset, self.header_offset)
    }

    fn set_value(&mut self, header: ValueHeader) {
        let ValueHeader {
            field_id,
            field_id_offset,
            wrapper_offset,
            annotations,
            header_offset,
            value,
        } = header;
        self.field_id = field_id;
        self.field_id_offset = field_id_offset;
        self.wrapper_offset = wrapper_offset;
        self.annotations = annotations;
        self.header_offset = header_offset;
        self.value = value;
    }

    fn clear_value(&mut self) {
        let position = self.buffer.total_consumed();
        self.field_id = None;
        self.field_id_offset = position;
        self.wrapper_offset = position;
        self.annotations = Marker::EMPTY;
        self.header_offset = position;
        self.value = Marker::EMPTY;
    }

    /// Discards up to `remaining` bytes. Returns `true` if all of them were buffered.
    fn skip_buffered(&mut self, remaining: usize) -> bool {
        let available = self.buffer.remaining();
        if available >= remaining {
            self.buffer.consume(remaining);
            self.state = CursorState::Ready;
            true
        } else {
            self.buffer.consume(available);
            self.state = CursorState::Skipping(remaining - available);
            false
        }
    }

    fn check_within_container(&self, label: &str, end: usize) -> IonResult<()> {
        match self.container_marker() {
            Some(parent) if end > parent.end => decoding_error(format!(
                "{label} ending at offset {end} overruns its container, which ends at offset {}",
                parent.end
            )),
            _ => Ok(()),
        }
    }

    fn needs_data(&mut self) -> Event {
        trace!(
            offset = self.buffer.total_consumed(),
            available = self.buffer.remaining(),
            "cursor needs more data"
        );
        self.emit(Event::NeedsData)
    }

    fn emit(&mut self, event: Event) -> Event {
        self.last_event = event;
        event
    }
}

/// Parses the next token's header from `input`. Fails with [IonError::Incomplete] if the
/// header (or an annotations sequence) is not fully buffered; the caller discards `input` in
/// that case.
fn read_token(
    input: &mut BinaryBuffer<&Vec<u8>>,
    encoding: EncodingVersion,
    parent: Option<&Marker>,
) -> IonResult<Token> {
    let field_id_offset = input.total_consumed();
    let field_id = match parent.and_then(Marker::ion_type) {
        Some(IonType::Struct) => Some(input.read_var_uint()?.value()),
        _ => None,
    };
    let wrapper_offset = input.total_consumed();
    let mut annotations = Marker::new(wrapper_offset, wrapper_offset, Marker::EMPTY.type_descriptor);
    let mut phase = HeaderPhase::Unwrapped;
    loop {
        let header_offset = input.total_consumed();
        let type_descriptor = input.peek_type_descriptor(encoding)?;
        if !type_descriptor.is_valid {
            return decoding_error(format!(
                "found an invalid type descriptor byte 0x{:02X} at offset {header_offset}",
                ((type_descriptor.ion_type_code as u8) << 4) | type_descriptor.length_code
            ));
        }
        match phase {
            HeaderPhase::Unwrapped => {
                if type_descriptor.is_ivm_start() {
                    if parent.is_some() {
                        return decoding_error(format!(
                            "found an IVM inside a container at offset {header_offset}"
                        ));
                    }
                    let (major, minor) = input.read_ivm()?;
                    return Ok(Token::VersionMarker { major, minor });
                }
                if type_descriptor.is_nop() {
                    input.consume(1);
                    let length = input.read_length(type_descriptor.length_code)?;
                    return Ok(Token::Nop {
                        end: input.total_consumed() + length.value(),
                    });
                }
                if type_descriptor.is_annotation_wrapper() {
                    input.consume(1);
                    let wrapper_length = input.read_length(type_descriptor.length_code)?;
                    let wrapper_end = input.total_consumed() + wrapper_length.value();
                    annotations = read_annotations_sequence(input, type_descriptor, wrapper_end)?;
                    phase = HeaderPhase::Wrapped { wrapper_end };
                    continue;
                }
            }
            HeaderPhase::Wrapped { .. } => {
                if type_descriptor.is_annotation_wrapper() {
                    return decoding_error(format!(
                        "found a nested annotation wrapper at offset {header_offset}"
                    ));
                }
                if type_descriptor.is_nop() || type_descriptor.is_ivm_start() {
                    return decoding_error(format!(
                        "annotation wrapper at offset {wrapper_offset} does not wrap a value"
                    ));
                }
            }
        }

        input.consume(1);
        let length = input.read_value_length(type_descriptor)?;
        let start = input.total_consumed();
        let end = start + length.value();
        if let HeaderPhase::Wrapped { wrapper_end } = phase {
            if end != wrapper_end {
                return decoding_error(format!(
                    "annotation wrapper at offset {wrapper_offset} ends at {wrapper_end} but its \
                     value ends at {end}"
                ));
            }
        }
        return Ok(Token::Value(ValueHeader {
            field_id,
            field_id_offset,
            wrapper_offset,
            annotations,
            header_offset,
            value: Marker::new(start, end, type_descriptor),
        }));
    }
}

/// Reads the annotations length and the annotation symbol IDs that follow it, confirming that
/// every ID is well-formed and that the wrapper leaves room for a value.
fn read_annotations_sequence(
    input: &mut BinaryBuffer<&Vec<u8>>,
    wrapper: TypeDescriptor,
    wrapper_end: usize,
) -> IonResult<Marker> {
    let sequence_length = input.read_var_uint()?.value();
    if sequence_length == 0 {
        return decoding_error(format!(
            "annotation wrapper at offset {} has an empty annotations sequence",
            input.total_consumed()
        ));
    }
    let start = input.total_consumed();
    let end = start + sequence_length;
    if end >= wrapper_end {
        return decoding_error(format!(
            "annotations sequence at offset {start} leaves no room for the wrapped value"
        ));
    }
    let sequence = input
        .peek_n_bytes(sequence_length)
        .ok_or_else(|| incomplete_error_raw("an annotations sequence", start))?;
    let mut ids = BinaryBuffer::new(sequence);
    while !ids.is_empty() {
        if let Err(IonError::Incomplete(_)) = ids.read_var_uint() {
            return decoding_error(format!(
                "annotations sequence at offset {start} ends inside a symbol ID"
            ));
        }
    }
    input.consume(sequence_length);
    Ok(Marker::new(start, end, wrapper))
}

/// An iterator over the annotation symbol IDs of the cursor's current value.
pub struct AnnotationIds<'a> {
    buffer: BinaryBuffer<&'a [u8]>,
}

impl<'a> Iterator for AnnotationIds<'a> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<Self::Item> {
        // The sequence was validated when its wrapper was parsed.
        self.buffer.read_var_uint().ok().map(|sid| sid.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const IVM: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];

    fn cursor_over(body: &[u8]) -> BinaryCursor {
        let mut data = IVM.to_vec();
        data.extend_from_slice(body);
        BinaryCursor::new(data)
    }

    fn expect_event(cursor: &mut BinaryCursor, expected: Event) -> IonResult<()> {
        assert_eq!(cursor.advance()?, expected);
        Ok(())
    }

    #[test]
    fn top_level_scalars() -> IonResult<()> {
        let mut cursor = cursor_over(&[
            0x21, 0x05, // 5
            0x0F, // null
            0x11, // true
        ]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.current_type(), Some(IonType::Int));
        assert_eq!(cursor.raw_value_bytes(), Some([0x05u8].as_slice()));
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.current_type(), Some(IonType::Null));
        assert!(cursor.is_null());
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.current_type(), Some(IonType::Bool));
        expect_event(&mut cursor, Event::NeedsData)?;
        assert_eq!(cursor.current_type(), None);
        assert_eq!(cursor.ion_version(), (1, 0));
        Ok(())
    }

    #[test]
    fn containers() -> IonResult<()> {
        let mut cursor = cursor_over(&[
            0xB4, // [
            0x21, 0x01, //   1,
            0x21, 0x02, //   2
            0xD3, // {
            0x8A, 0x21, 0x03, //   $10: 3
        ]);
        expect_event(&mut cursor, Event::StartContainer)?;
        assert_eq!(cursor.current_type(), Some(IonType::List));
        assert_eq!(cursor.step_into_container()?, Event::NeedsInstruction);
        assert_eq!(cursor.depth(), 1);
        assert_eq!(cursor.container_marker().map(Marker::len), Some(4));
        expect_event(&mut cursor, Event::StartScalar)?;
        expect_event(&mut cursor, Event::StartScalar)?;
        expect_event(&mut cursor, Event::EndContainer)?;
        // Asking again reports the same thing.
        expect_event(&mut cursor, Event::EndContainer)?;
        assert_eq!(cursor.step_out_of_container()?, Event::NeedsInstruction);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.field_id(), Some(10));
        assert_eq!(cursor.raw_field_id_bytes(), Some([0x8Au8].as_slice()));
        expect_event(&mut cursor, Event::EndContainer)?;
        cursor.step_out_of_container()?;
        expect_event(&mut cursor, Event::NeedsData)?;
        Ok(())
    }

    #[test]
    fn step_out_early_skips_the_rest() -> IonResult<()> {
        let mut cursor = cursor_over(&[
            0xC4, 0x21, 0x01, 0x21, 0x02, // (1 2)
            0x21, 0x07, // 7
        ]);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.step_out_of_container()?, Event::NeedsInstruction);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.raw_value_bytes(), Some([0x07u8].as_slice()));
        Ok(())
    }

    #[test]
    fn step_out_before_container_is_buffered() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xB6, 0x21, 0x01]);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        assert_eq!(cursor.step_out_of_container()?, Event::NeedsData);
        assert_eq!(cursor.depth(), 0);
        cursor.append_bytes(&[0x21, 0x02, 0x21]);
        expect_event(&mut cursor, Event::NeedsData)?;
        cursor.append_bytes(&[0x03, 0x20]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.raw_header_bytes(), Some([0x20u8].as_slice()));
        Ok(())
    }

    #[test]
    fn annotations() -> IonResult<()> {
        let mut cursor = cursor_over(&[
            0xE5, 0x82, 0x84, 0x85, 0x21, 0x07, // $4::$5::7
        ]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert!(cursor.has_annotations());
        assert_eq!(cursor.annotation_ids().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(
            cursor.raw_annotations_bytes(),
            Some([0xE5u8, 0x82, 0x84, 0x85].as_slice())
        );
        assert_eq!(cursor.raw_value_bytes(), Some([0x07u8].as_slice()));
        Ok(())
    }

    #[test]
    fn nop_pads_are_skipped() -> IonResult<()> {
        let mut cursor = cursor_over(&[
            0x00, // one-byte NOP
            0x02, 0xFF, 0xFF, // three-byte NOP
            0x0E, 0x81, 0x00, // NOP with a VarUInt length
            0xD5, 0x84, 0x01, 0x00, 0x8A, 0x20, // {$4: NOP, $10: 0}
        ]);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.field_id(), Some(10));
        expect_event(&mut cursor, Event::EndContainer)?;
        Ok(())
    }

    #[test]
    fn nop_larger_than_the_buffer() -> IonResult<()> {
        let mut cursor = cursor_over(&[0x0E, 0x90, 0x00, 0x00]);
        expect_event(&mut cursor, Event::NeedsData)?;
        cursor.append_bytes(&[0u8; 14]);
        expect_event(&mut cursor, Event::NeedsData)?;
        cursor.append_bytes(&[0x21, 0x01]);
        expect_event(&mut cursor, Event::StartScalar)?;
        Ok(())
    }

    #[test]
    fn header_split_across_appends() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xE4]);
        expect_event(&mut cursor, Event::NeedsData)?;
        // Nothing past the IVM has been accepted.
        assert_eq!(cursor.bytes_consumed(), 4);
        cursor.append_bytes(&[0x81, 0x84]);
        expect_event(&mut cursor, Event::NeedsData)?;
        cursor.append_bytes(&[0x21]);
        expect_event(&mut cursor, Event::NeedsData)?;
        cursor.append_bytes(&[0x01]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.annotation_ids().collect::<Vec<_>>(), vec![4]);
        Ok(())
    }

    #[test]
    fn containers_are_reported_before_their_bodies_arrive() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xBE, 0x8A]);
        expect_event(&mut cursor, Event::StartContainer)?;
        assert_eq!(cursor.value_marker().map(Marker::len), Some(10));
        cursor.step_into_container()?;
        expect_event(&mut cursor, Event::NeedsData)?;
        Ok(())
    }

    #[test]
    fn fill_value_is_idempotent() -> IonResult<()> {
        let mut cursor = cursor_over(&[0x83, b'f', b'o', b'o']);
        expect_event(&mut cursor, Event::StartScalar)?;
        let marker = *cursor.value_marker().unwrap();
        assert_eq!(cursor.fill_value()?, Event::ValueReady);
        assert_eq!(cursor.fill_value()?, Event::ValueReady);
        assert_eq!(cursor.value_marker(), Some(&marker));
        assert_eq!(cursor.raw_value_bytes(), Some(b"foo".as_slice()));
        Ok(())
    }

    #[test]
    fn second_ivm_is_reported() -> IonResult<()> {
        let mut cursor = cursor_over(&[0x20, 0xE0, 0x01, 0x00, 0xEA, 0x20]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.take_ivms(), vec![(1, 0)]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.take_ivms(), vec![(1, 0)]);
        assert!(cursor.take_ivms().is_empty());
        Ok(())
    }

    #[test]
    fn illegal_navigation() -> IonResult<()> {
        let mut cursor = cursor_over(&[0x21, 0x01]);
        assert!(cursor.step_out_of_container().is_err());
        expect_event(&mut cursor, Event::StartScalar)?;
        assert!(cursor.step_into_container().is_err());
        expect_event(&mut cursor, Event::NeedsData)?;
        assert!(cursor.fill_value().is_err());
        Ok(())
    }

    #[test]
    fn null_containers_are_scalars() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xDF]);
        expect_event(&mut cursor, Event::StartScalar)?;
        assert_eq!(cursor.current_type(), Some(IonType::Struct));
        assert!(cursor.is_null());
        assert!(cursor.step_into_container().is_err());
        Ok(())
    }

    #[rstest]
    #[case::missing_ivm(&[0x21, 0x01])]
    #[case::reserved_type(&[0xE0, 0x01, 0x00, 0xEA, 0xF0])]
    #[case::bad_ivm(&[0xE0, 0x01, 0x00, 0xEB])]
    #[case::ion_1_1(&[0xE0, 0x01, 0x01, 0xEA])]
    #[case::nested_wrapper(&[0xE0, 0x01, 0x00, 0xEA, 0xE7, 0x81, 0x84, 0xE4, 0x81, 0x85, 0x20])]
    #[case::nop_in_wrapper(&[0xE0, 0x01, 0x00, 0xEA, 0xE4, 0x81, 0x84, 0x01, 0x00])]
    #[case::wrapper_length_mismatch(&[0xE0, 0x01, 0x00, 0xEA, 0xE5, 0x81, 0x84, 0x21, 0x01])]
    #[case::empty_annotations(&[0xE0, 0x01, 0x00, 0xEA, 0xE3, 0x80, 0x20, 0x20])]
    #[case::empty_ordered_struct(&[0xE0, 0x01, 0x00, 0xEA, 0xD1, 0x80])]
    #[case::negative_zero_int_header(&[0xE0, 0x01, 0x00, 0xEA, 0x30])]
    #[case::bad_float_length(&[0xE0, 0x01, 0x00, 0xEA, 0x42, 0x00, 0x00])]
    fn malformed_top_level(#[case] input: &[u8]) {
        let mut cursor = BinaryCursor::new(input.to_vec());
        let mut result = cursor.advance();
        // Keep advancing over anything that was read successfully.
        while let Ok(Event::StartScalar) | Ok(Event::StartContainer) = result {
            result = cursor.advance();
        }
        assert!(
            matches!(result, Err(IonError::Decoding(_))),
            "expected a decoding error, found {result:?}"
        );
    }

    #[test]
    fn child_overruns_parent() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xB2, 0x22, 0x01, 0x01]);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        assert!(matches!(cursor.advance(), Err(IonError::Decoding(_))));
        Ok(())
    }

    #[test]
    fn ivm_inside_container() -> IonResult<()> {
        let mut cursor = cursor_over(&[0xB4, 0xE0, 0x01, 0x00, 0xEA]);
        expect_event(&mut cursor, Event::StartContainer)?;
        cursor.step_into_container()?;
        assert!(matches!(cursor.advance(), Err(IonError::Decoding(_))));
        Ok(())
    }
}
