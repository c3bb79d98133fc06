//! `Encoder` — writes value tuples into a [`GrowBuffer`].
//!
//! Wire layout per value:
//! - `-` nil, `0` false, `1` true
//! - `N` + native `f64`
//! - `S` + native `usize` length + raw bytes
//! - `T` + `i32` array size + `i32` hash size + key/value pairs
//!
//! Table size fields are reserved as zeros and backpatched once the entries
//! have been written, so tables are encoded in a single pass.

use tablebin_buffers::{Allocator, GrowBuffer, SystemAllocator};

use crate::constants::{
    INT_WIDTH, MAX_TUPLE, NUMBER_WIDTH, SIZE_WIDTH, TAG_FALSE, TAG_NIL, TAG_NUMBER, TAG_STRING,
    TAG_TABLE, TAG_TRUE,
};
use crate::{CodecOptions, EncodeError, Table, Value};

pub struct Encoder<A: Allocator = SystemAllocator> {
    pub buffer: GrowBuffer<A>,
    max_nesting: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_allocator(SystemAllocator)
    }
}

impl<A: Allocator> Encoder<A> {
    pub fn with_allocator(alloc: A) -> Self {
        Self::with_options(alloc, CodecOptions::default())
    }

    pub fn with_options(alloc: A, options: CodecOptions) -> Self {
        Self {
            buffer: GrowBuffer::new(alloc, options.block_size),
            max_nesting: options.max_nesting,
        }
    }

    /// Encodes `values` as one message.
    ///
    /// On failure the buffer is released and nothing is returned but the error.
    pub fn encode(&mut self, values: &[Value]) -> Result<Vec<u8>, EncodeError> {
        self.buffer.clear();
        match self.write_message(values) {
            Ok(()) => Ok(self.flush()),
            Err(err) => {
                tracing::debug!(error = %err, roots = values.len(), "encode failed");
                self.buffer.destroy();
                Err(err)
            }
        }
    }

    fn write_message(&mut self, values: &[Value]) -> Result<(), EncodeError> {
        if values.len() > MAX_TUPLE {
            return Err(EncodeError::TooManyRoots(values.len()));
        }
        self.write_tuple_size(values.len() as u8)?;
        for value in values {
            self.write_value(value, 0)?;
        }
        Ok(())
    }

    /// Returns the bytes written so far and empties the buffer.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.buffer.to_vec();
        self.buffer.clear();
        out
    }

    /// Writes one value. `nesting` is the number of tables enclosing it.
    pub fn write_value(&mut self, value: &Value, nesting: usize) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Number(n) => self.write_number(*n),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Table(t) => self.write_table(t, nesting + 1),
            Value::Host(kind) => Err(EncodeError::UnsupportedType(*kind)),
        }
    }

    fn write_table(&mut self, table: &Table, nesting: usize) -> Result<(), EncodeError> {
        if nesting > self.max_nesting {
            return Err(EncodeError::TooDeep {
                limit: self.max_nesting,
            });
        }

        let header = self.write_table_header(0, 0)?;

        let mut total = 0usize;
        for (key, value) in table {
            self.write_value(key, nesting)?;
            self.write_value(value, nesting)?;
            total += 1;
        }

        // The declared length may overshoot when the sequence has holes.
        let array_size = total.min(table.sequence_len());
        let hash_size = total - array_size;
        self.write_table_header_at(header, size_field(array_size)?, size_field(hash_size)?)
    }

    // ---- Low-level write API ----

    pub fn write_tuple_size(&mut self, count: u8) -> Result<(), EncodeError> {
        self.buffer.write(&[count])?;
        Ok(())
    }

    pub fn write_nil(&mut self) -> Result<(), EncodeError> {
        self.buffer.write(&[TAG_NIL])?;
        Ok(())
    }

    pub fn write_boolean(&mut self, b: bool) -> Result<(), EncodeError> {
        self.buffer.write(&[if b { TAG_TRUE } else { TAG_FALSE }])?;
        Ok(())
    }

    pub fn write_number(&mut self, n: f64) -> Result<(), EncodeError> {
        self.buffer.grow(1 + NUMBER_WIDTH)?;
        self.buffer.write(&[TAG_NUMBER])?;
        self.buffer.write(&n.to_ne_bytes())?;
        Ok(())
    }

    /// Integers are carried as numbers.
    pub fn write_integer(&mut self, n: i64) -> Result<(), EncodeError> {
        self.write_number(n as f64)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.buffer.grow(1 + SIZE_WIDTH + bytes.len())?;
        self.buffer.write(&[TAG_STRING])?;
        self.buffer.write(&bytes.len().to_ne_bytes())?;
        self.buffer.write(bytes)?;
        Ok(())
    }

    /// Writes a table tag and size header; returns the offset of the tag.
    pub fn write_table_header(
        &mut self,
        array_size: i32,
        hash_size: i32,
    ) -> Result<usize, EncodeError> {
        let offset = self.buffer.len();
        self.buffer.grow(1 + 2 * INT_WIDTH)?;
        self.buffer.write(&[TAG_TABLE])?;
        self.buffer.write(&array_size.to_ne_bytes())?;
        self.buffer.write(&hash_size.to_ne_bytes())?;
        Ok(offset)
    }

    /// Rewrites the size header of the table whose tag sits at `offset`.
    pub fn write_table_header_at(
        &mut self,
        offset: usize,
        array_size: i32,
        hash_size: i32,
    ) -> Result<(), EncodeError> {
        self.buffer.overwrite(offset + 1, &array_size.to_ne_bytes())?;
        self.buffer.overwrite(offset + 1 + INT_WIDTH, &hash_size.to_ne_bytes())?;
        Ok(())
    }
}

fn size_field(n: usize) -> Result<i32, EncodeError> {
    i32::try_from(n).map_err(|_| EncodeError::TableTooLarge(n))
}

#[cfg(test)]
#[cfg(all(target_endian = "little", target_pointer_width = "64"))]
mod tests {
    use super::*;
    use crate::HostKind;

    fn encode(values: &[Value]) -> Result<Vec<u8>, EncodeError> {
        Encoder::new().encode(values)
    }

    #[test]
    fn write_tuple_size() {
        let mut encoder = Encoder::new();
        encoder.write_tuple_size(0xab).unwrap();
        assert_eq!(encoder.flush(), [0xab]);
    }

    #[test]
    fn write_table_header() {
        let mut encoder = Encoder::new();
        encoder.write_table_header(0xab, 0xcd).unwrap();
        assert_eq!(encoder.flush(), b"T\xab\0\0\0\xcd\0\0\0");
    }

    #[test]
    fn write_table_header_at() {
        let mut encoder = Encoder::new();
        encoder.write_tuple_size(1).unwrap();
        let pos = encoder.write_table_header(0, 0).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(encoder.buffer.view(), b"\x01T\0\0\0\0\0\0\0\0");
        encoder.write_table_header_at(pos, 0xab, 0xcd).unwrap();
        assert_eq!(encoder.flush(), b"\x01T\xab\0\0\0\xcd\0\0\0");
    }

    #[test]
    fn write_scalars() {
        let mut encoder = Encoder::new();
        encoder.write_nil().unwrap();
        encoder.write_boolean(true).unwrap();
        encoder.write_boolean(false).unwrap();
        assert_eq!(encoder.flush(), b"-10");
    }

    #[test]
    fn write_number_and_integer() {
        let mut encoder = Encoder::new();
        encoder.write_number(1.0).unwrap();
        assert_eq!(encoder.flush(), b"N\0\0\0\0\0\0\xf0\x3f");
        encoder.write_integer(1).unwrap();
        assert_eq!(encoder.flush(), b"N\0\0\0\0\0\0\xf0\x3f");
    }

    #[test]
    fn write_strings() {
        let mut encoder = Encoder::new();
        encoder.write_bytes(b"").unwrap();
        assert_eq!(encoder.flush(), b"S\0\0\0\0\0\0\0\0");
        encoder.write_bytes(b"payload").unwrap();
        assert_eq!(encoder.flush(), b"S\x07\0\0\0\0\0\0\0payload");
        encoder.write_bytes(b"Embedded\0Zero").unwrap();
        assert_eq!(encoder.flush(), b"S\x0d\0\0\0\0\0\0\0Embedded\0Zero");
    }

    #[test]
    fn empty_tuple() {
        assert_eq!(encode(&[]).unwrap(), [0x00]);
    }

    #[test]
    fn scalar_tuple() {
        let bytes = encode(&[Value::Nil, Value::Bool(true), Value::Bool(false)]).unwrap();
        assert_eq!(bytes, [0x03, 0x2d, 0x31, 0x30]);
    }

    #[test]
    fn sequence_table() {
        let mut t = Table::new().with_sequence_hint(1);
        t.insert(1, "x");
        let bytes = encode(&[Value::Table(t)]).unwrap();
        let mut expected = vec![0x01, b'T', 1, 0, 0, 0, 0, 0, 0, 0];
        expected.extend_from_slice(b"N\0\0\0\0\0\0\xf0\x3f");
        expected.extend_from_slice(b"S\x01\0\0\0\0\0\0\0x");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn overshooting_hint_is_clamped() {
        let mut t = Table::new().with_sequence_hint(10);
        t.insert(1, true);
        t.insert("k", false);
        let bytes = encode(&[Value::Table(t)]).unwrap();
        assert_eq!(&bytes[1..10], b"T\x02\0\0\0\0\0\0\0");
    }

    #[test]
    fn hash_only_table() {
        let mut t = Table::new();
        t.insert("a", 1);
        t.insert("b", 2);
        t.insert("c", 3);
        let bytes = encode(&[Value::Table(t)]).unwrap();
        assert_eq!(&bytes[1..10], b"T\0\0\0\0\x03\0\0\0");
    }

    #[test]
    fn nested_header_backpatch() {
        let inner = Table::from_sequence([true, false]);
        let mut outer = Table::new();
        outer.insert("inner", inner);
        let bytes = encode(&[Value::Table(outer)]).unwrap();
        assert_eq!(&bytes[1..10], b"T\0\0\0\0\x01\0\0\0");
        // "inner" key: tag + 8-byte length + 5 bytes
        let inner_at = 10 + 1 + 8 + 5;
        assert_eq!(&bytes[inner_at..inner_at + 9], b"T\x02\0\0\0\0\0\0\0");
    }

    #[test]
    fn unsupported_type_aborts() {
        let err = encode(&[Value::Nil, Value::Host(HostKind::Function)]).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedType(HostKind::Function));
    }

    #[test]
    fn unsupported_key_inside_table() {
        let mut t = Table::new();
        t.insert(Value::Host(HostKind::Thread), 1);
        let err = encode(&[Value::Table(t)]).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedType(HostKind::Thread));
    }

    #[test]
    fn too_many_roots() {
        let values = vec![Value::Nil; 256];
        assert_eq!(encode(&values), Err(EncodeError::TooManyRoots(256)));
        let values = vec![Value::Nil; 255];
        assert_eq!(encode(&values).unwrap()[0], 255);
    }

    #[test]
    fn encoder_is_reusable_after_failure() {
        let mut encoder = Encoder::new();
        assert!(encoder.encode(&[Value::Host(HostKind::Userdata)]).is_err());
        assert_eq!(encoder.buffer.capacity(), 0);
        assert_eq!(encoder.encode(&[Value::Nil]).unwrap(), b"\x01-");
        assert_eq!(encoder.encode(&[]).unwrap(), b"\x00");
    }
}
