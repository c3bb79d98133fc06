//! `Decoder` — reads value tuples back from a byte buffer.
//!
//! Mirrors the encoder's layout. Every read is bounds-checked; the first short
//! read or unknown tag aborts the whole message with `CorruptData`.

use tablebin_buffers::Reader;

use crate::constants::Tag;
use crate::{CodecOptions, DecodeError, Table, Value};

/// Stateless decoder.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_nesting: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn corrupt(reader: &Reader<'_>) -> DecodeError {
    DecodeError::CorruptData {
        offset: reader.position(),
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_options(&CodecOptions::default())
    }

    pub fn with_options(options: &CodecOptions) -> Self {
        Self {
            max_nesting: options.max_nesting,
        }
    }

    /// Decodes one message.
    ///
    /// Returns the values and the number of input bytes they occupied; bytes
    /// after the last value are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<(Vec<Value>, usize), DecodeError> {
        let mut reader = Reader::new(input);
        self.read_message(&mut reader).inspect_err(|err| {
            tracing::debug!(error = %err, len = input.len(), "decode failed");
        })
    }

    fn read_message(&self, r: &mut Reader<'_>) -> Result<(Vec<Value>, usize), DecodeError> {
        let count = r.try_u8().map_err(|_| corrupt(r))?;
        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(self.read_value(r, 0)?);
        }
        Ok((values, r.position()))
    }

    /// Reads one value. `nesting` is the number of tables enclosing it.
    pub fn read_value(&self, r: &mut Reader<'_>, nesting: usize) -> Result<Value, DecodeError> {
        let offset = r.position();
        let tag = r.try_u8().map_err(|_| corrupt(r))?;
        match Tag::try_from(tag) {
            Ok(Tag::Nil) => Ok(Value::Nil),
            Ok(Tag::False) => Ok(Value::Bool(false)),
            Ok(Tag::True) => Ok(Value::Bool(true)),
            Ok(Tag::Number) => r.try_f64().map(Value::Number).map_err(|_| corrupt(r)),
            Ok(Tag::String) => {
                let len = r.try_usize().map_err(|_| corrupt(r))?;
                let bytes = r.try_buf(len).map_err(|_| corrupt(r))?;
                Ok(Value::Bytes(bytes.to_vec()))
            }
            Ok(Tag::Table) => self.read_table(r, nesting + 1),
            Err(_) => Err(DecodeError::CorruptData { offset }),
        }
    }

    fn read_table(&self, r: &mut Reader<'_>, nesting: usize) -> Result<Value, DecodeError> {
        if nesting > self.max_nesting {
            return Err(DecodeError::TooDeep {
                limit: self.max_nesting,
            });
        }

        let header = r.position();
        let array_size = r.try_i32().map_err(|_| corrupt(r))?;
        let hash_size = r.try_i32().map_err(|_| corrupt(r))?;
        let (Ok(array_size), Ok(hash_size)) =
            (usize::try_from(array_size), usize::try_from(hash_size))
        else {
            return Err(DecodeError::CorruptData { offset: header });
        };
        let total = array_size
            .checked_add(hash_size)
            .ok_or(DecodeError::CorruptData { offset: header })?;

        // Sizes are only a hint; every pair takes at least two bytes.
        let mut table = Table::with_capacity(total.min(r.size() / 2));
        for _ in 0..total {
            let key = self.read_value(r, nesting)?;
            let value = self.read_value(r, nesting)?;
            table.insert(key, value);
        }
        table.set_sequence_hint(Some(array_size));
        Ok(Value::Table(table))
    }
}

#[cfg(test)]
#[cfg(all(target_endian = "little", target_pointer_width = "64"))]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> Result<(Vec<Value>, usize), DecodeError> {
        Decoder::new().decode(input)
    }

    #[test]
    fn empty_input_is_corrupt() {
        assert_eq!(decode(b""), Err(DecodeError::CorruptData { offset: 0 }));
    }

    #[test]
    fn empty_tuple() {
        assert_eq!(decode(b"\x00"), Ok((vec![], 1)));
    }

    #[test]
    fn scalars() {
        let (values, used) = decode(b"\x03-10").unwrap();
        assert_eq!(values, vec![Value::Nil, Value::Bool(true), Value::Bool(false)]);
        assert_eq!(used, 4);
    }

    #[test]
    fn number() {
        let (values, _) = decode(b"\x01N\0\0\0\0\0\0\xf0\x3f").unwrap();
        assert_eq!(values, vec![Value::Number(1.0)]);
    }

    #[test]
    fn strings_with_zero_bytes() {
        let (values, _) = decode(b"\x02S\x03\0\0\0\0\0\0\0a\0bS\0\0\0\0\0\0\0\0").unwrap();
        assert_eq!(values, vec![Value::from(&b"a\0b"[..]), Value::from("")]);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(decode(b"\x01-garbage"), Ok((vec![Value::Nil], 2)));
    }

    #[test]
    fn missing_values_are_corrupt() {
        assert_eq!(decode(b"\x02-"), Err(DecodeError::CorruptData { offset: 2 }));
    }

    #[test]
    fn unknown_tag_is_corrupt() {
        assert_eq!(decode(b"\x01X"), Err(DecodeError::CorruptData { offset: 1 }));
    }

    #[test]
    fn short_string_is_corrupt() {
        assert_eq!(
            decode(b"\x01S\x05\0\0\0\0\0\0\0abc"),
            Err(DecodeError::CorruptData { offset: 10 })
        );
    }

    #[test]
    fn huge_string_length_is_corrupt() {
        assert!(matches!(
            decode(b"\x01S\xff\xff\xff\xff\xff\xff\xff\xffabc"),
            Err(DecodeError::CorruptData { .. })
        ));
    }

    #[test]
    fn table() {
        let input = b"\x01T\x01\0\0\0\0\0\0\0N\0\0\0\0\0\0\xf0\x3fS\x01\0\0\0\0\0\0\0x";
        let (values, used) = decode(input).unwrap();
        assert_eq!(used, input.len());
        let table = values[0].as_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Value::Number(1.0)), Some(&Value::from("x")));
        assert_eq!(table.sequence_hint(), Some(1));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let input = b"\x01T\0\0\0\0\x02\0\0\0-0-1";
        let (values, _) = decode(input).unwrap();
        let table = values[0].as_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Value::Nil), Some(&Value::Bool(true)));
    }

    #[test]
    fn negative_sizes_are_corrupt() {
        let input = b"\x01T\xff\xff\xff\xff\0\0\0\0";
        assert_eq!(decode(input), Err(DecodeError::CorruptData { offset: 2 }));
    }

    #[test]
    fn oversized_header_is_corrupt_not_oom() {
        let input = b"\x01T\xff\xff\xff\x7f\xff\xff\xff\x7f--";
        assert!(matches!(decode(input), Err(DecodeError::CorruptData { .. })));
    }

    #[test]
    fn nesting_limit() {
        let decoder = Decoder::with_options(&CodecOptions::default().max_nesting(1));
        let one = b"\x01T\0\0\0\0\0\0\0\0";
        assert!(decoder.decode(one).is_ok());
        let two = b"\x01T\0\0\0\0\x01\0\0\0-T\0\0\0\0\0\0\0\0";
        assert_eq!(decoder.decode(two), Err(DecodeError::TooDeep { limit: 1 }));
    }
}
