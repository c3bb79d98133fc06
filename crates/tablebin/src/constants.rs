//! Wire tags, field widths and limits shared by the encoder and decoder.
//!
//! Integer and float fields use host-native width and byte order, so a buffer
//! is only readable on a host with the same layout as the writer.

use std::mem::size_of;

pub const TAG_NIL: u8 = b'-';
pub const TAG_FALSE: u8 = b'0';
pub const TAG_TRUE: u8 = b'1';
pub const TAG_NUMBER: u8 = b'N';
pub const TAG_STRING: u8 = b'S';
pub const TAG_TABLE: u8 = b'T';

/// Width of each table size field.
pub const INT_WIDTH: usize = size_of::<i32>();
/// Width of a string length field.
pub const SIZE_WIDTH: usize = size_of::<usize>();
/// Width of a number payload.
pub const NUMBER_WIDTH: usize = size_of::<f64>();

/// Largest number of values in one message.
pub const MAX_TUPLE: usize = 255;
/// Deepest table nesting accepted by default.
pub const MAX_NESTING: usize = 200;
/// Default growth granularity of the encoder buffer.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// One-byte value tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Nil = TAG_NIL,
    False = TAG_FALSE,
    True = TAG_TRUE,
    Number = TAG_NUMBER,
    String = TAG_STRING,
    Table = TAG_TABLE,
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            TAG_NIL => Ok(Tag::Nil),
            TAG_FALSE => Ok(Tag::False),
            TAG_TRUE => Ok(Tag::True),
            TAG_NUMBER => Ok(Tag::Number),
            TAG_STRING => Ok(Tag::String),
            TAG_TABLE => Ok(Tag::Table),
            other => Err(other),
        }
    }
}
