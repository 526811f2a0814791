//! Variable-length unsigned integer codec (1-6 bytes, 31-bit range).
//!
//! This is the UTF-8 byte framing followed to its natural conclusion: the
//! initial byte carries a run of leading one-bits announcing the total
//! length (none for a single byte), continuation bytes carry `10` plus six
//! value bits, most significant chunk first.
//!
//! ```text
//! 32-bit integer                       1st byte 2nd byte 3rd byte 4th byte 5th byte 6th byte
//! -----------------------------------  -------- -------- -------- -------- -------- --------
//! 00000000 00000000 00000000 0aaaaaaa  0aaaaaaa
//! 00000000 00000000 00000bbb bbaaaaaa  110bbbbb 10aaaaaa
//! 00000000 00000000 ccccbbbb bbaaaaaa  1110cccc 10bbbbbb 10aaaaaa
//! 00000000 000dddcc ccccbbbb bbaaaaaa  11110ddd 10cccccc 10bbbbbb 10aaaaaa
//! 000000ee ddddddcc ccccbbbb bbaaaaaa  111110ee 10dddddd 10cccccc 10bbbbbb 10aaaaaa
//! 0feeeeee ddddddcc ccccbbbb bbaaaaaa  1111110f 10eeeeee 10dddddd 10cccccc 10bbbbbb 10aaaaaa
//! ```
//!
//! A value is only valid in its minimum-length encoding. Decoding re-derives
//! the canonical length and rejects anything longer ([`Error::NonCanonicalEncoding`]);
//! the byte values 0xFE and 0xFF never appear in a valid sequence.

use crate::bytestream::{ByteReader, ByteWriter};
use crate::{Error, Result};

/// Largest encodable value: six bytes carry 1 + 5 * 6 = 31 value bits.
pub const MAX_VALUE: u32 = 0x7FFF_FFFF;

const MIN_TWO_BYTE_VALUE: u32 = 0x0000_0080;
const MIN_THREE_BYTE_VALUE: u32 = 0x0000_0800;
const MIN_FOUR_BYTE_VALUE: u32 = 0x0001_0000;
const MIN_FIVE_BYTE_VALUE: u32 = 0x0020_0000;
const MIN_SIX_BYTE_VALUE: u32 = 0x0400_0000;

const VALUE_BITS_PER_CONTINUATION_BYTE: usize = 6;

const CONTINUATION_TEMPLATE: u8 = 0x80; // 10xxxxxx
const CONTINUATION_VALUE_MASK: u8 = 0x3F; // 00111111
const CONTINUATION_TEMPLATE_MASK: u8 = 0xC0; // 11000000

/// Value-bit masks of the initial byte, indexed by total length (index 0 unused).
const INITIAL_VALUE_MASK: [u8; 7] = [0x00, 0x7F, 0x1F, 0x0F, 0x07, 0x03, 0x01];

/// Template-bit masks of the initial byte, indexed by total length (index 0 unused).
const INITIAL_TEMPLATE_MASK: [u8; 7] = [0x00, 0x80, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE];

/// Templates of the initial byte, indexed by total length (index 0 unused).
const INITIAL_TEMPLATE: [u8; 7] = [0x00, 0x00, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC];

const MIN_ENCODED_LENGTH: usize = 1;
const MAX_ENCODED_LENGTH: usize = 6;

/// Canonical encoded length of `value`, in bytes.
///
/// Used for encoding and re-used as the validation step when decoding.
#[inline]
pub fn encoded_len(value: u32) -> usize {
    if value < MIN_TWO_BYTE_VALUE {
        1
    } else if value < MIN_THREE_BYTE_VALUE {
        2
    } else if value < MIN_FOUR_BYTE_VALUE {
        3
    } else if value < MIN_FIVE_BYTE_VALUE {
        4
    } else if value < MIN_SIX_BYTE_VALUE {
        5
    } else {
        6
    }
}

/// Encodes `value` in its canonical 1-6 byte form.
///
/// Returns [`Error::ValueOutOfRange`] for values above [`MAX_VALUE`].
#[inline]
pub fn encode(writer: &mut ByteWriter, value: u32) -> Result<()> {
    if value > MAX_VALUE {
        return Err(Error::ValueOutOfRange(value));
    }
    if value < MIN_TWO_BYTE_VALUE {
        // Fast-Path: Single-Byte (häufigster Fall, Opcodes und kleine IDs)
        writer.write_byte(value as u8);
        return Ok(());
    }

    let length = encoded_len(value);
    for i in 0..length {
        let shift = (length - i - 1) * VALUE_BITS_PER_CONTINUATION_BYTE;
        let (mask, template) = if i == 0 {
            (INITIAL_VALUE_MASK[length], INITIAL_TEMPLATE[length])
        } else {
            (CONTINUATION_VALUE_MASK, CONTINUATION_TEMPLATE)
        };
        writer.write_byte(template | ((value >> shift) as u8 & mask));
    }
    Ok(())
}

/// Total length announced by the initial byte, matched against the six
/// templates in increasing length order.
#[inline]
fn length_from_initial_byte(initial: u8) -> Result<usize> {
    for length in MIN_ENCODED_LENGTH..=MAX_ENCODED_LENGTH {
        if initial & INITIAL_TEMPLATE_MASK[length] == INITIAL_TEMPLATE[length] {
            return Ok(length);
        }
    }
    Err(Error::InvalidLeadingByte(initial))
}

/// Decodes one canonical variable-length integer from the stream.
///
/// # Errors
///
/// - [`Error::InvalidLeadingByte`] if the initial byte matches no template
/// - [`Error::InvalidContinuationByte`] if a later byte is not `10xxxxxx`
/// - [`Error::NonCanonicalEncoding`] for overlong forms
/// - [`Error::TruncatedStream`] if input ends mid-sequence
#[inline]
pub fn decode(reader: &mut ByteReader<'_>) -> Result<u32> {
    let initial = reader.read_byte()?;
    if initial & INITIAL_TEMPLATE_MASK[1] == INITIAL_TEMPLATE[1] {
        // Fast-Path: Single-Byte, per Konstruktion kanonisch
        return Ok(u32::from(initial));
    }

    let length = length_from_initial_byte(initial)?;
    let mut value = u32::from(initial & INITIAL_VALUE_MASK[length])
        << (VALUE_BITS_PER_CONTINUATION_BYTE * (length - 1));

    for i in 1..length {
        let byte = reader.read_byte()?;
        if byte & CONTINUATION_TEMPLATE_MASK != CONTINUATION_TEMPLATE {
            return Err(Error::InvalidContinuationByte { byte, offset: i });
        }
        value |= u32::from(byte & CONTINUATION_VALUE_MASK)
            << (VALUE_BITS_PER_CONTINUATION_BYTE * (length - i - 1));
    }

    let canonical = encoded_len(value);
    if canonical != length {
        return Err(Error::NonCanonicalEncoding { value, length, canonical });
    }

    Ok(value)
}

/// Decodes from a raw slice, returning the value and the bytes consumed.
pub fn decode_slice(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut reader = ByteReader::new(bytes);
    let value = decode(&mut reader)?;
    Ok((value, reader.position()))
}

/// Encodes into a fresh buffer. Convenience for callers outside a stream.
pub fn encode_to_vec(value: u32) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::new();
    encode(&mut writer, value)?;
    Ok(writer.into_vec())
}
