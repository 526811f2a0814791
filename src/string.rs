//! String payload encoding: varint byte length followed by raw UTF-8.
//!
//! Die Länge ist die Byte-Länge des UTF-8 Encodings (nicht die Zeichenzahl)
//! und läuft durch denselben kanonischen Varint-Decoder wie alle anderen
//! Integers, Overlong-Längen werden also genauso abgelehnt.

use crate::bytestream::{ByteReader, ByteWriter};
use crate::{varint, Error, Result};

/// Encodes a string as a length-prefixed UTF-8 byte sequence.
pub fn encode(writer: &mut ByteWriter, value: &str) -> Result<()> {
    let bytes = value.as_bytes();
    let len = u32::try_from(bytes.len()).map_err(|_| Error::ValueOutOfRange(u32::MAX))?;
    varint::encode(writer, len)?;
    writer.write_bytes(bytes);
    Ok(())
}

/// Decodes a length-prefixed UTF-8 string.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected,
/// matching the lossy text handling of typical SAX pipelines.
///
/// # Errors
///
/// [`Error::TruncatedStream`] if fewer than `length` bytes remain;
/// malformed length varints propagate their own errors.
pub fn decode(reader: &mut ByteReader<'_>) -> Result<String> {
    let len = varint::decode(reader)? as usize;
    if len == 0 {
        return Ok(String::new());
    }
    let bytes = reader.read_bytes(len)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: &str) -> String {
        let mut w = ByteWriter::new();
        encode(&mut w, value).unwrap();
        let data = w.into_vec();
        let mut r = ByteReader::new(&data);
        let decoded = decode(&mut r).unwrap();
        assert!(r.is_at_end());
        decoded
    }

    #[test]
    fn empty_string() {
        assert_eq!(round_trip(""), "");
        let mut w = ByteWriter::new();
        encode(&mut w, "").unwrap();
        // Länge 0, keine Payload-Bytes
        assert_eq!(w.into_vec(), vec![0x00]);
    }

    #[test]
    fn ascii_string() {
        assert_eq!(round_trip("hello"), "hello");
        let mut w = ByteWriter::new();
        encode(&mut w, "hi").unwrap();
        assert_eq!(w.into_vec(), vec![0x02, b'h', b'i']);
    }

    // Länge ist Byte-Länge, nicht Zeichenzahl
    #[test]
    fn length_is_byte_count() {
        let mut w = ByteWriter::new();
        encode(&mut w, "aé").unwrap();
        let data = w.into_vec();
        // "aé" = 3 UTF-8 Bytes, 2 Zeichen
        assert_eq!(data[0], 3);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn unicode_round_trips() {
        for s in ["漢字", "😀", "Hello, 世界! 🌍", "\u{10FFFF}"] {
            assert_eq!(round_trip(s), s);
        }
    }

    #[test]
    fn long_string_two_byte_length() {
        let s: String = (0..200).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        assert_eq!(round_trip(&s), s);
        let mut w = ByteWriter::new();
        encode(&mut w, &s).unwrap();
        // 200 > 127 → Zwei-Byte-Länge
        assert_eq!(w.len(), 2 + 200);
    }

    #[test]
    fn decode_eof_on_length() {
        let mut r = ByteReader::new(&[]);
        assert_eq!(
            decode(&mut r).unwrap_err(),
            Error::TruncatedStream { offset: 0 }
        );
    }

    #[test]
    fn decode_eof_mid_payload() {
        // Länge 5, aber nur 2 Payload-Bytes vorhanden
        let mut r = ByteReader::new(&[0x05, b'a', b'b']);
        assert_eq!(
            decode(&mut r).unwrap_err(),
            Error::TruncatedStream { offset: 3 }
        );
    }

    // Die Längen-Varint unterliegt derselben Kanonizitätsprüfung
    #[test]
    fn decode_rejects_overlong_length() {
        let mut r = ByteReader::new(&[0xC0, 0x80, b'x']);
        assert_eq!(
            decode(&mut r).unwrap_err(),
            Error::NonCanonicalEncoding { value: 0, length: 2, canonical: 1 }
        );
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        // Länge 2, isoliertes Continuation-Byte + 'a'
        let mut r = ByteReader::new(&[0x02, 0x80, b'a']);
        let s = decode(&mut r).unwrap();
        assert_eq!(s, "\u{FFFD}a");
    }

    #[test]
    fn sequential_strings() {
        let mut w = ByteWriter::new();
        encode(&mut w, "abc").unwrap();
        encode(&mut w, "").unwrap();
        encode(&mut w, "日本").unwrap();
        let data = w.into_vec();

        let mut r = ByteReader::new(&data);
        assert_eq!(decode(&mut r).unwrap(), "abc");
        assert_eq!(decode(&mut r).unwrap(), "");
        assert_eq!(decode(&mut r).unwrap(), "日本");
    }
}
