//! Central error types for the BSAX codec.
//!
//! Three groups: malformed variable-length integers, protocol violations
//! (the stream breaks a structural rule of the format), and truncation.

use core::fmt;

/// All error conditions a BSAX stream can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The initial byte of a variable-length integer matches none of the
    /// six leading-byte templates (0xFE and 0xFF can never appear).
    InvalidLeadingByte(u8),
    /// A continuation byte does not match the `10xxxxxx` template.
    InvalidContinuationByte {
        /// The offending byte value.
        byte: u8,
        /// Position of the byte within the integer sequence (1-based).
        offset: usize,
    },
    /// An integer was encoded in more bytes than its canonical length.
    ///
    /// Overlong-Formen (z.B. 0 als `{0xC0, 0x80}`) sind ein klassischer
    /// Injection-Vektor in UTF-8-artigen Encodings und werden immer
    /// zurückgewiesen.
    NonCanonicalEncoding {
        /// The decoded value.
        value: u32,
        /// The length of the encoding actually read.
        length: usize,
        /// The canonical length for this value.
        canonical: usize,
    },
    /// A value outside the encodable range [0, 2^31) was passed to the
    /// integer encoder.
    ValueOutOfRange(u32),
    /// The stream does not begin with the `BSAX` magic bytes.
    BadMagic([u8; 4]),
    /// The stream's format version is not supported (only version 1 is).
    UnsupportedVersion(u32),
    /// The header's string table capacity is neither 0 (unlimited) nor >= 7.
    InvalidTableCapacity(u32),
    /// An opcode value outside 0..=13 was read at a top-level position.
    UnknownOpcode(u32),
    /// The attribute opcode appeared outside a start-element operation.
    AttributeOutsideStartElement,
    /// A non-definition opcode other than attribute appeared inside a
    /// start-element attribute loop.
    WrongOpcodeInAttributeLoop(u32),
    /// A string definition targeted reserved id 0 (absent) or 1 (empty).
    ReservedIdRedefinition(u32),
    /// A string id is outside the fixed capacity of a bounded table.
    StringIdOutOfBounds {
        /// The offending id.
        id: u32,
        /// The table's fixed capacity.
        capacity: u32,
    },
    /// A string reference does not resolve to a table entry.
    UnknownStringReference(u32),
    /// An unlimited-capacity table definition skipped past the append
    /// position (more than one beyond the current end).
    TableGrowthSkippedId {
        /// The offending id.
        id: u32,
        /// The table size at the time of the definition.
        size: u32,
    },
    /// End of input while a record or operand was only partially read.
    ///
    /// A clean end at a top-level opcode boundary is not an error and never
    /// produces this variant.
    TruncatedStream {
        /// Byte offset at which input ran out.
        offset: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLeadingByte(byte) => {
                write!(f, "initial byte 0x{byte:02x} does not match a valid variable-length integer pattern")
            }
            Self::InvalidContinuationByte { byte, offset } => {
                write!(f, "illegal continuation byte 0x{byte:02x} at offset {offset} in variable-length integer")
            }
            Self::NonCanonicalEncoding { value, length, canonical } => {
                write!(f, "illegal representation of value {value} as {length} bytes (should be {canonical})")
            }
            Self::ValueOutOfRange(value) => {
                write!(f, "value {value} exceeds the 31-bit encodable range")
            }
            Self::BadMagic(bytes) => {
                write!(
                    f,
                    "initial bytes {bytes:02x?} don't match the BSAX magic byte pattern"
                )
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported BSAX version {version} (expected 1)")
            }
            Self::InvalidTableCapacity(capacity) => {
                write!(f, "string table capacity must be zero or at least 7, got {capacity}")
            }
            Self::UnknownOpcode(op) => write!(f, "unrecognized BSAX opcode {op}"),
            Self::AttributeOutsideStartElement => {
                write!(f, "cannot define an attribute outside a start-element operation")
            }
            Self::WrongOpcodeInAttributeLoop(op) => {
                write!(f, "illegal opcode {op} while reading attributes for start-element operation")
            }
            Self::ReservedIdRedefinition(id) => {
                write!(f, "cannot modify string table entry {id} (0 = absent, 1 = empty string)")
            }
            Self::StringIdOutOfBounds { id, capacity } => {
                write!(f, "string table entry {id} is beyond the fixed string table size of {capacity}")
            }
            Self::UnknownStringReference(id) => {
                write!(f, "illegal reference to string index {id} beyond the end of the string table")
            }
            Self::TableGrowthSkippedId { id, size } => {
                write!(f, "unlimited string table write to index {id} is more than one position past the end ({size} entries)")
            }
            Self::TruncatedStream { offset } => {
                write!(f, "unexpected end of stream at byte offset {offset}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_leading_byte_display() {
        let msg = Error::InvalidLeadingByte(0xFF).to_string();
        assert!(msg.contains("0xff"), "{msg}");
        assert!(msg.contains("initial byte"), "{msg}");
    }

    #[test]
    fn invalid_continuation_byte_display() {
        let msg = Error::InvalidContinuationByte { byte: 0x00, offset: 2 }.to_string();
        assert!(msg.contains("0x00"), "{msg}");
        assert!(msg.contains("offset 2"), "{msg}");
    }

    #[test]
    fn non_canonical_encoding_display() {
        let e = Error::NonCanonicalEncoding { value: 0, length: 2, canonical: 1 };
        let msg = e.to_string();
        assert!(msg.contains("value 0"), "{msg}");
        assert!(msg.contains("2 bytes"), "{msg}");
        assert!(msg.contains("should be 1"), "{msg}");
    }

    #[test]
    fn bad_magic_display() {
        let msg = Error::BadMagic(*b"EXIF").to_string();
        assert!(msg.contains("magic"), "{msg}");
    }

    #[test]
    fn unsupported_version_display() {
        let msg = Error::UnsupportedVersion(2).to_string();
        assert!(msg.contains("version 2"), "{msg}");
        assert!(msg.contains("expected 1"), "{msg}");
    }

    #[test]
    fn invalid_table_capacity_display() {
        let msg = Error::InvalidTableCapacity(3).to_string();
        assert!(msg.contains("got 3"), "{msg}");
        assert!(msg.contains("at least 7"), "{msg}");
    }

    #[test]
    fn reserved_id_display() {
        let msg = Error::ReservedIdRedefinition(1).to_string();
        assert!(msg.contains("entry 1"), "{msg}");
    }

    #[test]
    fn truncated_stream_display() {
        let msg = Error::TruncatedStream { offset: 17 }.to_string();
        assert!(msg.contains("offset 17"), "{msg}");
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::AttributeOutsideStartElement);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::UnknownOpcode(99);
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }

    #[test]
    fn result_type_alias_works() {
        let ok: Result<u32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);

        let err: Result<u32> = Err(Error::AttributeOutsideStartElement);
        assert!(err.is_err());
    }
}
