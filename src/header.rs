//! The BSAX frame header: magic bytes, format version, table capacity.
//!
//! Every stream starts with the four ASCII bytes "BSAX", a varint format
//! version and the varint capacity of the string table. Nothing after the
//! header is readable without it, so [`decode`] validates all three fields
//! before the opcode loop starts.

use crate::bytestream::{ByteReader, ByteWriter};
use crate::string_table::CapacityPolicy;
use crate::{varint, Error, Result};

/// Stream signature, the ASCII bytes "BSAX".
pub const MAGIC: [u8; 4] = [0x42, 0x53, 0x41, 0x58];

/// The only format version this implementation reads and writes.
pub const VERSION: u32 = 1;

/// Decoded frame header of a BSAX stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Format version, always [`VERSION`] for streams we accept.
    pub version: u32,
    /// String table sizing policy.
    pub capacity: CapacityPolicy,
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self {
            version: VERSION,
            capacity: CapacityPolicy::Unlimited,
        }
    }
}

impl FrameHeader {
    /// Header for the given table policy at the current format version.
    pub fn new(capacity: CapacityPolicy) -> Self {
        Self { version: VERSION, capacity }
    }
}

/// Writes a frame header.
pub fn encode(writer: &mut ByteWriter, header: &FrameHeader) -> Result<()> {
    writer.write_bytes(&MAGIC);
    varint::encode(writer, header.version)?;
    varint::encode(writer, header.capacity.wire_value())?;
    Ok(())
}

/// Reads and validates a frame header.
///
/// # Errors
///
/// - [`Error::BadMagic`] when the signature bytes do not match
/// - [`Error::UnsupportedVersion`] for any version other than 1
/// - [`Error::InvalidTableCapacity`] for capacities in 1..7
/// - [`Error::TruncatedStream`] when the header is cut short
pub fn decode(reader: &mut ByteReader<'_>) -> Result<FrameHeader> {
    let magic = reader.read_bytes(MAGIC.len())?;
    if magic != MAGIC {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(Error::BadMagic(found));
    }

    let version = varint::decode(reader)?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let capacity = CapacityPolicy::from_wire(varint::decode(reader)?)?;
    Ok(FrameHeader { version, capacity })
}
