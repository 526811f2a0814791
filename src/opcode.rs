//! The closed BSAX opcode enumeration.
//!
//! Each record in the stream starts with one of these codes as a varint.
//! [`Opcode::Attribute`] is only legal inside the attribute loop of a
//! start-element operation.

/// Operation codes of the BSAX stream, with their operand lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    /// String definition: id + length-prefixed UTF-8 payload.
    String = 0,
    /// Start of document, no operands.
    StartDocument = 1,
    /// End of document, no operands.
    EndDocument = 2,
    /// Start element: uri, localName, qName, attribute count
    /// (each attribute follows as an [`Opcode::Attribute`] record).
    StartElement = 3,
    /// Attribute: uri, localName, qName, type, value.
    Attribute = 4,
    /// End element: uri, localName, qName.
    EndElement = 5,
    /// Character data: one string reference.
    Characters = 6,
    /// Ignorable whitespace: one string reference.
    IgnorableWhitespace = 7,
    /// Start prefix mapping: prefix, uri.
    StartPrefixMapping = 8,
    /// End prefix mapping: prefix.
    EndPrefixMapping = 9,
    /// Notation declaration: name, publicId, systemId.
    NotationDecl = 10,
    /// Processing instruction: target, data.
    ProcessingInstruction = 11,
    /// Skipped entity: name.
    SkippedEntity = 12,
    /// Unparsed entity declaration: name, publicId, systemId, notationName.
    UnparsedEntityDecl = 13,
}

impl Opcode {
    /// Maps a raw opcode value to its variant; `None` for anything
    /// outside 0..=13.
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::String,
            1 => Self::StartDocument,
            2 => Self::EndDocument,
            3 => Self::StartElement,
            4 => Self::Attribute,
            5 => Self::EndElement,
            6 => Self::Characters,
            7 => Self::IgnorableWhitespace,
            8 => Self::StartPrefixMapping,
            9 => Self::EndPrefixMapping,
            10 => Self::NotationDecl,
            11 => Self::ProcessingInstruction,
            12 => Self::SkippedEntity,
            13 => Self::UnparsedEntityDecl,
            _ => return None,
        })
    }

    /// The raw wire value.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}
