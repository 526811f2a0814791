//! BSAX: a binary serialization of SAX document event streams.
//!
//! A BSAX stream carries the exact event sequence a streaming XML parser
//! delivers for a document, encoded as a compact opcode stream with an
//! interned string table. Every string operand is stored once and
//! referenced by id afterwards; integers use a canonical extended-UTF-8
//! variable-length encoding covering the 31-bit unsigned range.
//!
//! Encoding and decoding are exact inverses: the decoder replays the
//! identical event sequence the encoder consumed, and rejects every form
//! of corruption it can detect (bad header, overlong varints, unknown
//! opcodes, dangling string references, truncation).
//!
//! ```
//! use bsax::{decode, encode, ChContent, SaxEvent};
//!
//! let events = vec![
//!     SaxEvent::StartDocument,
//!     SaxEvent::Characters(ChContent::new("hello")),
//!     SaxEvent::EndDocument,
//! ];
//! let bytes = encode(&events)?;
//! assert_eq!(decode(&bytes)?, events);
//! # Ok::<(), bsax::Error>(())
//! ```

pub mod bytestream;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod event;
pub mod header;
pub mod opcode;
pub mod string;
pub mod string_table;
pub mod varint;

pub use decoder::{decode, decode_to, Decoder, EventSink};
pub use encoder::{encode, encode_with_capacity, Encoder};
pub use error::{Error, Result};
pub use event::{
    Attribute, ChContent, EpContent, NameTriple, NdContent, PiContent, PmContent, SaxEvent,
    SeContent, UeContent,
};
pub use header::{FrameHeader, MAGIC, VERSION};
pub use opcode::Opcode;
pub use string_table::{CapacityPolicy, StringInterner, StringTable};

/// Hash map used throughout the crate.
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;
