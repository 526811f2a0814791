//! Serializes a stream of SAX events into BSAX wire bytes.
//!
//! The encoder interns every string operand through its own
//! [`StringInterner`] and emits a definition record the first time a value
//! appears. Definitions for an operation's operands always precede the
//! operation's opcode, except inside a start-element attribute loop where
//! they are interleaved with the attribute records (the decoder accepts
//! them there transparently).

use crate::bytestream::ByteWriter;
use crate::event::{Attribute, NameTriple, SaxEvent};
use crate::header::{self, FrameHeader};
use crate::opcode::Opcode;
use crate::string_table::{CapacityPolicy, InternResult, StringInterner};
use crate::{string, varint, Result};

/// Streaming BSAX encoder.
///
/// Events are written one at a time with [`write_event`]; the frame header
/// is emitted lazily before the first event. [`finish`] yields the
/// accumulated bytes.
///
/// [`write_event`]: Encoder::write_event
/// [`finish`]: Encoder::finish
#[derive(Debug)]
pub struct Encoder {
    writer: ByteWriter,
    interner: StringInterner,
    capacity: CapacityPolicy,
    started: bool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates an encoder with an unlimited string table.
    pub fn new() -> Self {
        Self::with_capacity(CapacityPolicy::Unlimited)
    }

    /// Creates an encoder with the given string table policy.
    pub fn with_capacity(capacity: CapacityPolicy) -> Self {
        Self {
            writer: ByteWriter::new(),
            interner: StringInterner::new(capacity),
            capacity,
            started: false,
        }
    }

    /// Appends one event to the stream.
    ///
    /// # Errors
    ///
    /// [`crate::Error::StringIdOutOfBounds`] when a bounded table runs out
    /// of ids for a fresh string.
    pub fn write_event(&mut self, event: &SaxEvent) -> Result<()> {
        self.ensure_started()?;
        match event {
            SaxEvent::StartDocument => self.write_opcode(Opcode::StartDocument),
            SaxEvent::EndDocument => self.write_opcode(Opcode::EndDocument),
            SaxEvent::StartElement(se) => {
                let name = self.intern_name(&se.name)?;
                self.write_opcode(Opcode::StartElement)?;
                self.write_ids(&name)?;
                varint::encode(&mut self.writer, se.attributes.len() as u32)?;
                for attribute in &se.attributes {
                    self.write_attribute(attribute)?;
                }
                Ok(())
            }
            SaxEvent::EndElement(name) => {
                let name = self.intern_name(name)?;
                self.write_opcode(Opcode::EndElement)?;
                self.write_ids(&name)
            }
            SaxEvent::Characters(ch) => {
                self.write_string_op(Opcode::Characters, ch.text.as_deref())
            }
            SaxEvent::IgnorableWhitespace(ch) => {
                self.write_string_op(Opcode::IgnorableWhitespace, ch.text.as_deref())
            }
            SaxEvent::SkippedEntity(ch) => {
                self.write_string_op(Opcode::SkippedEntity, ch.text.as_deref())
            }
            SaxEvent::StartPrefixMapping(pm) => {
                let ids = [
                    self.intern(pm.prefix.as_deref())?,
                    self.intern(pm.uri.as_deref())?,
                ];
                self.write_opcode(Opcode::StartPrefixMapping)?;
                self.write_ids(&ids)
            }
            SaxEvent::EndPrefixMapping(ep) => {
                self.write_string_op(Opcode::EndPrefixMapping, ep.prefix.as_deref())
            }
            SaxEvent::ProcessingInstruction(pi) => {
                let ids = [
                    self.intern(pi.target.as_deref())?,
                    self.intern(pi.data.as_deref())?,
                ];
                self.write_opcode(Opcode::ProcessingInstruction)?;
                self.write_ids(&ids)
            }
            SaxEvent::NotationDecl(nd) => {
                let ids = [
                    self.intern(nd.name.as_deref())?,
                    self.intern(nd.public_id.as_deref())?,
                    self.intern(nd.system_id.as_deref())?,
                ];
                self.write_opcode(Opcode::NotationDecl)?;
                self.write_ids(&ids)
            }
            SaxEvent::UnparsedEntityDecl(ue) => {
                let ids = [
                    self.intern(ue.name.as_deref())?,
                    self.intern(ue.public_id.as_deref())?,
                    self.intern(ue.system_id.as_deref())?,
                    self.intern(ue.notation_name.as_deref())?,
                ];
                self.write_opcode(Opcode::UnparsedEntityDecl)?;
                self.write_ids(&ids)
            }
        }
    }

    /// Finishes the stream and returns its bytes.
    ///
    /// An empty event sequence still yields a valid stream consisting of
    /// just the frame header.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.ensure_started()?;
        Ok(self.writer.into_vec())
    }

    fn ensure_started(&mut self) -> Result<()> {
        if !self.started {
            let frame = FrameHeader::new(self.capacity);
            header::encode(&mut self.writer, &frame)?;
            self.started = true;
        }
        Ok(())
    }

    fn write_opcode(&mut self, op: Opcode) -> Result<()> {
        varint::encode(&mut self.writer, op.as_u32())
    }

    fn write_ids(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            varint::encode(&mut self.writer, id)?;
        }
        Ok(())
    }

    /// Interns a value, emitting a string definition record on a miss.
    fn intern(&mut self, value: Option<&str>) -> Result<u32> {
        match self.interner.intern(value)? {
            InternResult::Hit(id) => Ok(id),
            InternResult::Miss(id) => {
                let text = value.unwrap_or_default();
                log::trace!("define string {id} ({} bytes)", text.len());
                self.write_opcode(Opcode::String)?;
                varint::encode(&mut self.writer, id)?;
                string::encode(&mut self.writer, text)?;
                Ok(id)
            }
        }
    }

    fn intern_name(&mut self, name: &NameTriple) -> Result<[u32; 3]> {
        Ok([
            self.intern(name.uri.as_deref())?,
            self.intern(name.local_name.as_deref())?,
            self.intern(name.qname.as_deref())?,
        ])
    }

    fn write_string_op(&mut self, op: Opcode, value: Option<&str>) -> Result<()> {
        let id = self.intern(value)?;
        self.write_opcode(op)?;
        varint::encode(&mut self.writer, id)
    }

    fn write_attribute(&mut self, attribute: &Attribute) -> Result<()> {
        let ids = [
            self.intern(attribute.name.uri.as_deref())?,
            self.intern(attribute.name.local_name.as_deref())?,
            self.intern(attribute.name.qname.as_deref())?,
            self.intern(attribute.attr_type.as_deref())?,
            self.intern(attribute.value.as_deref())?,
        ];
        self.write_opcode(Opcode::Attribute)?;
        self.write_ids(&ids)
    }
}

/// Encodes a complete event sequence with an unlimited string table.
pub fn encode(events: &[SaxEvent]) -> Result<Vec<u8>> {
    encode_with_capacity(events, CapacityPolicy::Unlimited)
}

/// Encodes a complete event sequence with the given table policy.
pub fn encode_with_capacity(events: &[SaxEvent], capacity: CapacityPolicy) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_capacity(capacity);
    for event in events {
        encoder.write_event(event)?;
    }
    encoder.finish()
}
