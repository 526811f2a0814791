//! Replays a BSAX stream as its original SAX event sequence.
//!
//! The decoder is a single-pass state machine over the byte stream: it
//! validates the frame header, then reads opcode records until end of
//! input. String definitions update the table as a side effect and produce
//! no event. Clean end of stream is only legal at a top-level opcode
//! boundary; anywhere else truncation is an error.

use std::rc::Rc;

use crate::bytestream::ByteReader;
use crate::event::{Attribute, ChContent, EpContent, NameTriple, NdContent, PiContent, PmContent,
    SaxEvent, SeContent, UeContent};
use crate::header;
use crate::opcode::Opcode;
use crate::string_table::{CapacityPolicy, StringTable};
use crate::{string, varint, Error, Result};

/// Receives decoded events one at a time.
///
/// A sink error aborts decoding and propagates out of [`Decoder::run`].
pub trait EventSink {
    /// Handles the next event of the stream.
    fn event(&mut self, event: SaxEvent) -> Result<()>;
}

impl EventSink for Vec<SaxEvent> {
    fn event(&mut self, event: SaxEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

// Vorab-Allokation der Attributliste wird gedeckelt, damit ein korruptes
// Count-Feld keine Riesen-Allokation auslösen kann.
const ATTRIBUTE_PREALLOC_CAP: usize = 64;

/// Single-pass BSAX decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    reader: ByteReader<'a>,
    table: StringTable,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over a complete in-memory stream.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(data),
            // Platzhalter bis der Header die echte Policy liefert
            table: StringTable::new(CapacityPolicy::Unlimited),
        }
    }

    /// Decodes the whole stream, delivering every event to `sink`.
    ///
    /// # Errors
    ///
    /// Any header, varint, string table or opcode violation aborts with
    /// the corresponding [`Error`]; no partial event is delivered for the
    /// record that failed.
    pub fn run<S: EventSink>(&mut self, sink: &mut S) -> Result<()> {
        let frame = header::decode(&mut self.reader)?;
        log::debug!("stream header: version {}, capacity {:?}", frame.version, frame.capacity);
        self.table = StringTable::new(frame.capacity);

        while !self.reader.is_at_end() {
            let raw = varint::decode(&mut self.reader)?;
            let Some(op) = Opcode::from_u32(raw) else {
                return Err(Error::UnknownOpcode(raw));
            };
            match op {
                Opcode::String => self.op_string()?,
                Opcode::Attribute => return Err(Error::AttributeOutsideStartElement),
                Opcode::StartDocument => sink.event(SaxEvent::StartDocument)?,
                Opcode::EndDocument => sink.event(SaxEvent::EndDocument)?,
                Opcode::StartElement => {
                    let event = self.op_start_element()?;
                    sink.event(event)?;
                }
                Opcode::EndElement => {
                    let name = self.read_name()?;
                    sink.event(SaxEvent::EndElement(name))?;
                }
                Opcode::Characters => {
                    let text = self.read_str()?;
                    sink.event(SaxEvent::Characters(ChContent { text }))?;
                }
                Opcode::IgnorableWhitespace => {
                    let text = self.read_str()?;
                    sink.event(SaxEvent::IgnorableWhitespace(ChContent { text }))?;
                }
                Opcode::SkippedEntity => {
                    let text = self.read_str()?;
                    sink.event(SaxEvent::SkippedEntity(ChContent { text }))?;
                }
                Opcode::StartPrefixMapping => {
                    let prefix = self.read_str()?;
                    let uri = self.read_str()?;
                    sink.event(SaxEvent::StartPrefixMapping(PmContent { prefix, uri }))?;
                }
                Opcode::EndPrefixMapping => {
                    let prefix = self.read_str()?;
                    sink.event(SaxEvent::EndPrefixMapping(EpContent { prefix }))?;
                }
                Opcode::ProcessingInstruction => {
                    let target = self.read_str()?;
                    let data = self.read_str()?;
                    sink.event(SaxEvent::ProcessingInstruction(PiContent { target, data }))?;
                }
                Opcode::NotationDecl => {
                    let name = self.read_str()?;
                    let public_id = self.read_str()?;
                    let system_id = self.read_str()?;
                    sink.event(SaxEvent::NotationDecl(NdContent { name, public_id, system_id }))?;
                }
                Opcode::UnparsedEntityDecl => {
                    let name = self.read_str()?;
                    let public_id = self.read_str()?;
                    let system_id = self.read_str()?;
                    let notation_name = self.read_str()?;
                    sink.event(SaxEvent::UnparsedEntityDecl(UeContent {
                        name,
                        public_id,
                        system_id,
                        notation_name,
                    }))?;
                }
            }
        }
        Ok(())
    }

    fn op_string(&mut self) -> Result<()> {
        let id = varint::decode(&mut self.reader)?;
        let value = string::decode(&mut self.reader)?;
        log::trace!("define string {id} ({} bytes)", value.len());
        self.table.define(id, Rc::from(value))
    }

    fn op_start_element(&mut self) -> Result<SaxEvent> {
        let name = self.read_name()?;
        let count = varint::decode(&mut self.reader)? as usize;
        let mut attributes = Vec::with_capacity(count.min(ATTRIBUTE_PREALLOC_CAP));
        for _ in 0..count {
            attributes.push(self.read_attribute()?);
        }
        Ok(SaxEvent::StartElement(SeContent { name, attributes }))
    }

    /// Reads the next attribute record, replaying any string definitions
    /// interleaved before it. Only opcodes 0 and 4 are legal here.
    fn read_attribute(&mut self) -> Result<Attribute> {
        loop {
            let raw = varint::decode(&mut self.reader)?;
            match Opcode::from_u32(raw) {
                Some(Opcode::String) => self.op_string()?,
                Some(Opcode::Attribute) => {
                    let name = self.read_name()?;
                    let attr_type = self.read_str()?;
                    let value = self.read_str()?;
                    return Ok(Attribute { name, attr_type, value });
                }
                _ => return Err(Error::WrongOpcodeInAttributeLoop(raw)),
            }
        }
    }

    fn read_name(&mut self) -> Result<NameTriple> {
        Ok(NameTriple {
            uri: self.read_str()?,
            local_name: self.read_str()?,
            qname: self.read_str()?,
        })
    }

    fn read_str(&mut self) -> Result<Option<Rc<str>>> {
        let id = varint::decode(&mut self.reader)?;
        self.table.resolve(id)
    }
}

/// Decodes a complete stream into an event vector.
pub fn decode(data: &[u8]) -> Result<Vec<SaxEvent>> {
    let mut events = Vec::new();
    decode_to(data, &mut events)?;
    Ok(events)
}

/// Decodes a complete stream into the given sink.
pub fn decode_to<S: EventSink>(data: &[u8], sink: &mut S) -> Result<()> {
    Decoder::new(data).run(sink)
}
