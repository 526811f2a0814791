//! The SAX document event model carried by a BSAX stream.
//!
//! Events mirror the push-style callbacks of a streaming XML parser. Every
//! string-valued field is `Option<Rc<str>>`: `None` is the absent string
//! (string table id 0), `Some("")` the empty string (id 1). Events are
//! transient: produced one at a time, consumed one at a time, never
//! buffered as a whole document by the codec itself.

use std::rc::Rc;

/// The (uri, localName, qName) identity triple of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameTriple {
    /// Namespace URI (absent when no namespace processing was done).
    pub uri: Option<Rc<str>>,
    /// Local name.
    pub local_name: Option<Rc<str>>,
    /// Qualified name (prefix:local).
    pub qname: Option<Rc<str>>,
}

impl NameTriple {
    /// Builds a triple from present string values.
    pub fn new(uri: &str, local_name: &str, qname: &str) -> Self {
        Self {
            uri: Some(uri.into()),
            local_name: Some(local_name.into()),
            qname: Some(qname.into()),
        }
    }
}

/// One attribute of a start-element event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attribute {
    /// Identity triple of the attribute.
    pub name: NameTriple,
    /// Attribute type as reported by the parser ("CDATA", "ID", ...).
    pub attr_type: Option<Rc<str>>,
    /// Attribute value.
    pub value: Option<Rc<str>>,
}

/// Content of a start-element event: identity plus the ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeContent {
    /// Identity triple of the element.
    pub name: NameTriple,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
}

/// Content of a characters or ignorable-whitespace event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChContent {
    /// The character data.
    pub text: Option<Rc<str>>,
}

impl ChContent {
    /// Builds character content from a present string.
    pub fn new(text: &str) -> Self {
        Self { text: Some(text.into()) }
    }
}

/// Content of a start-prefix-mapping event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PmContent {
    /// The declared prefix (empty for the default namespace).
    pub prefix: Option<Rc<str>>,
    /// The URI the prefix is bound to.
    pub uri: Option<Rc<str>>,
}

/// Content of an end-prefix-mapping event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpContent {
    /// The prefix going out of scope.
    pub prefix: Option<Rc<str>>,
}

/// Content of a processing-instruction event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PiContent {
    /// The PI target.
    pub target: Option<Rc<str>>,
    /// The PI data.
    pub data: Option<Rc<str>>,
}

/// Content of a notation-declaration event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdContent {
    /// The notation name.
    pub name: Option<Rc<str>>,
    /// The public identifier.
    pub public_id: Option<Rc<str>>,
    /// The system identifier.
    pub system_id: Option<Rc<str>>,
}

/// Content of an unparsed-entity-declaration event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UeContent {
    /// The entity name.
    pub name: Option<Rc<str>>,
    /// The public identifier.
    pub public_id: Option<Rc<str>>,
    /// The system identifier.
    pub system_id: Option<Rc<str>>,
    /// The associated notation name.
    pub notation_name: Option<Rc<str>>,
}

/// One document event, in the order a streaming parser delivers them.
///
/// A well-formed sequence has exactly one `StartDocument` before and one
/// `EndDocument` after all other events, with every `StartElement`
/// eventually paired with an `EndElement` and every `StartPrefixMapping`
/// with an `EndPrefixMapping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaxEvent {
    /// Beginning of the document.
    StartDocument,
    /// End of the document.
    EndDocument,
    /// An element opens, with its complete attribute list.
    StartElement(SeContent),
    /// An element closes.
    EndElement(NameTriple),
    /// Character data.
    Characters(ChContent),
    /// Whitespace the parser deemed ignorable.
    IgnorableWhitespace(ChContent),
    /// A namespace prefix comes into scope.
    StartPrefixMapping(PmContent),
    /// A namespace prefix goes out of scope (only the prefix is carried).
    EndPrefixMapping(EpContent),
    /// A processing instruction.
    ProcessingInstruction(PiContent),
    /// An entity the parser skipped.
    SkippedEntity(ChContent),
    /// A notation declaration from the DTD.
    NotationDecl(NdContent),
    /// An unparsed entity declaration from the DTD.
    UnparsedEntityDecl(UeContent),
}
