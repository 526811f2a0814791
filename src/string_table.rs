//! String table: the per-stream id↔string dictionary.
//!
//! Ids 0 (absent string) and 1 (empty string) are permanently reserved and
//! never appear as definition records. The writer side interns strings and
//! assigns ids ([`StringInterner`]), the reader side replays definitions
//! ([`StringTable::define`]) and resolves references
//! ([`StringTable::resolve`]). Both directions validate against the same
//! [`CapacityPolicy`].
//!
//! Lifecycle: one table per stream, owned by its encoder or decoder
//! instance, never shared across streams.

use std::rc::Rc;

use crate::FastHashMap;
use crate::{Error, Result};

/// Reserved id for the absent (null) string.
pub const NULL_STRING_ID: u32 = 0;

/// Reserved id for the empty string.
pub const EMPTY_STRING_ID: u32 = 1;

/// First id available for interned strings.
pub const FIRST_FREE_STRING_ID: u32 = 2;

/// Sizing policy of a stream's string table, carried in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// The table grows without bound, one id per definition.
    Unlimited,
    /// Ids 0..n-1 are addressable; definitions may arrive in any order
    /// within range. A producer can reuse entries to keep the reader's
    /// table small; sieben Einträge reichen im Extremfall (5 Operanden
    /// des Attribut-Opcodes plus die zwei reservierten IDs).
    Bounded(u32),
}

impl CapacityPolicy {
    /// Smallest legal bounded capacity.
    pub const MINIMUM_BOUNDED: u32 = 7;

    /// Header wire value: 0 for unlimited, the capacity otherwise.
    pub fn wire_value(self) -> u32 {
        match self {
            Self::Unlimited => 0,
            Self::Bounded(capacity) => capacity,
        }
    }

    /// Parses the header capacity field.
    ///
    /// Returns [`Error::InvalidTableCapacity`] for values in 1..7.
    pub fn from_wire(raw: u32) -> Result<Self> {
        if raw == 0 {
            Ok(Self::Unlimited)
        } else if raw >= Self::MINIMUM_BOUNDED {
            Ok(Self::Bounded(raw))
        } else {
            Err(Error::InvalidTableCapacity(raw))
        }
    }
}

/// Reader-side id→string table.
///
/// Under `Bounded(n)` a definition may target any free or occupied id in
/// range; skipped intermediate ids hold the absent string until defined.
/// Under `Unlimited` a definition may only append at the current end or
/// overwrite an existing entry.
#[derive(Debug, Clone)]
pub struct StringTable {
    entries: Vec<Option<Rc<str>>>,
    policy: CapacityPolicy,
}

impl StringTable {
    /// Creates a table with the two reserved entries pre-populated.
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            entries: vec![None, Some(Rc::from(""))],
            policy,
        }
    }

    /// Current number of entries, including the reserved ones and any
    /// absent placeholders.
    pub fn size(&self) -> u32 {
        self.entries.len() as u32
    }

    /// The table's sizing policy.
    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Replays a string definition record.
    ///
    /// # Errors
    ///
    /// - [`Error::ReservedIdRedefinition`] for ids 0 and 1
    /// - [`Error::StringIdOutOfBounds`] for ids past a bounded capacity
    /// - [`Error::TableGrowthSkippedId`] when an unlimited table would
    ///   have to skip an id
    pub fn define(&mut self, id: u32, value: Rc<str>) -> Result<()> {
        if id < FIRST_FREE_STRING_ID {
            return Err(Error::ReservedIdRedefinition(id));
        }

        match self.policy {
            CapacityPolicy::Bounded(capacity) => {
                if id >= capacity {
                    return Err(Error::StringIdOutOfBounds { id, capacity });
                }
                let index = id as usize;
                if index >= self.entries.len() {
                    // Lücken bis zur Ziel-ID mit Absent-Platzhaltern füllen
                    self.entries.resize(index + 1, None);
                }
                self.entries[index] = Some(value);
            }
            CapacityPolicy::Unlimited => {
                let size = self.entries.len() as u32;
                if id < size {
                    self.entries[id as usize] = Some(value);
                } else if id == size {
                    self.entries.push(Some(value));
                } else {
                    return Err(Error::TableGrowthSkippedId { id, size });
                }
            }
        }

        Ok(())
    }

    /// Resolves a string reference to its value.
    ///
    /// Id 0 is always the absent string, id 1 always the empty string. A
    /// defined-then-gapped bounded entry resolves to absent.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownStringReference`] for ids past the bounded capacity
    /// or past the current table end.
    pub fn resolve(&self, id: u32) -> Result<Option<Rc<str>>> {
        if id == NULL_STRING_ID {
            return Ok(None);
        }
        if id == EMPTY_STRING_ID {
            return Ok(Some(Rc::from("")));
        }
        if let CapacityPolicy::Bounded(capacity) = self.policy {
            if id >= capacity {
                return Err(Error::UnknownStringReference(id));
            }
        }
        let index = id as usize;
        if index >= self.entries.len() {
            return Err(Error::UnknownStringReference(id));
        }
        Ok(self.entries[index].clone())
    }
}

/// Outcome of interning a string on the writer side.
///
/// On a miss the caller must emit a definition record for the returned id
/// before the event that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternResult {
    /// The string already has an id (or is one of the reserved values).
    Hit(u32),
    /// The string was assigned a fresh id; a definition must be written.
    Miss(u32),
}

impl InternResult {
    /// The id regardless of hit or miss.
    pub fn id(self) -> u32 {
        match self {
            Self::Hit(id) | Self::Miss(id) => id,
        }
    }
}

/// Writer-side string→id interner.
///
/// Owns its counter and map exclusively; nothing here is process-wide, so
/// independent encoder instances can never corrupt each other's numbering.
#[derive(Debug)]
pub struct StringInterner {
    ids: FastHashMap<Rc<str>, u32>,
    next_id: u32,
    policy: Option<u32>,
}

impl StringInterner {
    /// Creates an interner for the given policy.
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            ids: FastHashMap::default(),
            next_id: FIRST_FREE_STRING_ID,
            policy: match policy {
                CapacityPolicy::Unlimited => None,
                CapacityPolicy::Bounded(capacity) => Some(capacity),
            },
        }
    }

    /// Looks up or assigns the id for a string value.
    ///
    /// Absent maps to id 0, empty to id 1; both are hits without table
    /// entries. Fresh strings get sequential ids from 2 upward.
    ///
    /// # Errors
    ///
    /// [`Error::StringIdOutOfBounds`] when a fresh id would exceed a
    /// bounded capacity.
    pub fn intern(&mut self, value: Option<&str>) -> Result<InternResult> {
        let Some(value) = value else {
            return Ok(InternResult::Hit(NULL_STRING_ID));
        };
        if value.is_empty() {
            return Ok(InternResult::Hit(EMPTY_STRING_ID));
        }
        if let Some(&id) = self.ids.get(value) {
            return Ok(InternResult::Hit(id));
        }

        if let Some(capacity) = self.policy {
            if self.next_id >= capacity {
                return Err(Error::StringIdOutOfBounds { id: self.next_id, capacity });
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(Rc::from(value), id);
        Ok(InternResult::Miss(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc(value: &str) -> Rc<str> {
        Rc::from(value)
    }

    // --- CapacityPolicy ---

    #[test]
    fn capacity_wire_round_trip() {
        assert_eq!(CapacityPolicy::from_wire(0).unwrap(), CapacityPolicy::Unlimited);
        assert_eq!(CapacityPolicy::from_wire(7).unwrap(), CapacityPolicy::Bounded(7));
        assert_eq!(CapacityPolicy::Bounded(100).wire_value(), 100);
        assert_eq!(CapacityPolicy::Unlimited.wire_value(), 0);
    }

    #[test]
    fn capacity_floor_is_seven() {
        for raw in 1..7 {
            assert_eq!(
                CapacityPolicy::from_wire(raw).unwrap_err(),
                Error::InvalidTableCapacity(raw)
            );
        }
    }

    // --- StringTable ---

    #[test]
    fn reserved_entries_are_pre_populated() {
        let table = StringTable::new(CapacityPolicy::Unlimited);
        assert_eq!(table.size(), 2);
        assert_eq!(table.resolve(NULL_STRING_ID).unwrap(), None);
        assert_eq!(table.resolve(EMPTY_STRING_ID).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn reserved_ids_cannot_be_redefined() {
        for policy in [CapacityPolicy::Unlimited, CapacityPolicy::Bounded(7)] {
            let mut table = StringTable::new(policy);
            assert_eq!(
                table.define(0, rc("x")).unwrap_err(),
                Error::ReservedIdRedefinition(0)
            );
            assert_eq!(
                table.define(1, rc("x")).unwrap_err(),
                Error::ReservedIdRedefinition(1)
            );
        }
    }

    #[test]
    fn unlimited_sequential_growth() {
        let mut table = StringTable::new(CapacityPolicy::Unlimited);
        table.define(2, rc("a")).unwrap();
        table.define(3, rc("b")).unwrap();
        assert_eq!(table.size(), 4);
        assert_eq!(table.resolve(2).unwrap().as_deref(), Some("a"));
        assert_eq!(table.resolve(3).unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn unlimited_overwrite_existing() {
        let mut table = StringTable::new(CapacityPolicy::Unlimited);
        table.define(2, rc("a")).unwrap();
        table.define(2, rc("z")).unwrap();
        assert_eq!(table.size(), 3);
        assert_eq!(table.resolve(2).unwrap().as_deref(), Some("z"));
    }

    #[test]
    fn unlimited_rejects_skipped_id() {
        let mut table = StringTable::new(CapacityPolicy::Unlimited);
        table.define(2, rc("a")).unwrap();
        // Tabellengröße 3, ID 5 liegt mehr als eine Position hinter dem Ende
        assert_eq!(
            table.define(5, rc("x")).unwrap_err(),
            Error::TableGrowthSkippedId { id: 5, size: 3 }
        );
    }

    #[test]
    fn bounded_allows_out_of_order_definitions() {
        let mut table = StringTable::new(CapacityPolicy::Bounded(7));
        table.define(5, rc("later")).unwrap();
        table.define(2, rc("earlier")).unwrap();
        assert_eq!(table.resolve(5).unwrap().as_deref(), Some("later"));
        assert_eq!(table.resolve(2).unwrap().as_deref(), Some("earlier"));
    }

    // Dokumentiert die Asymmetrie zur Unlimited-Policy: Lücken innerhalb
    // der Kapazität werden mit Absent-Platzhaltern gefüllt und lösen zu
    // Absent auf statt zu einem Fehler.
    #[test]
    fn bounded_gap_resolves_to_absent() {
        let mut table = StringTable::new(CapacityPolicy::Bounded(7));
        table.define(4, rc("x")).unwrap();
        assert_eq!(table.resolve(3).unwrap(), None);
        assert_eq!(table.resolve(4).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn bounded_rejects_id_at_capacity() {
        let mut table = StringTable::new(CapacityPolicy::Bounded(7));
        assert_eq!(
            table.define(7, rc("x")).unwrap_err(),
            Error::StringIdOutOfBounds { id: 7, capacity: 7 }
        );
        table.define(6, rc("ok")).unwrap();
    }

    #[test]
    fn resolve_rejects_unknown_references() {
        let table = StringTable::new(CapacityPolicy::Unlimited);
        assert_eq!(
            table.resolve(2).unwrap_err(),
            Error::UnknownStringReference(2)
        );

        let bounded = StringTable::new(CapacityPolicy::Bounded(7));
        assert_eq!(
            bounded.resolve(9).unwrap_err(),
            Error::UnknownStringReference(9)
        );
    }

    // --- StringInterner ---

    #[test]
    fn intern_reserved_values() {
        let mut interner = StringInterner::new(CapacityPolicy::Unlimited);
        assert_eq!(interner.intern(None).unwrap(), InternResult::Hit(NULL_STRING_ID));
        assert_eq!(interner.intern(Some("")).unwrap(), InternResult::Hit(EMPTY_STRING_ID));
    }

    #[test]
    fn intern_assigns_sequential_ids() {
        let mut interner = StringInterner::new(CapacityPolicy::Unlimited);
        assert_eq!(interner.intern(Some("a")).unwrap(), InternResult::Miss(2));
        assert_eq!(interner.intern(Some("b")).unwrap(), InternResult::Miss(3));
        assert_eq!(interner.intern(Some("a")).unwrap(), InternResult::Hit(2));
    }

    #[test]
    fn intern_is_instance_scoped() {
        // Zwei unabhängige Encoder-Instanzen nummerieren identisch
        let mut first = StringInterner::new(CapacityPolicy::Unlimited);
        let mut second = StringInterner::new(CapacityPolicy::Unlimited);
        assert_eq!(first.intern(Some("x")).unwrap(), InternResult::Miss(2));
        assert_eq!(second.intern(Some("y")).unwrap(), InternResult::Miss(2));
    }

    #[test]
    fn intern_bounded_ceiling() {
        let mut interner = StringInterner::new(CapacityPolicy::Bounded(7));
        for (i, value) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            assert_eq!(
                interner.intern(Some(value)).unwrap(),
                InternResult::Miss(2 + i as u32)
            );
        }
        assert_eq!(
            interner.intern(Some("f")).unwrap_err(),
            Error::StringIdOutOfBounds { id: 7, capacity: 7 }
        );
        // Bereits internierte Werte bleiben erreichbar
        assert_eq!(interner.intern(Some("a")).unwrap(), InternResult::Hit(2));
    }

    #[test]
    fn intern_result_id_accessor() {
        assert_eq!(InternResult::Hit(5).id(), 5);
        assert_eq!(InternResult::Miss(9).id(), 9);
    }
}
