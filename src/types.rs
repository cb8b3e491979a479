/// Numeric identifier assigned to a registered entity class
pub type ClassId = u16;
/// Opaque transport-layer filter identifier, carried through verbatim
pub type FilterId = u64;
/// Foreign identifier of a live entity, as stored in an entity-reference slot
pub type EntityId = u16;
/// Identifier of a remote call within one namespace
pub type RemoteCallId = u8;
/// Identifier routing a change notification to a registered callback
pub type NotifyId = u8;

/// Remote-call ids travel in a single byte, with the top value reserved as
/// the unassigned sentinel. A namespace therefore holds at most 254 calls.
pub const MAX_REMOTE_CALLS: usize = 254;

/// Slot count of a remote-call handler table (one slot per representable id)
pub const REMOTE_CALL_TABLE_SIZE: usize = 255;

/// Byte size of an entity-reference slot (a foreign [`EntityId`])
pub const ENTITY_REF_SIZE: usize = 2;
