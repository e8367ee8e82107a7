//! Primitive type vocabulary.
//!
//! ## Examples
//! ```rust
//! use lexy_core::lang::types::{self, PrimitiveTypeId};
//!
//! assert_eq!(types::from_str("number"), Some(PrimitiveTypeId::Number));
//! assert_eq!(types::as_str(PrimitiveTypeId::Date), "date");
//! ```

/// Stable identifier for every primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeId {
    Number,
    String,
    Boolean,
    Date,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveTypeInfo {
    pub id: PrimitiveTypeId,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// Registry of primitive types.
pub const PRIMITIVE_TYPES: &[PrimitiveTypeInfo] = &[
    PrimitiveTypeInfo {
        id: PrimitiveTypeId::Number,
        canonical: "number",
        description: "decimal number",
    },
    PrimitiveTypeInfo {
        id: PrimitiveTypeId::String,
        canonical: "string",
        description: "text value",
    },
    PrimitiveTypeInfo {
        id: PrimitiveTypeId::Boolean,
        canonical: "boolean",
        description: "true or false",
    },
    PrimitiveTypeInfo {
        id: PrimitiveTypeId::Date,
        canonical: "date",
        description: "date and time of day",
    },
];

/// Resolve a spelling to a primitive type id.
pub fn from_str(name: &str) -> Option<PrimitiveTypeId> {
    PRIMITIVE_TYPES.iter().find(|t| t.canonical == name).map(|t| t.id)
}

/// Canonical spelling of a primitive type.
pub fn as_str(id: PrimitiveTypeId) -> &'static str {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.canonical)
        .expect("INVARIANT: every PrimitiveTypeId has a registry entry")
}
