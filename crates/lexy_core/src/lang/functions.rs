//! Built-in function vocabulary.
//!
//! Lexy distinguishes three families of built-in callees:
//!
//! - **System functions** (`new`, `fill`, `extract`) operate on whole objects and are parsed into dedicated
//!   expression variants.
//! - **Table functions** (`lookUp`, `lookUpBy`, `lookUpRow`, `lookUpRowBy`) are bound to a table and have a fixed
//!   argument shape that the parser enforces.
//! - **Library functions** (`abs`, `round`, `year`, ...) have primitive signatures and are resolved at validation
//!   time when no user function with the same name exists.
//!
//! ## Examples
//! ```rust
//! use lexy_core::lang::functions::{self, TableFunctionId};
//!
//! assert_eq!(functions::table_function_from_str("lookUp"), Some(TableFunctionId::LookUp));
//! assert_eq!(functions::table_function_info(TableFunctionId::LookUp).arity, 4);
//! ```

use super::types::PrimitiveTypeId;

/// Stable identifier for object-level system functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemFunctionId {
    New,
    Fill,
    Extract,
}

/// Metadata for a system function.
#[derive(Debug, Clone, Copy)]
pub struct SystemFunctionInfo {
    pub id: SystemFunctionId,
    pub canonical: &'static str,
    pub usage: &'static str,
}

/// Registry of system functions.
pub const SYSTEM_FUNCTIONS: &[SystemFunctionInfo] = &[
    SystemFunctionInfo {
        id: SystemFunctionId::New,
        canonical: "new",
        usage: "new(Type)",
    },
    SystemFunctionInfo {
        id: SystemFunctionId::Fill,
        canonical: "fill",
        usage: "fill(Type)",
    },
    SystemFunctionInfo {
        id: SystemFunctionId::Extract,
        canonical: "extract",
        usage: "extract(variable)",
    },
];

/// Stable identifier for table-bound functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFunctionId {
    LookUp,
    LookUpBy,
    LookUpRow,
    LookUpRowBy,
}

/// Metadata for a table function.
#[derive(Debug, Clone, Copy)]
pub struct TableFunctionInfo {
    pub id: TableFunctionId,
    pub canonical: &'static str,
    /// Exact number of arguments, the table name included.
    pub arity: usize,
    /// Human readable shape used in "wrong arguments" diagnostics.
    pub usage: &'static str,
    /// `true` when the result is a whole row instead of a single column value.
    pub returns_row: bool,
    /// `true` when the lookup narrows by a discriminator column first.
    pub has_discriminator: bool,
}

/// Registry of table functions.
pub const TABLE_FUNCTIONS: &[TableFunctionInfo] = &[
    TableFunctionInfo {
        id: TableFunctionId::LookUp,
        canonical: "lookUp",
        arity: 4,
        usage: "lookUp(Table, value, Table.SearchColumn, Table.ResultColumn)",
        returns_row: false,
        has_discriminator: false,
    },
    TableFunctionInfo {
        id: TableFunctionId::LookUpBy,
        canonical: "lookUpBy",
        arity: 6,
        usage: "lookUpBy(Table, discriminator, value, Table.DiscriminatorColumn, Table.SearchColumn, Table.ResultColumn)",
        returns_row: false,
        has_discriminator: true,
    },
    TableFunctionInfo {
        id: TableFunctionId::LookUpRow,
        canonical: "lookUpRow",
        arity: 3,
        usage: "lookUpRow(Table, value, Table.SearchColumn)",
        returns_row: true,
        has_discriminator: false,
    },
    TableFunctionInfo {
        id: TableFunctionId::LookUpRowBy,
        canonical: "lookUpRowBy",
        arity: 5,
        usage: "lookUpRowBy(Table, discriminator, value, Table.DiscriminatorColumn, Table.SearchColumn)",
        returns_row: true,
        has_discriminator: true,
    },
];

/// Stable identifier for library functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryFunctionId {
    Abs,
    Int,
    Power,
    Round,
    Now,
    Today,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

/// Signature of a library function.
#[derive(Debug, Clone, Copy)]
pub struct LibraryFunctionInfo {
    pub id: LibraryFunctionId,
    pub canonical: &'static str,
    pub parameters: &'static [PrimitiveTypeId],
    pub result: PrimitiveTypeId,
}

const fn lib(
    id: LibraryFunctionId,
    canonical: &'static str,
    parameters: &'static [PrimitiveTypeId],
    result: PrimitiveTypeId,
) -> LibraryFunctionInfo {
    LibraryFunctionInfo {
        id,
        canonical,
        parameters,
        result,
    }
}

use PrimitiveTypeId::{Date, Number};

/// Registry of library functions.
pub const LIBRARY_FUNCTIONS: &[LibraryFunctionInfo] = &[
    lib(LibraryFunctionId::Abs, "abs", &[Number], Number),
    lib(LibraryFunctionId::Int, "int", &[Number], Number),
    lib(LibraryFunctionId::Power, "power", &[Number, Number], Number),
    lib(LibraryFunctionId::Round, "round", &[Number, Number], Number),
    lib(LibraryFunctionId::Now, "now", &[], Date),
    lib(LibraryFunctionId::Today, "today", &[], Date),
    lib(LibraryFunctionId::Year, "year", &[Date], Number),
    lib(LibraryFunctionId::Month, "month", &[Date], Number),
    lib(LibraryFunctionId::Day, "day", &[Date], Number),
    lib(LibraryFunctionId::Hour, "hour", &[Date], Number),
    lib(LibraryFunctionId::Minute, "minute", &[Date], Number),
    lib(LibraryFunctionId::Second, "second", &[Date], Number),
    lib(LibraryFunctionId::Years, "years", &[Date, Date], Number),
    lib(LibraryFunctionId::Months, "months", &[Date, Date], Number),
    lib(LibraryFunctionId::Days, "days", &[Date, Date], Number),
    lib(LibraryFunctionId::Hours, "hours", &[Date, Date], Number),
    lib(LibraryFunctionId::Minutes, "minutes", &[Date, Date], Number),
    lib(LibraryFunctionId::Seconds, "seconds", &[Date, Date], Number),
    lib(LibraryFunctionId::Milliseconds, "milliseconds", &[Date, Date], Number),
];

/// Resolve a callee name to a system function.
pub fn system_function_from_str(name: &str) -> Option<SystemFunctionId> {
    SYSTEM_FUNCTIONS.iter().find(|f| f.canonical == name).map(|f| f.id)
}

/// Registry metadata for a system function.
pub fn system_function_info(id: SystemFunctionId) -> &'static SystemFunctionInfo {
    SYSTEM_FUNCTIONS
        .iter()
        .find(|f| f.id == id)
        .expect("INVARIANT: every SystemFunctionId has a registry entry")
}

/// Resolve a callee name to a table function.
pub fn table_function_from_str(name: &str) -> Option<TableFunctionId> {
    TABLE_FUNCTIONS.iter().find(|f| f.canonical == name).map(|f| f.id)
}

/// Registry metadata for a table function.
pub fn table_function_info(id: TableFunctionId) -> &'static TableFunctionInfo {
    TABLE_FUNCTIONS
        .iter()
        .find(|f| f.id == id)
        .expect("INVARIANT: every TableFunctionId has a registry entry")
}

/// Resolve a callee name to a library function.
pub fn library_function(name: &str) -> Option<&'static LibraryFunctionInfo> {
    LIBRARY_FUNCTIONS.iter().find(|f| f.canonical == name)
}
