//! Shared compiler conventions (well-known identifiers and spellings).

/// Member of a function that names its generated parameters type.
pub const PARAMETERS_MEMBER: &str = "Parameters";

/// Member of a function that names its generated results type.
pub const RESULTS_MEMBER: &str = "Results";

/// Member of a table that names its generated row type.
pub const ROW_MEMBER: &str = "Row";

/// Member of a table that yields the number of rows.
pub const COUNT_MEMBER: &str = "Count";

/// Keyword used in place of a type to request an inferred variable type.
pub const IMPLICIT_TYPE_KEYWORD: &str = "var";

/// Prefix that starts a comment running to the end of the line.
pub const COMMENT_PREFIX: &str = "//";

/// Prefix character of a date-time literal (`d"2024-01-01"`).
pub const DATE_LITERAL_PREFIX: char = 'd';

/// Separator between segments of a member access literal.
pub const MEMBER_SEPARATOR: char = '.';

/// Default source file extension (without the dot).
pub const DEFAULT_FILE_EXTENSION: &str = "lexy";

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 2;
