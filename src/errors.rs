//! Error types with rich diagnostics using miette
//!
//! Configuration errors are raised while a `LayoutConfig` is being resolved,
//! never while drawing. File errors carry source spans so the CLI can point
//! at the offending YAML.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Validation Errors
// ============================================================================

/// A single configuration leaf has a value outside its declared type or range
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("`{field}` = {value} is out of range (valid range: {range})")]
    #[diagnostic(code(letterpack::config::out_of_range))]
    OutOfRange {
        field: String,
        value: String,
        range: String,
    },

    #[error("`{field}` = {value} has the wrong type (expected {expected}, valid range: {range})")]
    #[diagnostic(code(letterpack::config::wrong_type))]
    WrongType {
        field: String,
        value: String,
        expected: &'static str,
        range: String,
    },

    #[error("`{field}` = {value} is not a known choice (expected one of: {allowed})")]
    #[diagnostic(code(letterpack::config::unknown_choice))]
    UnknownChoice {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("`{field}` must be a mapping, found {value}")]
    #[diagnostic(
        code(letterpack::config::not_a_mapping),
        help("values are nested under their group, e.g. `name: 16` under `fonts:`")
    )]
    NotAMapping { field: String, value: String },

    #[error("configuration does not match the layout schema: {message}")]
    #[diagnostic(code(letterpack::config::shape))]
    Shape { message: String },
}

impl ValidationError {
    /// Dotted path of the offending field (`fonts.name`)
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::WrongType { field, .. }
            | ValidationError::UnknownChoice { field, .. }
            | ValidationError::NotAMapping { field, .. } => field,
            ValidationError::Shape { .. } => "<root>",
        }
    }
}

// ============================================================================
// File Errors
// ============================================================================

/// A configuration source could not be read or is not well-formed
#[derive(Error, Diagnostic, Debug)]
pub enum FileError {
    #[error("cannot read configuration file {path}")]
    #[diagnostic(code(letterpack::config::unreadable))]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration file {path}: {message}")]
    #[diagnostic(code(letterpack::config::malformed))]
    Malformed {
        path: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("configuration file {path} must contain a mapping at the top level")]
    #[diagnostic(
        code(letterpack::config::top_level),
        help("start the file with a group name such as `layout:` or `fonts:`")
    )]
    NotAMapping { path: String },
}

// ============================================================================
// Invariant Errors
// ============================================================================

/// Cross-field contract violated after merging
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum InvariantError {
    #[error(
        "section heights do not add up: {to_section_height} + {from_section_height} = {} mm, \
         but layout.label_height is {label_height} mm",
        .to_section_height + .from_section_height
    )]
    #[diagnostic(
        code(letterpack::config::section_heights),
        help(
            "section_height.to_section_height + section_height.from_section_height \
             must equal layout.label_height"
        )
    )]
    SectionHeights {
        to_section_height: f64,
        from_section_height: f64,
        label_height: f64,
    },

    #[error(
        "\"from\" address text would be {} pt: fonts.address ({address}) + \
         section_height.from_address_font_size_adjust ({adjust}) must be at least {min}",
        .address + .adjust
    )]
    #[diagnostic(
        code(letterpack::config::from_address_size),
        help("raise fonts.address or section_height.from_address_font_size_adjust")
    )]
    FromAddressSize { address: i64, adjust: i64, min: i64 },
}

// ============================================================================
// Umbrella
// ============================================================================

/// Anything that can go wrong while resolving a configuration
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invariant(#[from] InvariantError),
}

// ============================================================================
// Address Errors
// ============================================================================

/// An address record could not be constructed
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("postal code {0:?} is not formatted NNN-NNNN")]
    #[diagnostic(
        code(letterpack::address::postal_code),
        help("use seven ASCII digits with a hyphen after the third, e.g. 123-4567")
    )]
    InvalidPostalCode(String),

    #[error("address must have at least one non-empty line")]
    #[diagnostic(code(letterpack::address::missing_address))]
    MissingAddress,

    #[error("name must not be empty")]
    #[diagnostic(code(letterpack::address::missing_name))]
    MissingName,
}
