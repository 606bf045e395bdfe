//! Parsers for source code and catalogue files.
//!
//! - `source`: JavaScript/TypeScript/JSX source parser (swc)
//! - `format`: the catalogue codec contract and format selection
//! - `po`: gettext PO catalogue codec
//! - `json`: JSON catalogue codec

pub mod format;
pub mod json;
pub mod po;
pub mod source;

pub use format::{CatalogueFormat, Format, FormatError};
