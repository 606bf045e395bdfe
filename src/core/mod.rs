//! Extraction and compilation engine.
//!
//! - `messages`: message model, ICU serializer and id hashing
//! - `parsers`: source parsing and catalogue codecs
//! - `extract`: pattern matcher building messages from the syntax tree
//! - `generate`: runtime lookup code generation
//! - `transform`: module traversal tying matcher and generator together, and
//!   code emission
//! - `catalogue`: merge, fallback resolution and file output
//! - `watch`: debounced file watching

pub mod catalogue;
pub mod extract;
pub mod file_scanner;
pub mod generate;
pub mod messages;
pub mod parsers;
pub mod transform;
pub mod watch;

pub use catalogue::CatalogueEntry;
pub use messages::{CompositeMessage, Message, generate_hash};
pub use transform::{
    TransformOutput, emit_module, extract_messages, transform_module, transform_source,
};
