//! Sayable - message extraction and catalogue compiler
//!
//! Sayable finds translatable messages written as tagged templates, calls and
//! JSX elements in JavaScript/TypeScript sources, keeps per-locale translation
//! catalogues in sync with them, and compiles the catalogues into runtime
//! lookup tables with locale fallbacks applied.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`extract`, `compile`, `init`)
//! - `config`: Configuration file loading and validation
//! - `core`: Extraction, code generation and catalogue engine
//! - `issues`: Diagnostics reported during extraction

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
