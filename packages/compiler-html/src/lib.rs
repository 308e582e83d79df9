//! # Mailblocks HTML Compiler
//!
//! Turns an email document into a standalone, table-based HTML page that
//! renders consistently across mail clients. All styling is inlined.
//!
//! Compilation is total: any document yields a page, and the same document
//! always yields the same bytes.

mod compiler;
mod export;

pub use compiler::{compile, compile_to_html, escape_html, CompileOptions};
pub use export::{export, ExportedFile, HTML_MIME_TYPE};

#[cfg(test)]
mod tests;
