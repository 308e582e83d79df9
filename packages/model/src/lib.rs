//! # Mailblocks Model
//!
//! Block types and factories for the drag-and-drop email builder.
//!
//! A [`Document`] is an ordered list of [`EmailBlock`]s. Rows split the email
//! into side-by-side columns; columns hold leaf [`ContentBlock`]s. Every block
//! carries an opaque id that stays stable for its whole life.
//!
//! ```rust,ignore
//! use mailblocks_model::{create_row_block, create_text_block, Document, IDGenerator};
//!
//! let mut ids = IDGenerator::new();
//! let mut doc = Document::new();
//! doc.blocks.push(create_row_block(2, &mut ids)?.into());
//! doc.blocks.push(create_text_block(&mut ids).into());
//! ```

mod block;
mod document;
mod error;
mod factory;
mod id_generator;
pub mod style;

pub use block::*;
pub use document::{Document, DocumentStyle};
pub use error::ModelError;
pub use factory::*;
pub use id_generator::IDGenerator;
pub use style::{BoxSides, FontWeight, Padding, Side, TextAlign, VerticalAlign};
