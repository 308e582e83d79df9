//! # Mailblocks Editor
//!
//! Editing engine for block-based email documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ palette / drag: user intent                 │
//! │  - Templates offered for insertion          │
//! │  - Pointer gestures resolved to drops       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mutations + tree: Document changes          │
//! │  - Lookup by id across rows and columns     │
//! │  - Atomic property merges                   │
//! │  - Stale ids are no-ops                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session + store: lifecycle                  │
//! │  - Load with fallback, snapshot saves       │
//! │  - Export through the HTML compiler         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailblocks_editor::{EditSession, FileStore, Mutation, PaletteItem};
//!
//! let store = FileStore::new("emails");
//! let mut session = EditSession::open(&store, "welcome")?;
//!
//! let row_id = session.add_from_palette(PaletteItem::Row { columns: 2 })?;
//! session.apply(Mutation::MoveBlock { from_index: 1, to_index: 0 })?;
//!
//! session.save(&store);
//! let file = session.export("Welcome email");
//! ```

mod drag;
mod errors;
mod mutations;
mod palette;
mod session;
mod store;
mod tree;

pub use drag::{
    resolve_target, DragController, DragPayload, DragState, DropOutcome, DropTarget, IgnoreReason, Point,
    DEFAULT_ACTIVATION_DISTANCE,
};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError};
pub use palette::{ContentDraft, PaletteItem};
pub use session::{EditSession, SaveRequest, SaveStatus};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
pub use tree::{BlockPatch, BlockRef, DocumentTree, TreeChange, PROTECTED_FIELDS};

// Re-export model types for convenience
pub use mailblocks_model::{Document, DocumentStyle, EmailBlock, IDGenerator};
