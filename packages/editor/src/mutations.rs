//! # Document Mutations
//!
//! High-level semantic operations on an email document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one editor action
//! 2. **Atomic**: A mutation is fully applied or leaves the tree untouched
//! 3. **Forgiving on lookup**: Stale ids are no-ops, not errors
//!
//! ## Mutation Semantics
//!
//! ### AddBlock / AddToColumn
//! - Appends at the end of the top level / the named column
//! - Refused if any id of the new block already exists in the document
//! - A missing column is a no-op
//!
//! ### UpdateBlock / UpdateColumn
//! - Property merge, last write wins
//! - Never changes `id`, `type`, `columns` or `blocks`
//!
//! ### RemoveBlock
//! - Removing a row removes its columns and their content
//! - Removing nested content leaves the row in place
//!
//! ### MoveBlock
//! - Top-level only: the block at `from_index` lands at `to_index`

use crate::tree::{BlockPatch, DocumentTree, TreeChange};
use mailblocks_model::{ContentBlock, Document, EmailBlock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a block to the top level
    AddBlock { block: EmailBlock },

    /// Append a content block to a column
    AddToColumn {
        column_id: String,
        block: ContentBlock,
    },

    /// Merge properties into a block
    UpdateBlock { block_id: String, patch: BlockPatch },

    /// Merge properties into a column
    UpdateColumn { column_id: String, patch: BlockPatch },

    /// Remove a block from wherever it lives
    RemoveBlock { block_id: String },

    /// Move a top-level block
    MoveBlock { from_index: usize, to_index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block id already in use: {0}")]
    DuplicateId(String),

    #[error("Field cannot be changed by an update: {0}")]
    ProtectedField(String),

    #[error("Patch does not fit the block: {0}")]
    InvalidPatch(String),

    #[error("Patch must be a JSON object")]
    NotAnObject,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<TreeChange, MutationError> {
        self.validate(doc)?;

        let change = match self {
            Mutation::AddBlock { block } => {
                doc.append(block.clone());
                TreeChange::Applied
            }

            Mutation::AddToColumn { column_id, block } => {
                doc.append_to_column(column_id, block.clone())
            }

            Mutation::UpdateBlock { block_id, patch } => doc.update_by_id(block_id, patch)?,

            Mutation::UpdateColumn { column_id, patch } => doc.update_column(column_id, patch)?,

            Mutation::RemoveBlock { block_id } => doc.delete_by_id(block_id),

            Mutation::MoveBlock {
                from_index,
                to_index,
            } => doc.reorder(*from_index, *to_index),
        };

        debug!(mutation = self.name(), applied = change.is_applied(), "Applied mutation");
        Ok(change)
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::AddBlock { block } => ensure_fresh_ids(doc, block.ids()),

            Mutation::AddToColumn { block, .. } => ensure_fresh_ids(doc, vec![block.id()]),

            Mutation::UpdateBlock { patch, .. } | Mutation::UpdateColumn { patch, .. } => {
                match patch.protected_field() {
                    Some(field) => Err(MutationError::ProtectedField(field.to_string())),
                    None => Ok(()),
                }
            }

            Mutation::RemoveBlock { .. } | Mutation::MoveBlock { .. } => Ok(()),
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::AddToColumn { .. } => "add_to_column",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::UpdateColumn { .. } => "update_column",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::MoveBlock { .. } => "move_block",
        }
    }
}

fn ensure_fresh_ids(doc: &Document, ids: Vec<&str>) -> Result<(), MutationError> {
    // Incoming ids must also be distinct among themselves
    for (i, id) in ids.iter().enumerate() {
        if doc.contains_id(id) || ids[..i].contains(id) {
            return Err(MutationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}
