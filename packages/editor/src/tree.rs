//! # Document Tree Operations
//!
//! Structural queries and edits over a [`Document`].
//!
//! ## Semantics
//!
//! - Lookups search the top level first, then the content of every column.
//! - A missing id is never an error. The operation leaves the tree alone and
//!   reports [`TreeChange::Unchanged`]; ids routinely go stale between a UI
//!   render and the event that refers to them.
//! - Every operation is all-or-nothing. Updates build the replacement block
//!   first and only swap it in once it type-checks.
//! - Ids never change. Updates refuse to touch `id`, `type` or the nested
//!   `columns` / `blocks` sequences.

use crate::mutations::MutationError;
use mailblocks_model::{ColumnBlock, ContentBlock, Document, EmailBlock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys an update may never write
pub const PROTECTED_FIELDS: &[&str] = &["id", "type", "columns", "blocks"];

/// Whether an operation found its target and changed the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeChange {
    Applied,
    Unchanged,
}

impl TreeChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, TreeChange::Applied)
    }
}

/// Partial block fields, merged into the block's serialized form.
///
/// Objects merge key by key (so `{"style": {"color": "#fff"}}` keeps the
/// other style fields); any other value replaces what was there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPatch(Map<String, Value>);

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, MutationError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(MutationError::NotAnObject),
        }
    }

    /// Set a top-level field
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set one field inside `style`
    pub fn style(mut self, key: &str, value: impl Into<Value>) -> Self {
        let style = self
            .0
            .entry("style".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !style.is_object() {
            *style = Value::Object(Map::new());
        }
        if let Value::Object(fields) = style {
            fields.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// First protected key present in the patch
    pub fn protected_field(&self) -> Option<&'static str> {
        PROTECTED_FIELDS.iter().copied().find(|key| self.0.contains_key(*key))
    }
}

/// Where a block lives in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockRef<'a> {
    TopLevel {
        index: usize,
        block: &'a EmailBlock,
    },
    Nested {
        row_id: &'a str,
        column_id: &'a str,
        index: usize,
        block: &'a ContentBlock,
    },
}

impl<'a> BlockRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            BlockRef::TopLevel { block, .. } => block.id(),
            BlockRef::Nested { block, .. } => block.id(),
        }
    }

    /// Owned copy of the referenced block
    pub fn to_block(&self) -> EmailBlock {
        match self {
            BlockRef::TopLevel { block, .. } => (*block).clone(),
            BlockRef::Nested { block, .. } => (*block).clone().into(),
        }
    }
}

/// Structural operations on the block tree
pub trait DocumentTree {
    /// Find a block (top level or inside a column) by id
    fn find_by_id(&self, id: &str) -> Option<BlockRef<'_>>;

    fn find_column(&self, column_id: &str) -> Option<&ColumnBlock>;

    /// Position of a top-level block
    fn top_level_index(&self, id: &str) -> Option<usize>;

    /// True if any block or column carries this id
    fn contains_id(&self, id: &str) -> bool;

    /// Every id in the document, columns included, in document order
    fn ids(&self) -> Vec<&str>;

    /// Insert at the end of the top-level sequence
    fn append(&mut self, block: EmailBlock);

    /// Append to the named column; a missing column leaves the tree alone
    fn append_to_column(&mut self, column_id: &str, block: ContentBlock) -> TreeChange;

    /// Merge partial fields into the block with this id, wherever it lives
    fn update_by_id(&mut self, id: &str, patch: &BlockPatch) -> Result<TreeChange, MutationError>;

    /// Merge partial fields (`width`, `style`) into a column
    fn update_column(&mut self, column_id: &str, patch: &BlockPatch) -> Result<TreeChange, MutationError>;

    /// Remove a block from wherever it lives; removing a row drops its columns too
    fn delete_by_id(&mut self, id: &str) -> TreeChange;

    /// Move the top-level block at `from` so that it ends up at `to`
    fn reorder(&mut self, from: usize, to: usize) -> TreeChange;
}

impl DocumentTree for Document {
    fn find_by_id(&self, id: &str) -> Option<BlockRef<'_>> {
        if let Some(index) = self.top_level_index(id) {
            return Some(BlockRef::TopLevel {
                index,
                block: &self.blocks[index],
            });
        }

        for row in self.blocks.iter().filter_map(EmailBlock::as_row) {
            for column in &row.columns {
                if let Some(index) = column.blocks.iter().position(|b| b.id() == id) {
                    return Some(BlockRef::Nested {
                        row_id: &row.id,
                        column_id: &column.id,
                        index,
                        block: &column.blocks[index],
                    });
                }
            }
        }

        None
    }

    fn find_column(&self, column_id: &str) -> Option<&ColumnBlock> {
        self.columns().find(|c| c.id == column_id)
    }

    fn top_level_index(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.blocks.iter().any(|b| b.ids().contains(&id))
    }

    fn ids(&self) -> Vec<&str> {
        self.blocks.iter().flat_map(|b| b.ids()).collect()
    }

    fn append(&mut self, block: EmailBlock) {
        self.blocks.push(block);
    }

    fn append_to_column(&mut self, column_id: &str, block: ContentBlock) -> TreeChange {
        match column_mut(self, column_id) {
            Some(column) => {
                column.blocks.push(block);
                TreeChange::Applied
            }
            None => TreeChange::Unchanged,
        }
    }

    fn update_by_id(&mut self, id: &str, patch: &BlockPatch) -> Result<TreeChange, MutationError> {
        if let Some(field) = patch.protected_field() {
            return Err(MutationError::ProtectedField(field.to_string()));
        }

        if let Some(index) = self.top_level_index(id) {
            let current = &self.blocks[index];
            let updated = patched(current, patch)?;
            if updated == *current {
                return Ok(TreeChange::Unchanged);
            }
            self.blocks[index] = updated;
            return Ok(TreeChange::Applied);
        }

        let Some(slot) = nested_block_mut(self, id) else {
            return Ok(TreeChange::Unchanged);
        };
        let updated = patched(&*slot, patch)?;
        if updated == *slot {
            return Ok(TreeChange::Unchanged);
        }
        *slot = updated;
        Ok(TreeChange::Applied)
    }

    fn update_column(&mut self, column_id: &str, patch: &BlockPatch) -> Result<TreeChange, MutationError> {
        if let Some(field) = patch.protected_field() {
            return Err(MutationError::ProtectedField(field.to_string()));
        }

        let Some(column) = column_mut(self, column_id) else {
            return Ok(TreeChange::Unchanged);
        };
        let updated = patched(&*column, patch)?;
        if updated == *column {
            return Ok(TreeChange::Unchanged);
        }
        *column = updated;
        Ok(TreeChange::Applied)
    }

    fn delete_by_id(&mut self, id: &str) -> TreeChange {
        if let Some(index) = self.top_level_index(id) {
            self.blocks.remove(index);
            return TreeChange::Applied;
        }

        for row in self.blocks.iter_mut().filter_map(EmailBlock::as_row_mut) {
            for column in &mut row.columns {
                if let Some(index) = column.blocks.iter().position(|b| b.id() == id) {
                    column.blocks.remove(index);
                    return TreeChange::Applied;
                }
            }
        }

        TreeChange::Unchanged
    }

    fn reorder(&mut self, from: usize, to: usize) -> TreeChange {
        let len = self.blocks.len();
        if from == to || from >= len || to >= len {
            return TreeChange::Unchanged;
        }

        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        TreeChange::Applied
    }
}

fn column_mut<'a>(doc: &'a mut Document, column_id: &str) -> Option<&'a mut ColumnBlock> {
    doc.blocks
        .iter_mut()
        .filter_map(EmailBlock::as_row_mut)
        .flat_map(|row| row.columns.iter_mut())
        .find(|c| c.id == column_id)
}

fn nested_block_mut<'a>(doc: &'a mut Document, id: &str) -> Option<&'a mut ContentBlock> {
    doc.blocks
        .iter_mut()
        .filter_map(EmailBlock::as_row_mut)
        .flat_map(|row| row.columns.iter_mut())
        .flat_map(|column| column.blocks.iter_mut())
        .find(|b| b.id() == id)
}

/// Build the patched copy of a block without touching the original
fn patched<T>(current: &T, patch: &BlockPatch) -> Result<T, MutationError>
where
    T: Serialize + DeserializeOwned,
{
    let mut value =
        serde_json::to_value(current).map_err(|e| MutationError::InvalidPatch(e.to_string()))?;

    if let Value::Object(fields) = &mut value {
        merge_into(fields, patch.fields());
    }

    serde_json::from_value(value).map_err(|e| MutationError::InvalidPatch(e.to_string()))
}

fn merge_into(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), value) {
            merge_into(existing, nested);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailblocks_model::{create_row_block, create_spacer_block, create_text_block, IDGenerator, Padding};
    use serde_json::json;

    fn sample() -> (Document, IDGenerator) {
        let mut ids = IDGenerator::from_seed("t");
        let mut row = create_row_block(2, &mut ids).unwrap();
        row.columns[0]
            .blocks
            .push(ContentBlock::Text(create_text_block(&mut ids)));
        let doc = Document::with_blocks(vec![
            create_spacer_block(&mut ids).into(),
            row.into(),
        ]);
        (doc, ids)
    }

    #[test]
    fn test_find_reaches_into_columns() {
        let (doc, _) = sample();
        let nested_id = doc.nested_blocks().next().unwrap().id().to_string();

        match doc.find_by_id(&nested_id) {
            Some(BlockRef::Nested { index, column_id, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(column_id, doc.columns().next().unwrap().id);
            }
            other => panic!("Expected nested ref, got {:?}", other),
        }
        assert!(doc.find_by_id("missing").is_none());
    }

    #[test]
    fn test_merge_keeps_untouched_style_fields() {
        let (mut doc, _) = sample();
        let nested_id = doc.nested_blocks().next().unwrap().id().to_string();

        let patch = BlockPatch::new()
            .set("content", "<p>Hi</p>")
            .style("fontSize", 24);
        assert_eq!(doc.update_by_id(&nested_id, &patch), Ok(TreeChange::Applied));

        let Some(BlockRef::Nested { block: ContentBlock::Text(text), .. }) = doc.find_by_id(&nested_id) else {
            panic!("Expected text block");
        };
        assert_eq!(text.content, "<p>Hi</p>");
        assert_eq!(text.style.font_size, 24);
        assert_eq!(text.style.font_family, "Arial");
    }

    #[test]
    fn test_padding_number_replaces_box() {
        let (mut doc, _) = sample();
        let nested_id = doc.nested_blocks().next().unwrap().id().to_string();

        let boxed = BlockPatch::from_value(json!({
            "style": { "padding": { "top": 1, "right": 2, "bottom": 3, "left": 4 } }
        }))
        .unwrap();
        doc.update_by_id(&nested_id, &boxed).unwrap();
        doc.update_by_id(&nested_id, &BlockPatch::new().style("padding", 12)).unwrap();

        let Some(BlockRef::Nested { block: ContentBlock::Text(text), .. }) = doc.find_by_id(&nested_id) else {
            panic!("Expected text block");
        };
        assert_eq!(text.style.padding, Padding::Uniform(12));
    }

    #[test]
    fn test_ill_typed_patch_leaves_tree_alone() {
        let (mut doc, _) = sample();
        let before = doc.clone();
        let spacer_id = doc.blocks[0].id().to_string();

        let result = doc.update_by_id(&spacer_id, &BlockPatch::new().set("height", "tall"));
        assert!(matches!(result, Err(MutationError::InvalidPatch(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_protected_fields_are_refused() {
        let (mut doc, _) = sample();
        let spacer_id = doc.blocks[0].id().to_string();

        for key in PROTECTED_FIELDS {
            let patch = BlockPatch::new().set(key, "x");
            assert_eq!(
                doc.update_by_id(&spacer_id, &patch),
                Err(MutationError::ProtectedField(key.to_string()))
            );
        }
    }

    #[test]
    fn test_update_column_style() {
        let (mut doc, _) = sample();
        let column_id = doc.columns().nth(1).unwrap().id.clone();

        let patch = BlockPatch::new()
            .set("width", 40)
            .style("verticalAlign", "middle");
        assert_eq!(doc.update_column(&column_id, &patch), Ok(TreeChange::Applied));

        let column = doc.find_column(&column_id).unwrap();
        assert_eq!(column.width, 40);
        assert_eq!(column.style.vertical_align.to_string(), "middle");
        assert_eq!(column.style.padding, 10);

        assert_eq!(doc.update_column("nope", &patch), Ok(TreeChange::Unchanged));
    }

    #[test]
    fn test_delete_nested_keeps_row() {
        let (mut doc, _) = sample();
        let nested_id = doc.nested_blocks().next().unwrap().id().to_string();

        assert_eq!(doc.delete_by_id(&nested_id), TreeChange::Applied);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.nested_blocks().count(), 0);
    }

    #[test]
    fn test_delete_column_id_is_a_miss() {
        let (mut doc, _) = sample();
        let column_id = doc.columns().next().unwrap().id.clone();

        assert_eq!(doc.delete_by_id(&column_id), TreeChange::Unchanged);
        assert_eq!(doc.columns().count(), 2);
    }

    #[test]
    fn test_reorder_bounds() {
        let (mut doc, _) = sample();
        assert_eq!(doc.reorder(0, 5), TreeChange::Unchanged);
        assert_eq!(doc.reorder(1, 1), TreeChange::Unchanged);
        assert_eq!(doc.reorder(1, 0), TreeChange::Applied);
        assert!(doc.blocks[0].is_row());
    }

    #[test]
    fn test_empty_document_tolerated() {
        let mut doc = Document::new();
        assert_eq!(doc.delete_by_id("x"), TreeChange::Unchanged);
        assert_eq!(doc.reorder(0, 0), TreeChange::Unchanged);
        assert_eq!(doc.update_by_id("x", &BlockPatch::new()), Ok(TreeChange::Unchanged));
        assert!(doc.ids().is_empty());
    }
}
