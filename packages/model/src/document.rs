//! # Document
//!
//! One email's editable content. The whole value is persisted as a single
//! JSON object (`{"blocks": [...], "style": {...}}`) and replaced wholesale on
//! save.

use crate::block::{ColumnBlock, ContentBlock, EmailBlock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<EmailBlock>,

    #[serde(default)]
    pub style: DocumentStyle,
}

/// Email-wide settings applied by the HTML shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStyle {
    pub background_color: String,
    pub font_family: String,
    /// Max width of the centered content table, in pixels
    pub max_width: u32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            max_width: 600,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<EmailBlock>) -> Self {
        Self {
            blocks,
            style: DocumentStyle::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Rebuild a document from the value kept by the document store.
    ///
    /// Absent content, or content without a `blocks` array, yields an empty
    /// document. Blocks are read one at a time: an unreadable block (unknown
    /// `type`, bad field) is skipped with a warning and its siblings are kept.
    /// Nothing here is surfaced as an error.
    pub fn from_persisted(value: Option<Value>) -> Self {
        let Some(value) = value else {
            debug!("No stored content, starting with an empty document");
            return Self::new();
        };

        let Some(Value::Array(items)) = value.get("blocks") else {
            warn!("Stored content has no blocks array, starting with an empty document");
            return Self::new();
        };

        let blocks = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| read_block(index, item))
            .collect();

        let style = match value.get("style") {
            None | Some(Value::Null) => DocumentStyle::default(),
            Some(style) => DocumentStyle::deserialize(style).unwrap_or_else(|e| {
                warn!(error = %e, "Stored document style is malformed, using defaults");
                DocumentStyle::default()
            }),
        };

        Self { blocks, style }
    }

    /// Parse persisted JSON text, with the same fallback as [`Document::from_persisted`]
    pub fn from_json(source: &str) -> Self {
        match serde_json::from_str::<Value>(source) {
            Ok(value) => Self::from_persisted(Some(value)),
            Err(e) => {
                warn!(error = %e, "Stored content is not JSON, starting with an empty document");
                Self::new()
            }
        }
    }

    /// Value handed to the document store
    pub fn to_persisted(&self) -> Value {
        // Every field is a string, number, enum or nested struct
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Every column across all rows, in document order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnBlock> {
        self.blocks
            .iter()
            .filter_map(EmailBlock::as_row)
            .flat_map(|row| row.columns.iter())
    }

    /// Every leaf block nested in a column, in document order
    pub fn nested_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.columns().flat_map(|column| column.blocks.iter())
    }

    /// Total number of blocks, counting columns and nested content
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(|b| b.ids().len()).sum()
    }
}

fn block_id(item: &Value) -> &str {
    item.get("id").and_then(Value::as_str).unwrap_or("<no id>")
}

/// Read one top-level block, dropping unreadable content inside its columns first
fn read_block(index: usize, item: &Value) -> Option<EmailBlock> {
    let mut item = item.clone();

    if let Some(Value::Array(columns)) = item.get_mut("columns") {
        for column in columns.iter_mut() {
            if let Some(Value::Array(blocks)) = column.get_mut("blocks") {
                blocks.retain(|block| match ContentBlock::deserialize(block) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(id = block_id(block), error = %e, "Skipping unreadable column block");
                        false
                    }
                });
            }
        }
    }

    match EmailBlock::deserialize(&item) {
        Ok(block) => Some(block),
        Err(e) => {
            warn!(index, id = block_id(&item), error = %e, "Skipping unreadable block");
            None
        }
    }
}
