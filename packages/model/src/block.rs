//! # Block Types
//!
//! The email document is a shallow tree:
//!
//! ```text
//! Document
//!  ├─ Row ── Column ── Text | Image | Button | Spacer | Divider
//!  │     └─ Column ── ...
//!  └─ Text | Image | Button | Spacer | Divider   (standalone)
//! ```
//!
//! Columns hold `ContentBlock`s only, so a row can never end up inside a
//! column. The serialized shape is the camelCase JSON the document store keeps
//! (`{"id": "...", "type": "text", "content": "...", "style": {...}}`).

use crate::error::ModelError;
use crate::id_generator::IDGenerator;
use crate::style::{FontWeight, Padding, TextAlign, VerticalAlign, TRANSPARENT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a block, as written in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Row,
    Column,
    Text,
    Image,
    Button,
    Spacer,
    Divider,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Row => "row",
            BlockKind::Column => "column",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Button => "button",
            BlockKind::Spacer => "spacer",
            BlockKind::Divider => "divider",
        }
    }

    /// Prefix used when generating ids for this kind
    pub fn id_prefix(&self) -> &'static str {
        match self {
            BlockKind::Row => "row",
            BlockKind::Column => "col",
            BlockKind::Text => "text",
            BlockKind::Image => "img",
            BlockKind::Button => "btn",
            BlockKind::Spacer => "spacer",
            BlockKind::Divider => "divider",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any block that may sit at the top level of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailBlock {
    Row(RowBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    Spacer(SpacerBlock),
    Divider(DividerBlock),
}

/// Leaf blocks, allowed at the top level and inside columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text(TextBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    Spacer(SpacerBlock),
    Divider(DividerBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBlock {
    pub id: String,
    pub columns: Vec<ColumnBlock>,
    #[serde(default)]
    pub style: RowStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowStyle {
    pub background_color: String,
    pub padding: u32,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            background_color: TRANSPARENT.to_string(),
            padding: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBlock {
    pub id: String,
    /// `"column"` on the wire; any other value is refused
    #[serde(rename = "type", default)]
    pub kind: ColumnTag,
    /// Percent of the row width
    pub width: u32,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub style: ColumnStyle,
}

/// The only `type` a column may carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnTag {
    #[default]
    Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnStyle {
    pub background_color: String,
    pub padding: u32,
    pub vertical_align: VerticalAlign,
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            background_color: TRANSPARENT.to_string(),
            padding: 10,
            vertical_align: VerticalAlign::Top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    /// HTML fragment, emitted unescaped
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub font_family: String,
    pub text_align: TextAlign,
    pub color: String,
    pub background_color: String,
    pub padding: Padding,
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16,
            font_weight: FontWeight::Normal,
            font_family: "Arial".to_string(),
            text_align: TextAlign::Left,
            color: "#000000".to_string(),
            background_color: TRANSPARENT.to_string(),
            padding: Padding::Uniform(10),
            line_height: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: String,
    /// URL or data URI
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub style: ImageStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStyle {
    /// CSS length, e.g. `100%` or `400px`
    pub width: String,
    pub height: String,
    pub text_align: TextAlign,
    pub padding: u32,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "auto".to_string(),
            text_align: TextAlign::Center,
            padding: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBlock {
    pub id: String,
    pub text: String,
    pub href: String,
    #[serde(default)]
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyle {
    pub background_color: String,
    pub color: String,
    pub padding: u32,
    pub border_radius: u32,
    pub text_align: TextAlign,
    pub font_size: u32,
    pub font_weight: FontWeight,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background_color: "#3b82f6".to_string(),
            color: "#ffffff".to_string(),
            padding: 12,
            border_radius: 6,
            text_align: TextAlign::Center,
            font_size: 16,
            font_weight: FontWeight::Bold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacerBlock {
    pub id: String,
    #[serde(default = "default_spacer_height")]
    pub height: u32,
}

pub(crate) fn default_spacer_height() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerBlock {
    pub id: String,
    #[serde(default)]
    pub style: DividerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerStyle {
    pub color: String,
    pub thickness: u32,
    pub padding: u32,
}

impl Default for DividerStyle {
    fn default() -> Self {
        Self {
            color: "#e5e7eb".to_string(),
            thickness: 1,
            padding: 20,
        }
    }
}

impl ContentBlock {
    pub fn id(&self) -> &str {
        match self {
            ContentBlock::Text(b) => &b.id,
            ContentBlock::Image(b) => &b.id,
            ContentBlock::Button(b) => &b.id,
            ContentBlock::Spacer(b) => &b.id,
            ContentBlock::Divider(b) => &b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Image(_) => BlockKind::Image,
            ContentBlock::Button(_) => BlockKind::Button,
            ContentBlock::Spacer(_) => BlockKind::Spacer,
            ContentBlock::Divider(_) => BlockKind::Divider,
        }
    }

    fn set_id(&mut self, id: String) {
        match self {
            ContentBlock::Text(b) => b.id = id,
            ContentBlock::Image(b) => b.id = id,
            ContentBlock::Button(b) => b.id = id,
            ContentBlock::Spacer(b) => b.id = id,
            ContentBlock::Divider(b) => b.id = id,
        }
    }

    /// Copy of this block carrying a newly generated id
    pub fn with_fresh_id(&self, ids: &mut IDGenerator) -> ContentBlock {
        let mut copy = self.clone();
        copy.set_id(ids.new_id(self.kind()));
        copy
    }
}

impl EmailBlock {
    pub fn id(&self) -> &str {
        match self {
            EmailBlock::Row(b) => &b.id,
            EmailBlock::Text(b) => &b.id,
            EmailBlock::Image(b) => &b.id,
            EmailBlock::Button(b) => &b.id,
            EmailBlock::Spacer(b) => &b.id,
            EmailBlock::Divider(b) => &b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            EmailBlock::Row(_) => BlockKind::Row,
            EmailBlock::Text(_) => BlockKind::Text,
            EmailBlock::Image(_) => BlockKind::Image,
            EmailBlock::Button(_) => BlockKind::Button,
            EmailBlock::Spacer(_) => BlockKind::Spacer,
            EmailBlock::Divider(_) => BlockKind::Divider,
        }
    }

    pub fn is_row(&self) -> bool {
        matches!(self, EmailBlock::Row(_))
    }

    pub fn as_row(&self) -> Option<&RowBlock> {
        match self {
            EmailBlock::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_row_mut(&mut self) -> Option<&mut RowBlock> {
        match self {
            EmailBlock::Row(row) => Some(row),
            _ => None,
        }
    }

    /// Convert into a leaf block; rows are handed back unchanged
    pub fn into_content(self) -> Result<ContentBlock, RowBlock> {
        match self {
            EmailBlock::Row(row) => Err(row),
            EmailBlock::Text(b) => Ok(ContentBlock::Text(b)),
            EmailBlock::Image(b) => Ok(ContentBlock::Image(b)),
            EmailBlock::Button(b) => Ok(ContentBlock::Button(b)),
            EmailBlock::Spacer(b) => Ok(ContentBlock::Spacer(b)),
            EmailBlock::Divider(b) => Ok(ContentBlock::Divider(b)),
        }
    }

    /// Every id owned by this block, its own first
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id()];
        if let EmailBlock::Row(row) = self {
            for column in &row.columns {
                ids.push(&column.id);
                ids.extend(column.blocks.iter().map(|b| b.id()));
            }
        }
        ids
    }

    /// Clone a template with new ids for the block, its columns and their content
    pub fn with_fresh_ids(&self, ids: &mut IDGenerator) -> EmailBlock {
        match self.clone().into_content() {
            Ok(content) => content.with_fresh_id(ids).into(),
            Err(row) => EmailBlock::Row(row.with_fresh_ids(ids)),
        }
    }
}

impl From<ContentBlock> for EmailBlock {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text(b) => EmailBlock::Text(b),
            ContentBlock::Image(b) => EmailBlock::Image(b),
            ContentBlock::Button(b) => EmailBlock::Button(b),
            ContentBlock::Spacer(b) => EmailBlock::Spacer(b),
            ContentBlock::Divider(b) => EmailBlock::Divider(b),
        }
    }
}

impl TryFrom<EmailBlock> for ContentBlock {
    type Error = ModelError;

    fn try_from(block: EmailBlock) -> Result<Self, Self::Error> {
        block.into_content().map_err(|_| ModelError::RowInColumn)
    }
}

macro_rules! impl_into_email_block {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for EmailBlock {
                fn from(block: $ty) -> Self {
                    EmailBlock::$variant(block)
                }
            }
        )*
    };
}

impl_into_email_block!(
    Row(RowBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    Spacer(SpacerBlock),
    Divider(DividerBlock),
);

impl RowBlock {
    fn with_fresh_ids(&self, ids: &mut IDGenerator) -> RowBlock {
        let columns = self
            .columns
            .iter()
            .map(|column| ColumnBlock {
                id: ids.new_id(BlockKind::Column),
                kind: ColumnTag::Column,
                width: column.width,
                blocks: column.blocks.iter().map(|b| b.with_fresh_id(ids)).collect(),
                style: column.style.clone(),
            })
            .collect();

        RowBlock {
            id: ids.new_id(BlockKind::Row),
            columns,
            style: self.style.clone(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnBlock> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut ColumnBlock> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }
}
