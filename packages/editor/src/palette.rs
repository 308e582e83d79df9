//! Block palette: the templates offered for insertion.

use mailblocks_model::{
    create_button_block, create_divider_block, create_image_block,
    create_row_block, create_spacer_block, create_text_block, BlockKind, ContentBlock, EmailBlock,
    IDGenerator, ModelError, MAX_COLUMNS,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteItem {
    Row { columns: usize },
    Text,
    Image,
    Button,
    Spacer,
    Divider,
}

impl PaletteItem {
    /// Layout items first, then content items
    pub fn all() -> Vec<PaletteItem> {
        let mut items: Vec<PaletteItem> = (1..=MAX_COLUMNS)
            .map(|columns| PaletteItem::Row { columns })
            .collect();
        items.extend([
            PaletteItem::Text,
            PaletteItem::Image,
            PaletteItem::Button,
            PaletteItem::Spacer,
            PaletteItem::Divider,
        ]);
        items
    }

    pub fn label(&self) -> String {
        match self {
            PaletteItem::Row { columns: 1 } => "1 Column".to_string(),
            PaletteItem::Row { columns } => format!("{} Columns", columns),
            PaletteItem::Text => "Text".to_string(),
            PaletteItem::Image => "Image".to_string(),
            PaletteItem::Button => "Button".to_string(),
            PaletteItem::Spacer => "Spacer".to_string(),
            PaletteItem::Divider => "Divider".to_string(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaletteItem::Row { columns: 1 } => "Single column layout",
            PaletteItem::Row { columns: 2 } => "Two column layout",
            PaletteItem::Row { columns: 3 } => "Three column layout",
            PaletteItem::Row { columns: 4 } => "Four column layout",
            PaletteItem::Row { columns: 5 } => "Five column layout",
            PaletteItem::Row { .. } => "Six column layout",
            PaletteItem::Text => "Add text content",
            PaletteItem::Image => "Add an image",
            PaletteItem::Button => "Add a call-to-action",
            PaletteItem::Spacer => "Add vertical spacing",
            PaletteItem::Divider => "Add a horizontal line",
        }
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, PaletteItem::Row { .. })
    }

    /// Build a fresh block for this item
    pub fn template(&self, ids: &mut IDGenerator) -> Result<EmailBlock, ModelError> {
        let block = match *self {
            PaletteItem::Row { columns } => create_row_block(columns, ids)?.into(),
            PaletteItem::Text => create_text_block(ids).into(),
            PaletteItem::Image => create_image_block(ids).into(),
            PaletteItem::Button => create_button_block(ids).into(),
            PaletteItem::Spacer => create_spacer_block(ids).into(),
            PaletteItem::Divider => create_divider_block(ids).into(),
        };
        Ok(block)
    }
}

impl fmt::Display for PaletteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteItem::Row { columns } => write!(f, "row-{}", columns),
            PaletteItem::Text => f.write_str("text"),
            PaletteItem::Image => f.write_str("image"),
            PaletteItem::Button => f.write_str("button"),
            PaletteItem::Spacer => f.write_str("spacer"),
            PaletteItem::Divider => f.write_str("divider"),
        }
    }
}

impl FromStr for PaletteItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(count) = s.strip_prefix("row-") {
            return match count.parse::<usize>() {
                Ok(columns) if (1..=MAX_COLUMNS).contains(&columns) => Ok(PaletteItem::Row { columns }),
                _ => Err(format!("Unknown block type: {}", s)),
            };
        }

        match s {
            "text" => Ok(PaletteItem::Text),
            "image" => Ok(PaletteItem::Image),
            "button" => Ok(PaletteItem::Button),
            "spacer" => Ok(PaletteItem::Spacer),
            "divider" => Ok(PaletteItem::Divider),
            _ => Err(format!("Unknown block type: {}", s)),
        }
    }
}

/// Content block with the fields the "add content" dialog lets users fill in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDraft {
    Text { content: String },
    Image { src: String, alt: String },
    Button { text: String, href: String },
    /// Height as typed; anything that isn't a positive number means 20px
    Spacer { height: String },
    Divider,
}

impl ContentDraft {
    /// Turn the draft into a block with a fresh id and default styling
    pub fn build(&self, ids: &mut IDGenerator) -> ContentBlock {
        match self {
            ContentDraft::Text { content } => {
                let mut block = create_text_block(ids);
                block.content = content.clone();
                ContentBlock::Text(block)
            }
            ContentDraft::Image { src, alt } => {
                let mut block = create_image_block(ids);
                block.src = src.clone();
                block.alt = alt.clone();
                ContentBlock::Image(block)
            }
            ContentDraft::Button { text, href } => {
                let mut block = create_button_block(ids);
                block.text = text.clone();
                block.href = href.clone();
                ContentBlock::Button(block)
            }
            ContentDraft::Spacer { height } => {
                let mut block = create_spacer_block(ids);
                if let Ok(h) = height.trim().parse::<u32>() {
                    if h > 0 {
                        block.height = h;
                    }
                }
                ContentBlock::Spacer(block)
            }
            ContentDraft::Divider => ContentBlock::Divider(create_divider_block(ids)),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentDraft::Text { .. } => BlockKind::Text,
            ContentDraft::Image { .. } => BlockKind::Image,
            ContentDraft::Button { .. } => BlockKind::Button,
            ContentDraft::Spacer { .. } => BlockKind::Spacer,
            ContentDraft::Divider => BlockKind::Divider,
        }
    }
}
