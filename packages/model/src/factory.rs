//! # Block Factories
//!
//! One constructor per block kind. Each returns a ready-to-insert block with
//! the editor's default styling and a fresh id from the session generator.

use crate::block::*;
use crate::error::ModelError;
use crate::id_generator::IDGenerator;

/// Most columns a row may hold
pub const MAX_COLUMNS: usize = 6;

pub const DEFAULT_TEXT: &str = "Enter your text here...";
pub const DEFAULT_IMAGE_SRC: &str = "/placeholder.svg?height=200&width=400";

/// Width given to each of `count` columns.
///
/// Floors `100 / count`; three columns get 33% each and the remaining 1% is
/// left unallocated.
pub fn column_width(count: usize) -> u32 {
    (100 / count.max(1)) as u32
}

pub fn create_row_block(column_count: usize, ids: &mut IDGenerator) -> Result<RowBlock, ModelError> {
    if column_count == 0 || column_count > MAX_COLUMNS {
        return Err(ModelError::ColumnCount(column_count));
    }

    let width = column_width(column_count);
    let columns = (0..column_count)
        .map(|_| ColumnBlock {
            id: ids.new_id(BlockKind::Column),
            kind: ColumnTag::Column,
            width,
            blocks: Vec::new(),
            style: ColumnStyle::default(),
        })
        .collect();

    Ok(RowBlock {
        id: ids.new_id(BlockKind::Row),
        columns,
        style: RowStyle::default(),
    })
}

pub fn create_text_block(ids: &mut IDGenerator) -> TextBlock {
    TextBlock {
        id: ids.new_id(BlockKind::Text),
        content: DEFAULT_TEXT.to_string(),
        style: TextStyle::default(),
    }
}

pub fn create_image_block(ids: &mut IDGenerator) -> ImageBlock {
    ImageBlock {
        id: ids.new_id(BlockKind::Image),
        src: DEFAULT_IMAGE_SRC.to_string(),
        alt: "Image".to_string(),
        href: None,
        style: ImageStyle::default(),
    }
}

pub fn create_button_block(ids: &mut IDGenerator) -> ButtonBlock {
    ButtonBlock {
        id: ids.new_id(BlockKind::Button),
        text: "Click Here".to_string(),
        href: "#".to_string(),
        style: ButtonStyle::default(),
    }
}

pub fn create_spacer_block(ids: &mut IDGenerator) -> SpacerBlock {
    SpacerBlock {
        id: ids.new_id(BlockKind::Spacer),
        height: default_spacer_height(),
    }
}

pub fn create_divider_block(ids: &mut IDGenerator) -> DividerBlock {
    DividerBlock {
        id: ids.new_id(BlockKind::Divider),
        style: DividerStyle::default(),
    }
}

/// Build a leaf block of the given kind; `None` for rows and columns
pub fn create_content_block(kind: BlockKind, ids: &mut IDGenerator) -> Option<ContentBlock> {
    let block = match kind {
        BlockKind::Text => ContentBlock::Text(create_text_block(ids)),
        BlockKind::Image => ContentBlock::Image(create_image_block(ids)),
        BlockKind::Button => ContentBlock::Button(create_button_block(ids)),
        BlockKind::Spacer => ContentBlock::Spacer(create_spacer_block(ids)),
        BlockKind::Divider => ContentBlock::Divider(create_divider_block(ids)),
        BlockKind::Row | BlockKind::Column => return None,
    };
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontWeight, TextAlign, VerticalAlign};

    #[test]
    fn test_row_columns_share_floor_width() {
        let mut ids = IDGenerator::from_seed("1");
        let row = create_row_block(3, &mut ids).unwrap();

        assert_eq!(row.columns.len(), 3);
        assert!(row.columns.iter().all(|c| c.width == 33));
        // Remainder is not redistributed
        assert_eq!(row.columns.iter().map(|c| c.width).sum::<u32>(), 99);
        assert!(row.columns.iter().all(|c| c.style.vertical_align == VerticalAlign::Top));
        assert!(row.columns.iter().all(|c| c.style.padding == 10));
    }

    #[test]
    fn test_row_column_count_bounds() {
        let mut ids = IDGenerator::from_seed("1");
        assert!(matches!(create_row_block(0, &mut ids), Err(ModelError::ColumnCount(0))));
        assert!(matches!(create_row_block(7, &mut ids), Err(ModelError::ColumnCount(7))));
        assert_eq!(create_row_block(6, &mut ids).unwrap().columns[0].width, 16);
    }

    #[test]
    fn test_content_defaults() {
        let mut ids = IDGenerator::from_seed("1");

        let text = create_text_block(&mut ids);
        assert_eq!(text.content, DEFAULT_TEXT);
        assert_eq!(text.style.font_size, 16);
        assert_eq!(text.style.font_family, "Arial");
        assert_eq!(text.style.line_height, 1.5);

        let button = create_button_block(&mut ids);
        assert_eq!(button.style.font_weight, FontWeight::Bold);
        assert_eq!(button.style.text_align, TextAlign::Center);
        assert_eq!(button.href, "#");

        assert_eq!(create_spacer_block(&mut ids).height, 20);
        assert_eq!(create_divider_block(&mut ids).style.color, "#e5e7eb");
        assert!(create_image_block(&mut ids).href.is_none());
    }

    #[test]
    fn test_create_content_block_refuses_containers() {
        let mut ids = IDGenerator::from_seed("1");
        assert!(create_content_block(BlockKind::Row, &mut ids).is_none());
        assert!(create_content_block(BlockKind::Column, &mut ids).is_none());
        assert_eq!(
            create_content_block(BlockKind::Divider, &mut ids).map(|b| b.kind()),
            Some(BlockKind::Divider)
        );
    }
}
