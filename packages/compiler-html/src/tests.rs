use crate::{compile, compile_to_html, export, CompileOptions};
use mailblocks_model::{
    create_button_block, create_divider_block, create_image_block, create_row_block, create_spacer_block,
    create_text_block, ContentBlock, Document, IDGenerator,
};

const EMPTY_COLUMN_CELL: &str = "<td style=\"font-size: 1px; line-height: 1px;\">&nbsp;</td>";

#[test]
fn test_compile_empty_document() {
    let html = compile(&Document::new());

    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("max-width: 600px; margin: 0 auto;"));
    assert!(html.contains("role=\"presentation\""));
    assert!(html.contains("<tbody>"));
    assert!(!html.contains("<tr"));
}

#[test]
fn test_compile_three_column_row() {
    let mut ids = IDGenerator::from_seed("b");
    let mut row = create_row_block(3, &mut ids).unwrap();
    let mut text = create_text_block(&mut ids);
    text.content = "Hello".to_string();
    row.columns[0].blocks.push(ContentBlock::Text(text));
    let doc = Document::with_blocks(vec![row.into()]);

    let html = compile(&doc);

    println!("Generated HTML:\n{}", html);

    assert_eq!(html.matches("width=\"33%\"").count(), 3);
    assert_eq!(html.matches(EMPTY_COLUMN_CELL).count(), 2);

    // "Hello" lands in the first column, before the two placeholders
    let hello = html.find("Hello").unwrap();
    let first_placeholder = html.find(EMPTY_COLUMN_CELL).unwrap();
    let first_column = html.find("width=\"33%\"").unwrap();
    assert!(first_column < hello && hello < first_placeholder);
}

#[test]
fn test_compile_is_deterministic() {
    let mut ids = IDGenerator::from_seed("d");
    let doc = Document::with_blocks(vec![
        create_image_block(&mut ids).into(),
        create_button_block(&mut ids).into(),
        create_row_block(2, &mut ids).unwrap().into(),
    ]);

    assert_eq!(compile(&doc), compile(&doc));
}

#[test]
fn test_compile_text_block_styles() {
    let mut ids = IDGenerator::from_seed("t");
    let mut text = create_text_block(&mut ids);
    text.content = "<strong>Sale</strong> today".to_string();
    let doc = Document::with_blocks(vec![text.into()]);

    let html = compile(&doc);

    assert!(html.contains("font-size: 16px;"));
    assert!(html.contains("font-weight: normal;"));
    assert!(html.contains("text-align: left;"));
    assert!(html.contains("color: #000000;"));
    assert!(html.contains("padding: 10px;"));
    assert!(html.contains("line-height: 1.5;"));
    // Transparent backgrounds are left out
    assert!(!html.contains("background-color: transparent"));
    // Text content is authored HTML
    assert!(html.contains("<div><strong>Sale</strong> today</div>"));
}

#[test]
fn test_compile_image_with_and_without_link() {
    let mut ids = IDGenerator::from_seed("i");
    let plain = create_image_block(&mut ids);
    let mut linked = create_image_block(&mut ids);
    linked.href = Some("https://example.com/?a=1&b=2".to_string());
    let mut empty_link = create_image_block(&mut ids);
    empty_link.href = Some(String::new());

    let doc = Document::with_blocks(vec![plain.into(), linked.into(), empty_link.into()]);
    let html = compile(&doc);

    assert_eq!(html.matches("<img ").count(), 3);
    assert_eq!(html.matches("<a href=").count(), 1);
    assert!(html.contains("<a href=\"https://example.com/?a=1&amp;b=2\">"));
    assert!(html.contains("src=\"/placeholder.svg?height=200&amp;width=400\""));
    assert!(html.contains("max-width: 100%; display: block;"));
}

#[test]
fn test_compile_button_escapes_text() {
    let mut ids = IDGenerator::from_seed("btn");
    let mut button = create_button_block(&mut ids);
    button.text = "Buy <now> & save".to_string();
    button.href = "https://shop.example/\"x\"".to_string();
    let doc = Document::with_blocks(vec![button.into()]);

    let html = compile(&doc);

    assert!(html.contains("Buy &lt;now&gt; &amp; save</a>"));
    assert!(html.contains("href=\"https://shop.example/&quot;x&quot;\""));
    assert!(html.contains("background-color: #3b82f6; border-radius: 6px;"));
    assert!(html.contains("padding: 12px 24px;"));
    assert!(html.contains("text-decoration: none;"));
    assert!(html.contains("font-weight: bold;"));
}

#[test]
fn test_compile_spacer_and_divider() {
    let mut ids = IDGenerator::from_seed("s");
    let mut spacer = create_spacer_block(&mut ids);
    spacer.height = 32;
    let doc = Document::with_blocks(vec![spacer.into(), create_divider_block(&mut ids).into()]);

    let html = compile(&doc);

    assert!(html.contains("height: 32px; line-height: 32px; font-size: 1px;"));
    assert!(html.contains("border-top: 1px solid #e5e7eb;"));
    assert!(html.contains("padding: 20px;"));
}

#[test]
fn test_compact_output_has_no_newlines() {
    let mut ids = IDGenerator::from_seed("c");
    let doc = Document::with_blocks(vec![create_text_block(&mut ids).into()]);

    let html = compile_to_html(
        &doc,
        CompileOptions {
            pretty: false,
            ..CompileOptions::default()
        },
    );

    assert!(!html.contains('\n'));
    assert!(html.contains("<tr><td><table"));
}

#[test]
fn test_document_style_reaches_shell() {
    let mut doc = Document::new();
    doc.style.background_color = "#f3f4f6".to_string();
    doc.style.max_width = 640;

    let html = compile(&doc);

    assert!(html.contains("background-color: #f3f4f6;"));
    assert!(html.contains("max-width: 640px;"));
}

#[test]
fn test_export_file() {
    let file = export(&Document::new(), "  Promo / March  ");
    assert_eq!(file.file_name, "Promo - March.html");
    assert_eq!(file.mime_type, "text/html");
    assert!(file.contents.contains("<title>Promo / March</title>"));

    let unnamed = export(&Document::new(), "   ");
    assert_eq!(unnamed.file_name, "email.html");
    assert!(unnamed.contents.contains("<title>Email</title>"));

    let json = serde_json::to_value(&file).unwrap();
    assert_eq!(json["mimeType"], "text/html");
}
