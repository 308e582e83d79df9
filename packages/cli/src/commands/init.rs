use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailblocks_model::{
    create_button_block, create_divider_block, create_row_block, create_spacer_block, create_text_block,
    ContentBlock, Document, IDGenerator, TextAlign,
};
use std::fs;
use std::path::PathBuf;

pub const SAMPLE_DOCUMENT_NAME: &str = "welcome.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Mailblocks project...".bright_blue().bold());

    let src_dir = PathBuf::from(cwd).join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let sample_file = src_dir.join(SAMPLE_DOCUMENT_NAME);
    if !sample_file.exists() {
        let sample = serde_json::to_string_pretty(&sample_document()?.to_persisted())?;
        fs::write(&sample_file, sample)?;
        println!("  {} Created {}", "✓".green(), SAMPLE_DOCUMENT_NAME);
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: mailblocks tree {}/{}", args.src_dir, SAMPLE_DOCUMENT_NAME);
    println!("  2. Run: mailblocks compile");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

/// Header row, a two-column body and a call to action
fn sample_document() -> Result<Document> {
    let mut ids = IDGenerator::new();

    let mut heading = create_text_block(&mut ids);
    heading.content = "<h1>Welcome aboard!</h1>".to_string();
    heading.style.text_align = TextAlign::Center;
    heading.style.font_size = 24;

    let mut body = create_row_block(2, &mut ids)?;
    let mut left = create_text_block(&mut ids);
    left.content = "Thanks for signing up. Here is what happens next.".to_string();
    body.columns[0].blocks.push(ContentBlock::Text(left));
    let mut button = create_button_block(&mut ids);
    button.text = "Get started".to_string();
    body.columns[1].blocks.push(ContentBlock::Button(button));

    Ok(Document::with_blocks(vec![
        heading.into(),
        create_divider_block(&mut ids).into(),
        body.into(),
        create_spacer_block(&mut ids).into(),
    ]))
}
