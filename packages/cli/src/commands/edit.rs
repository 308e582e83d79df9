use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;
use mailblocks_editor::{EditSession, FileStore, Mutation, PaletteItem, SaveStatus, TreeChange};
use mailblocks_model::{ContentBlock, Document, EmailBlock};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Document file (`<email>.json`)
    pub doc: String,

    /// Palette item: row-1 … row-6, text, image, button, spacer, divider
    pub item: PaletteItem,

    /// Append into this column instead of the top level
    #[arg(short, long)]
    pub column: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Document file (`<email>.json`)
    pub doc: String,

    /// Id of the block to remove
    pub id: String,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Document file (`<email>.json`)
    pub doc: String,

    /// Current top-level position
    pub from: usize,

    /// Position the block should land at
    pub to: usize,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Document file (`<email>.json`)
    pub doc: String,
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let (store, mut session) = open(&args.doc, cwd)?;

    let block_id = match &args.column {
        None => session.add_from_palette(args.item)?,
        Some(column_id) => {
            let template = args.item.template(session.ids())?;
            let block = ContentBlock::try_from(template)
                .map_err(|_| anyhow!("{} cannot be placed inside a column", args.item.label()))?;
            let block_id = block.id().to_string();

            let change = session.apply(Mutation::AddToColumn {
                column_id: column_id.clone(),
                block,
            })?;
            if change == TreeChange::Unchanged {
                bail!("No column with id {}", column_id);
            }
            block_id
        }
    };

    save(&store, &mut session)?;
    println!("  {} Added {} {}", "✓".green(), args.item.label(), block_id.dimmed());
    Ok(())
}

pub fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    let (store, mut session) = open(&args.doc, cwd)?;

    let change = session.apply(Mutation::RemoveBlock {
        block_id: args.id.clone(),
    })?;
    if change == TreeChange::Unchanged {
        println!("{} No block with id {}", "⚠️".yellow(), args.id);
        return Ok(());
    }

    save(&store, &mut session)?;
    println!("  {} Removed {}", "✓".green(), args.id);
    Ok(())
}

pub fn move_block(args: MoveArgs, cwd: &str) -> Result<()> {
    let (store, mut session) = open(&args.doc, cwd)?;

    let change = session.apply(Mutation::MoveBlock {
        from_index: args.from,
        to_index: args.to,
    })?;
    if change == TreeChange::Unchanged {
        println!(
            "{} Nothing moved ({} blocks at the top level)",
            "⚠️".yellow(),
            session.document().blocks.len()
        );
        return Ok(());
    }

    save(&store, &mut session)?;
    println!("  {} Moved block {} → {}", "✓".green(), args.from, args.to);
    Ok(())
}

pub fn tree(args: TreeArgs, cwd: &str) -> Result<()> {
    let (_, session) = open(&args.doc, cwd)?;
    print!("{}", render_tree(session.document()));
    Ok(())
}

/// Resolve a document path to its store directory and email id
fn locate(doc: &str, cwd: &str) -> Result<(PathBuf, String)> {
    let path = PathBuf::from(cwd).join(doc);
    let email_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Not a document path: {}", doc))?
        .to_string();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(cwd));
    Ok((dir, email_id))
}

fn open(doc: &str, cwd: &str) -> Result<(FileStore, EditSession)> {
    let (dir, email_id) = locate(doc, cwd)?;
    let store = FileStore::new(dir);
    let session = EditSession::open(&store, &email_id)?;
    Ok((store, session))
}

fn save(store: &FileStore, session: &mut EditSession) -> Result<()> {
    match session.save(store) {
        SaveStatus::Failed(message) => Err(anyhow!("Could not save {}: {}", session.email_id, message)),
        _ => Ok(()),
    }
}

/// One line per block, nested by depth
pub fn render_tree(doc: &Document) -> String {
    let mut out = String::new();

    if doc.is_empty() {
        out.push_str("(empty document)\n");
        return out;
    }

    for (index, block) in doc.blocks.iter().enumerate() {
        out.push_str(&format!("{:>2}. {} {}\n", index, block.kind().to_string().cyan(), block.id()));
        if let EmailBlock::Row(row) = block {
            for column in &row.columns {
                out.push_str(&format!("      {} {} {}%\n", "column".blue(), column.id, column.width));
                for content in &column.blocks {
                    out.push_str(&format!("        {} {}\n", content.kind().to_string().cyan(), content.id()));
                }
            }
        }
    }

    out
}
