use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailblocks_compiler_html::{compile_to_html, CompileOptions};
use mailblocks_model::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Emit HTML without indentation (overrides config)
    #[arg(long)]
    pub compact: bool,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let src_dir = config.get_src_dir(cwd);

    if !src_dir.exists() {
        return Err(anyhow!("Source directory does not exist: {:?}", src_dir));
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    let pretty = config.pretty && !args.compact;

    if !args.stdout {
        println!("{}", "🔨 Compiling email documents...".bright_blue().bold());
    }

    let documents = find_documents(&src_dir);

    if documents.is_empty() {
        println!("{}", "⚠️  No .json documents found".yellow());
        return Ok(());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for path in &documents {
        let relative_path = path.strip_prefix(&src_dir).unwrap_or(path);
        match compile_file(path, relative_path, &out_dir, pretty, args.stdout) {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!("  {} {} → {}", "✓".green(), relative_path.display(), output_path);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), relative_path.display(), e.to_string().red());
            }
        }
    }

    if args.stdout {
        return Ok(());
    }

    println!();
    if error_count == 0 {
        println!("{} Compiled {} emails successfully", "✅".green(), success_count);
    } else {
        println!(
            "{} Compiled {} emails, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

fn find_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

fn compile_file(
    file_path: &Path,
    relative_path: &Path,
    out_dir: &Path,
    pretty: bool,
    stdout: bool,
) -> Result<String> {
    let source = fs::read_to_string(file_path)?;

    // Malformed documents compile as empty emails
    let document = Document::from_json(&source);
    debug!(path = %file_path.display(), blocks = document.blocks.len(), "Loaded document");

    let title = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Email")
        .to_string();
    let options = CompileOptions {
        pretty,
        title,
        ..CompileOptions::default()
    };
    let output = compile_to_html(&document, options);

    if stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let output_file = out_dir.join(relative_path).with_extension("html");

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}
