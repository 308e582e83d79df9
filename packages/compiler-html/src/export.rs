//! Downloadable HTML export

use crate::compiler::{compile_to_html, CompileOptions};
use mailblocks_model::Document;
use serde::Serialize;

pub const HTML_MIME_TYPE: &str = "text/html";

/// A compiled email ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Compile `document` into `<display name>.html`
pub fn export(document: &Document, display_name: &str) -> ExportedFile {
    let name = display_name.trim();
    let title = if name.is_empty() { "Email" } else { name };

    let options = CompileOptions {
        title: title.to_string(),
        ..CompileOptions::default()
    };

    ExportedFile {
        file_name: format!("{}.html", file_stem(name)),
        mime_type: HTML_MIME_TYPE.to_string(),
        contents: compile_to_html(document, options),
    }
}

fn file_stem(name: &str) -> String {
    if name.is_empty() {
        return "email".to_string();
    }
    name.replace(['/', '\\'], "-")
}
