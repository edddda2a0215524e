pub mod cli;
pub mod decl;
pub mod doc;
mod render;
pub mod search;

use anyhow::{Context, Result};
use decl::DeclNode;
use doc::unit::RenderedPage;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Loads a parsed program from disk: a JSON array of module declaration
/// trees, produced by the language parser.
pub fn load_program(tree_path: &Path) -> Result<Vec<DeclNode>> {
    let raw = fs::read_to_string(tree_path)
        .with_context(|| format!("could not read declaration tree '{}'", tree_path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed declaration tree '{}'", tree_path.display()))
}

/// Clears and recreates the output directory.
pub fn prepare_doc_path(out_dir: &Path) -> Result<PathBuf> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    Ok(out_dir.to_path_buf())
}

/// Writes rendered pages under the output directory, creating module
/// directories as needed.
pub fn write_pages(pages: &[RenderedPage], doc_path: &Path) -> Result<()> {
    for page in pages {
        let mut page_path = doc_path.to_path_buf();
        for prefix in &page.module_prefixes {
            page_path.push(prefix);
        }
        fs::create_dir_all(&page_path)?;
        page_path.push(&page.file_name);
        fs::write(&page_path, page.contents.as_bytes())?;
    }
    Ok(())
}
