//! Accumulates search entries during traversal and writes the shared
//! `search.js` artifact the generated pages load.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const JS_SEARCH_FILE_NAME: &str = "search.js";

/// One searchable item. `module_info` is the dotted module path split into
/// segments; together with `html_filename` it locates the page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    pub html_filename: String,
    pub module_info: Vec<String>,
    pub name: String,
    pub preview: String,
    pub type_name: String,
}

/// The item pool the search bar pulls from, keyed by root package name.
/// BTreeMap keeps the serialized index byte-stable across runs.
#[derive(Debug, Default)]
pub struct SearchIndex {
    items: BTreeMap<String, Vec<SearchItem>>,
}

impl SearchIndex {
    pub fn add(&mut self, project_name: &str, item: SearchItem) {
        self.items.entry(project_name.to_owned()).or_default().push(item);
    }

    pub fn to_search_js(&self) -> Result<String> {
        let index = serde_json::to_string(&self.items)?;
        Ok(format!(
            "var SEARCH_INDEX={index};\n\
             \"object\"==typeof exports&&\"undefined\"!=typeof module&&(module.exports=SEARCH_INDEX);"
        ))
    }
}

/// Writes `search.js` into the output directory root.
pub fn write_search_index(doc_path: &Path, index: &SearchIndex) -> Result<()> {
    fs::write(doc_path.join(JS_SEARCH_FILE_NAME), index.to_search_js()?)?;
    Ok(())
}
