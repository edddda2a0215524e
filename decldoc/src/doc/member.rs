//! Per-scope member tables.
//!
//! Every open scope accumulates one categorized table of its documented
//! children and renders it exactly once, into the scope's own page, when the
//! scope closes.

use crate::render::html_escape;
use anyhow::Result;
use horrorshow::{box_html, html, Raw, Template};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Presentation category of a member-table entry.
///
/// The variant order here is the fixed rendering order; it is a presentation
/// choice, stable across runs regardless of encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Enums,
    Aliases,
    Variables,
    Functions,
    Structs,
    Interfaces,
    Classes,
    Templates,
    Values,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Enums,
        Category::Aliases,
        Category::Variables,
        Category::Functions,
        Category::Structs,
        Category::Interfaces,
        Category::Classes,
        Category::Templates,
        Category::Values,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Enums => "Enums",
            Category::Aliases => "Aliases",
            Category::Variables => "Variables",
            Category::Functions => "Functions",
            Category::Structs => "Structs",
            Category::Interfaces => "Interfaces",
            Category::Classes => "Classes",
            Category::Templates => "Templates",
            Category::Values => "Values",
        }
    }

    /// CSS class and search `type_name` for entries of this category.
    pub fn html_class(self) -> &'static str {
        match self {
            Category::Enums => "enum",
            Category::Aliases => "alias",
            Category::Variables => "variable",
            Category::Functions => "fn",
            Category::Structs => "struct",
            Category::Interfaces => "interface",
            Category::Classes => "class",
            Category::Templates => "template",
            Category::Values => "value",
        }
    }

    fn anchor(self) -> &'static str {
        match self {
            Category::Enums => "enums",
            Category::Aliases => "aliases",
            Category::Variables => "variables",
            Category::Functions => "functions",
            Category::Structs => "structs",
            Category::Interfaces => "interfaces",
            Category::Classes => "classes",
            Category::Templates => "templates",
            Category::Values => "values",
        }
    }
}

/// One row of a member table.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Href to the member's page, relative to the page the table renders
    /// on; `None` for members documented inline (enum members, manifest
    /// constants).
    pub link: Option<String>,
    pub name: String,
    /// Plain-text summary produced by the comment renderer.
    pub summary: String,
    /// Declared type or alias target, shown in the type column.
    pub type_text: Option<String>,
    /// Visible attribute modifiers at the point of declaration, rendered
    /// as badges on the name cell.
    pub attributes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemberTable {
    entries: BTreeMap<Category, Vec<Entry>>,
}

impl MemberTable {
    /// Appends an entry, preserving source encounter order within the
    /// category.
    pub fn record(&mut self, category: Category, entry: Entry) {
        self.entries.entry(category).or_default().push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Emits a heading and a table per non-empty category, in the fixed
    /// [`Category::ALL`] order; emits nothing at all when every category is
    /// empty.
    pub fn render(&self, dst: &mut dyn Write) -> Result<()> {
        for category in Category::ALL {
            let Some(entries) = self.entries.get(&category) else {
                continue;
            };
            if entries.is_empty() {
                continue;
            }
            write_category(dst, category, entries)?;
        }
        Ok(())
    }
}

fn write_category(dst: &mut dyn Write, category: Category, entries: &[Entry]) -> Result<()> {
    let anchor = category.anchor();
    let rows: Vec<String> = entries.iter().map(|entry| entry_row(category, entry)).collect();
    let section = box_html! {
        h2(id=anchor, class="small-section-header") {
            : category.title();
            a(href=format!("#{anchor}"), class="anchor");
        }
        div(class="item-table") {
            table {
                @ for row in &rows {
                    : Raw(row);
                }
            }
        }
    }
    .into_string()
    .unwrap();
    dst.write_str(&section)?;
    Ok(())
}

fn entry_row(category: Category, entry: &Entry) -> String {
    let name_cell = match &entry.link {
        Some(href) => format!(
            "<a class=\"{}\" href=\"{}\">{}</a>",
            category.html_class(),
            html_escape(href),
            html_escape(&entry.name)
        ),
        None => format!("<code>{}</code>", html_escape(&entry.name)),
    };
    html! {
        tr(class="member-row") {
            td(class="item-name") {
                : Raw(&name_cell);
                @ for attr in &entry.attributes {
                    span(class="attr-badge") { : attr.as_str(); }
                }
            }
            @ if let Some(type_text) = &entry.type_text {
                td(class="item-type") {
                    code { : type_text.as_str(); }
                }
            }
            td(class="item-summary") {
                : entry.summary.as_str();
            }
        }
    }
    .into_string()
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        Entry {
            link: Some(format!("{name}.html")),
            name: name.into(),
            summary: format!("about {name}"),
            type_text: None,
            attributes: vec![],
        }
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = MemberTable::default();
        let mut out = String::new();
        table.render(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn categories_render_in_fixed_order() {
        let mut table = MemberTable::default();
        // recorded out of presentation order on purpose
        table.record(Category::Values, entry("v"));
        table.record(Category::Functions, entry("f"));
        table.record(Category::Enums, entry("e"));
        table.record(Category::Aliases, entry("a"));

        let mut out = String::new();
        table.render(&mut out).unwrap();

        let positions: Vec<usize> = ["Enums", "Aliases", "Functions", "Values"]
            .iter()
            .map(|title| out.find(title).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(!out.contains("Structs"));
    }

    #[test]
    fn entries_keep_encounter_order_within_category() {
        let mut table = MemberTable::default();
        table.record(Category::Functions, entry("zeta"));
        table.record(Category::Functions, entry("alpha"));

        let mut out = String::new();
        table.render(&mut out).unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
    }

    #[test]
    fn unlinked_entry_renders_without_anchor() {
        let mut table = MemberTable::default();
        table.record(
            Category::Values,
            Entry {
                link: None,
                name: "RED".into(),
                summary: "the warm one".into(),
                type_text: None,
                attributes: vec![],
            },
        );
        let mut out = String::new();
        table.render(&mut out).unwrap();
        assert!(out.contains("<code>RED</code>"));
        assert!(!out.contains("href=\"RED"));
    }
}
