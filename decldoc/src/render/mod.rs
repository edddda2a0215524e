//! Shared HTML furniture: page head, sidebar, breadcrumbs, code blocks.
//!
//! Pages stream into their output unit top to bottom, so the chrome here is
//! split into an opening half written when a unit is first acquired and the
//! fixed closing marker appended when the unit is sealed (see
//! [`crate::doc::unit::PAGE_FOOTER`]).

pub(crate) mod comment;
pub(crate) mod signature;

use anyhow::Result;
use horrorshow::{box_html, Template};
use std::fmt::Write;

pub(crate) const GENERATOR: &str = "decldoc";

/// Href of a link that stays on the current page.
pub(crate) const IDENTITY: &str = "#";

pub(crate) fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Everything the opening chrome of a page needs to know.
pub(crate) struct PageMeta {
    /// `<title>` content.
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// CSS class on `<body>`, e.g. `class` or `mod`.
    pub body_class: &'static str,
    /// Label in the sidebar location heading.
    pub location: String,
    /// Href back to the module's own page; `None` on the module page.
    pub module_href: Option<String>,
}

/// Writes the shared opening chrome: document head, sidebar navigation and
/// the opening of the main content section.
pub(crate) fn page_open(dst: &mut dyn Write, meta: &PageMeta) -> Result<()> {
    let head = box_html! {
        head {
            meta(charset="utf-8");
            meta(name="viewport", content="width=device-width, initial-scale=1.0");
            meta(name="generator", content=GENERATOR);
            meta(name="description", content=&meta.description);
            meta(name="keywords", content=&meta.keywords);
            title: meta.title.as_str();
        }
    }
    .into_string()
    .unwrap();

    let sidebar = box_html! {
        nav(class="sidebar") {
            h2(class="location") { : meta.location.as_str(); }
            @ if let Some(href) = &meta.module_href {
                div(class="sidebar-elems") {
                    a(id="module-link", href=href) {
                        p: "Back to module";
                    }
                }
            }
        }
    }
    .into_string()
    .unwrap();

    write!(
        dst,
        "<!DOCTYPE html><html>{head}<body class=\"{} {}\">{sidebar}\
         <main><div class=\"width-limiter\">\
         <section id=\"main-content\" class=\"content\">",
        GENERATOR, meta.body_class
    )?;
    Ok(())
}

/// One segment of the breadcrumb trail.
pub(crate) struct Crumb {
    pub name: String,
    /// `None` renders as plain text (package prefixes have no pages).
    pub href: Option<String>,
    pub class: &'static str,
}

/// Writes the `h1` breadcrumb trail for a page, segments joined by dots.
pub(crate) fn breadcrumbs(dst: &mut dyn Write, crumbs: &[Crumb]) -> Result<()> {
    let segments: Vec<String> = crumbs
        .iter()
        .map(|crumb| match &crumb.href {
            Some(href) => format!(
                "<a class=\"{}\" href=\"{}\">{}</a>",
                crumb.class,
                html_escape(href),
                html_escape(&crumb.name)
            ),
            None => format!(
                "<span class=\"{}\">{}</span>",
                crumb.class,
                html_escape(&crumb.name)
            ),
        })
        .collect();
    write!(
        dst,
        "<div class=\"main-heading\"><h1 class=\"fqn\"><span class=\"in-band\">{}</span></h1></div>",
        segments.join("<span>.</span>")
    )?;
    Ok(())
}

/// Visual separator between overload signature blocks on a shared page.
pub(crate) fn separator(dst: &mut dyn Write) -> Result<()> {
    dst.write_str("<hr class=\"overload-separator\">")?;
    Ok(())
}

/// Writes a declaration signature inside the standard code block.
pub(crate) fn code_block(dst: &mut dyn Write, kind_class: &str, code: &str) -> Result<()> {
    write!(
        dst,
        "<div class=\"docblock item-decl\"><pre class=\"{GENERATOR} {kind_class}\">\
         <code>{}</code></pre></div>",
        html_escape(code)
    )?;
    Ok(())
}
