//! Renders raw doc comments to HTML and produces the plain-text summaries
//! used by member tables and the search index.

use crate::doc::examples::Example;
use crate::render::html_escape;
use anyhow::Result;
use comrak::{markdown_to_html, ComrakOptions};
use std::fmt::Write;

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.render.hardbreaks = true;
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.superscript = true;
    options.extension.footnotes = true;
    options.parse.smart = true;
    options.parse.default_info_string = Some("source".into());
    options
}

/// Renders `raw` into `dst` as an expandable doc block, appends any matched
/// examples, and returns the plain-text summary of the comment's first
/// paragraph.
///
/// `scope_comments` is the stack of raw comments of every enclosing scope;
/// markdown reference-link definitions found there stay resolvable inside
/// nested comments.
pub(crate) fn render_docblock(
    dst: &mut dyn Write,
    raw: &str,
    scope_comments: &[String],
    examples: &[Example],
) -> Result<String> {
    let html = to_html(raw, scope_comments);
    write!(
        dst,
        "<details class=\"decldoc-toggle top-doc\" open>\
         <summary class=\"hideme\"><span>Expand description</span></summary>\
         <div class=\"docblock\">{html}</div></details>"
    )?;
    for example in examples {
        write!(dst, "<h2 class=\"example-header\">Example</h2>")?;
        write!(dst, "<div class=\"docblock example\">")?;
        if let Some(comment) = &example.doc_comment {
            dst.write_str(&to_html(comment, scope_comments))?;
        }
        write!(
            dst,
            "<pre class=\"decldoc example\"><code>{}</code></pre>",
            html_escape(&example.text)
        )?;
        write!(dst, "</div>")?;
    }
    Ok(plain_summary(&html))
}

/// Summary without a rendering side effect, for members documented inline.
pub(crate) fn summary_of(raw: &str) -> String {
    plain_summary(&to_html(raw, &[]))
}

fn to_html(raw: &str, scope_comments: &[String]) -> String {
    let defs = reference_definitions(scope_comments);
    let source = if defs.is_empty() {
        raw.to_owned()
    } else {
        format!("{raw}\n\n{defs}")
    };
    markdown_to_html(&source, &comrak_options())
}

/// Markdown reference-link definition lines (`[label]: target`) from the
/// enclosing scopes' comments, so a nested comment can use a shorthand
/// reference its aggregate or module defined.
fn reference_definitions(scope_comments: &[String]) -> String {
    let mut defs = String::new();
    for comment in scope_comments {
        for line in comment.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with('[') && trimmed.contains("]:") {
                defs.push_str(trimmed);
                defs.push('\n');
            }
        }
    }
    defs
}

/// Checks if some raw html (rendered from markdown) contains a header.
/// If it does, it splits at the header and returns the slice that
/// preceded it.
fn split_at_markdown_header(raw_html: &str) -> &str {
    for header in ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>"] {
        if let Some((preceding, _)) = raw_html.split_once(header) {
            return preceding;
        }
    }
    raw_html
}

/// First paragraph of the rendered comment with tags stripped and entities
/// decoded, whitespace collapsed.
fn plain_summary(html: &str) -> String {
    let html = split_at_markdown_header(html);
    let first_paragraph = html.split_once("</p>").map(|(head, _)| head).unwrap_or(html);

    let mut text = String::with_capacity(first_paragraph.len());
    let mut in_tag = false;
    for ch in first_paragraph.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
