//! Scope bookkeeping for the traversal: the namespace path, the per-scope
//! member tables, the prior-comment stack handed to the comment renderer,
//! and the lexically scoped attribute context.
//!
//! All of this is plain state owned by one traversal engine instance.
//! Mismatched push/pop calls are defects and fail hard.

use crate::doc::member::{Category, Entry, MemberTable};
use crate::doc::unit::{UnitPath, PAGE_EXTENSION};

/// The namespace path from module root to the current position.
///
/// The first `base_len` segments are the module's package path and never
/// pop; everything beyond them is class/struct/function nesting, pushed and
/// popped in strict LIFO order. A root member table sits below the first
/// nested segment, so there is always one more table than nested segments.
#[derive(Debug)]
pub struct ScopeStack {
    base_len: usize,
    segments: Vec<String>,
    tables: Vec<MemberTable>,
    comments: Vec<String>,
}

impl ScopeStack {
    pub fn new(module_prefixes: &[String], module_comment: Option<&str>) -> Self {
        assert!(
            !module_prefixes.is_empty(),
            "scope stack needs a non-empty module path"
        );
        Self {
            base_len: module_prefixes.len(),
            segments: module_prefixes.to_vec(),
            tables: vec![MemberTable::default()],
            comments: vec![module_comment.unwrap_or_default().to_owned()],
        }
    }

    /// Appends a segment and opens a fresh member table for the new scope.
    pub fn enter(&mut self, name: &str, raw_comment: &str) {
        self.segments.push(name.to_owned());
        self.tables.push(MemberTable::default());
        self.comments.push(raw_comment.to_owned());
    }

    /// Pops the current scope and hands back its member table so the caller
    /// can render it into the scope's output unit.
    pub fn leave(&mut self) -> MemberTable {
        assert!(
            self.segments.len() > self.base_len,
            "left a scope below the module root"
        );
        self.segments.pop();
        self.comments.pop();
        self.tables.pop().expect("scope stack lost its member table")
    }

    /// Closes the root scope at the end of the module traversal, returning
    /// the module-level member table.
    pub fn finish(&mut self) -> MemberTable {
        assert_eq!(
            self.segments.len(),
            self.base_len,
            "module traversal finished with scopes still open"
        );
        self.tables.pop().expect("scope stack lost its member table")
    }

    /// Records an entry into the current scope's table.
    pub fn record(&mut self, category: Category, entry: Entry) {
        self.tables
            .last_mut()
            .expect("scope stack lost its member table")
            .record(category, entry);
    }

    pub fn current_path(&self) -> &[String] {
        &self.segments
    }

    /// Class/struct/function nesting segments beyond the module path.
    pub fn nested(&self) -> &[String] {
        &self.segments[self.base_len..]
    }

    pub fn depth(&self) -> usize {
        self.segments.len() - self.base_len
    }

    /// Raw doc comments of every enclosing scope, outermost first. The
    /// comment renderer resolves cross-references against these.
    pub fn comment_stack(&self) -> &[String] {
        &self.comments
    }

    /// Canonical output location for a symbol declared in the current
    /// scope: all symbol pages of a module share one directory, with nested
    /// names joined by dots. `pkg.sub` + nesting `C` + symbol `f` lands at
    /// `pkg/sub/C.f.html`.
    pub fn unit_path(&self, symbol: &str) -> UnitPath {
        let mut dotted = self.nested().join(".");
        if !dotted.is_empty() {
            dotted.push('.');
        }
        dotted.push_str(symbol);
        UnitPath {
            module_prefixes: self.segments[..self.base_len].to_vec(),
            file_name: format!("{dotted}.{PAGE_EXTENSION}"),
        }
    }

    /// Href from the page the current scope's member table renders on to
    /// `symbol`'s page. The module page sits next to the module directory,
    /// so its links descend one level; nested pages are flat siblings.
    pub fn link_for(&self, symbol: &str) -> String {
        let file_name = self.unit_path(symbol).file_name;
        if self.nested().is_empty() {
            format!("{}/{}", self.segments[self.base_len - 1], file_name)
        } else {
            file_name
        }
    }
}

/// Attribute modifiers currently in effect, one frame per open lexical
/// block or aggregate body.
#[derive(Debug, Default)]
pub struct AttributeContext {
    frames: Vec<Vec<String>>,
}

impl AttributeContext {
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames
            .pop()
            .expect("popped attribute context past the outermost frame");
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Marks the current frame length so a declaration-scoped attribute set
    /// can be rolled back without disturbing earlier block attributes.
    pub fn mark(&self) -> usize {
        self.top().len()
    }

    pub fn extend(&mut self, attrs: &[String]) {
        self.frames
            .last_mut()
            .expect("attribute context has no open frame")
            .extend(attrs.iter().cloned());
    }

    pub fn truncate_to(&mut self, mark: usize) {
        self.frames
            .last_mut()
            .expect("attribute context has no open frame")
            .truncate(mark);
    }

    /// Every visible attribute, outermost frame first.
    pub fn visible(&self) -> Vec<String> {
        self.frames.iter().flatten().cloned().collect()
    }

    fn top(&self) -> &[String] {
        self.frames.last().expect("attribute context has no open frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_owned).collect()
    }

    #[test]
    fn paths_and_links_at_module_level() {
        let scope = ScopeStack::new(&prefixes("pkg.sub"), None);
        assert_eq!(scope.unit_path("f").canonical(), "pkg/sub/f.html");
        assert_eq!(scope.link_for("f"), "sub/f.html");
    }

    #[test]
    fn paths_and_links_when_nested() {
        let mut scope = ScopeStack::new(&prefixes("pkg.sub"), None);
        scope.enter("C", "");
        assert_eq!(scope.unit_path("f").canonical(), "pkg/sub/C.f.html");
        assert_eq!(scope.link_for("f"), "C.f.html");
        scope.leave();
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn comment_stack_follows_nesting() {
        let mut scope = ScopeStack::new(&prefixes("pkg"), Some("module docs"));
        scope.enter("C", "class docs");
        let stack: Vec<&str> = scope.comment_stack().iter().map(String::as_str).collect();
        assert_eq!(stack, vec!["module docs", "class docs"]);
        scope.leave();
        let stack: Vec<&str> = scope.comment_stack().iter().map(String::as_str).collect();
        assert_eq!(stack, vec!["module docs"]);
    }

    #[test]
    #[should_panic(expected = "below the module root")]
    fn leaving_root_scope_panics() {
        let mut scope = ScopeStack::new(&prefixes("pkg.sub"), None);
        scope.leave();
    }

    #[test]
    fn declaration_attributes_roll_back() {
        let mut attrs = AttributeContext::default();
        attrs.push_frame();
        attrs.extend(&["@safe".into()]);
        let mark = attrs.mark();
        attrs.extend(&["const".into()]);
        assert_eq!(attrs.visible(), ["@safe", "const"]);
        attrs.truncate_to(mark);
        assert_eq!(attrs.visible(), ["@safe"]);
        attrs.pop_frame();
        assert_eq!(attrs.frame_count(), 0);
    }

    #[test]
    fn inner_frames_see_outer_attributes() {
        let mut attrs = AttributeContext::default();
        attrs.push_frame();
        attrs.extend(&["@safe".into()]);
        attrs.push_frame();
        attrs.extend(&["nothrow".into()]);
        assert_eq!(attrs.visible(), ["@safe", "nothrow"]);
        attrs.pop_frame();
        assert_eq!(attrs.visible(), ["@safe"]);
    }

    #[test]
    #[should_panic(expected = "outermost frame")]
    fn popping_empty_attribute_context_panics() {
        let mut attrs = AttributeContext::default();
        attrs.pop_frame();
    }
}
