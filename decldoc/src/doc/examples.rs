//! Matching trailing example blocks to the declarations they document.
//!
//! Built once over the whole tree before traversal and consulted read-only
//! afterwards, keyed by declaration identity. Keeping this association in a
//! side table means the externally-owned declaration tree never needs to be
//! decorated.

use crate::decl::{DeclId, DeclKind, DeclNode};
use std::collections::HashMap;

/// One usage example: the source text of a documented test block that
/// trails a declaration, plus the block's own doc comment.
#[derive(Clone, Debug)]
pub struct Example {
    pub text: String,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Default)]
pub struct ExampleIndex {
    map: HashMap<DeclId, Vec<Example>>,
}

impl ExampleIndex {
    /// Walks every member list in the tree. A test block with a doc comment
    /// attaches to the nearest preceding non-block declaration in the same
    /// list; consecutive test blocks all attach to that same declaration.
    /// Undocumented test blocks attach nothing.
    pub fn build(root: &DeclNode) -> Self {
        let mut index = Self::default();
        index.scan(std::slice::from_ref(root));
        index
    }

    pub fn lookup(&self, id: DeclId) -> &[Example] {
        self.map.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    fn scan(&mut self, members: &[DeclNode]) {
        let mut preceding: Option<DeclId> = None;
        for node in members {
            match &node.kind {
                DeclKind::Block(block) if block.is_test => {
                    if let (Some(id), Some(comment)) = (preceding, &node.doc_comment) {
                        self.map.entry(id).or_default().push(Example {
                            text: block.source_text.clone().unwrap_or_default(),
                            doc_comment: Some(comment.clone()),
                        });
                    }
                    // does not reset `preceding`: a run of test blocks all
                    // belongs to the declaration before the run
                }
                DeclKind::Block(block) => {
                    self.scan(&block.members);
                    preceding = None;
                }
                DeclKind::Module(m) => {
                    self.scan(&m.members);
                    preceding = Some(node.id);
                }
                DeclKind::Enum(e) => {
                    self.scan(&e.members);
                    preceding = Some(node.id);
                }
                DeclKind::Class(a)
                | DeclKind::Struct(a)
                | DeclKind::Interface(a)
                | DeclKind::Template(a) => {
                    self.scan(&a.members);
                    preceding = Some(node.id);
                }
                DeclKind::Function(f) => {
                    self.scan(&f.body);
                    preceding = Some(node.id);
                }
                DeclKind::Constructor(c) => {
                    self.scan(&c.body);
                    preceding = Some(node.id);
                }
                DeclKind::EnumMember(_) | DeclKind::Alias(_) | DeclKind::Variable(_) => {
                    preceding = Some(node.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{BlockDecl, FunctionDecl, ModuleDecl};

    fn function(id: u64, name: &str) -> DeclNode {
        DeclNode {
            id: DeclId(id),
            doc_comment: Some("Does a thing.".into()),
            attributes: vec![],
            kind: DeclKind::Function(FunctionDecl {
                name: name.into(),
                return_type: Some("int".into()),
                type_params: vec![],
                params: vec![],
                member_attrs: vec![],
                constraint: None,
                body: vec![],
            }),
        }
    }

    fn test_block(id: u64, text: &str, comment: Option<&str>) -> DeclNode {
        DeclNode {
            id: DeclId(id),
            doc_comment: comment.map(str::to_owned),
            attributes: vec![],
            kind: DeclKind::Block(BlockDecl {
                is_test: true,
                source_text: Some(text.into()),
                members: vec![],
            }),
        }
    }

    fn module(members: Vec<DeclNode>) -> DeclNode {
        DeclNode {
            id: DeclId(0),
            doc_comment: None,
            attributes: vec![],
            kind: DeclKind::Module(ModuleDecl {
                package_path: vec!["pkg".into()],
                members,
            }),
        }
    }

    #[test]
    fn trailing_documented_test_block_attaches() {
        let root = module(vec![
            function(1, "f"),
            test_block(2, "assert(f() == 1);", Some("basic use")),
        ]);
        let index = ExampleIndex::build(&root);
        let examples = index.lookup(DeclId(1));
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].text, "assert(f() == 1);");
        assert_eq!(examples[0].doc_comment.as_deref(), Some("basic use"));
    }

    #[test]
    fn undocumented_test_block_attaches_nothing() {
        let root = module(vec![function(1, "f"), test_block(2, "assert(true);", None)]);
        let index = ExampleIndex::build(&root);
        assert!(index.lookup(DeclId(1)).is_empty());
    }

    #[test]
    fn consecutive_test_blocks_share_one_declaration() {
        let root = module(vec![
            function(1, "f"),
            test_block(2, "first", Some("one")),
            test_block(3, "second", Some("two")),
        ]);
        let index = ExampleIndex::build(&root);
        let examples = index.lookup(DeclId(1));
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].text, "first");
        assert_eq!(examples[1].text, "second");
    }

    #[test]
    fn test_block_at_list_start_is_ignored() {
        let root = module(vec![
            test_block(2, "orphan", Some("no owner")),
            function(1, "f"),
        ]);
        let index = ExampleIndex::build(&root);
        assert!(index.lookup(DeclId(1)).is_empty());
        assert!(index.lookup(DeclId(2)).is_empty());
    }
}
