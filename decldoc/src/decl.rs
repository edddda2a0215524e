//! The declaration tree consumed by the builder.
//!
//! A parser for the documented language produces this tree and hands it over
//! as data; decldoc never mutates it. The kind set is closed on purpose so
//! that dispatch in the traversal engine is exhaustively checked.

use serde::{Deserialize, Serialize};

/// Stable identity of a declaration, assigned by the parser.
///
/// Used only as a lookup key (e.g. to match trailing example blocks to the
/// declaration they follow), never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclId(pub u64);

/// One node of the declaration tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclNode {
    pub id: DeclId,
    /// Raw doc comment text, markdown. Declarations without one are
    /// invisible in the generated output.
    #[serde(default)]
    pub doc_comment: Option<String>,
    /// Attribute modifiers attached directly to this declaration. For a
    /// `Block` these are attribute-block modifiers and stay visible for the
    /// whole block; for any other kind they apply to this declaration only.
    #[serde(default)]
    pub attributes: Vec<String>,
    pub kind: DeclKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclKind {
    Module(ModuleDecl),
    Enum(EnumDecl),
    EnumMember(EnumMemberDecl),
    Class(AggregateDecl),
    Struct(AggregateDecl),
    Interface(AggregateDecl),
    Template(AggregateDecl),
    Alias(AliasDecl),
    Variable(VariableDecl),
    Function(FunctionDecl),
    Constructor(ConstructorDecl),
    Block(BlockDecl),
}

/// A module and its body. The package path is the dotted module name split
/// into segments, e.g. `pkg.sub` is `["pkg", "sub"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub package_path: Vec<String>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

/// Classes, structs, interfaces and templates share one declaration shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDecl {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Base class / implemented interface clause, in source order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Trailing template constraint, without the `if` keyword.
    #[serde(default)]
    pub constraint: Option<String>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub base_type: Option<String>,
    /// `EnumMember` nodes.
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// `alias a = X, b = Y;` introduces one binding per name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasDecl {
    pub bindings: Vec<AliasBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasBinding {
    pub name: String,
    pub target: String,
}

/// A variable declaration with one or more declarators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDecl {
    /// `None` for type-inferring syntax.
    #[serde(default)]
    pub declared_type: Option<String>,
    /// Storage classes in effect, e.g. `static`, `enum`.
    #[serde(default)]
    pub storage: Vec<String>,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    /// A doc comment attached to this declarator rather than the whole
    /// declaration.
    #[serde(default)]
    pub doc_comment: Option<String>,
    #[serde(default)]
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Trailing member attributes, e.g. `const`, `nothrow`.
    #[serde(default)]
    pub member_attrs: Vec<String>,
    #[serde(default)]
    pub constraint: Option<String>,
    /// Nested declarations inside the function body; still documented.
    #[serde(default)]
    pub body: Vec<DeclNode>,
}

/// Constructors render under the fixed name `this` and have no return type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub member_attrs: Vec<String>,
    #[serde(default)]
    pub constraint: Option<String>,
    #[serde(default)]
    pub body: Vec<DeclNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_text: String,
}

/// A lexical block. Test blocks carry the example source text shown on the
/// preceding declaration's page; plain blocks merely scope attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDecl {
    #[serde(default)]
    pub is_test: bool,
    #[serde(default)]
    pub source_text: Option<String>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}
