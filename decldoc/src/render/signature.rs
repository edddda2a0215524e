//! Formats declaration signatures as source text for the code block at the
//! top of each page. Purely syntactic; types are echoed, never resolved.

use crate::decl::{AggregateDecl, ConstructorDecl, EnumDecl, FunctionDecl, Param, VariableDecl};

pub(crate) fn aggregate(keyword: &str, decl: &AggregateDecl) -> String {
    let mut sig = format!("{keyword} {}", decl.name);
    push_type_params(&mut sig, &decl.type_params);
    if !decl.bases.is_empty() {
        sig.push_str(" : ");
        sig.push_str(&decl.bases.join(", "));
    }
    push_constraint(&mut sig, decl.constraint.as_deref());
    sig
}

pub(crate) fn enumeration(decl: &EnumDecl) -> String {
    match &decl.base_type {
        Some(base) => format!("enum {} : {base}", decl.name),
        None => format!("enum {}", decl.name),
    }
}

/// Attribute order is fixed: visible attributes, return type, name,
/// template parameters, parameters, trailing member attributes, trailing
/// constraint.
pub(crate) fn function(visible_attrs: &[String], decl: &FunctionDecl) -> String {
    let mut sig = String::new();
    push_attrs(&mut sig, visible_attrs);
    if let Some(ret) = &decl.return_type {
        sig.push_str(ret);
        sig.push(' ');
    }
    sig.push_str(&decl.name);
    push_type_params(&mut sig, &decl.type_params);
    push_params(&mut sig, &decl.params);
    for attr in &decl.member_attrs {
        sig.push(' ');
        sig.push_str(attr);
    }
    push_constraint(&mut sig, decl.constraint.as_deref());
    sig
}

pub(crate) fn constructor(visible_attrs: &[String], decl: &ConstructorDecl) -> String {
    let mut sig = String::new();
    push_attrs(&mut sig, visible_attrs);
    sig.push_str("this");
    push_type_params(&mut sig, &decl.type_params);
    push_params(&mut sig, &decl.params);
    for attr in &decl.member_attrs {
        sig.push(' ');
        sig.push_str(attr);
    }
    push_constraint(&mut sig, decl.constraint.as_deref());
    sig
}

pub(crate) fn alias(name: &str, target: &str) -> String {
    format!("alias {name} = {target}")
}

/// Manifest constants (`enum` storage, inferred type) render with their
/// initializer and no type; everything else renders storage classes, the
/// declared type (or `auto`), and the name.
pub(crate) fn variable(decl: &VariableDecl, name: &str, initializer: Option<&str>) -> String {
    if is_manifest_constant(decl) {
        return match initializer {
            Some(init) => format!("enum {name} = {init}"),
            None => format!("enum {name}"),
        };
    }
    let mut sig = String::new();
    for storage in &decl.storage {
        sig.push_str(storage);
        sig.push(' ');
    }
    sig.push_str(decl.declared_type.as_deref().unwrap_or("auto"));
    sig.push(' ');
    sig.push_str(name);
    sig
}

pub(crate) fn is_manifest_constant(decl: &VariableDecl) -> bool {
    decl.declared_type.is_none() && decl.storage.iter().any(|s| s == "enum")
}

fn push_constraint(sig: &mut String, constraint: Option<&str>) {
    if let Some(constraint) = constraint {
        sig.push_str(" if (");
        sig.push_str(constraint);
        sig.push(')');
    }
}

fn push_attrs(sig: &mut String, attrs: &[String]) {
    for attr in attrs {
        sig.push_str(attr);
        sig.push(' ');
    }
}

fn push_type_params(sig: &mut String, type_params: &[String]) {
    if !type_params.is_empty() {
        sig.push('(');
        sig.push_str(&type_params.join(", "));
        sig.push(')');
    }
}

fn push_params(sig: &mut String, params: &[Param]) {
    sig.push('(');
    let mut first = true;
    for param in params {
        if !first {
            sig.push_str(", ");
        }
        first = false;
        sig.push_str(&param.type_text);
        sig.push(' ');
        sig.push_str(&param.name);
    }
    sig.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::AliasBinding;
    use expect_test::expect;

    fn param(name: &str, ty: &str) -> Param {
        Param {
            name: name.into(),
            type_text: ty.into(),
        }
    }

    #[test]
    fn aggregate_with_bases_and_constraint() {
        let decl = AggregateDecl {
            name: "Tree".into(),
            type_params: vec!["T".into()],
            bases: vec!["Container".into(), "Iterable".into()],
            constraint: Some("isOrdered!T".into()),
            members: vec![],
        };
        expect!["class Tree(T) : Container, Iterable if (isOrdered!T)"]
            .assert_eq(&aggregate("class", &decl));
    }

    #[test]
    fn plain_struct() {
        let decl = AggregateDecl {
            name: "Point".into(),
            type_params: vec![],
            bases: vec![],
            constraint: None,
            members: vec![],
        };
        expect!["struct Point"].assert_eq(&aggregate("struct", &decl));
    }

    #[test]
    fn function_orders_all_clauses() {
        let decl = FunctionDecl {
            name: "insert".into(),
            return_type: Some("bool".into()),
            type_params: vec!["T".into()],
            params: vec![param("value", "T"), param("index", "size_t")],
            member_attrs: vec!["const".into()],
            constraint: Some("isCopyable!T".into()),
            body: vec![],
        };
        expect!["@safe bool insert(T)(T value, size_t index) const if (isCopyable!T)"]
            .assert_eq(&function(&["@safe".into()], &decl));
    }

    #[test]
    fn constructor_has_fixed_name_and_no_return() {
        let decl = ConstructorDecl {
            type_params: vec![],
            params: vec![param("capacity", "size_t")],
            member_attrs: vec![],
            constraint: None,
            body: vec![],
        };
        expect!["this(size_t capacity)"].assert_eq(&constructor(&[], &decl));
    }

    #[test]
    fn alias_binding() {
        let binding = AliasBinding {
            name: "Index".into(),
            target: "size_t".into(),
        };
        expect!["alias Index = size_t"].assert_eq(&alias(&binding.name, &binding.target));
    }

    #[test]
    fn manifest_constant_shows_initializer_without_type() {
        let decl = VariableDecl {
            declared_type: None,
            storage: vec!["enum".into()],
            declarators: vec![],
        };
        assert!(is_manifest_constant(&decl));
        expect!["enum limit = 100"].assert_eq(&variable(&decl, "limit", Some("100")));
    }

    #[test]
    fn typed_variable_keeps_storage_and_type() {
        let decl = VariableDecl {
            declared_type: Some("int".into()),
            storage: vec!["static".into()],
            declarators: vec![],
        };
        assert!(!is_manifest_constant(&decl));
        expect!["static int count"].assert_eq(&variable(&decl, "count", None));
    }

    #[test]
    fn inferred_variable_without_enum_storage_is_auto() {
        let decl = VariableDecl {
            declared_type: None,
            storage: vec![],
            declarators: vec![],
        };
        assert!(!is_manifest_constant(&decl));
        expect!["auto total"].assert_eq(&variable(&decl, "total", Some("0")));
    }
}
