//! The traversal engine.
//!
//! One top-down, depth-first pass over a module's declaration tree decides
//! where every documented symbol's page lives, merges overloaded siblings
//! into shared pages, and aggregates each scope's documented children into
//! a categorized member table rendered when the scope closes. Declarations
//! without a doc comment produce no output at all.

pub mod examples;
pub mod member;
pub mod module;
pub mod scope;
pub mod unit;

use crate::decl::{AggregateDecl, AliasDecl, BlockDecl, DeclKind, DeclNode, EnumDecl,
    EnumMemberDecl, ModuleDecl, VariableDecl};
use crate::doc::examples::ExampleIndex;
use crate::doc::member::{Category, Entry};
use crate::doc::module::{ExclusionFilter, ModuleInfo};
use crate::doc::scope::{AttributeContext, ScopeStack};
use crate::doc::unit::{RenderedPage, UnitKey, UnitPath, UnitRegistry, PAGE_EXTENSION};
use crate::render::{self, comment, signature, Crumb, PageMeta, GENERATOR, IDENTITY};
use crate::search::{SearchIndex, SearchItem};
use anyhow::{bail, Result};

/// Outcome of building one module.
#[derive(Debug)]
pub enum ModuleBuild {
    /// The module's dotted name matched the exclusion configuration.
    Excluded,
    /// Pages for the module and its documented symbols, in release order.
    Built(Vec<RenderedPage>),
}

/// Builds the documentation pages for a single module tree.
///
/// Returns [`ModuleBuild::Excluded`] without creating any output when the
/// module's dotted name or any prefix of it is excluded. Resource-level
/// errors are returned so a driver processing several modules can skip the
/// failed one; bookkeeping violations panic instead, since they indicate a
/// defect in the traversal itself.
pub fn build_module(
    node: &DeclNode,
    exclusions: &ExclusionFilter,
    search: &mut SearchIndex,
) -> Result<ModuleBuild> {
    let DeclKind::Module(decl) = &node.kind else {
        bail!("top-level declaration is not a module");
    };
    if decl.package_path.is_empty() {
        bail!("module has an empty package path");
    }
    if exclusions.is_excluded(&decl.package_path) {
        tracing::info!("module {} excluded", decl.package_path.join("."));
        return Ok(ModuleBuild::Excluded);
    }

    let examples = ExampleIndex::build(node);
    let info = ModuleInfo::new(decl.package_path.clone());
    let mut builder = DocBuilder {
        examples: &examples,
        search,
        scope: ScopeStack::new(&decl.package_path, node.doc_comment.as_deref()),
        attrs: AttributeContext::default(),
        units: UnitRegistry::default(),
        info,
    };
    let pages = builder.run(node, decl)?;
    Ok(ModuleBuild::Built(pages))
}

struct DocBuilder<'a> {
    examples: &'a ExampleIndex,
    search: &'a mut SearchIndex,
    scope: ScopeStack,
    attrs: AttributeContext,
    units: UnitRegistry,
    info: ModuleInfo,
}

impl<'a> DocBuilder<'a> {
    fn run(&mut self, node: &DeclNode, decl: &ModuleDecl) -> Result<Vec<RenderedPage>> {
        self.units.push_frame();
        let (module_key, _) = self.units.open(UnitPath {
            module_prefixes: self.info.parent_prefixes().to_vec(),
            file_name: self.info.page_file_name(),
        });

        let dotted = self.info.dotted_name();
        let meta = PageMeta {
            title: format!("{dotted} - {}", self.info.project_name()),
            description: format!("API documentation for the `{dotted}` module."),
            keywords: format!("{GENERATOR}, {dotted}"),
            body_class: "mod",
            location: format!("Module {}", self.info.location()),
            module_href: None,
        };
        render::page_open(self.units.writer(&module_key), &meta)?;
        self.write_module_breadcrumbs(&module_key)?;

        let preview = match &node.doc_comment {
            Some(raw) => comment::render_docblock(
                self.units.writer(&module_key),
                raw,
                &[],
                self.examples.lookup(node.id),
            )?,
            None => String::new(),
        };
        self.search.add(
            self.info.project_name(),
            SearchItem {
                html_filename: self.info.page_file_name(),
                module_info: self.info.parent_prefixes().to_vec(),
                name: self.info.location().to_owned(),
                preview,
                type_name: "module".to_owned(),
            },
        );

        self.attrs.push_frame();
        for child in &decl.members {
            self.visit(child)?;
        }
        self.attrs.pop_frame();

        let table = self.scope.finish();
        table.render(self.units.writer(&module_key))?;
        self.units.seal_open_units();
        self.units.pop_frame();

        debug_assert_eq!(self.units.open_unit_count(), 0);
        debug_assert_eq!(self.attrs.frame_count(), 0);
        Ok(std::mem::take(&mut self.units).into_pages())
    }

    /// Applies a declaration's own attribute modifiers for the duration of
    /// that declaration only, so they never leak to following siblings.
    fn visit(&mut self, node: &DeclNode) -> Result<()> {
        if node.attributes.is_empty() {
            return self.dispatch(node);
        }
        let mark = self.attrs.mark();
        self.attrs.extend(&node.attributes);
        let result = self.dispatch(node);
        self.attrs.truncate_to(mark);
        result
    }

    fn dispatch(&mut self, node: &DeclNode) -> Result<()> {
        match &node.kind {
            DeclKind::Module(_) => bail!("modules cannot be nested inside a module body"),
            DeclKind::Enum(decl) => self.visit_enum(node, decl),
            DeclKind::EnumMember(decl) => {
                self.visit_enum_member(node, decl);
                Ok(())
            }
            DeclKind::Class(decl) => self.visit_aggregate(node, decl, "class", Category::Classes),
            DeclKind::Struct(decl) => self.visit_aggregate(node, decl, "struct", Category::Structs),
            DeclKind::Interface(decl) => {
                self.visit_aggregate(node, decl, "interface", Category::Interfaces)
            }
            DeclKind::Template(decl) => {
                self.visit_aggregate(node, decl, "template", Category::Templates)
            }
            DeclKind::Alias(decl) => self.visit_alias(node, decl),
            DeclKind::Variable(decl) => self.visit_variable(node, decl),
            DeclKind::Function(decl) => {
                let Some(raw) = node.doc_comment.as_deref() else {
                    tracing::debug!("skipping undocumented function {}", decl.name);
                    return Ok(());
                };
                let visible = self.attrs.visible();
                let sig = signature::function(&visible, decl);
                self.visit_callable(node, &decl.name, sig, visible, &decl.body, raw)
            }
            DeclKind::Constructor(decl) => {
                let Some(raw) = node.doc_comment.as_deref() else {
                    tracing::debug!("skipping undocumented constructor");
                    return Ok(());
                };
                let visible = self.attrs.visible();
                let sig = signature::constructor(&visible, decl);
                self.visit_callable(node, "this", sig, visible, &decl.body, raw)
            }
            DeclKind::Block(decl) => self.visit_block(decl),
        }
    }

    fn visit_aggregate(
        &mut self,
        node: &DeclNode,
        decl: &AggregateDecl,
        keyword: &'static str,
        category: Category,
    ) -> Result<()> {
        let Some(raw) = node.doc_comment.as_deref() else {
            tracing::debug!("skipping undocumented {keyword} {}", decl.name);
            return Ok(());
        };
        let kind_class = category.html_class();
        let (key, first, link) = self.open_symbol(&decl.name, kind_class)?;

        render::code_block(
            self.units.writer(&key),
            kind_class,
            &signature::aggregate(keyword, decl),
        )?;
        let summary = comment::render_docblock(
            self.units.writer(&key),
            raw,
            self.scope.comment_stack(),
            self.examples.lookup(node.id),
        )?;
        if first {
            self.record_symbol(category, &decl.name, link, &summary, None, Vec::new());
        }

        self.scope.enter(&decl.name, raw);
        self.attrs.push_frame();
        self.units.push_frame();
        for child in &decl.members {
            self.visit(child)?;
        }
        self.attrs.pop_frame();
        self.units.seal_open_units();
        self.units.pop_frame();
        let table = self.scope.leave();
        table.render(self.units.writer(&key))?;

        // aggregates are uniquely named, so the page closes right away
        self.units.seal(&key);
        Ok(())
    }

    fn visit_enum(&mut self, node: &DeclNode, decl: &EnumDecl) -> Result<()> {
        let Some(raw) = node.doc_comment.as_deref() else {
            tracing::debug!("skipping undocumented enum {}", decl.name);
            return Ok(());
        };
        let (key, first, link) = self.open_symbol(&decl.name, "enum")?;

        render::code_block(self.units.writer(&key), "enum", &signature::enumeration(decl))?;
        let summary = comment::render_docblock(
            self.units.writer(&key),
            raw,
            self.scope.comment_stack(),
            self.examples.lookup(node.id),
        )?;
        if first {
            self.record_symbol(Category::Enums, &decl.name, link, &summary, None, Vec::new());
        }

        // members land in the enum's own table, category "values"
        self.scope.enter(&decl.name, raw);
        self.attrs.push_frame();
        self.units.push_frame();
        for child in &decl.members {
            self.visit(child)?;
        }
        self.attrs.pop_frame();
        self.units.seal_open_units();
        self.units.pop_frame();
        let table = self.scope.leave();
        table.render(self.units.writer(&key))?;

        self.units.seal(&key);
        Ok(())
    }

    /// Enum members never get a page of their own; a documented member is a
    /// row in the enclosing enum's "Values" table and nothing else.
    fn visit_enum_member(&mut self, node: &DeclNode, decl: &EnumMemberDecl) {
        let Some(raw) = node.doc_comment.as_deref() else {
            return;
        };
        self.scope.record(
            Category::Values,
            Entry {
                link: None,
                name: decl.name.clone(),
                summary: comment::summary_of(raw),
                type_text: decl.value.clone(),
                attributes: Vec::new(),
            },
        );
    }

    fn visit_alias(&mut self, node: &DeclNode, decl: &AliasDecl) -> Result<()> {
        let Some(raw) = node.doc_comment.as_deref() else {
            tracing::debug!("skipping undocumented alias declaration");
            return Ok(());
        };
        for binding in &decl.bindings {
            let (key, first, link) = self.open_symbol(&binding.name, "alias")?;
            render::code_block(
                self.units.writer(&key),
                "alias",
                &signature::alias(&binding.name, &binding.target),
            )?;
            let summary = comment::render_docblock(
                self.units.writer(&key),
                raw,
                self.scope.comment_stack(),
                self.examples.lookup(node.id),
            )?;
            if first {
                self.record_symbol(
                    Category::Aliases,
                    &binding.name,
                    link,
                    &summary,
                    Some(binding.target.clone()),
                    Vec::new(),
                );
            }
            self.units.seal(&key);
        }
        Ok(())
    }

    fn visit_variable(&mut self, node: &DeclNode, decl: &VariableDecl) -> Result<()> {
        for declarator in &decl.declarators {
            let raw = declarator
                .doc_comment
                .as_deref()
                .or(node.doc_comment.as_deref());
            let Some(raw) = raw else {
                tracing::debug!("skipping undocumented variable {}", declarator.name);
                continue;
            };
            let manifest = signature::is_manifest_constant(decl);
            let kind_class = if manifest { "value" } else { "variable" };
            let (key, first, link) = self.open_symbol(&declarator.name, kind_class)?;
            render::code_block(
                self.units.writer(&key),
                kind_class,
                &signature::variable(decl, &declarator.name, declarator.initializer.as_deref()),
            )?;
            let summary = comment::render_docblock(
                self.units.writer(&key),
                raw,
                self.scope.comment_stack(),
                self.examples.lookup(node.id),
            )?;
            if first {
                let (category, type_text) = if manifest {
                    (Category::Values, None)
                } else {
                    (Category::Variables, decl.declared_type.clone())
                };
                self.record_symbol(category, &declarator.name, link, &summary, type_text, Vec::new());
            }
            self.units.seal(&key);
        }
        Ok(())
    }

    /// Functions and constructors: overloadable, so the unit stays open for
    /// later same-named siblings and only one summary row is recorded.
    fn visit_callable(
        &mut self,
        node: &DeclNode,
        name: &str,
        sig: String,
        visible_attrs: Vec<String>,
        body: &[DeclNode],
        raw: &str,
    ) -> Result<()> {
        let (key, first, link) = self.open_symbol(name, "fn")?;
        render::code_block(self.units.writer(&key), "fn", &sig)?;
        let summary = comment::render_docblock(
            self.units.writer(&key),
            raw,
            self.scope.comment_stack(),
            self.examples.lookup(node.id),
        )?;
        if first {
            self.record_symbol(Category::Functions, name, link, &summary, None, visible_attrs);
        }

        // nested declarations inside the body are still documented
        self.scope.enter(name, raw);
        self.attrs.push_frame();
        self.units.push_frame();
        for child in body {
            self.visit(child)?;
        }
        self.attrs.pop_frame();
        self.units.seal_open_units();
        self.units.pop_frame();
        let table = self.scope.leave();
        table.render(self.units.writer(&key))?;
        Ok(())
    }

    fn visit_block(&mut self, decl: &BlockDecl) -> Result<()> {
        if decl.is_test {
            // consumed through the example index, nothing to emit here
            return Ok(());
        }
        self.attrs.push_frame();
        for child in &decl.members {
            self.visit(child)?;
        }
        self.attrs.pop_frame();
        Ok(())
    }

    /// Opens (or reuses) the output unit for `name` in the current scope.
    /// On first occurrence writes the opening chrome and breadcrumb trail;
    /// on later occurrences writes the overload separator instead. Returns
    /// the unit key, the first-occurrence flag, and the href the parent's
    /// member table uses.
    fn open_symbol(&mut self, name: &str, kind_class: &'static str) -> Result<(UnitKey, bool, String)> {
        let path = self.scope.unit_path(name);
        let link = self.scope.link_for(name);
        let (key, first) = self.units.open(path);
        if first {
            let dotted = self.info.dotted_name();
            let meta = PageMeta {
                title: format!("{name} in {dotted} - {}", self.info.project_name()),
                description: format!(
                    "API documentation for the `{name}` {kind_class} in module `{dotted}`."
                ),
                keywords: format!("{GENERATOR}, {dotted}, {name}"),
                body_class: kind_class,
                location: format!("{} {name}", kind_label(kind_class)),
                module_href: Some(format!("../{}", self.info.page_file_name())),
            };
            render::page_open(self.units.writer(&key), &meta)?;
            self.write_symbol_breadcrumbs(&key, name, kind_class)?;
        } else {
            render::separator(self.units.writer(&key))?;
        }
        Ok((key, first, link))
    }

    fn record_symbol(
        &mut self,
        category: Category,
        name: &str,
        link: String,
        summary: &str,
        type_text: Option<String>,
        attributes: Vec<String>,
    ) {
        self.scope.record(
            category,
            Entry {
                link: Some(link),
                name: name.to_owned(),
                summary: summary.to_owned(),
                type_text,
                attributes,
            },
        );
        self.search.add(
            self.info.project_name(),
            SearchItem {
                html_filename: self.scope.unit_path(name).file_name,
                module_info: self.info.module_prefixes.clone(),
                name: name.to_owned(),
                preview: summary.to_owned(),
                type_name: category.html_class().to_owned(),
            },
        );
    }

    fn write_module_breadcrumbs(&mut self, key: &UnitKey) -> Result<()> {
        let mut crumbs: Vec<Crumb> = self
            .info
            .parent_prefixes()
            .iter()
            .map(|prefix| Crumb {
                name: prefix.clone(),
                href: None,
                class: "mod",
            })
            .collect();
        crumbs.push(Crumb {
            name: self.info.location().to_owned(),
            href: Some(IDENTITY.to_owned()),
            class: "mod",
        });
        render::breadcrumbs(self.units.writer(key), &crumbs)
    }

    fn write_symbol_breadcrumbs(
        &mut self,
        key: &UnitKey,
        leaf: &str,
        leaf_class: &'static str,
    ) -> Result<()> {
        let mut crumbs: Vec<Crumb> = self
            .info
            .parent_prefixes()
            .iter()
            .map(|prefix| Crumb {
                name: prefix.clone(),
                href: None,
                class: "mod",
            })
            .collect();
        crumbs.push(Crumb {
            name: self.info.location().to_owned(),
            href: Some(format!("../{}", self.info.page_file_name())),
            class: "mod",
        });
        let mut dotted = String::new();
        for segment in self.scope.nested() {
            if !dotted.is_empty() {
                dotted.push('.');
            }
            dotted.push_str(segment);
            crumbs.push(Crumb {
                name: segment.clone(),
                href: Some(format!("{dotted}.{PAGE_EXTENSION}")),
                class: "mod",
            });
        }
        crumbs.push(Crumb {
            name: leaf.to_owned(),
            href: Some(IDENTITY.to_owned()),
            class: leaf_class,
        });
        render::breadcrumbs(self.units.writer(key), &crumbs)
    }
}

fn kind_label(kind_class: &str) -> &'static str {
    match kind_class {
        "class" => "Class",
        "struct" => "Struct",
        "interface" => "Interface",
        "template" => "Template",
        "enum" => "Enum",
        "fn" => "Function",
        "alias" => "Alias",
        "variable" => "Variable",
        "value" => "Value",
        _ => "Symbol",
    }
}
