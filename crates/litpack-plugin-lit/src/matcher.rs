//! Deciding which tagged templates hold markup.

use litpack_config::{MatcherKind, TagMatcherConfig};
use oxc_ast::ast::{Expression, ImportDeclarationSpecifier, ModuleExportName, Program, Statement};
use rustc_hash::FxHashSet;

const HTML_TAG: &str = "html";

/// Recognises the tag of a markup literal.
///
/// The heuristic form accepts the identifier `html` and any static member
/// expression ending in `.html`. The binding form only accepts names that
/// the module imported as `html` from one of the configured modules, plus
/// `ns.html` for namespace imports of those modules.
#[derive(Debug, Clone)]
pub enum TagMatcher {
    Heuristic,
    Binding {
        locals: FxHashSet<String>,
        namespaces: FxHashSet<String>,
    },
}

impl TagMatcher {
    /// Build the matcher for one program.
    pub fn for_program(config: &TagMatcherConfig, program: &Program<'_>) -> Self {
        match config.kind {
            MatcherKind::Heuristic => Self::Heuristic,
            MatcherKind::Binding => Self::from_imports(&config.modules, program),
        }
    }

    fn from_imports(modules: &[String], program: &Program<'_>) -> Self {
        let mut locals = FxHashSet::default();
        let mut namespaces = FxHashSet::default();

        for stmt in &program.body {
            let Statement::ImportDeclaration(import) = stmt else {
                continue;
            };
            if import.import_kind.is_type() {
                continue;
            }
            let source = import.source.value.as_str();
            if !modules.iter().any(|m| m == source) {
                continue;
            }
            let Some(specifiers) = &import.specifiers else {
                continue;
            };
            for spec in specifiers {
                match spec {
                    ImportDeclarationSpecifier::ImportSpecifier(named) => {
                        if named.import_kind.is_type() {
                            continue;
                        }
                        let imported = match &named.imported {
                            ModuleExportName::IdentifierName(ident) => ident.name.as_str(),
                            ModuleExportName::IdentifierReference(ident) => ident.name.as_str(),
                            ModuleExportName::StringLiteral(lit) => lit.value.as_str(),
                        };
                        if imported == HTML_TAG {
                            locals.insert(named.local.name.to_string());
                        }
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(ns) => {
                        namespaces.insert(ns.local.name.to_string());
                    }
                    // lit has no default export
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => {}
                }
            }
        }

        Self::Binding { locals, namespaces }
    }

    /// Returns the tag's display name when it marks a markup literal.
    pub fn match_tag(&self, tag: &Expression<'_>) -> Option<String> {
        match (self, tag) {
            (Self::Heuristic, Expression::Identifier(ident)) if ident.name.as_str() == HTML_TAG => {
                Some(HTML_TAG.to_string())
            }
            (Self::Heuristic, Expression::StaticMemberExpression(member))
                if member.property.name.as_str() == HTML_TAG =>
            {
                Some(match &member.object {
                    Expression::Identifier(object) => format!("{}.{HTML_TAG}", object.name),
                    _ => HTML_TAG.to_string(),
                })
            }
            (Self::Binding { locals, .. }, Expression::Identifier(ident))
                if locals.contains(ident.name.as_str()) =>
            {
                Some(ident.name.to_string())
            }
            (Self::Binding { namespaces, .. }, Expression::StaticMemberExpression(member))
                if member.property.name.as_str() == HTML_TAG =>
            {
                match &member.object {
                    Expression::Identifier(object) if namespaces.contains(object.name.as_str()) => {
                        Some(format!("{}.{HTML_TAG}", object.name))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn tags(config: &TagMatcherConfig, source: &str) -> Vec<Option<String>> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(!ret.panicked);
        let matcher = TagMatcher::for_program(config, &ret.program);
        ret.program
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::ExpressionStatement(expr) => match &expr.expression {
                    Expression::TaggedTemplateExpression(tagged) => {
                        Some(matcher.match_tag(&tagged.tag))
                    }
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    #[test]
    fn heuristic_matches_identifier_and_member() {
        let found = tags(
            &TagMatcherConfig::default(),
            "html`<a></a>`; lit.html`<b></b>`; css`a{}`; this.render.html`<i></i>`;",
        );
        assert_eq!(
            found,
            vec![
                Some("html".to_string()),
                Some("lit.html".to_string()),
                None,
                Some("html".to_string()),
            ]
        );
    }

    #[test]
    fn heuristic_ignores_imports() {
        let found = tags(
            &TagMatcherConfig::default(),
            "import { html as h } from 'lit'; h`<a></a>`;",
        );
        assert_eq!(found, vec![None]);
    }

    #[test]
    fn binding_follows_renamed_imports() {
        let found = tags(
            &TagMatcherConfig::binding(),
            "import { html as h } from 'lit'; import * as L from 'lit-html'; \
             h`<a></a>`; L.html`<b></b>`; html`<c></c>`;",
        );
        assert_eq!(
            found,
            vec![Some("h".to_string()), Some("L.html".to_string()), None]
        );
    }

    #[test]
    fn binding_ignores_other_modules() {
        let found = tags(
            &TagMatcherConfig::binding(),
            "import { html } from './local-html.js'; html`<a></a>`;",
        );
        assert_eq!(found, vec![None]);
    }
}
