//! The markup-literal rewrite of one module.

use litpack_bundler::sourcemap::{Rewrite, apply_rewrites, empty_sourcemap};
use litpack_config::TagMatcherConfig;
use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_sourcemap::SourceMap;
use oxc_span::SourceType;

use crate::collect::{LiteralCollector, MarkupLiteral};
use crate::error::{LitIssue, Result};
use crate::matcher::TagMatcher;
use crate::minifier::MarkupMinifier;

/// Result of minifying the markup literals of one module.
#[derive(Debug, Clone)]
pub struct LitOutput {
    pub code: String,
    /// Empty when nothing was rewritten.
    pub map: SourceMap,
    /// Markup literals found.
    pub matched: usize,
    /// Static text parts that changed.
    pub rewritten: usize,
    pub issues: Vec<LitIssue>,
}

impl LitOutput {
    fn unchanged(source: &str, matched: usize, issues: Vec<LitIssue>) -> Self {
        Self {
            code: source.to_string(),
            map: empty_sourcemap(),
            matched,
            rewritten: 0,
            issues,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.rewritten > 0
    }
}

/// Minify every markup literal in `source`.
///
/// Literals whose placeholders do not come back intact, or whose minifier
/// call fails, are left as they were and reported in [`LitOutput::issues`].
/// A module that cannot be parsed is returned unchanged with a single
/// [`LitIssue::Parse`].
pub fn minify_literals(
    source: &str,
    id: &str,
    matcher: &TagMatcherConfig,
    minifier: &dyn MarkupMinifier,
) -> Result<LitOutput> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(id).unwrap_or(SourceType::mjs());
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked {
        let message = ret
            .errors
            .first()
            .map_or_else(|| "unrecoverable syntax error".to_string(), |e| e.to_string());
        return Ok(LitOutput::unchanged(source, 0, vec![LitIssue::Parse(message)]));
    }
    for error in &ret.errors {
        tracing::debug!("[{id}] recovered from syntax error: {error}");
    }

    let matcher = TagMatcher::for_program(matcher, &ret.program);
    let mut collector = LiteralCollector::new(&matcher, source);
    collector.visit_program(&ret.program);
    let collected = collector.finish();

    let matched = collected.literals.len();
    let mut issues = collected.issues;
    if matched == 0 {
        return Ok(LitOutput::unchanged(source, 0, issues));
    }

    let nonce = placeholder_nonce(source);
    let mut rewrites = Vec::new();
    for literal in &collected.literals {
        match minify_literal(source, literal, nonce, minifier) {
            Ok(parts) => rewrites.extend(parts),
            Err(issue) => issues.push(issue),
        }
    }

    if rewrites.is_empty() {
        return Ok(LitOutput::unchanged(source, matched, issues));
    }

    let rewritten = rewrites.len();
    let output = apply_rewrites(id, source, rewrites)?;
    Ok(LitOutput {
        code: output.code,
        map: output.map,
        matched,
        rewritten,
        issues,
    })
}

/// Smallest `n` such that `__litpack{n}_` does not occur in the module.
fn placeholder_nonce(source: &str) -> usize {
    (0..)
        .find(|n| !source.contains(&placeholder_prefix(*n)))
        .unwrap_or_default()
}

fn placeholder_prefix(nonce: usize) -> String {
    format!("__litpack{nonce}_")
}

fn placeholder(nonce: usize, index: usize) -> String {
    format!("__litpack{nonce}_{index}__")
}

fn minify_literal(
    source: &str,
    literal: &MarkupLiteral,
    nonce: usize,
    minifier: &dyn MarkupMinifier,
) -> std::result::Result<Vec<Rewrite>, LitIssue> {
    let offset = literal.content_range.start;
    let mut joined = String::with_capacity(literal.content_range.len());
    for (index, range) in literal.quasis.iter().enumerate() {
        if index > 0 {
            joined.push_str(&placeholder(nonce, index - 1));
        }
        joined.push_str(&source[range.clone()]);
    }

    let minified = minifier.minify(&joined).map_err(|e| LitIssue::Minify {
        tag: literal.tag_name.clone(),
        offset,
        message: e.to_string(),
    })?;

    let mismatch = || LitIssue::PlaceholderMismatch {
        tag: literal.tag_name.clone(),
        offset,
    };
    let parts = split_on_placeholders(&minified, nonce, literal.placeholders).ok_or_else(mismatch)?;

    let last = parts.len() - 1;
    let keeps_syntax = literal
        .quasis
        .iter()
        .zip(&parts)
        .enumerate()
        .all(|(index, (range, part))| keeps_template_syntax(&source[range.clone()], part, index < last));
    if !keeps_syntax {
        return Err(mismatch());
    }

    Ok(literal
        .quasis
        .iter()
        .zip(parts)
        .filter(|(range, part)| &source[(*range).clone()] != *part)
        .map(|(range, part)| Rewrite::new(range.clone(), part))
        .collect())
}

/// Split `minified` back into `placeholders + 1` parts.
///
/// Every placeholder must appear exactly once and in order.
fn split_on_placeholders(minified: &str, nonce: usize, placeholders: usize) -> Option<Vec<&str>> {
    let mut parts = Vec::with_capacity(placeholders + 1);
    let mut cursor = 0;
    for index in 0..placeholders {
        let token = placeholder(nonce, index);
        let found = cursor + minified[cursor..].find(&token)?;
        parts.push(&minified[cursor..found]);
        cursor = found + token.len();
    }
    parts.push(&minified[cursor..]);

    let prefix = placeholder_prefix(nonce);
    if parts.iter().any(|part| part.contains(&prefix)) {
        return None;
    }
    Some(parts)
}

/// Whether `part` can stand in for the quasi `original` without changing
/// where the template's interpolations begin or where the literal ends.
///
/// Removing markup can join text into `${`, expose a backtick, or leave a
/// backslash that escapes the next `${`.
fn keeps_template_syntax(original: &str, part: &str, before_interpolation: bool) -> bool {
    if count_unescaped(part, "${") > count_unescaped(original, "${")
        || count_unescaped(part, "`") > count_unescaped(original, "`")
    {
        return false;
    }
    if trailing_backslashes(part) % 2 == 1 {
        return false;
    }
    !(before_interpolation && ends_with_unescaped_dollar(part) && !ends_with_unescaped_dollar(original))
}

fn count_unescaped(text: &str, pattern: &str) -> usize {
    text.match_indices(pattern)
        .filter(|(at, _)| trailing_backslashes(&text[..*at]) % 2 == 0)
        .count()
}

fn trailing_backslashes(text: &str) -> usize {
    text.bytes().rev().take_while(|b| *b == b'\\').count()
}

fn ends_with_unescaped_dollar(text: &str) -> bool {
    text.strip_suffix('$')
        .is_some_and(|rest| trailing_backslashes(rest) % 2 == 0)
}
