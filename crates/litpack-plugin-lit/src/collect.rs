//! Locating markup literals and the original ranges of their static text.

use std::ops::Range;

use oxc_ast::ast::{TaggedTemplateExpression, TemplateLiteral};
use oxc_ast_visit::{Visit, walk};

use crate::error::LitIssue;
use crate::matcher::TagMatcher;

/// A tagged template recognised as markup.
///
/// All ranges are byte offsets into the original module text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLiteral {
    pub tag_name: String,
    /// Everything between the backticks.
    pub content_range: Range<usize>,
    /// Static text parts, in source order.
    pub quasis: Vec<Range<usize>>,
    /// Number of `${...}` interpolations.
    pub placeholders: usize,
}

#[derive(Debug, Default)]
pub struct Collected {
    pub literals: Vec<MarkupLiteral>,
    pub issues: Vec<LitIssue>,
}

/// Walks a program and records every markup literal, including literals
/// nested inside the interpolations of other literals.
pub struct LiteralCollector<'m, 's> {
    matcher: &'m TagMatcher,
    source: &'s str,
    collected: Collected,
}

impl<'m, 's> LiteralCollector<'m, 's> {
    pub fn new(matcher: &'m TagMatcher, source: &'s str) -> Self {
        Self {
            matcher,
            source,
            collected: Collected::default(),
        }
    }

    pub fn finish(self) -> Collected {
        self.collected
    }

    fn record(&mut self, tag_name: String, quasi: &TemplateLiteral<'_>) {
        let start = quasi.span.start as usize;
        let end = quasi.span.end as usize;
        let offset = start;

        let Some(quasis) = quasi_ranges(self.source, quasi) else {
            self.collected.issues.push(LitIssue::UnalignedQuasi {
                tag: tag_name,
                offset,
            });
            return;
        };

        self.collected.literals.push(MarkupLiteral {
            tag_name,
            content_range: start + 1..end.saturating_sub(1),
            quasis,
            placeholders: quasi.expressions.len(),
        });
    }
}

impl<'a> Visit<'a> for LiteralCollector<'_, '_> {
    fn visit_tagged_template_expression(&mut self, it: &TaggedTemplateExpression<'a>) {
        if let Some(tag_name) = self.matcher.match_tag(&it.tag) {
            self.record(tag_name, &it.quasi);
        }
        walk::walk_tagged_template_expression(self, it);
    }
}

/// Original ranges of each static part, excluding the `` ` ``, `${` and `}`
/// delimiters.
///
/// Element spans may or may not cover their delimiters; the first element
/// starting on the opening backtick means they do.
fn quasi_ranges(source: &str, quasi: &TemplateLiteral<'_>) -> Option<Vec<Range<usize>>> {
    let literal_start = quasi.span.start as usize;
    let first = quasi.quasis.first()?;
    let spans_cover_delimiters = first.span.start as usize == literal_start;

    let mut ranges = Vec::with_capacity(quasi.quasis.len());
    let mut previous_end = literal_start + 1;
    for element in &quasi.quasis {
        let (mut start, mut end) = (element.span.start as usize, element.span.end as usize);
        if spans_cover_delimiters {
            start += 1;
            end = end.checked_sub(if element.tail { 1 } else { 2 })?;
        }
        if start > end
            || start < previous_end
            || end > source.len()
            || !source.is_char_boundary(start)
            || !source.is_char_boundary(end)
        {
            return None;
        }
        ranges.push(start..end);
        previous_end = end;
    }

    let closes = quasi.span.end as usize;
    let last_end = ranges.last().map(|r| r.end)?;
    if closes == 0 || last_end != closes - 1 {
        return None;
    }
    Some(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use litpack_config::TagMatcherConfig;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn collect(source: &str) -> Collected {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        let matcher = TagMatcher::for_program(&TagMatcherConfig::default(), &ret.program);
        let mut collector = LiteralCollector::new(&matcher, source);
        collector.visit_program(&ret.program);
        collector.finish()
    }

    fn texts<'s>(source: &'s str, literal: &MarkupLiteral) -> Vec<&'s str> {
        literal.quasis.iter().map(|r| &source[r.clone()]).collect()
    }

    #[test]
    fn ranges_exclude_delimiters() {
        let source = "const t = html`<p>${a}</p>${b}`;";
        let collected = collect(source);
        assert!(collected.issues.is_empty());
        let literal = &collected.literals[0];
        assert_eq!(literal.tag_name, "html");
        assert_eq!(literal.placeholders, 2);
        assert_eq!(texts(source, literal), vec!["<p>", "</p>", ""]);
        assert_eq!(&source[literal.content_range.clone()], "<p>${a}</p>${b}");
    }

    #[test]
    fn sibling_literals_are_found_in_order() {
        let source = "html`<a> </a>`; x.html`<b>  </b>`; tag`<c></c>`;";
        let collected = collect(source);
        let names: Vec<_> = collected.literals.iter().map(|l| l.tag_name.as_str()).collect();
        assert_eq!(names, vec!["html", "x.html"]);
        assert_eq!(texts(source, &collected.literals[1]), vec!["<b>  </b>"]);
    }

    #[test]
    fn nested_literals_have_disjoint_ranges() {
        let source = "html`<ul>${items.map(i => html`<li>${i}</li>`)}</ul>`;";
        let collected = collect(source);
        assert_eq!(collected.literals.len(), 2);

        let outer = &collected.literals[0];
        let inner = &collected.literals[1];
        assert_eq!(texts(source, outer), vec!["<ul>", "</ul>"]);
        assert_eq!(texts(source, inner), vec!["<li>", "</li>"]);
        for o in &outer.quasis {
            for i in &inner.quasis {
                assert!(o.end <= i.start || i.end <= o.start);
            }
        }
    }

    #[test]
    fn multibyte_text_keeps_byte_offsets() {
        let source = "let s = \"é\"; html`<p>ü ${x} ✓</p>`;";
        let collected = collect(source);
        assert_eq!(texts(source, &collected.literals[0]), vec!["<p>ü ", " ✓</p>"]);
    }
}
