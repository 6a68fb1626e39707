//! Regenerating code and a source map from a list of span rewrites.
//!
//! Transforms describe their edits as [`Rewrite`]s against the original
//! text. Spans always refer to the original buffer and are never shifted as
//! earlier edits change lengths; [`apply_rewrites`] walks the list once, in
//! order, producing the new code and a map back to the original.

use std::ops::Range;

use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use crate::{Error, Result};

/// Replace `span` of the original text with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub span: Range<usize>,
    pub replacement: String,
}

impl Rewrite {
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewriteOutput {
    pub code: String,
    pub map: SourceMap,
}

/// A map with no sources and no mappings.
pub fn empty_sourcemap() -> SourceMap {
    SourceMapBuilder::default().into_sourcemap()
}

/// Apply `rewrites` to `original`.
///
/// Rewrites may arrive in any order but must not overlap, must lie inside the
/// text, and must start and end on char boundaries. Unchanged text is mapped
/// line by line; each replacement maps to the start of the span it replaced.
/// Columns are counted in UTF-16 code units.
pub fn apply_rewrites(
    source_name: &str,
    original: &str,
    mut rewrites: Vec<Rewrite>,
) -> Result<RewriteOutput> {
    rewrites.sort_by_key(|r| (r.span.start, r.span.end));
    validate(original, &rewrites)?;

    let mut emitter = MapEmitter::new(source_name, original);
    let mut cursor = 0;
    for rewrite in &rewrites {
        emitter.copy_original(cursor..rewrite.span.start);
        emitter.replace(rewrite.span.start, &rewrite.replacement);
        cursor = rewrite.span.end;
    }
    emitter.copy_original(cursor..original.len());

    Ok(emitter.finish())
}

fn validate(original: &str, rewrites: &[Rewrite]) -> Result<()> {
    let mut previous_end = 0;
    for rewrite in rewrites {
        let Range { start, end } = rewrite.span;
        if start > end || end > original.len() {
            return Err(Error::InvalidRewrite(format!(
                "span {start}..{end} is outside the source (length {})",
                original.len()
            )));
        }
        if !original.is_char_boundary(start) || !original.is_char_boundary(end) {
            return Err(Error::InvalidRewrite(format!(
                "span {start}..{end} splits a character"
            )));
        }
        if start < previous_end {
            return Err(Error::InvalidRewrite(format!(
                "span {start}..{end} overlaps the previous rewrite ending at {previous_end}"
            )));
        }
        previous_end = end;
    }
    Ok(())
}

struct MapEmitter<'a> {
    original: &'a str,
    line_starts: Vec<usize>,
    builder: SourceMapBuilder,
    source_id: u32,
    code: String,
    out_line: u32,
    out_col: u32,
}

impl<'a> MapEmitter<'a> {
    fn new(source_name: &str, original: &'a str) -> Self {
        let mut builder = SourceMapBuilder::default();
        let source_id = builder.set_source_and_content(source_name, original);
        let line_starts = std::iter::once(0)
            .chain(original.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            original,
            line_starts,
            builder,
            source_id,
            code: String::with_capacity(original.len()),
            out_line: 0,
            out_col: 0,
        }
    }

    fn original_position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let col = self.original[self.line_starts[line]..offset]
            .encode_utf16()
            .count();
        (line as u32, col as u32)
    }

    fn mark(&mut self, original_offset: usize) {
        let (src_line, src_col) = self.original_position(original_offset);
        self.builder.add_token(
            self.out_line,
            self.out_col,
            src_line,
            src_col,
            Some(self.source_id),
            None,
        );
    }

    fn push(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.out_line += 1;
                self.out_col = 0;
            } else {
                self.out_col += ch.len_utf16() as u32;
            }
        }
        self.code.push_str(text);
    }

    fn copy_original(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let original = self.original;
        let segment = &original[range.clone()];

        self.mark(range.start);
        let mut line_start = 0;
        for (i, _) in segment.match_indices('\n') {
            self.push(&segment[line_start..=i]);
            line_start = i + 1;
            if line_start < segment.len() {
                self.mark(range.start + line_start);
            }
        }
        self.push(&segment[line_start..]);
    }

    fn replace(&mut self, original_offset: usize, replacement: &str) {
        if replacement.is_empty() {
            return;
        }
        self.mark(original_offset);
        self.push(replacement);
    }

    fn finish(self) -> RewriteOutput {
        RewriteOutput {
            code: self.code,
            map: self.builder.into_sourcemap(),
        }
    }
}
