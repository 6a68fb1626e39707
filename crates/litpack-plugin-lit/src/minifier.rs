//! Markup minification.
//!
//! [`MarkupMinifier`] is the seam a different minifier plugs into;
//! [`HtmlMinifier`] is the default, a conservative single-pass minifier that
//! strips comments and collapses whitespace while leaving fragments it does
//! not understand alone.

use std::ops::Range;
use std::sync::LazyLock;

use litpack_config::MinifierConfig;
use regex::Regex;

use crate::error::{LitError, Result};

/// Minifies the static markup of one literal.
///
/// The input is the literal's text with interpolations replaced by opaque
/// word-like tokens; those tokens must come back unchanged.
pub trait MarkupMinifier: Send + Sync {
    fn minify(&self, markup: &str) -> Result<String>;
}

/// Elements whose content is copied without changes.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["pre", "textarea", "script", "style"];

#[derive(Debug, Clone)]
pub struct HtmlMinifier {
    collapse_whitespace: bool,
    conservative_collapse: bool,
    preserve_line_breaks: bool,
    remove_comments: bool,
    ignore_fragments: Vec<Regex>,
}

impl HtmlMinifier {
    pub fn new(config: &MinifierConfig) -> Result<Self> {
        let ignore_fragments = config
            .ignore_custom_fragments
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| LitError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            collapse_whitespace: config.collapse_whitespace,
            conservative_collapse: config.conservative_collapse,
            preserve_line_breaks: config.preserve_line_breaks,
            remove_comments: config.remove_comments,
            ignore_fragments,
        })
    }

    fn protected_ranges(&self, input: &str) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = self
            .ignore_fragments
            .iter()
            .flat_map(|re| re.find_iter(input).map(|m| m.range()))
            .filter(|r| !r.is_empty())
            .collect();
        ranges.sort_by_key(|r| r.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        merged
    }

    fn collapse(&self, out: &str, run: &str, at_edge: bool, next: Option<char>) -> String {
        // A backslash before a newline is a line continuation in the template.
        if out.ends_with('\\') {
            return run.to_string();
        }
        let separator = if self.preserve_line_breaks && run.contains('\n') {
            "\n"
        } else {
            " "
        };
        if self.conservative_collapse {
            return separator.to_string();
        }
        let hugs_tag = out.ends_with('>') || next == Some('<');
        if at_edge || hugs_tag {
            if separator == "\n" {
                return separator.to_string();
            }
            return String::new();
        }
        separator.to_string()
    }
}

static DEFAULT_MINIFIER: LazyLock<HtmlMinifier> = LazyLock::new(|| {
    HtmlMinifier::new(&MinifierConfig::default())
        .expect("default ignore_custom_fragments are valid regexes")
});

impl Default for HtmlMinifier {
    fn default() -> Self {
        DEFAULT_MINIFIER.clone()
    }
}

impl MarkupMinifier for HtmlMinifier {
    fn minify(&self, input: &str) -> Result<String> {
        let protected = self.protected_ranges(input);
        let mut next_protected = 0;
        let mut out = String::with_capacity(input.len());
        let mut i = 0;

        while i < input.len() {
            while next_protected < protected.len() && protected[next_protected].end <= i {
                next_protected += 1;
            }
            let upcoming = protected.get(next_protected);
            if let Some(range) = upcoming.filter(|r| r.start <= i) {
                out.push_str(&input[i..range.end]);
                i = range.end;
                continue;
            }
            let boundary = upcoming.map_or(input.len(), |r| r.start);
            let rest = &input[i..];

            if self.remove_comments && rest.starts_with("<!--") {
                let keep = rest.starts_with("<!--[if") || rest.starts_with("<!--!");
                match rest.find("-->") {
                    Some(pos) => {
                        let end = i + pos + 3;
                        if keep {
                            out.push_str(&input[i..end]);
                        }
                        i = end;
                    }
                    None => {
                        out.push_str(rest);
                        i = input.len();
                    }
                }
                continue;
            }

            if let Some(name) = raw_text_element(rest) {
                let end = closing_tag_end(input, i, name).unwrap_or(input.len());
                out.push_str(&input[i..end]);
                i = end;
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };

            if self.collapse_whitespace && is_html_space(ch) {
                let run_end = rest
                    .char_indices()
                    .find(|(_, c)| !is_html_space(*c))
                    .map_or(input.len(), |(pos, _)| i + pos)
                    .min(boundary);
                let run = &input[i..run_end];
                let at_edge = i == 0 || run_end == input.len();
                let next = input[run_end..].chars().next();
                let replacement = self.collapse(&out, run, at_edge, next);
                out.push_str(&replacement);
                i = run_end;
                continue;
            }

            out.push(ch);
            i += ch.len_utf8();
        }

        Ok(out)
    }
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// The raw-text element opened at the start of `rest`, if any.
fn raw_text_element(rest: &str) -> Option<&'static str> {
    let after = rest.strip_prefix('<')?;
    RAW_TEXT_ELEMENTS.into_iter().find(|name| {
        after.len() > name.len()
            && after.is_char_boundary(name.len())
            && after[..name.len()].eq_ignore_ascii_case(name)
            && after[name.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c == '/' || is_html_space(c))
    })
}

/// Byte offset just past the `</name>` that closes the element opened at `start`.
fn closing_tag_end(input: &str, start: usize, name: &str) -> Option<usize> {
    let lower = input[start..].to_ascii_lowercase();
    let needle = format!("</{name}");
    let open = lower.find(&needle)?;
    let close = lower[open..].find('>')?;
    Some(start + open + close + 1)
}
