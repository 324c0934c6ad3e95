use std::{ops::Range, sync::Arc};

use crate::{
    foundation::error::Warning,
    text::{
        ability_words::AbilityWordTable,
        segment::{Segment, Style, push_run, split_lines},
    },
};

/// Separator between a lead-in (ability word or mode label) and its effect.
pub const LEAD_IN_SEPARATOR: &str = " — ";
/// Marker that starts a modal choice line.
pub const BULLET: char = '•';
const MODAL_KEYWORD: &str = "Choose";

/// Segments plus any malformed-input warnings found while classifying.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ClassifyReport {
    /// Ordered segments; their concatenation equals the input.
    pub segments: Vec<Segment>,
    /// Recovered malformed-input conditions.
    pub warnings: Vec<Warning>,
}

/// Splits rules text into plain and italic segments.
///
/// Italic runs are reminder text in parentheses, ability-word lead-ins at the
/// start of a line, and the labels of bulleted modes following a
/// "Choose ... —" line. Classification is pure: it depends only on the input
/// and the shared [`AbilityWordTable`].
#[derive(Clone, Debug)]
pub struct SpanClassifier {
    table: Arc<AbilityWordTable>,
}

impl Default for SpanClassifier {
    fn default() -> Self {
        Self::new(Arc::new(AbilityWordTable::builtin()))
    }
}

impl SpanClassifier {
    /// Classifier over a shared ability-word table.
    pub fn new(table: Arc<AbilityWordTable>) -> Self {
        Self { table }
    }

    /// The ability-word table in use.
    pub fn table(&self) -> &AbilityWordTable {
        &self.table
    }

    /// Classify rules text into segments.
    pub fn classify(&self, text: &str) -> Vec<Segment> {
        self.classify_report(text).segments
    }

    /// Classify rules text, also returning malformed-input warnings.
    pub fn classify_report(&self, text: &str) -> ClassifyReport {
        let mut report = ClassifyReport::default();
        let mut in_modal = false;

        for (line_idx, (line, terminator)) in split_lines(text).enumerate() {
            let mut italic = Vec::<Range<usize>>::new();
            reminder_ranges(line, line_idx, &mut italic, &mut report.warnings);
            if let Some(r) = self.ability_word_range(line, line_idx, &mut report.warnings) {
                italic.push(r);
            }

            let is_bullet = bullet_body_start(line).is_some();
            if in_modal && let Some(r) = modal_label_range(line) {
                italic.push(r);
            }
            in_modal = is_modal_lead_in(line) || (in_modal && is_bullet);

            emit_line(line, italic, &mut report.segments);
            push_run(&mut report.segments, terminator, Style::Plain);
        }

        for w in &report.warnings {
            tracing::warn!(warning = %w, "recovered malformed rules text");
        }
        report
    }

    /// Flavor text prints entirely in italics.
    pub fn classify_flavor(&self, text: &str) -> Vec<Segment> {
        let mut out = Vec::new();
        push_run(&mut out, text, Style::Italic);
        out
    }

    fn ability_word_range(
        &self,
        line: &str,
        line_idx: usize,
        warnings: &mut Vec<Warning>,
    ) -> Option<Range<usize>> {
        for word in self.table.iter() {
            let Some(rest) = line.strip_prefix(word) else {
                continue;
            };
            if rest.starts_with(LEAD_IN_SEPARATOR) {
                return Some(0..word.len());
            }
            if rest == LEAD_IN_SEPARATOR.trim_end() {
                warnings.push(Warning::MalformedInput {
                    line: line_idx,
                    column: word.chars().count(),
                    reason: format!("ability word '{word}' lead-in runs into a line break"),
                });
            }
        }
        None
    }
}

fn reminder_ranges(
    line: &str,
    line_idx: usize,
    out: &mut Vec<Range<usize>>,
    warnings: &mut Vec<Warning>,
) {
    let mut pos = 0usize;
    while pos < line.len() {
        let rest = &line[pos..];
        let next_open = rest.find('(');
        let next_close = rest.find(')');

        match (next_open, next_close) {
            (Some(open), close) if close.is_none_or(|c| open < c) => {
                let start = pos + open;
                match line[start + 1..].find(')') {
                    Some(rel) => {
                        let end = start + 1 + rel + 1;
                        out.push(start..end);
                        pos = end;
                    }
                    None => {
                        warnings.push(malformed(line, line_idx, start, "unmatched '('"));
                        pos = start + 1;
                    }
                }
            }
            (_, Some(close)) => {
                let at = pos + close;
                warnings.push(malformed(line, line_idx, at, "unmatched ')'"));
                pos = at + 1;
            }
            (_, None) => break,
        }
    }
}

fn malformed(line: &str, line_idx: usize, byte: usize, reason: &str) -> Warning {
    Warning::MalformedInput {
        line: line_idx,
        column: line[..byte].chars().count(),
        reason: reason.to_string(),
    }
}

/// Byte offset where a bullet line's body starts (after the marker and its
/// following whitespace), or `None` when the line is not bulleted.
fn bullet_body_start(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let after = trimmed.strip_prefix(BULLET)?;
    let body = after.trim_start();
    Some(line.len() - body.len())
}

fn strip_bullet(line: &str) -> &str {
    match bullet_body_start(line) {
        Some(start) => &line[start..],
        None => line,
    }
}

fn is_modal_lead_in(line: &str) -> bool {
    let body = strip_bullet(line).trim();
    body.starts_with(MODAL_KEYWORD) && body.ends_with('—')
}

fn modal_label_range(line: &str) -> Option<Range<usize>> {
    let start = bullet_body_start(line)?;
    let rel = line[start..].find(LEAD_IN_SEPARATOR)?;
    let end = start + rel;
    if line[start..end].trim().is_empty() {
        return None;
    }
    Some(start..end)
}

fn emit_line(line: &str, mut italic: Vec<Range<usize>>, out: &mut Vec<Segment>) {
    italic.sort_by_key(|r| (r.start, r.end));
    let mut pos = 0usize;
    for r in italic {
        if r.end <= pos {
            continue;
        }
        let start = r.start.max(pos);
        push_run(out, &line[pos..start], Style::Plain);
        push_run(out, &line[start..r.end], Style::Italic);
        pos = r.end;
    }
    push_run(out, &line[pos..], Style::Plain);
}

#[cfg(test)]
#[path = "../../tests/unit/text/classify.rs"]
mod tests;
