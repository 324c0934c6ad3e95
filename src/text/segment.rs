/// Rendering style of a run of text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Upright text.
    #[default]
    Plain,
    /// Italic text (reminder text, ability words, modal labels, flavor).
    Italic,
}

/// A run of text sharing one style.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Exact source text of the run.
    pub text: String,
    /// Style applied to the run.
    pub style: Style,
}

impl Segment {
    /// Build a plain segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Plain,
        }
    }

    /// Build an italic segment.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Italic,
        }
    }

    /// Whether this segment is italic.
    pub fn is_italic(&self) -> bool {
        self.style == Style::Italic
    }
}

/// Card rules text: lines separated by `\n`.
///
/// The text is stored verbatim; [`RulesText::lines`] yields each line with
/// its terminator stripped (a `\r` before `\n` counts as part of the terminator).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RulesText(pub String);

impl RulesText {
    /// Wrap raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lines without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.0).map(|(line, _)| line)
    }

    /// Number of lines (an empty text has zero lines).
    pub fn line_count(&self) -> usize {
        split_lines(&self.0).count()
    }
}

impl From<&str> for RulesText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RulesText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Split text into `(line, terminator)` pairs. The final line has an empty
/// terminator unless the text ends with a line break.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split_inclusive('\n').map(|chunk| {
        if let Some(body) = chunk.strip_suffix("\r\n") {
            (body, &chunk[body.len()..])
        } else if let Some(body) = chunk.strip_suffix('\n') {
            (body, &chunk[body.len()..])
        } else {
            (chunk, "")
        }
    })
}

/// Concatenate segment texts, dropping styles.
pub fn flatten(segments: &[Segment]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.text.len()).sum());
    for s in segments {
        out.push_str(&s.text);
    }
    out
}

/// Texts of the italic segments, in order.
pub fn italic_spans(segments: &[Segment]) -> Vec<&str> {
    segments
        .iter()
        .filter(|s| s.is_italic())
        .map(|s| s.text.as_str())
        .collect()
}

/// Append `text` with `style`, merging into the previous segment when the
/// styles match. Empty text is ignored.
pub(crate) fn push_run(out: &mut Vec<Segment>, text: &str, style: Style) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => out.push(Segment {
            text: text.to_string(),
            style,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/segment.rs"]
mod tests;
