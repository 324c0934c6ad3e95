//! Text measurement collaborators.
//!
//! The engine never shapes text itself. Fitting asks a [`TextMeasure`] for the
//! rendered size of a segment list at a font size; the rendering frontend
//! supplies the real implementation, tests supply formulas.

pub mod shaped;

use crate::{
    foundation::{
        core::Size,
        error::{TypesetError, TypesetResult},
    },
    text::segment::{Segment, Style},
};

/// Measures rendered text.
///
/// Implementations must be deterministic for a fixed font context: the same
/// segments, size and wrap width always produce the same [`Size`].
pub trait TextMeasure {
    /// Size of `segments` set at `font_size`, wrapped at `max_width` when given.
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size>;
}

impl<M: TextMeasure + ?Sized> TextMeasure for &mut M {
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size> {
        (**self).measure(segments, font_size, max_width)
    }
}

impl<M: TextMeasure + ?Sized> TextMeasure for Box<M> {
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size> {
        (**self).measure(segments, font_size, max_width)
    }
}

/// Adapter turning a closure into a [`TextMeasure`]. Build with [`measure_fn`].
pub struct FnMeasure<F>(F);

/// Wrap a closure as a [`TextMeasure`].
pub fn measure_fn<F>(f: F) -> FnMeasure<F>
where
    F: FnMut(&[Segment], f64, Option<f64>) -> anyhow::Result<Size>,
{
    FnMeasure(f)
}

impl<F> TextMeasure for FnMeasure<F>
where
    F: FnMut(&[Segment], f64, Option<f64>) -> anyhow::Result<Size>,
{
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size> {
        (self.0)(segments, font_size, max_width)
    }
}

/// Deterministic estimator using average glyph advances and greedy word wrap.
///
/// All metrics are in em units. This is an approximation of a real font; it
/// is good enough for previews, the CLI and tests.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatedMeasure {
    /// Average advance of a glyph.
    #[serde(default = "default_advance_em")]
    pub advance_em: f64,
    /// Advance multiplier applied to italic glyphs.
    #[serde(default = "default_italic_factor")]
    pub italic_factor: f64,
    /// Baseline-to-baseline distance.
    #[serde(default = "default_line_height_em")]
    pub line_height_em: f64,
}

fn default_advance_em() -> f64 {
    0.5
}

fn default_italic_factor() -> f64 {
    0.95
}

fn default_line_height_em() -> f64 {
    1.2
}

impl Default for EstimatedMeasure {
    fn default() -> Self {
        Self {
            advance_em: default_advance_em(),
            italic_factor: default_italic_factor(),
            line_height_em: default_line_height_em(),
        }
    }
}

impl EstimatedMeasure {
    /// Check all metrics are finite and positive.
    pub fn validate(&self) -> TypesetResult<()> {
        for (what, v) in [
            ("advance_em", self.advance_em),
            ("italic_factor", self.italic_factor),
            ("line_height_em", self.line_height_em),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TypesetError::invalid(format!(
                    "estimated measure {what} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Number of wrapped lines and the widest line, in pixels.
    fn wrap(&self, segments: &[Segment], font_size: f64, max_width: Option<f64>) -> (usize, f64) {
        let plain = font_size * self.advance_em;
        let italic = plain * self.italic_factor;

        let mut w = WrapState {
            max_width,
            ..WrapState::default()
        };
        for seg in segments {
            let adv = match seg.style {
                Style::Plain => plain,
                Style::Italic => italic,
            };
            for ch in seg.text.chars() {
                match ch {
                    '\n' => w.break_line(),
                    '\r' => {}
                    ' ' => {
                        w.flush_word();
                        w.pending_space += adv;
                        w.line_open = true;
                    }
                    _ => {
                        w.word += adv;
                        w.line_open = true;
                    }
                }
            }
        }
        w.flush_word();
        if w.line_open || w.line > 0.0 {
            w.lines += 1;
            w.widest = w.widest.max(w.line);
        }
        (w.lines, w.widest)
    }
}

#[derive(Default)]
struct WrapState {
    max_width: Option<f64>,
    lines: usize,
    widest: f64,
    line: f64,
    word: f64,
    pending_space: f64,
    line_open: bool,
}

impl WrapState {
    fn flush_word(&mut self) {
        if self.word == 0.0 {
            return;
        }
        if let Some(limit) = self.max_width
            && self.line > 0.0
            && self.line + self.pending_space + self.word > limit
        {
            self.lines += 1;
            self.widest = self.widest.max(self.line);
            self.line = self.word;
        } else {
            self.line += self.pending_space + self.word;
        }
        self.pending_space = 0.0;
        self.word = 0.0;
    }

    fn break_line(&mut self) {
        self.flush_word();
        self.lines += 1;
        self.widest = self.widest.max(self.line);
        self.line = 0.0;
        self.pending_space = 0.0;
        self.line_open = false;
    }
}

impl TextMeasure for EstimatedMeasure {
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size> {
        if !font_size.is_finite() || font_size <= 0.0 {
            anyhow::bail!("font size must be finite and > 0, got {font_size}");
        }
        let (lines, widest) = self.wrap(segments, font_size, max_width);
        Ok(Size::new(
            widest,
            lines as f64 * font_size * self.line_height_em,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/estimated.rs"]
mod tests;
