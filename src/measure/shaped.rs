use std::borrow::Cow;

use crate::{
    foundation::{
        core::Size,
        error::{TypesetError, TypesetResult},
    },
    measure::TextMeasure,
    text::segment::{Segment, Style, flatten},
};

/// Measures text by shaping it with Parley against real font bytes.
///
/// Italic segments are requested with `FontStyle::Italic`; register an italic
/// face with [`ParleyMeasure::register_font`] to measure with true italics
/// rather than the regular face.
pub struct ParleyMeasure {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
}

impl ParleyMeasure {
    /// Build a measurer from the bytes of the regular face (TTF/OTF).
    pub fn new(font_bytes: &[u8]) -> TypesetResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family_name = register(&mut font_ctx, font_bytes)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Register an additional face (typically the italic of the same family).
    /// Returns the registered family name.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> TypesetResult<String> {
        register(&mut self.font_ctx, font_bytes)
    }

    /// Family used for every segment.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(
        &mut self,
        segments: &[Segment],
        font_size: f32,
        max_width: Option<f32>,
    ) -> parley::Layout<()> {
        let text = flatten(segments);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));

        let mut start = 0usize;
        for seg in segments {
            let end = start + seg.text.len();
            if seg.style == Style::Italic {
                builder.push(
                    parley::style::StyleProperty::FontStyle(parley::style::FontStyle::Italic),
                    start..end,
                );
            }
            start = end;
        }

        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(max_width);
        layout
    }
}

fn register(font_ctx: &mut parley::FontContext, font_bytes: &[u8]) -> TypesetResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| TypesetError::invalid("no font families registered from font bytes"))?;
    let name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| TypesetError::invalid("registered font family has no name"))?;
    Ok(name.to_string())
}

impl TextMeasure for ParleyMeasure {
    fn measure(
        &mut self,
        segments: &[Segment],
        font_size: f64,
        max_width: Option<f64>,
    ) -> anyhow::Result<Size> {
        if !font_size.is_finite() || font_size <= 0.0 {
            anyhow::bail!("font size must be finite and > 0, got {font_size}");
        }
        let layout = self.layout(segments, font_size as f32, max_width.map(|w| w as f32));

        let mut w = 0.0f64;
        let mut h = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(f64::from(m.advance));
            h += f64::from(m.ascent + m.descent + m.leading);
        }
        Ok(Size::new(w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/shaped.rs"]
mod tests;
