use crate::{
    foundation::{
        core::{Rect, Size, ensure_non_negative, validate_region},
        error::{TypesetError, TypesetResult, Warning},
    },
    measure::TextMeasure,
    text::segment::{RulesText, Segment, Style, push_run},
};

/// Which measured dimension must fit the block's box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Rules text boxes: wrap at the box width, shrink until height fits.
    #[default]
    Height,
    /// Single-line fields (name, type line, mana cost): shrink until width fits.
    Width,
}

/// A text block to be fit into its box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextBlock {
    /// Caller-chosen identifier, echoed in outcomes and plans.
    pub id: String,
    /// Rules text.
    pub content: RulesText,
    /// Optional flavor text set below the rules text, separated by a divider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<RulesText>,
    /// Starting font size.
    pub font_size: f64,
    /// Smallest acceptable font size.
    pub min_font_size: f64,
    /// Target region the text must occupy.
    #[serde(rename = "box")]
    pub bounds: Rect,
    /// Constrained dimension.
    #[serde(default)]
    pub mode: FitMode,
    /// Space between rules and flavor text, in em of the current font size.
    #[serde(default = "default_flavor_gap_em")]
    pub flavor_gap_em: f64,
}

fn default_flavor_gap_em() -> f64 {
    1.0
}

impl TextBlock {
    /// Height-constrained block with no flavor text.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<RulesText>,
        font_size: f64,
        min_font_size: f64,
        bounds: Rect,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            flavor: None,
            font_size,
            min_font_size,
            bounds,
            mode: FitMode::Height,
            flavor_gap_em: default_flavor_gap_em(),
        }
    }

    /// Same block with flavor text attached.
    pub fn with_flavor(mut self, flavor: impl Into<RulesText>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }

    /// Same block with a different constrained dimension.
    pub fn with_mode(mut self, mode: FitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check sizes and geometry.
    pub fn validate(&self) -> TypesetResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(TypesetError::invalid(format!(
                "block '{}' font_size must be finite and > 0",
                self.id
            )));
        }
        if !self.min_font_size.is_finite() || self.min_font_size <= 0.0 {
            return Err(TypesetError::invalid(format!(
                "block '{}' min_font_size must be finite and > 0",
                self.id
            )));
        }
        ensure_non_negative("flavor_gap_em", self.flavor_gap_em)?;
        validate_region(&format!("block '{}' box", self.id), self.bounds)
    }
}

/// Styled content of a block, as produced by the span classifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockText {
    /// Rules text segments.
    pub rules: Vec<Segment>,
    /// Flavor text segments (empty when the block has none).
    pub flavor: Vec<Segment>,
}

impl BlockText {
    /// Unstyled content of `block`, one plain segment per text.
    pub fn plain(block: &TextBlock) -> Self {
        let mut rules = Vec::new();
        push_run(&mut rules, block.content.as_str(), Style::Plain);
        let mut flavor = Vec::new();
        if let Some(f) = &block.flavor {
            push_run(&mut flavor, f.as_str(), Style::Plain);
        }
        Self { rules, flavor }
    }
}

/// Fitting parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitOptions {
    /// Fraction of the current size removed per iteration.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Override for the block's `min_font_size`.
    #[serde(default)]
    pub floor: Option<f64>,
}

fn default_step() -> f64 {
    0.1
}

/// Smallest accepted [`FitOptions::step`].
pub const MIN_FIT_STEP: f64 = 1e-3;

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            step: default_step(),
            floor: None,
        }
    }
}

impl FitOptions {
    /// Check `MIN_FIT_STEP <= step < 1` and a positive floor override.
    pub fn validate(&self) -> TypesetResult<()> {
        if !self.step.is_finite() || self.step < MIN_FIT_STEP || self.step >= 1.0 {
            return Err(TypesetError::invalid(format!(
                "fit step must be in [{MIN_FIT_STEP}, 1), got {}",
                self.step
            )));
        }
        if let Some(floor) = self.floor
            && (!floor.is_finite() || floor <= 0.0)
        {
            return Err(TypesetError::invalid("fit floor must be finite and > 0"));
        }
        Ok(())
    }
}

/// Whether the returned size satisfies the box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// Measured dimension fits the box.
    Fits,
    /// Floor reached and the text still overflows.
    Tight,
}

/// Result of fitting one block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FitOutcome {
    /// Block identifier.
    pub block_id: String,
    /// Chosen font size.
    pub font_size: f64,
    /// Fit status at `font_size`.
    pub status: FitStatus,
    /// Measured size at `font_size` (rules, gap and flavor combined).
    pub measured: Size,
    /// Divider center measured from the box top, when flavor text is present.
    pub divider_offset: Option<f64>,
    /// Number of measurements taken.
    pub iterations: u32,
}

impl FitOutcome {
    /// Whether the floor was reached without fitting.
    pub fn is_tight(&self) -> bool {
        self.status == FitStatus::Tight
    }

    /// The warning to surface for a tight fit.
    pub fn warning(&self) -> Option<Warning> {
        self.is_tight().then(|| Warning::FitUnattainable {
            block: self.block_id.clone(),
            floor: self.font_size,
        })
    }

    /// Treat a tight fit as an error.
    pub fn into_strict(self) -> TypesetResult<Self> {
        match self.warning() {
            Some(w) => Err(w.into()),
            None => Ok(self),
        }
    }
}

struct Measured {
    size: Size,
    divider_offset: Option<f64>,
}

/// Shrink `block` until its text fits its box.
///
/// Starting at `block.font_size`, the size is multiplied by `1 - step` after
/// every overflowing measurement (large text shrinks faster), never going
/// below the floor. The floor is returned with [`FitStatus::Tight`] when the
/// text still overflows there. The result depends only on the inputs.
#[tracing::instrument(skip(measure, block, text, options), fields(block = %block.id))]
pub fn fit<M: TextMeasure + ?Sized>(
    measure: &mut M,
    block: &TextBlock,
    text: &BlockText,
    options: &FitOptions,
) -> TypesetResult<FitOutcome> {
    block.validate()?;
    options.validate()?;
    let floor = options.floor.unwrap_or(block.min_font_size);
    if floor > block.font_size {
        return Err(TypesetError::invalid(format!(
            "block '{}' floor {floor} exceeds starting font size {}",
            block.id, block.font_size
        )));
    }

    let (limit, wrap) = match block.mode {
        FitMode::Height => (block.bounds.height(), Some(block.bounds.width())),
        FitMode::Width => (block.bounds.width(), None),
    };

    let mut size = block.font_size;
    let mut iterations = 0u32;
    loop {
        iterations += 1;
        let m = measure_block(measure, block, text, size, wrap)?;
        let dim = match block.mode {
            FitMode::Height => m.size.height,
            FitMode::Width => m.size.width,
        };

        let status = if dim <= limit {
            FitStatus::Fits
        } else if size <= floor {
            FitStatus::Tight
        } else {
            size = (size * (1.0 - options.step)).max(floor);
            continue;
        };

        let outcome = FitOutcome {
            block_id: block.id.clone(),
            font_size: size,
            status,
            measured: m.size,
            divider_offset: m.divider_offset,
            iterations,
        };
        if outcome.is_tight() {
            tracing::warn!(floor = size, measured = dim, limit, "text overflows at floor");
        } else {
            tracing::debug!(font_size = size, iterations, "fit");
        }
        return Ok(outcome);
    }
}

fn measure_block<M: TextMeasure + ?Sized>(
    measure: &mut M,
    block: &TextBlock,
    text: &BlockText,
    size: f64,
    wrap: Option<f64>,
) -> TypesetResult<Measured> {
    let mut run = |segments: &[Segment]| {
        measure
            .measure(segments, size, wrap)
            .map_err(|e| TypesetError::measure(format!("block '{}': {e:#}", block.id)))
    };

    let rules = run(&text.rules)?;
    if text.flavor.is_empty() {
        return Ok(Measured {
            size: rules,
            divider_offset: None,
        });
    }

    let flavor = run(&text.flavor)?;
    let gap = block.flavor_gap_em * size;
    Ok(Measured {
        size: Size::new(
            rules.width.max(flavor.width),
            rules.height + gap + flavor.height,
        ),
        divider_offset: Some(rules.height + gap * 0.5),
    })
}

#[cfg(test)]
#[path = "../tests/unit/fit.rs"]
mod tests;
