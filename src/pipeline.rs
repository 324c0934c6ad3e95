use std::{collections::BTreeSet, num::NonZeroUsize, sync::Arc};

use rayon::prelude::*;

use crate::{
    fit::{BlockText, FitOptions, FitOutcome, TextBlock, fit},
    foundation::{
        core::{Rect, ensure_non_negative, ensure_rect, validate_region},
        error::{TypesetError, TypesetResult, Warning},
    },
    layout::{
        distribute::{DistributionPlan, PlacedBlock, distribute, spread_over_region},
        dividers::{DividerPlacement, place_dividers},
    },
    measure::TextMeasure,
    text::{ability_words::AbilityWordTable, classify::SpanClassifier, segment::Segment},
};

/// Everything needed to lay out the text of one card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardLayoutJob {
    /// Card name, used for diagnostics only.
    #[serde(default)]
    pub name: Option<String>,
    /// Text blocks in top-to-bottom order.
    pub blocks: Vec<TextBlock>,
    /// Fitting parameters shared by every block.
    #[serde(default)]
    pub fit: FitOptions,
    /// Distribute the fitted blocks inside a region.
    #[serde(default)]
    pub distribution: Option<DistributionSpec>,
    /// Ability words for this job instead of the engine's table.
    #[serde(default)]
    pub ability_words: Option<AbilityWordTable>,
}

/// Where and how fitted blocks are distributed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionSpec {
    /// Containing reference region.
    pub region: Rect,
    /// Gap policy.
    #[serde(default)]
    pub spacing: Spacing,
    /// Area blocks must not overlap (loyalty badge, power/toughness plate).
    #[serde(default)]
    pub exclusion: Option<Rect>,
    /// Place dividers between consecutive blocks.
    #[serde(default)]
    pub dividers: bool,
}

/// Gap policy for distribution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Spacing {
    /// Explicit gaps, see [`distribute`].
    Fixed {
        /// Gap above the first block.
        edge_gap: f64,
        /// Gap between blocks.
        #[serde(default)]
        inside_gap: Option<f64>,
    },
    /// Gaps derived from free space, see [`spread_over_region`].
    Auto {
        /// Fixed top and bottom gap.
        #[serde(default)]
        outside_gap: Option<f64>,
    },
}

impl Default for Spacing {
    fn default() -> Self {
        Self::Auto { outside_gap: None }
    }
}

impl CardLayoutJob {
    /// Check every block, the fitting options and the distribution settings.
    pub fn validate(&self) -> TypesetResult<()> {
        let mut ids = BTreeSet::<&str>::new();
        for b in &self.blocks {
            if b.id.is_empty() {
                return Err(TypesetError::invalid("block id must be non-empty"));
            }
            if !ids.insert(b.id.as_str()) {
                return Err(TypesetError::invalid(format!(
                    "duplicate block id '{}'",
                    b.id
                )));
            }
            b.validate()?;
        }
        self.fit.validate()?;

        if let Some(d) = &self.distribution {
            validate_region("distribution region", d.region)?;
            if let Some(ex) = d.exclusion {
                ensure_rect("exclusion zone", ex)?;
            }
            match d.spacing {
                Spacing::Fixed {
                    edge_gap,
                    inside_gap,
                } => {
                    ensure_non_negative("edge_gap", edge_gap)?;
                    if let Some(g) = inside_gap {
                        ensure_non_negative("inside_gap", g)?;
                    }
                }
                Spacing::Auto {
                    outside_gap: Some(g),
                } => ensure_non_negative("outside_gap", g)?,
                Spacing::Auto { outside_gap: None } => {}
            }
        }
        Ok(())
    }
}

/// Typeset result for one block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BlockLayout {
    /// Block identifier.
    pub id: String,
    /// Styled rules text.
    pub segments: Vec<Segment>,
    /// Styled flavor text.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flavor_segments: Vec<Segment>,
    /// Chosen font size and measurements.
    pub fit: FitOutcome,
    /// Fitted bounds before distribution: box origin, measured height.
    pub bounds: Rect,
}

/// Output consumed by the rendering frontend.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutResult {
    /// Card name from the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One entry per input block, in input order.
    pub blocks: Vec<BlockLayout>,
    /// Distribution plan, when the job asked for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<DistributionPlan>,
    /// Divider centers between distributed blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dividers: Vec<DividerPlacement>,
    /// Every warning raised while laying out the card.
    pub warnings: Vec<Warning>,
}

impl LayoutResult {
    /// Font size chosen for `block_id`.
    pub fn font_size(&self, block_id: &str) -> Option<f64> {
        self.blocks
            .iter()
            .find(|b| b.id == block_id)
            .map(|b| b.fit.font_size)
    }

    /// Treat any warning as an error.
    pub fn into_strict(self) -> TypesetResult<Self> {
        match self.warnings.first() {
            Some(w) => Err(w.clone().into()),
            None => Ok(self),
        }
    }
}

/// Runs classification, fitting and distribution for card layout jobs.
///
/// The engine holds only the shared, read-only ability-word table; every call
/// is independent of every other.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    classifier: SpanClassifier,
}

impl LayoutEngine {
    /// Engine over a shared ability-word table.
    pub fn new(table: Arc<AbilityWordTable>) -> Self {
        Self {
            classifier: SpanClassifier::new(table),
        }
    }

    /// The engine's classifier.
    pub fn classifier(&self) -> &SpanClassifier {
        &self.classifier
    }

    /// Lay out one card: classify every block, fit each independently, then
    /// distribute the fitted blocks and place dividers when requested.
    #[tracing::instrument(skip(self, job, measure), fields(card = ?job.name))]
    pub fn layout_card<M: TextMeasure + ?Sized>(
        &self,
        job: &CardLayoutJob,
        measure: &mut M,
    ) -> TypesetResult<LayoutResult> {
        job.validate()?;

        let job_classifier;
        let classifier = match &job.ability_words {
            Some(table) => {
                job_classifier = SpanClassifier::new(Arc::new(table.clone()));
                &job_classifier
            }
            None => &self.classifier,
        };

        let mut warnings = Vec::<Warning>::new();
        let mut blocks = Vec::<BlockLayout>::with_capacity(job.blocks.len());
        for block in &job.blocks {
            let report = classifier.classify_report(block.content.as_str());
            warnings.extend(report.warnings);
            let flavor = block
                .flavor
                .as_ref()
                .map(|f| classifier.classify_flavor(f.as_str()))
                .unwrap_or_default();
            let text = BlockText {
                rules: report.segments,
                flavor,
            };

            let outcome = fit(measure, block, &text, &job.fit)?;
            warnings.extend(outcome.warning());

            let bounds = Rect::new(
                block.bounds.x0,
                block.bounds.y0,
                block.bounds.x1,
                block.bounds.y0 + outcome.measured.height,
            );
            blocks.push(BlockLayout {
                id: block.id.clone(),
                segments: text.rules,
                flavor_segments: text.flavor,
                fit: outcome,
                bounds,
            });
        }

        let mut plan = None;
        let mut dividers = Vec::new();
        if let Some(spec) = &job.distribution {
            let placed = blocks
                .iter()
                .map(|b| PlacedBlock::new(b.id.clone(), b.bounds))
                .collect::<Vec<_>>();
            let p = match spec.spacing {
                Spacing::Fixed {
                    edge_gap,
                    inside_gap,
                } => distribute(&placed, spec.region, edge_gap, inside_gap, spec.exclusion)?,
                Spacing::Auto { outside_gap } => {
                    spread_over_region(&placed, spec.region, outside_gap, spec.exclusion)?
                }
            };
            warnings.extend(p.warnings.iter().cloned());
            if spec.dividers {
                dividers = place_dividers(&p);
            }
            plan = Some(p);
        }

        Ok(LayoutResult {
            name: job.name.clone(),
            blocks,
            plan,
            dividers,
            warnings,
        })
    }

    /// Lay out independent cards in parallel.
    ///
    /// Each worker thread builds its own measurer with `make_measure`.
    /// `threads` of `None` uses rayon's default. Results are returned in job
    /// order; one failing job does not affect the others.
    #[tracing::instrument(skip(self, jobs, make_measure), fields(count = jobs.len()))]
    pub fn layout_batch<M, F>(
        &self,
        jobs: &[CardLayoutJob],
        threads: Option<NonZeroUsize>,
        make_measure: F,
    ) -> TypesetResult<Vec<TypesetResult<LayoutResult>>>
    where
        M: TextMeasure,
        F: Fn() -> M + Sync + Send,
    {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.map_or(0, NonZeroUsize::get))
            .build()
            .map_err(|e| anyhow::anyhow!("batch layout workers: {e}"))?;
        Ok(workers.install(|| {
            jobs.par_iter()
                .map_init(&make_measure, |measure, job| self.layout_card(job, measure))
                .collect::<Vec<_>>()
        }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
