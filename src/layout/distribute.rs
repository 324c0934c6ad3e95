use crate::foundation::{
    core::{Rect, ensure_non_negative, ensure_rect, overlaps, translate_y, validate_region, with_top},
    error::{TypesetResult, Warning},
};

/// A block's current geometry, measured after fitting.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacedBlock {
    /// Block identifier.
    pub id: String,
    /// Current bounds; only the height and vertical position are used.
    pub bounds: Rect,
}

impl PlacedBlock {
    /// Block at `bounds`.
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
        }
    }
}

/// Gap configuration for [`distribute`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpreadOptions {
    /// Space between the region top and the first block.
    pub edge_gap: f64,
    /// Space between consecutive blocks; defaults to `edge_gap`.
    #[serde(default)]
    pub inside_gap: Option<f64>,
}

impl SpreadOptions {
    /// Check gaps are finite and non-negative.
    pub fn validate(&self) -> TypesetResult<()> {
        ensure_non_negative("edge_gap", self.edge_gap)?;
        if let Some(g) = self.inside_gap {
            ensure_non_negative("inside_gap", g)?;
        }
        Ok(())
    }
}

/// Where one block ends up.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Block identifier.
    pub block_id: String,
    /// Vertical delta to apply to the block's current position.
    pub y_offset: f64,
    /// Final bounds after applying `y_offset`.
    pub bounds: Rect,
}

/// Ordered placements for a list of blocks, plus overflow warnings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DistributionPlan {
    /// One entry per input block, in input order.
    pub placements: Vec<Placement>,
    /// Overflow conditions; the placements are still usable.
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl DistributionPlan {
    /// Placement for `block_id`.
    pub fn get(&self, block_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.block_id == block_id)
    }

    /// Final top edges, in order.
    pub fn tops(&self) -> Vec<f64> {
        self.placements.iter().map(|p| p.bounds.y0).collect()
    }

    /// Offsets, in order.
    pub fn offsets(&self) -> Vec<f64> {
        self.placements.iter().map(|p| p.y_offset).collect()
    }

    /// Whether any overflow was detected.
    pub fn overflows(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Treat any overflow as an error.
    pub fn into_strict(self) -> TypesetResult<Self> {
        match self.warnings.first() {
            Some(w) => Err(w.clone().into()),
            None => Ok(self),
        }
    }
}

/// Stack `blocks` top to bottom inside `region`.
///
/// The first block's top lands `edge_gap` below the region top; every other
/// block starts `inside_gap` (or `edge_gap`) below the previous bottom. When
/// `exclusion` intersects a placed block, that block and every block below it
/// move down by the smallest amount that clears the exclusion. Blocks are never
/// resized and the spread is never recomputed; overflow is reported through
/// [`DistributionPlan::warnings`].
#[tracing::instrument(skip(blocks), fields(count = blocks.len()))]
pub fn distribute(
    blocks: &[PlacedBlock],
    region: Rect,
    edge_gap: f64,
    inside_gap: Option<f64>,
    exclusion: Option<Rect>,
) -> TypesetResult<DistributionPlan> {
    validate_region("distribution region", region)?;
    SpreadOptions {
        edge_gap,
        inside_gap,
    }
    .validate()?;
    if let Some(ex) = exclusion {
        ensure_rect("exclusion zone", ex)?;
    }
    for b in blocks {
        ensure_rect(&format!("block '{}' bounds", b.id), b.bounds)?;
    }

    let mut plan = DistributionPlan::default();
    if blocks.is_empty() {
        return Ok(plan);
    }

    let gap = inside_gap.unwrap_or(edge_gap);
    let mut placed = Vec::<Rect>::with_capacity(blocks.len());
    let mut top = region.y0 + edge_gap;
    for b in blocks {
        let r = with_top(b.bounds, top);
        top = r.y1 + gap;
        placed.push(r);
    }

    let required = blocks.iter().map(|b| b.bounds.height()).sum::<f64>()
        + edge_gap
        + (blocks.len() - 1) as f64 * gap;
    if required > region.height() {
        tracing::warn!(required, available = region.height(), "blocks overflow region");
        plan.warnings.push(Warning::Overflow {
            required,
            available: region.height(),
        });
    }

    if let Some(ex) = exclusion
        && let Some(idx) = placed.iter().position(|r| overlaps(*r, ex))
    {
        let delta = ex.y1 - placed[idx].y0;
        tracing::debug!(block = %blocks[idx].id, delta, "clearing exclusion zone");
        for r in &mut placed[idx..] {
            *r = translate_y(*r, delta);
        }

        let last = placed.len() - 1;
        let overshoot = placed[last].y1 - region.y1;
        if overshoot > 0.0 {
            tracing::warn!(overshoot, "exclusion nudge pushed blocks past region bottom");
            plan.warnings.push(Warning::ExclusionOverflow {
                block: blocks[last].id.clone(),
                overshoot,
            });
        }
    }

    plan.placements = blocks
        .iter()
        .zip(placed)
        .map(|(b, r)| Placement {
            block_id: b.id.clone(),
            y_offset: r.y0 - b.bounds.y0,
            bounds: r,
        })
        .collect();
    Ok(plan)
}

/// Spread blocks over the whole region, deriving gaps from the free space.
///
/// With no `outside_gap` every gap (top, between, bottom) is
/// `free / (n + 1)`. Otherwise the top and bottom gaps are `outside_gap` and
/// the inside gaps share what remains. A negative derived gap is clamped to
/// zero and reported as [`Warning::Overflow`].
pub fn spread_over_region(
    blocks: &[PlacedBlock],
    region: Rect,
    outside_gap: Option<f64>,
    exclusion: Option<Rect>,
) -> TypesetResult<DistributionPlan> {
    validate_region("distribution region", region)?;
    if let Some(g) = outside_gap {
        ensure_non_negative("outside_gap", g)?;
    }
    if blocks.is_empty() {
        return Ok(DistributionPlan::default());
    }

    let n = blocks.len() as f64;
    let total = blocks.iter().map(|b| b.bounds.height()).sum::<f64>();
    let free = region.height() - total;

    let (edge, inside, wanted) = match outside_gap {
        None => {
            let g = free / (n + 1.0);
            (g, g, total)
        }
        Some(outside) if blocks.len() == 1 => (outside, outside, total + 2.0 * outside),
        Some(outside) => (
            outside,
            (free - 2.0 * outside) / (n - 1.0),
            total + 2.0 * outside,
        ),
    };

    let mut plan = distribute(
        blocks,
        region,
        edge.max(0.0),
        Some(inside.max(0.0)),
        exclusion,
    )?;
    let clamped = edge < 0.0 || inside < 0.0;
    let already = plan
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::Overflow { .. }));
    if clamped && !already {
        plan.warnings.push(Warning::Overflow {
            required: wanted,
            available: region.height(),
        });
    }
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/distribute.rs"]
mod tests;
