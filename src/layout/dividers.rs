use crate::layout::distribute::DistributionPlan;

/// Vertical center of a divider drawn between two consecutive blocks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DividerPlacement {
    /// Block above the divider.
    pub above: String,
    /// Block below the divider.
    pub below: String,
    /// Divider center line.
    pub center_y: f64,
}

/// Place one divider midway between every pair of consecutive placements
/// (saga chapters, class levels). Runs after distribution on final positions.
pub fn place_dividers(plan: &DistributionPlan) -> Vec<DividerPlacement> {
    plan.placements
        .windows(2)
        .map(|pair| DividerPlacement {
            above: pair[0].block_id.clone(),
            below: pair[1].block_id.clone(),
            center_y: (pair[0].bounds.y1 + pair[1].bounds.y0) * 0.5,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/dividers.rs"]
mod tests;
