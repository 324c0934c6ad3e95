//! Cardtype is the text layout engine behind trading-card rendering.
//!
//! It decides *how* rules text is set, never *where pixels go*: a rendering
//! frontend hands it text blocks and boxes and gets back styled segments,
//! font sizes and vertical positions.
//!
//! # Pipeline overview
//!
//! 1. **Classify**: `rules text -> Vec<Segment>` (which runs are italic)
//! 2. **Fit**: `TextBlock + TextMeasure -> FitOutcome` (largest font size that fits the box)
//! 3. **Distribute**: `fitted blocks + region -> DistributionPlan` (vertical spread, exclusion zone, dividers)
//!
//! [`LayoutEngine`] runs all three for a [`CardLayoutJob`] and can lay out
//! many cards in parallel.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: every stage is a pure function of its inputs and the measurer.
//! - **No shaping**: text measurement is delegated to a [`TextMeasure`].
//! - **Warnings, not panics**: malformed text and unattainable fits are reported as [`Warning`]s.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod fit;
mod foundation;
mod layout;
mod measure;
mod pipeline;
mod text;

pub use fit::{
    BlockText, FitMode, FitOptions, FitOutcome, FitStatus, MIN_FIT_STEP, TextBlock, fit,
};
pub use foundation::core::{Point, Rect, Size, overlaps};
pub use foundation::error::{TypesetError, TypesetResult, Warning};
pub use layout::align::{center_vertically, width_before_neighbor};
pub use layout::distribute::{
    DistributionPlan, PlacedBlock, Placement, SpreadOptions, distribute, spread_over_region,
};
pub use layout::dividers::{DividerPlacement, place_dividers};
pub use measure::shaped::ParleyMeasure;
pub use measure::{EstimatedMeasure, FnMeasure, TextMeasure, measure_fn};
pub use pipeline::{
    BlockLayout, CardLayoutJob, DistributionSpec, LayoutEngine, LayoutResult, Spacing,
};
pub use text::ability_words::AbilityWordTable;
pub use text::classify::{BULLET, ClassifyReport, LEAD_IN_SEPARATOR, SpanClassifier};
pub use text::segment::{RulesText, Segment, Style, flatten, italic_spans};
