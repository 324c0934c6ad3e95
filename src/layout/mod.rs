pub mod align;
pub mod distribute;
pub mod dividers;
