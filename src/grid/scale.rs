use crate::{
    constants::{GRID_SETTINGS, SCALE_STEPS},
    domain::Goal,
};

/// Raw units represented by one grid cell for a goal of `total` units.
pub fn scale_for(total: u64) -> u64 {
    SCALE_STEPS
        .iter()
        .find(|step| total <= step.max_total)
        .map_or(GRID_SETTINGS.max_scale, |step| step.scale)
}

/// Scale shared by every goal once the combined total crosses the rescale threshold.
pub fn aggregate_scale(goals: &[Goal]) -> Option<u64> {
    let aggregate: u64 = goals.iter().map(|goal| goal.total_amount).sum();
    if aggregate > GRID_SETTINGS.aggregate_rescale_threshold {
        Some(scale_for(aggregate))
    } else {
        None
    }
}
