use std::collections::HashSet;

use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    constants::GRID_SETTINGS,
    domain::{Cell, Goal, GoalError, GoalId, GoalUnit, GridStateError, ProgressError},
};

use super::{
    layout::{GridDimensions, compute_dimensions},
    scale::{aggregate_scale, scale_for},
    undo::UndoStack,
};

/// Goals and cells as they were right before a progress step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridSnapshot {
    pub goals: Vec<Goal>,
    pub cells: Vec<Cell>,
}

/// How many cells a progress amount is worth.
///
/// `Exact` divides the amount by the goal scale. `Proportional` takes the same share
/// of the goal's cells as the amount is of its total; it only matches `Exact` when the
/// scale is 1 and is kept for the goal-list quick complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellQuota {
    Exact,
    Proportional,
}

impl CellQuota {
    pub fn cells_for(self, goal: &Goal, amount: u64) -> usize {
        match self {
            CellQuota::Exact => amount.div_ceil(goal.scale.max(1)) as usize,
            CellQuota::Proportional => {
                if goal.total_amount == 0 {
                    return 0;
                }
                let squares = goal.scaled_square_count() as u128;
                (squares * amount as u128).div_ceil(goal.total_amount as u128) as usize
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOutcome {
    pub goal_id: GoalId,
    pub amount: u64,
    pub requested_cells: usize,
    pub colored_positions: Vec<usize>,
    pub goal_completed: bool,
}

pub struct GridProgressEngine<R = ThreadRng> {
    goals: Vec<Goal>,
    cells: Vec<Cell>,
    free_positions: Vec<usize>,
    next_goal_id: u64,
    history: UndoStack<GridSnapshot>,
    rng: R,
}

impl GridProgressEngine<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for GridProgressEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GridProgressEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            goals: Vec::new(),
            cells: Vec::new(),
            free_positions: Vec::new(),
            next_goal_id: 1,
            history: UndoStack::new(GRID_SETTINGS.undo_capacity),
            rng,
        }
    }

    /// Rebuilds an engine from persisted goals and cells without rescaling anything.
    /// Fails when a cell claims a position outside the persisted grid.
    pub fn from_parts(goals: Vec<Goal>, cells: Vec<Cell>, rng: R) -> Result<Self, GridStateError> {
        let next_goal_id = goals.iter().map(|goal| goal.id.0).max().unwrap_or(0) + 1;
        let mut engine = Self {
            goals,
            cells: normalize_cells(&cells)?,
            free_positions: Vec::new(),
            next_goal_id,
            history: UndoStack::new(GRID_SETTINGS.undo_capacity),
            rng,
        };
        engine.rebuild_free_positions();
        Ok(engine)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Sum of every goal's scaled square count.
    pub fn total_cells(&self) -> usize {
        self.goals.iter().map(Goal::scaled_square_count).sum()
    }

    pub fn colored_count(&self) -> usize {
        self.cells.len() - self.free_positions.len()
    }

    pub fn compute_dimensions(&self) -> GridDimensions {
        compute_dimensions(self.total_cells())
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn pending_undo(&self) -> Option<&GridSnapshot> {
        self.history.peek()
    }

    /// Reinstates an undo step that was persisted alongside the project.
    pub fn restore_pending_undo(&mut self, snapshot: GridSnapshot) -> Result<(), GridStateError> {
        let snapshot = GridSnapshot {
            cells: normalize_cells(&snapshot.cells)?,
            goals: snapshot.goals,
        };
        self.history.clear();
        self.history.push(snapshot);
        Ok(())
    }

    pub fn create_goal(
        &mut self,
        text: &str,
        total_amount: u64,
        unit: GoalUnit,
    ) -> Result<&Goal, GoalError> {
        let text = validate_goal_input(text, total_amount)?;

        let id = GoalId::new(self.next_goal_id);
        self.next_goal_id += 1;
        self.goals.push(Goal::new(
            id,
            text,
            total_amount,
            unit,
            scale_for(total_amount),
        ));
        self.history.clear();

        debug!(goal = %id, total_amount, "goal created");
        Ok(&self.goals[self.goals.len() - 1])
    }

    /// Updates a goal in place. Progress already made is kept, capped at the new total.
    /// The scale is only re-derived when the total changes.
    pub fn edit_goal(
        &mut self,
        id: GoalId,
        text: &str,
        total_amount: u64,
        unit: GoalUnit,
    ) -> Result<&Goal, GoalError> {
        let text = validate_goal_input(text, total_amount)?;
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or(GoalError::UnknownGoal(id))?;

        let goal = &mut self.goals[index];
        if goal.total_amount != total_amount {
            let completed = goal.completed_amount().min(total_amount);
            goal.scale = scale_for(total_amount);
            goal.total_amount = total_amount;
            goal.remaining_amount = total_amount - completed;
            goal.is_completed = goal.remaining_amount == 0;
        }
        goal.text = text;
        goal.unit = unit;
        self.history.clear();

        debug!(goal = %id, total_amount, "goal edited");
        Ok(&self.goals[index])
    }

    pub fn remove_goal(&mut self, id: GoalId) -> Result<Goal, GoalError> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or(GoalError::UnknownGoal(id))?;
        self.history.clear();
        debug!(goal = %id, "goal removed");
        Ok(self.goals.remove(index))
    }

    /// Resizes the cell array to the current goal set.
    ///
    /// Colored positions that still fit stay colored. Colored positions past the new
    /// end are dropped even though goal bookkeeping still counts that progress.
    pub fn initialize(&mut self) -> &[Cell] {
        if let Some(scale) = aggregate_scale(&self.goals) {
            for goal in &mut self.goals {
                goal.scale = scale;
            }
        }

        let total = self.total_cells();
        let colored: HashSet<usize> = self
            .cells
            .iter()
            .filter(|cell| cell.is_colored)
            .map(|cell| cell.position)
            .collect();

        let dropped = colored.iter().filter(|&&position| position >= total).count();
        if dropped > 0 {
            warn!(dropped, total, "colored cells fell outside the resized grid");
        }

        self.cells = (0..total)
            .map(|position| Cell {
                position,
                is_colored: colored.contains(&position),
            })
            .collect();
        self.rebuild_free_positions();

        info!(
            cells = total,
            colored = self.colored_count(),
            "grid initialized"
        );
        &self.cells
    }

    /// Colors up to `count` uniformly random uncolored cells and returns their positions.
    pub fn color_cells(&mut self, count: usize) -> Vec<usize> {
        let count = count.min(self.free_positions.len());
        let mut colored = Vec::with_capacity(count);

        for _ in 0..count {
            let pick = self.rng.gen_range(0..self.free_positions.len());
            let position = self.free_positions.swap_remove(pick);
            self.cells[position].is_colored = true;
            colored.push(position);
        }

        colored
    }

    pub fn apply_progress(
        &mut self,
        goal_id: GoalId,
        amount: u64,
    ) -> Result<ProgressOutcome, ProgressError> {
        self.apply_with_quota(goal_id, amount, CellQuota::Exact)
    }

    pub fn complete_goal(&mut self, goal_id: GoalId) -> Result<ProgressOutcome, ProgressError> {
        let remaining = self.remaining_of(goal_id)?;
        self.apply_with_quota(goal_id, remaining, CellQuota::Exact)
    }

    pub fn proportional_color(
        &mut self,
        goal_id: GoalId,
        count: u64,
    ) -> Result<ProgressOutcome, ProgressError> {
        self.apply_with_quota(goal_id, count, CellQuota::Proportional)
    }

    pub fn quick_complete(&mut self, goal_id: GoalId) -> Result<ProgressOutcome, ProgressError> {
        let remaining = self.remaining_of(goal_id)?;
        self.apply_with_quota(goal_id, remaining, CellQuota::Proportional)
    }

    /// Restores the state saved before the last progress step. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        self.goals = snapshot.goals;
        self.cells = snapshot.cells;
        self.rebuild_free_positions();

        info!(colored = self.colored_count(), "progress undone");
        true
    }

    fn apply_with_quota(
        &mut self,
        goal_id: GoalId,
        amount: u64,
        quota: CellQuota,
    ) -> Result<ProgressOutcome, ProgressError> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == goal_id)
            .ok_or(ProgressError::UnknownGoal(goal_id))?;

        let remaining = self.goals[index].remaining_amount;
        if amount > remaining {
            return Err(ProgressError::ExceedsRemaining {
                requested: amount,
                remaining,
            });
        }

        let requested_cells = quota.cells_for(&self.goals[index], amount);
        let snapshot = self.snapshot();
        self.history.push(snapshot);

        self.goals[index].consume(amount);
        let goal_completed = self.goals[index].is_completed;
        let colored_positions = self.color_cells(requested_cells);

        debug!(
            goal = %goal_id,
            amount,
            requested_cells,
            colored = colored_positions.len(),
            ?quota,
            "progress applied"
        );

        Ok(ProgressOutcome {
            goal_id,
            amount,
            requested_cells,
            colored_positions,
            goal_completed,
        })
    }

    fn remaining_of(&self, goal_id: GoalId) -> Result<u64, ProgressError> {
        self.goal(goal_id)
            .map(|goal| goal.remaining_amount)
            .ok_or(ProgressError::UnknownGoal(goal_id))
    }

    fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            goals: self.goals.clone(),
            cells: self.cells.clone(),
        }
    }

    fn rebuild_free_positions(&mut self) {
        self.free_positions = self
            .cells
            .iter()
            .filter(|cell| !cell.is_colored)
            .map(|cell| cell.position)
            .collect();
    }
}

fn validate_goal_input(text: &str, total_amount: u64) -> Result<String, GoalError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GoalError::EmptyText);
    }
    if total_amount == 0 {
        return Err(GoalError::NonPositiveAmount);
    }
    Ok(text.to_string())
}

/// Lays persisted cells out so that index and position agree.
pub(crate) fn normalize_cells(cells: &[Cell]) -> Result<Vec<Cell>, GridStateError> {
    let len = cells.len();
    let mut normalized: Vec<Cell> = (0..len).map(Cell::blank).collect();
    for cell in cells {
        let slot = normalized
            .get_mut(cell.position)
            .ok_or(GridStateError::CellOutOfRange {
                position: cell.position,
                len,
            })?;
        slot.is_colored |= cell.is_colored;
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn engine() -> GridProgressEngine<StdRng> {
        GridProgressEngine::with_rng(StdRng::seed_from_u64(7))
    }

    fn colored(engine: &GridProgressEngine<StdRng>) -> usize {
        engine.cells().iter().filter(|cell| cell.is_colored).count()
    }

    fn colored_positions(engine: &GridProgressEngine<StdRng>) -> Vec<usize> {
        engine
            .cells()
            .iter()
            .filter(|cell| cell.is_colored)
            .map(|cell| cell.position)
            .collect()
    }

    #[test]
    fn test_create_goal_rejects_invalid_input() {
        let mut engine = engine();
        assert_eq!(
            engine.create_goal("  ", 10, GoalUnit::Pieces).unwrap_err(),
            GoalError::EmptyText
        );
        assert_eq!(
            engine.create_goal("Read", 0, GoalUnit::Pieces).unwrap_err(),
            GoalError::NonPositiveAmount
        );
        assert!(engine.goals().is_empty());
    }

    #[test]
    fn test_create_goal_assigns_scale_from_own_total() {
        let mut engine = engine();
        let goal = engine.create_goal("Save", 25_000, GoalUnit::Dollar).unwrap();
        assert_eq!(goal.scale, 10);
        assert_eq!(goal.scaled_square_count(), 2_500);
        assert_eq!(goal.remaining_amount, 25_000);
        assert!(!goal.is_completed);

        engine.initialize();
        assert_eq!(engine.cells().len(), 2_500);
    }

    #[test]
    fn test_goal_ids_are_unique() {
        let mut engine = engine();
        let first = engine.create_goal("A", 1, GoalUnit::Pieces).unwrap().id;
        let second = engine.create_goal("B", 1, GoalUnit::Pieces).unwrap().id;
        engine.remove_goal(first).unwrap();
        let third = engine.create_goal("C", 1, GoalUnit::Pieces).unwrap().id;
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn test_initialize_cell_count_matches_goals() {
        let mut engine = engine();
        engine.create_goal("Read", 200, GoalUnit::Pieces).unwrap();
        engine.create_goal("Run", 37, GoalUnit::Kilograms).unwrap();
        let expected: usize = engine.goals().iter().map(Goal::scaled_square_count).sum();

        let cells = engine.initialize();
        assert_eq!(cells.len(), expected);
        assert!(
            cells
                .iter()
                .enumerate()
                .all(|(index, cell)| cell.position == index && !cell.is_colored)
        );
    }

    #[test]
    fn test_initialize_empty_goal_set() {
        let mut engine = engine();
        assert!(engine.initialize().is_empty());
        assert_eq!(engine.compute_dimensions(), GridDimensions::default());
    }

    #[test]
    fn test_aggregate_rescale_overwrites_every_goal() {
        let mut engine = engine();
        engine.create_goal("Save", 9_000, GoalUnit::Euro).unwrap();
        engine.create_goal("Walk", 6_000, GoalUnit::Meters).unwrap();
        assert!(engine.goals().iter().all(|goal| goal.scale == 1));

        engine.initialize();

        assert!(engine.goals().iter().all(|goal| goal.scale == 10));
        assert_eq!(engine.cells().len(), 900 + 600);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 150, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 40).unwrap();

        let first = engine.initialize().to_vec();
        let second = engine.initialize().to_vec();
        assert_eq!(first, second);
        assert_eq!(colored(&engine), 40);
    }

    #[test]
    fn test_initialize_preserves_colored_cells_when_growing() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 50, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 20).unwrap();
        let before = colored_positions(&engine);

        engine.create_goal("Write", 30, GoalUnit::Pieces).unwrap();
        engine.initialize();

        assert_eq!(engine.cells().len(), 80);
        assert_eq!(colored_positions(&engine), before);
    }

    #[test]
    fn test_initialize_drops_colored_cells_past_new_end() {
        let mut engine = engine();
        let keep = engine.create_goal("Keep", 10, GoalUnit::Pieces).unwrap().id;
        let gone = engine.create_goal("Gone", 90, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.complete_goal(gone).unwrap();
        let inside = colored_positions(&engine)
            .into_iter()
            .filter(|&position| position < 10)
            .collect::<Vec<_>>();

        engine.remove_goal(gone).unwrap();
        engine.initialize();

        assert_eq!(engine.cells().len(), 10);
        assert_eq!(colored_positions(&engine), inside);
        assert_eq!(engine.goal(keep).map(|goal| goal.remaining_amount), Some(10));
    }

    #[test]
    fn test_apply_progress_colors_exact_count() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 100, GoalUnit::Pieces).unwrap().id;
        engine.initialize();

        let outcome = engine.apply_progress(id, 30).unwrap();

        let goal = engine.goal(id).unwrap();
        assert_eq!(goal.remaining_amount, 70);
        assert!(!goal.is_completed);
        assert_eq!(outcome.colored_positions.len(), 30);
        assert_eq!(colored(&engine), 30);
        assert_eq!(engine.colored_count(), 30);
    }

    #[test]
    fn test_apply_progress_rounds_up_by_scale() {
        let mut engine = engine();
        let id = engine.create_goal("Save", 50_000, GoalUnit::Dollar).unwrap().id;
        engine.initialize();

        let outcome = engine.apply_progress(id, 15).unwrap();
        assert_eq!(outcome.requested_cells, 2);
        assert_eq!(colored(&engine), 2);
    }

    #[test]
    fn test_apply_progress_rejects_amount_over_remaining() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 20, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 5).unwrap();
        let goals_before = engine.goals().to_vec();
        let cells_before = engine.cells().to_vec();

        let err = engine.apply_progress(id, 16).unwrap_err();

        assert_eq!(
            err,
            ProgressError::ExceedsRemaining {
                requested: 16,
                remaining: 15
            }
        );
        assert_eq!(engine.goals(), goals_before.as_slice());
        assert_eq!(engine.cells(), cells_before.as_slice());
    }

    #[test]
    fn test_apply_progress_unknown_goal() {
        let mut engine = engine();
        assert_eq!(
            engine.apply_progress(GoalId::new(42), 1).unwrap_err(),
            ProgressError::UnknownGoal(GoalId::new(42))
        );
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_progress_colors_anywhere_in_shared_grid() {
        let mut engine = engine();
        let small = engine.create_goal("Small", 5, GoalUnit::Pieces).unwrap().id;
        engine.create_goal("Large", 95, GoalUnit::Pieces).unwrap();
        engine.initialize();

        engine.complete_goal(small).unwrap();
        engine.apply_progress(small, 0).unwrap();

        assert_eq!(colored(&engine), 5);
    }

    #[test]
    fn test_color_cells_never_exceeds_pool() {
        let mut engine = engine();
        engine.create_goal("Read", 12, GoalUnit::Pieces).unwrap();
        engine.initialize();

        let first = engine.color_cells(8);
        let second = engine.color_cells(10);

        assert_eq!(first.len(), 8);
        assert_eq!(second.len(), 4);
        assert!(engine.color_cells(3).is_empty());
        assert_eq!(colored(&engine), 12);

        let mut all: Vec<usize> = first.into_iter().chain(second).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 12);
    }

    #[test]
    fn test_complete_goal_uses_scale() {
        let mut engine = engine();
        let id = engine.create_goal("Pages", 80, GoalUnit::Pieces).unwrap().id;
        engine.create_goal("Other", 10_000, GoalUnit::Pieces).unwrap();
        engine.initialize();
        assert_eq!(engine.goal(id).unwrap().scale, 10);

        let mut goals = engine.goals().to_vec();
        goals[0].scale = 2;
        goals[0].remaining_amount = 40;
        let mut engine =
            GridProgressEngine::from_parts(goals, engine.cells().to_vec(), StdRng::seed_from_u64(1))
                .unwrap();
        let before = engine.colored_count();

        let outcome = engine.complete_goal(id).unwrap();

        assert_eq!(outcome.requested_cells, 20);
        assert_eq!(engine.colored_count(), before + 20);
        let goal = engine.goal(id).unwrap();
        assert_eq!(goal.remaining_amount, 0);
        assert!(goal.is_completed);
    }

    #[test]
    fn test_proportional_quota_diverges_from_exact_above_scale_one() {
        let goal = Goal::new(GoalId::new(1), "Save".to_string(), 20_005, GoalUnit::Euro, 10);
        assert_eq!(goal.scaled_square_count(), 2_001);
        assert_eq!(CellQuota::Exact.cells_for(&goal, 10_000), 1_000);
        assert_eq!(CellQuota::Proportional.cells_for(&goal, 10_000), 1_001);

        let unit = Goal::new(GoalId::new(2), "Read".to_string(), 77, GoalUnit::Pieces, 1);
        for amount in 0..=77 {
            assert_eq!(
                CellQuota::Exact.cells_for(&unit, amount),
                CellQuota::Proportional.cells_for(&unit, amount)
            );
        }
    }

    #[test]
    fn test_quick_complete_uses_proportional_quota() {
        let mut engine = engine();
        let id = engine.create_goal("Save", 20_005, GoalUnit::Euro).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 10_005).unwrap();
        assert_eq!(engine.colored_count(), 1_001);

        let outcome = engine.quick_complete(id).unwrap();

        assert_eq!(outcome.requested_cells, 1_001);
        assert_eq!(outcome.colored_positions.len(), 1_000);
        assert!(engine.goal(id).unwrap().is_completed);
        assert_eq!(engine.colored_count(), 2_001);
    }

    #[test]
    fn test_proportional_color_counts_progress() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 60, GoalUnit::Pieces).unwrap().id;
        engine.initialize();

        let outcome = engine.proportional_color(id, 25).unwrap();

        assert_eq!(outcome.colored_positions.len(), 25);
        assert_eq!(engine.goal(id).unwrap().remaining_amount, 35);
    }

    #[test]
    fn test_undo_reverts_exactly_one_step() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 100, GoalUnit::Pieces).unwrap().id;
        engine.initialize();

        engine.apply_progress(id, 10).unwrap();
        let goals_after_first = engine.goals().to_vec();
        let cells_after_first = engine.cells().to_vec();
        engine.apply_progress(id, 25).unwrap();

        assert!(engine.undo());
        assert_eq!(engine.goals(), goals_after_first.as_slice());
        assert_eq!(engine.cells(), cells_after_first.as_slice());
        assert_eq!(engine.colored_count(), 10);

        assert!(!engine.undo());
        assert_eq!(engine.goals(), goals_after_first.as_slice());
    }

    #[test]
    fn test_undo_reopens_completed_goal() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 30, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.complete_goal(id).unwrap();
        assert!(engine.goal(id).unwrap().is_completed);

        assert!(engine.undo());

        let goal = engine.goal(id).unwrap();
        assert!(!goal.is_completed);
        assert_eq!(goal.remaining_amount, 30);
        assert_eq!(engine.colored_count(), 0);

        let outcome = engine.apply_progress(id, 30).unwrap();
        assert_eq!(outcome.colored_positions.len(), 30);
    }

    #[test]
    fn test_undo_without_snapshot_is_noop() {
        let mut engine = engine();
        engine.create_goal("Read", 30, GoalUnit::Pieces).unwrap();
        engine.initialize();
        assert!(!engine.undo());
        assert_eq!(engine.cells().len(), 30);
    }

    #[test]
    fn test_goal_edits_discard_pending_undo() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 30, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 3).unwrap();
        assert!(engine.can_undo());

        engine.edit_goal(id, "Read more", 30, GoalUnit::Pieces).unwrap();
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_remaining_never_increases_without_undo() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 50, GoalUnit::Pieces).unwrap().id;
        engine.initialize();

        let mut last = 50;
        for amount in [3, 0, 60, 10, 45, 7, 30] {
            let _ = engine.apply_progress(id, amount);
            let remaining = engine.goal(id).unwrap().remaining_amount;
            assert!(remaining <= last);
            last = remaining;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_edit_goal_keeps_progress_and_scale() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 100, GoalUnit::Pieces).unwrap().id;
        engine.initialize();
        engine.apply_progress(id, 30).unwrap();

        let goal = engine.edit_goal(id, "Read books", 100, GoalUnit::Packs).unwrap();
        assert_eq!(goal.text, "Read books");
        assert_eq!(goal.unit, GoalUnit::Packs);
        assert_eq!(goal.remaining_amount, 70);

        let goal = engine.edit_goal(id, "Read books", 20, GoalUnit::Packs).unwrap();
        assert_eq!(goal.remaining_amount, 0);
        assert!(goal.is_completed);

        let goal = engine.edit_goal(id, "Read books", 50_000, GoalUnit::Packs).unwrap();
        assert_eq!(goal.scale, 10);
        assert_eq!(goal.remaining_amount, 49_980);
    }

    #[test]
    fn test_edit_goal_rejects_invalid_input() {
        let mut engine = engine();
        let id = engine.create_goal("Read", 100, GoalUnit::Pieces).unwrap().id;
        assert_eq!(
            engine.edit_goal(id, "", 10, GoalUnit::Pieces).unwrap_err(),
            GoalError::EmptyText
        );
        assert_eq!(
            engine
                .edit_goal(GoalId::new(99), "x", 10, GoalUnit::Pieces)
                .unwrap_err(),
            GoalError::UnknownGoal(GoalId::new(99))
        );
        assert_eq!(engine.goal(id).unwrap().text, "Read");
    }

    #[test]
    fn test_from_parts_normalizes_unordered_cells() {
        let goals = vec![Goal::new(
            GoalId::new(4),
            "Read".to_string(),
            4,
            GoalUnit::Pieces,
            1,
        )];
        let cells = vec![
            Cell {
                position: 3,
                is_colored: true,
            },
            Cell::blank(0),
            Cell {
                position: 1,
                is_colored: true,
            },
            Cell::blank(2),
        ];

        let mut engine =
            GridProgressEngine::from_parts(goals, cells, StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(colored_positions(&engine), vec![1, 3]);
        assert_eq!(engine.colored_count(), 2);
        let id = engine.create_goal("Next", 1, GoalUnit::Pieces).unwrap().id;
        assert_eq!(id, GoalId::new(5));
    }

    #[test]
    fn test_from_parts_rejects_cells_outside_grid() {
        let goals = vec![Goal::new(
            GoalId::new(1),
            "Read".to_string(),
            2,
            GoalUnit::Pieces,
            1,
        )];
        let cells = vec![
            Cell::blank(0),
            Cell {
                position: usize::MAX,
                is_colored: true,
            },
        ];

        let result = GridProgressEngine::from_parts(goals, cells, StdRng::seed_from_u64(3));

        assert_eq!(
            result.err(),
            Some(GridStateError::CellOutOfRange {
                position: usize::MAX,
                len: 2,
            })
        );
    }

    #[test]
    fn test_restore_pending_undo_rejects_cells_outside_grid() {
        let mut engine = engine();
        let snapshot = GridSnapshot {
            goals: Vec::new(),
            cells: vec![Cell {
                position: 5,
                is_colored: false,
            }],
        };

        assert_eq!(
            engine.restore_pending_undo(snapshot),
            Err(GridStateError::CellOutOfRange { position: 5, len: 1 })
        );
        assert!(!engine.can_undo());
    }
}
