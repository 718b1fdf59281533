use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    deadline::DeadlineStatus,
    domain::{Cell, Goal, GoalError, GoalId, GoalUnit, GridStateError, ProgressError, ProjectId},
    grid::{GridDimensions, GridProgressEngine, GridSnapshot, ProgressOutcome, normalize_cells},
};

/// Everything a persistence collaborator needs to store and restore a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub version: u8,
    pub id: ProjectId,
    pub name: String,
    pub goals: Vec<Goal>,
    pub cells: Vec<Cell>,
    pub grid_visible: bool,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Raw image bytes; stores keep them beside the JSON record.
    #[serde(skip)]
    pub image: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_undo: Option<GridSnapshot>,
}

impl ProjectRecord {
    pub const VERSION: u8 = 1;

    /// Name to show, resolved the same way as [`ProjectSession::display_name`].
    pub fn display_name(&self) -> String {
        resolve_display_name(&self.name, &self.goals)
    }

    /// Checks that the stored cells, and those of the undo step, fit their grid.
    pub fn validate(&self) -> Result<(), GridStateError> {
        normalize_cells(&self.cells)?;
        if let Some(snapshot) = &self.pending_undo {
            normalize_cells(&snapshot.cells)?;
        }
        Ok(())
    }
}

pub trait ProjectStore {
    /// All stored projects ordered by id. Image bytes may be left out.
    fn list(&self) -> Result<Vec<ProjectRecord>, String>;
    fn load(&self, id: ProjectId) -> Result<Option<ProjectRecord>, String>;
    /// Inserts the record or replaces the one with the same id.
    fn save(&mut self, record: &ProjectRecord) -> Result<(), String>;
    fn delete(&mut self, id: ProjectId) -> Result<bool, String>;

    fn next_id(&self) -> Result<ProjectId, String> {
        let max = self
            .list()?
            .iter()
            .map(|record| record.id.0)
            .max()
            .unwrap_or(0);
        Ok(ProjectId::new(max + 1))
    }
}

#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    records: BTreeMap<ProjectId, ProjectRecord>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn list(&self) -> Result<Vec<ProjectRecord>, String> {
        Ok(self.records.values().cloned().collect())
    }

    fn load(&self, id: ProjectId) -> Result<Option<ProjectRecord>, String> {
        Ok(self.records.get(&id).cloned())
    }

    fn save(&mut self, record: &ProjectRecord) -> Result<(), String> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    fn delete(&mut self, id: ProjectId) -> Result<bool, String> {
        Ok(self.records.remove(&id).is_some())
    }
}

/// An open project: the grid engine plus the picture it reveals.
pub struct ProjectSession<R = ThreadRng> {
    pub id: ProjectId,
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub image: Vec<u8>,
    grid_visible: bool,
    engine: GridProgressEngine<R>,
}

impl ProjectSession<ThreadRng> {
    pub fn new(id: ProjectId, name: &str, image: Vec<u8>) -> Self {
        Self::with_rng(id, name, image, rand::thread_rng())
    }

    pub fn open(record: ProjectRecord) -> Result<Self, GridStateError> {
        Self::from_record(record, rand::thread_rng())
    }
}

impl<R: Rng> ProjectSession<R> {
    pub fn with_rng(id: ProjectId, name: &str, image: Vec<u8>, rng: R) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            deadline: None,
            image,
            grid_visible: false,
            engine: GridProgressEngine::with_rng(rng),
        }
    }

    pub fn from_record(record: ProjectRecord, rng: R) -> Result<Self, GridStateError> {
        let mut engine = GridProgressEngine::from_parts(record.goals, record.cells, rng)?;
        if let Some(snapshot) = record.pending_undo {
            engine.restore_pending_undo(snapshot)?;
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            deadline: record.deadline,
            image: record.image,
            grid_visible: record.grid_visible,
            engine,
        })
    }

    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            version: ProjectRecord::VERSION,
            id: self.id,
            name: self.name.clone(),
            goals: self.engine.goals().to_vec(),
            cells: self.engine.cells().to_vec(),
            grid_visible: self.grid_visible,
            deadline: self.deadline,
            image: self.image.clone(),
            pending_undo: self.engine.pending_undo().cloned(),
        }
    }

    pub fn engine(&self) -> &GridProgressEngine<R> {
        &self.engine
    }

    pub fn is_grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// Project name, falling back to the first goal and then to "Untitled". The
    /// fallback is never persisted.
    pub fn display_name(&self) -> String {
        resolve_display_name(&self.name, self.engine.goals())
    }

    pub fn deadline_status(&self, today: NaiveDate) -> Option<DeadlineStatus> {
        self.deadline
            .map(|deadline| DeadlineStatus::for_date(deadline, today))
    }

    pub fn add_goal(
        &mut self,
        text: &str,
        total_amount: u64,
        unit: GoalUnit,
    ) -> Result<GoalId, GoalError> {
        let id = self.engine.create_goal(text, total_amount, unit)?.id;
        self.refresh_grid();
        Ok(id)
    }

    pub fn edit_goal(
        &mut self,
        id: GoalId,
        text: &str,
        total_amount: u64,
        unit: GoalUnit,
    ) -> Result<(), GoalError> {
        self.engine.edit_goal(id, text, total_amount, unit)?;
        self.refresh_grid();
        Ok(())
    }

    pub fn remove_goal(&mut self, id: GoalId) -> Result<Goal, GoalError> {
        let removed = self.engine.remove_goal(id)?;
        self.refresh_grid();
        Ok(removed)
    }

    /// Splits the image into cells and shows the grid.
    pub fn divide(&mut self) -> GridDimensions {
        self.grid_visible = true;
        self.engine.initialize();
        let dimensions = self.engine.compute_dimensions();
        debug!(
            project = %self.id,
            rows = dimensions.rows,
            columns = dimensions.columns,
            "image divided"
        );
        dimensions
    }

    pub fn apply_progress(
        &mut self,
        goal_id: GoalId,
        amount: u64,
    ) -> Result<ProgressOutcome, ProgressError> {
        self.ensure_divided()?;
        self.engine.apply_progress(goal_id, amount)
    }

    pub fn complete_goal(&mut self, goal_id: GoalId) -> Result<ProgressOutcome, ProgressError> {
        self.ensure_divided()?;
        self.engine.complete_goal(goal_id)
    }

    pub fn quick_complete(&mut self, goal_id: GoalId) -> Result<ProgressOutcome, ProgressError> {
        self.ensure_divided()?;
        self.engine.quick_complete(goal_id)
    }

    pub fn proportional_color(
        &mut self,
        goal_id: GoalId,
        count: u64,
    ) -> Result<ProgressOutcome, ProgressError> {
        self.ensure_divided()?;
        self.engine.proportional_color(goal_id, count)
    }

    pub fn undo(&mut self) -> bool {
        self.engine.undo()
    }

    fn ensure_divided(&self) -> Result<(), ProgressError> {
        if self.grid_visible {
            Ok(())
        } else {
            Err(ProgressError::GridNotDivided)
        }
    }

    fn refresh_grid(&mut self) {
        if self.grid_visible {
            self.engine.initialize();
        }
    }
}

fn resolve_display_name(name: &str, goals: &[Goal]) -> String {
    let name = name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    goals
        .first()
        .map(|goal| goal.text.clone())
        .unwrap_or_else(|| "Untitled".to_string())
}
