use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub u64);

impl GoalId {
    pub fn new(id: u64) -> Self {
        GoalId(id)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl ProjectId {
    pub fn new(id: u64) -> Self {
        ProjectId(id)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnitKind {
    Quantity,
    Currency,
    Time,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Quantity, UnitKind::Currency, UnitKind::Time];

    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Quantity => "Quantity",
            UnitKind::Currency => "Currency",
            UnitKind::Time => "Time",
        }
    }

    pub fn units(self) -> impl Iterator<Item = GoalUnit> {
        GoalUnit::ALL.into_iter().filter(move |unit| unit.kind() == self)
    }
}

/// Display unit attached to a goal. Units never convert amounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalUnit {
    #[default]
    Pieces,
    Packs,
    Kilograms,
    Liters,
    Meters,
    Euro,
    Dollar,
    Ruble,
    Tenge,
    Days,
    Weeks,
    Months,
    Hours,
}

impl GoalUnit {
    pub const ALL: [GoalUnit; 13] = [
        GoalUnit::Pieces,
        GoalUnit::Packs,
        GoalUnit::Kilograms,
        GoalUnit::Liters,
        GoalUnit::Meters,
        GoalUnit::Euro,
        GoalUnit::Dollar,
        GoalUnit::Ruble,
        GoalUnit::Tenge,
        GoalUnit::Days,
        GoalUnit::Weeks,
        GoalUnit::Months,
        GoalUnit::Hours,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            GoalUnit::Pieces => "pcs",
            GoalUnit::Packs => "pk",
            GoalUnit::Kilograms => "kg",
            GoalUnit::Liters => "l",
            GoalUnit::Meters => "m",
            GoalUnit::Euro => "€",
            GoalUnit::Dollar => "$",
            GoalUnit::Ruble => "₽",
            GoalUnit::Tenge => "₸",
            GoalUnit::Days => "d",
            GoalUnit::Weeks => "wk",
            GoalUnit::Months => "mo",
            GoalUnit::Hours => "h",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GoalUnit::Pieces => "pieces",
            GoalUnit::Packs => "packs",
            GoalUnit::Kilograms => "kilograms",
            GoalUnit::Liters => "liters",
            GoalUnit::Meters => "meters",
            GoalUnit::Euro => "euro",
            GoalUnit::Dollar => "dollar",
            GoalUnit::Ruble => "ruble",
            GoalUnit::Tenge => "tenge",
            GoalUnit::Days => "days",
            GoalUnit::Weeks => "weeks",
            GoalUnit::Months => "months",
            GoalUnit::Hours => "hours",
        }
    }

    pub fn kind(self) -> UnitKind {
        match self {
            GoalUnit::Pieces
            | GoalUnit::Packs
            | GoalUnit::Kilograms
            | GoalUnit::Liters
            | GoalUnit::Meters => UnitKind::Quantity,
            GoalUnit::Euro | GoalUnit::Dollar | GoalUnit::Ruble | GoalUnit::Tenge => {
                UnitKind::Currency
            }
            GoalUnit::Days | GoalUnit::Weeks | GoalUnit::Months | GoalUnit::Hours => {
                UnitKind::Time
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown unit '{0}'")]
pub struct UnknownUnit(pub String);

impl FromStr for GoalUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        GoalUnit::ALL
            .into_iter()
            .find(|unit| {
                unit.name().eq_ignore_ascii_case(needle)
                    || unit.symbol().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub text: String,
    pub total_amount: u64,
    pub remaining_amount: u64,
    pub is_completed: bool,
    pub unit: GoalUnit,
    pub scale: u64,
}

impl Goal {
    pub fn new(id: GoalId, text: String, total_amount: u64, unit: GoalUnit, scale: u64) -> Self {
        Self {
            id,
            text,
            total_amount,
            remaining_amount: total_amount,
            is_completed: total_amount == 0,
            unit,
            scale: scale.max(1),
        }
    }

    /// Number of grid cells this goal adds to the shared grid.
    pub fn scaled_square_count(&self) -> usize {
        self.total_amount.div_ceil(self.scale.max(1)) as usize
    }

    pub fn completed_amount(&self) -> u64 {
        self.total_amount.saturating_sub(self.remaining_amount)
    }

    pub fn progress_label(&self) -> String {
        let symbol = self.unit.symbol();
        let scale_note = if self.scale > 1 {
            format!(" (1□={}{})", self.scale, symbol)
        } else {
            String::new()
        };
        format!(
            "{}/{}{}{}",
            self.completed_amount(),
            self.total_amount,
            symbol,
            scale_note
        )
    }

    pub(crate) fn consume(&mut self, amount: u64) {
        self.remaining_amount = self.remaining_amount.saturating_sub(amount);
        self.is_completed = self.remaining_amount == 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub position: usize,
    pub is_colored: bool,
}

impl Cell {
    pub fn blank(position: usize) -> Self {
        Cell {
            position,
            is_colored: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("goal text must not be empty")]
    EmptyText,
    #[error("goal amount must be greater than zero")]
    NonPositiveAmount,
    #[error("goal {0} not found")]
    UnknownGoal(GoalId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("goal {0} not found")]
    UnknownGoal(GoalId),
    #[error("amount {requested} exceeds the remaining {remaining}")]
    ExceedsRemaining { requested: u64, remaining: u64 },
    #[error("the image has not been divided yet")]
    GridNotDivided,
}

/// Persisted grid state that cannot be laid out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridStateError {
    #[error("cell position {position} is outside a grid of {len} cells")]
    CellOutOfRange { position: usize, len: usize },
}
