//! Month calendar for a sprint: grid
//! derivation, task bucketing, the
//! per-day schedule store and the day
//! modal.

pub mod bucket;
pub mod grid;
pub mod modal;
pub mod schedule;
pub mod view;

use thiserror::Error;

pub use grid::{
  CellKind,
  GridCell,
  MonthGrid
};
pub use modal::DayModal;
pub use schedule::{
  DateKey,
  ScheduleBook,
  ScheduleDraft,
  ScheduleEntry,
  ScheduleStore
};
pub use view::{
  CalendarSnapshot,
  CalendarView
};

/// Rule violations raised by the
/// calendar. None of them are fatal;
/// the view state is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
  #[error("title is required")]
  MissingTitle,

  #[error("time is required")]
  MissingTime,

  #[error("invalid time of day: {0}")]
  InvalidTime(String),

  #[error("day {day} is not part of {month}")]
  DayOutsideMonth { day: u32, month: String },

  #[error("no day is selected")]
  NoDaySelected,

  #[error("cannot {action} while the agenda is {state}")]
  InvalidTransition {
    action: &'static str,
    state:  &'static str
  }
}

pub type Result<T> =
  std::result::Result<T, CalendarError>;
