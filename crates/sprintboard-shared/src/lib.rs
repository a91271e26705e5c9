use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  Todo,
  InProgress,
  Done
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:         Uuid,
  #[serde(default)]
  pub title:      String,
  #[serde(default)]
  pub description: String,
  pub status:     TaskStatus,
  pub updated_at: DateTime<Utc>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct SprintDto {
  pub id:         Uuid,
  pub name:       String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  #[serde(default)]
  pub tasks:      Vec<TaskDto>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ProjectDto {
  pub id:      Uuid,
  pub name:    String,
  #[serde(default)]
  pub sprints: Vec<SprintDto>
}

/// Snapshot of the board as handed to
/// the calendar: every project plus the
/// ids the user had selected.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct BoardSnapshot {
  #[serde(default)]
  pub projects:         Vec<ProjectDto>,
  #[serde(default)]
  pub selected_project: Option<Uuid>,
  #[serde(default)]
  pub selected_sprint:  Option<Uuid>
}
