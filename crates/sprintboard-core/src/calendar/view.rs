use chrono::{
  NaiveDate,
  Weekday
};
use chrono_tz::Tz;
use sprintboard_shared::{
  ProjectDto,
  SprintDto,
  TaskDto
};
use tracing::{
  debug,
  info,
  warn
};
use uuid::Uuid;

use super::bucket::tasks_for_day;
use super::grid::{
  MonthGrid,
  month_start,
  shift_month
};
use super::modal::DayModal;
use super::schedule::{
  DateKey,
  ScheduleBook,
  ScheduleDraft,
  ScheduleEntry,
  ScheduleStore
};
use super::{
  CalendarError,
  Result
};
use crate::locale::Locale;

#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
  pub week_start: Weekday,
  pub timezone:   Tz,
  pub locale:     Locale
}

impl Default for ViewSettings {
  fn default() -> Self {
    Self {
      week_start: Weekday::Sun,
      timezone:   chrono_tz::UTC,
      locale:     Locale::Es
    }
  }
}

/// State of one mounted calendar: the
/// displayed month, the session agenda
/// and the day modal. Dropping the view
/// drops every schedule entry.
#[derive(Debug, Clone)]
pub struct CalendarView {
  settings:  ViewSettings,
  reference: NaiveDate,
  today:     NaiveDate,
  schedules: ScheduleStore,
  modal:     DayModal
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellSnapshot {
  pub date:      NaiveDate,
  pub key:       DateKey,
  pub day:       Option<u32>,
  pub is_today:  bool,
  pub tasks:     Vec<TaskDto>,
  pub schedules: Vec<ScheduleEntry>
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprintSummary {
  pub project_name: String,
  pub name:         String,
  pub start_date:   NaiveDate,
  pub end_date:     NaiveDate,
  pub task_count:   usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgendaSnapshot {
  pub title:    String,
  pub day:      NaiveDate,
  pub key:      DateKey,
  pub entries:  Vec<ScheduleEntry>,
  pub creating: bool
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSnapshot {
  pub locale:   Locale,
  pub header:   String,
  pub today:    NaiveDate,
  pub weekdays: Vec<&'static str>,
  pub cells:    Vec<CellSnapshot>,
  pub sprint:   SprintSummary,
  pub agenda:   Option<AgendaSnapshot>
}

impl CalendarView {
  pub fn new(
    settings: ViewSettings,
    today: NaiveDate
  ) -> Self {
    Self {
      settings,
      reference: month_start(today),
      today,
      schedules: ScheduleStore::new(),
      modal: DayModal::Closed
    }
  }

  pub fn starting_at(
    mut self,
    reference: NaiveDate
  ) -> Self {
    self.reference =
      month_start(reference);
    self
  }

  pub fn reference(&self) -> NaiveDate {
    self.reference
  }

  pub fn today(&self) -> NaiveDate {
    self.today
  }

  /// Moves the today marker only; the
  /// displayed month stays put.
  pub fn set_today(
    &mut self,
    today: NaiveDate
  ) {
    if self.today != today {
      debug!(%today, "today marker moved");
      self.today = today;
    }
  }

  pub fn modal(&self) -> DayModal {
    self.modal
  }

  pub fn schedules(
    &self
  ) -> &ScheduleStore {
    &self.schedules
  }

  pub fn grid(&self) -> MonthGrid {
    MonthGrid::derive(
      self.reference,
      self.settings.week_start
    )
  }

  pub fn next_month(&mut self) {
    self.reference =
      shift_month(self.reference, 1);
    debug!(reference = %self.reference, "moved to next month");
  }

  pub fn previous_month(&mut self) {
    self.reference =
      shift_month(self.reference, -1);
    debug!(reference = %self.reference, "moved to previous month");
  }

  pub fn jump_to_today(
    &mut self,
    today: NaiveDate
  ) {
    self.today = today;
    self.reference = month_start(today);
    debug!(reference = %self.reference, "jumped to today");
  }

  /// Opens the modal on an in-month day
  /// of the displayed month.
  pub fn select_day(
    &mut self,
    day: u32
  ) -> Result<NaiveDate> {
    let grid = self.grid();
    let cell = grid
      .cell_for_day(day)
      .ok_or_else(|| {
        CalendarError::DayOutsideMonth {
          day,
          month: self
            .settings
            .locale
            .month_header(self.reference)
        }
      })?;
    self.modal.open(cell.date);
    Ok(cell.date)
  }

  pub fn begin_create(
    &mut self
  ) -> Result<()> {
    self.modal.begin_create()
  }

  pub fn cancel_create(
    &mut self
  ) -> Result<()> {
    self.modal.cancel_create()
  }

  /// Validates the form and appends the
  /// entry to the selected day. A
  /// rejected form keeps the modal in
  /// the create state.
  pub fn submit_entry(
    &mut self,
    draft: ScheduleDraft
  ) -> Result<Uuid> {
    let DayModal::Creating(day) =
      self.modal
    else {
      return Err(
        CalendarError::InvalidTransition {
          action: "save",
          state:  self.modal.state_name()
        }
      );
    };

    let entry = draft.into_entry()?;
    let id = entry.id;
    self.schedules.add(day.into(), entry);
    self.modal.finish_create()?;
    info!(%day, %id, "schedule entry saved");
    Ok(id)
  }

  pub fn delete_entry(
    &mut self,
    id: Uuid
  ) -> Result<bool> {
    let day = self
      .modal
      .selected_day()
      .ok_or(CalendarError::NoDaySelected)?;
    let removed =
      self.schedules.remove(day.into(), id);
    if !removed {
      warn!(%day, %id, "schedule entry not found");
    }
    Ok(removed)
  }

  /// Resolves an id prefix on the
  /// selected day.
  pub fn resolve_entry(
    &self,
    prefix: &str
  ) -> Result<Option<Uuid>> {
    let day = self
      .modal
      .selected_day()
      .ok_or(CalendarError::NoDaySelected)?;
    Ok(
      self
        .schedules
        .find_by_prefix(day.into(), prefix)
    )
  }

  pub fn close_modal(&mut self) {
    self.modal.close();
  }

  /// Builds the frame for the selected
  /// project and sprint. Nothing is
  /// drawn without both.
  #[tracing::instrument(skip_all, fields(reference = %self.reference))]
  pub fn snapshot(
    &self,
    project: Option<&ProjectDto>,
    sprint: Option<&SprintDto>
  ) -> Option<CalendarSnapshot> {
    let (Some(project), Some(sprint)) =
      (project, sprint)
    else {
      warn!(
        has_project = project.is_some(),
        has_sprint = sprint.is_some(),
        "no project or sprint selected; \
         calendar not rendered"
      );
      return None;
    };

    let locale = self.settings.locale;
    let cells = self
      .grid()
      .cells
      .iter()
      .map(|cell| {
        let key = DateKey::from(cell.date);
        let day = cell.day();
        let (tasks, schedules) =
          if day.is_some() {
            (
              tasks_for_day(
                &sprint.tasks,
                cell.date,
                self.settings.timezone
              )
              .into_iter()
              .cloned()
              .collect(),
              self.schedules.entries(key).to_vec()
            )
          } else {
            (Vec::new(), Vec::new())
          };
        CellSnapshot {
          date: cell.date,
          key,
          day,
          is_today: day.is_some()
            && cell.date == self.today,
          tasks,
          schedules
        }
      })
      .collect::<Vec<_>>();

    let agenda =
      self.modal.selected_day().map(|day| {
        let key = DateKey::from(day);
        AgendaSnapshot {
          title: locale.agenda_title(day),
          day,
          key,
          entries: self
            .schedules
            .entries(key)
            .to_vec(),
          creating: self.modal.is_creating()
        }
      });

    Some(CalendarSnapshot {
      locale,
      header: locale
        .month_header(self.reference),
      today: self.today,
      weekdays: locale.weekday_labels(
        self.settings.week_start
      ),
      cells,
      sprint: SprintSummary {
        project_name: project.name.clone(),
        name:         sprint.name.clone(),
        start_date:   sprint.start_date,
        end_date:     sprint.end_date,
        task_count:   sprint.tasks.len()
      },
      agenda
    })
  }
}
