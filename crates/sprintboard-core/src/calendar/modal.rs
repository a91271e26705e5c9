use chrono::NaiveDate;
use tracing::trace;

use super::{
  CalendarError,
  Result
};

/// Day detail modal. At most one day is
/// open; the create form only exists
/// inside an open day.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum DayModal {
  #[default]
  Closed,
  Viewing(NaiveDate),
  Creating(NaiveDate)
}

impl DayModal {
  pub fn state_name(
    &self
  ) -> &'static str {
    match self {
      | DayModal::Closed => "closed",
      | DayModal::Viewing(_) => "viewing",
      | DayModal::Creating(_) => {
        "creating"
      }
    }
  }

  pub fn selected_day(
    &self
  ) -> Option<NaiveDate> {
    match self {
      | DayModal::Closed => None,
      | DayModal::Viewing(day)
      | DayModal::Creating(day) => {
        Some(*day)
      }
    }
  }

  pub fn is_creating(&self) -> bool {
    matches!(self, DayModal::Creating(_))
  }

  /// Replaces any current selection,
  /// discarding an unsent form.
  pub fn open(&mut self, day: NaiveDate) {
    trace!(
      from = self.state_name(),
      %day,
      "opening day"
    );
    *self = DayModal::Viewing(day);
  }

  pub fn begin_create(
    &mut self
  ) -> Result<()> {
    match *self {
      | DayModal::Viewing(day) => {
        *self = DayModal::Creating(day);
        Ok(())
      }
      | _ => {
        Err(self.invalid("add an event"))
      }
    }
  }

  pub fn cancel_create(
    &mut self
  ) -> Result<()> {
    self.leave_form("cancel")
  }

  /// Submit and cancel both return to
  /// the day listing.
  pub fn finish_create(
    &mut self
  ) -> Result<()> {
    self.leave_form("save")
  }

  pub fn close(&mut self) {
    trace!(
      from = self.state_name(),
      "closing day"
    );
    *self = DayModal::Closed;
  }

  fn leave_form(
    &mut self,
    action: &'static str
  ) -> Result<()> {
    match *self {
      | DayModal::Creating(day) => {
        *self = DayModal::Viewing(day);
        Ok(())
      }
      | _ => Err(self.invalid(action))
    }
  }

  fn invalid(
    &self,
    action: &'static str
  ) -> CalendarError {
    CalendarError::InvalidTransition {
      action,
      state: self.state_name()
    }
  }
}
