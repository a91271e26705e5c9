use chrono::{
  Datelike,
  Days,
  Months,
  NaiveDate,
  Weekday
};
use tracing::warn;

pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize =
  GRID_WEEKS * 7;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CellKind {
  InMonth { day: u32 },
  Padding
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct GridCell {
  /// Real calendar date of the cell;
  /// adjacent-month dates on padding.
  pub date: NaiveDate,
  pub kind: CellKind
}

impl GridCell {
  pub fn day(&self) -> Option<u32> {
    match self.kind {
      | CellKind::InMonth { day } => {
        Some(day)
      }
      | CellKind::Padding => None
    }
  }

  pub fn is_in_month(&self) -> bool {
    matches!(
      self.kind,
      CellKind::InMonth { .. }
    )
  }
}

/// Fixed 6x7 window that always covers
/// the whole reference month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  pub first:      NaiveDate,
  pub week_start: Weekday,
  pub cells:      Vec<GridCell>
}

impl MonthGrid {
  #[tracing::instrument(level = "trace")]
  pub fn derive(
    reference: NaiveDate,
    week_start: Weekday
  ) -> Self {
    let first = month_start(reference);
    let month_len = i64::from(
      days_in_month(
        first.year(),
        first.month()
      )
    );
    let padding = i64::from(
      leading_padding(first, week_start)
    );

    let cells = (0..GRID_CELLS as i64)
      .map(|index| {
        let offset = index - padding;
        let kind = if (0..month_len)
          .contains(&offset)
        {
          CellKind::InMonth {
            day: offset as u32 + 1
          }
        } else {
          CellKind::Padding
        };
        GridCell {
          date: add_days(first, offset),
          kind
        }
      })
      .collect();

    Self {
      first,
      week_start,
      cells
    }
  }

  pub fn in_month_count(&self) -> usize {
    self
      .cells
      .iter()
      .filter(|cell| cell.is_in_month())
      .count()
  }

  pub fn cell_for_day(
    &self,
    day: u32
  ) -> Option<&GridCell> {
    self
      .cells
      .iter()
      .find(|cell| cell.day() == Some(day))
  }
}

/// Weekday offset of `first` relative
/// to `week_start` (0..=6).
pub fn leading_padding(
  first: NaiveDate,
  week_start: Weekday
) -> u32 {
  let day_idx =
    first.weekday().num_days_from_sunday();
  let start_idx =
    week_start.num_days_from_sunday();
  (7 + day_idx - start_idx) % 7
}

pub fn month_start(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

/// Moves by whole months; the result is
/// always day 1 of the target month. At
/// the edge of the representable range
/// the month does not move.
pub fn shift_month(
  reference: NaiveDate,
  step: i32
) -> NaiveDate {
  let first = month_start(reference);
  let months = Months::new(step.unsigned_abs());
  let shifted = if step >= 0 {
    first.checked_add_months(months)
  } else {
    first.checked_sub_months(months)
  };

  shifted.unwrap_or_else(|| {
    warn!(
      %reference,
      step,
      "month shift out of range; staying put"
    );
    first
  })
}

/// Zero for a month that does not
/// exist.
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  let Some(first) =
    NaiveDate::from_ymd_opt(year, month, 1)
  else {
    return 0;
  };
  // December of the last representable
  // year has no successor month.
  first
    .checked_add_months(Months::new(1))
    .map_or(31, |next| {
      (next - first).num_days() as u32
    })
}

/// Saturates at the calendar bounds.
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  let step = Days::new(days.unsigned_abs());
  if days >= 0 {
    date
      .checked_add_days(step)
      .unwrap_or(NaiveDate::MAX)
  } else {
    date
      .checked_sub_days(step)
      .unwrap_or(NaiveDate::MIN)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::calendar::DateKey;

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn every_month_yields_42_cells() {
    for year in [2023, 2024, 2100] {
      for month in 1..=12 {
        for week_start in
          [Weekday::Sun, Weekday::Mon]
        {
          let grid = MonthGrid::derive(
            ymd(year, month, 15),
            week_start
          );
          assert_eq!(
            grid.cells.len(),
            GRID_CELLS
          );
          assert_eq!(
            grid.in_month_count() as u32,
            days_in_month(year, month)
          );
        }
      }
    }
  }

  #[test]
  fn march_2024_starts_on_friday() {
    let grid = MonthGrid::derive(
      ymd(2024, 3, 1),
      Weekday::Sun
    );
    assert_eq!(grid.in_month_count(), 31);
    assert_eq!(
      grid.cells[5].kind,
      CellKind::InMonth { day: 1 }
    );
    assert_eq!(
      grid.cells[4].kind,
      CellKind::Padding
    );
    assert_eq!(
      grid.cells[4].date,
      ymd(2024, 2, 29)
    );
    assert_eq!(
      grid.cells[41].date,
      ymd(2024, 4, 6)
    );

    let monday = MonthGrid::derive(
      ymd(2024, 3, 1),
      Weekday::Mon
    );
    assert_eq!(
      monday.cells[4].kind,
      CellKind::InMonth { day: 1 }
    );
  }

  #[test]
  fn february_lengths_follow_leap_years()
  {
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(1900, 2), 28);
    assert_eq!(days_in_month(2000, 2), 29);
    assert_eq!(days_in_month(2024, 12), 31);
  }

  #[test]
  fn shifting_normalizes_to_first_day() {
    assert_eq!(
      shift_month(ymd(2024, 1, 31), 1),
      ymd(2024, 2, 1)
    );
    assert_eq!(
      shift_month(ymd(2024, 1, 31), -1),
      ymd(2023, 12, 1)
    );
    assert_eq!(
      shift_month(ymd(2024, 12, 10), 1),
      ymd(2025, 1, 1)
    );
    assert_eq!(
      shift_month(ymd(2024, 3, 1), -27),
      ymd(2021, 12, 1)
    );
  }

  #[test]
  fn twelve_steps_each_way_round_trip() {
    let start = ymd(2024, 5, 1);
    let mut current = start;
    for _ in 0..12 {
      current = shift_month(current, 1);
    }
    assert_eq!(current, ymd(2025, 5, 1));
    for _ in 0..12 {
      current = shift_month(current, -1);
    }
    assert_eq!(current, start);
  }

  #[test]
  fn shifting_at_range_edge_stays_put() {
    let last = month_start(NaiveDate::MAX);
    assert_eq!(shift_month(NaiveDate::MAX, 1), last);
    assert_eq!(
      shift_month(last, -1).month(),
      11
    );
    assert_eq!(
      shift_month(NaiveDate::MIN, -1),
      month_start(NaiveDate::MIN)
    );
    assert_eq!(days_in_month(2024, 13), 0);
  }

  #[test]
  fn cell_keys_never_collide() {
    for (year, month) in
      [(2024, 2), (2024, 3), (2023, 12), (2026, 8)]
    {
      for week_start in
        [Weekday::Sun, Weekday::Mon]
      {
        let grid = MonthGrid::derive(
          ymd(year, month, 1),
          week_start
        );
        let keys = grid
          .cells
          .iter()
          .map(|cell| DateKey::from(cell.date))
          .collect::<HashSet<_>>();
        assert_eq!(keys.len(), GRID_CELLS);
      }
    }
  }

  #[test]
  fn cell_dates_are_consecutive() {
    let grid = MonthGrid::derive(
      ymd(2024, 2, 1),
      Weekday::Sun
    );
    for pair in grid.cells.windows(2) {
      assert_eq!(
        add_days(pair[0].date, 1),
        pair[1].date
      );
    }
    assert_eq!(
      grid
        .cell_for_day(29)
        .map(|cell| cell.date),
      Some(ymd(2024, 2, 29))
    );
    assert!(grid.cell_for_day(30).is_none());
  }
}
