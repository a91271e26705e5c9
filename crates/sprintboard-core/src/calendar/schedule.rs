use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDate,
  NaiveTime
};
use tracing::debug;
use uuid::Uuid;

use super::{
  CalendarError,
  Result
};
use crate::datetime::parse_time_of_day;

/// Canonical `(year, month, day)` index
/// into the schedule map. Text form is
/// `2024-3-5`, no zero padding.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct DateKey {
  pub year:  i32,
  pub month: u32,
  pub day:   u32
}

impl From<NaiveDate> for DateKey {
  fn from(date: NaiveDate) -> Self {
    Self {
      year:  date.year(),
      month: date.month(),
      day:   date.day()
    }
  }
}

impl fmt::Display for DateKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}-{}-{}",
      self.year, self.month, self.day
    )
  }
}

impl FromStr for DateKey {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> std::result::Result<Self, Self::Err>
  {
    let mut parts = s.trim().splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (
      parts.next(),
      parts.next(),
      parts.next()
    ) else {
      return Err(anyhow!(
        "expected YEAR-MONTH-DAY, got: \
         {s}"
      ));
    };

    let date = NaiveDate::from_ymd_opt(
      y.parse::<i32>()?,
      m.parse::<u32>()?,
      d.parse::<u32>()?
    )
    .ok_or_else(|| {
      anyhow!("not a calendar date: {s}")
    })?;
    Ok(date.into())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
  pub id:          Uuid,
  pub title:       String,
  pub time:        NaiveTime,
  pub description: String
}

impl ScheduleEntry {
  pub fn time_label(&self) -> String {
    self.time.format("%H:%M").to_string()
  }
}

/// Raw create-form input. Title and time
/// are required; the id is generated on
/// submit.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDraft {
  pub title:       String,
  pub time:        String,
  pub description: String
}

impl ScheduleDraft {
  pub fn new(
    title: impl Into<String>,
    time: impl Into<String>
  ) -> Self {
    Self {
      title:       title.into(),
      time:        time.into(),
      description: String::new()
    }
  }

  pub fn with_description(
    mut self,
    description: impl Into<String>
  ) -> Self {
    self.description = description.into();
    self
  }

  pub fn into_entry(
    self
  ) -> Result<ScheduleEntry> {
    self.into_entry_with_id(Uuid::new_v4())
  }

  pub fn into_entry_with_id(
    self,
    id: Uuid
  ) -> Result<ScheduleEntry> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(
        CalendarError::MissingTitle
      );
    }
    let raw_time = self.time.trim();
    if raw_time.is_empty() {
      return Err(CalendarError::MissingTime);
    }
    let time = parse_time_of_day(raw_time)
      .ok_or_else(|| {
        CalendarError::InvalidTime(
          raw_time.to_string()
        )
      })?;

    Ok(ScheduleEntry {
      id,
      title: title.to_string(),
      time,
      description: self
        .description
        .trim()
        .to_string()
    })
  }
}

/// Day-indexed agenda storage.
pub trait ScheduleBook {
  /// Appends, creating the day on first
  /// use.
  fn add(
    &mut self,
    key: DateKey,
    entry: ScheduleEntry
  );

  /// Drops `id` from the day. The day
  /// stays present even when emptied.
  fn remove(
    &mut self,
    key: DateKey,
    id: Uuid
  ) -> bool;

  fn entries(
    &self,
    key: DateKey
  ) -> &[ScheduleEntry];

  fn contains_day(
    &self,
    key: DateKey
  ) -> bool;
}

/// In-memory book; lives as long as the
/// view that owns it.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
  days: BTreeMap<
    DateKey,
    Vec<ScheduleEntry>
  >
}

impl ScheduleStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn total_entries(&self) -> usize {
    self.days.values().map(Vec::len).sum()
  }

  /// Resolves an id prefix against one
  /// day; ambiguous prefixes resolve to
  /// nothing.
  pub fn find_by_prefix(
    &self,
    key: DateKey,
    prefix: &str
  ) -> Option<Uuid> {
    let prefix =
      prefix.trim().to_ascii_lowercase();
    if prefix.is_empty() {
      return None;
    }

    let mut matches = self
      .entries(key)
      .iter()
      .filter(|entry| {
        entry
          .id
          .to_string()
          .starts_with(&prefix)
      })
      .map(|entry| entry.id);
    let first = matches.next()?;
    if matches.next().is_some() {
      None
    } else {
      Some(first)
    }
  }
}

impl ScheduleBook for ScheduleStore {
  fn add(
    &mut self,
    key: DateKey,
    entry: ScheduleEntry
  ) {
    debug!(
      %key,
      id = %entry.id,
      title = %entry.title,
      "adding schedule entry"
    );
    self
      .days
      .entry(key)
      .or_default()
      .push(entry);
  }

  fn remove(
    &mut self,
    key: DateKey,
    id: Uuid
  ) -> bool {
    let Some(day) =
      self.days.get_mut(&key)
    else {
      return false;
    };
    let before = day.len();
    day.retain(|entry| entry.id != id);
    let removed = day.len() != before;
    debug!(
      %key,
      %id,
      removed,
      remaining = day.len(),
      "removing schedule entry"
    );
    removed
  }

  fn entries(
    &self,
    key: DateKey
  ) -> &[ScheduleEntry] {
    self
      .days
      .get(&key)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  fn contains_day(
    &self,
    key: DateKey
  ) -> bool {
    self.days.contains_key(&key)
  }
}
