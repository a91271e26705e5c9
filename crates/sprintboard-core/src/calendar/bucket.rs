use chrono::NaiveDate;
use chrono_tz::Tz;
use sprintboard_shared::TaskDto;

use crate::datetime::local_date;

/// Tasks whose update timestamp falls
/// on `day` in `timezone`. Linear scan,
/// input order kept.
pub fn tasks_for_day<'a>(
  tasks: &'a [TaskDto],
  day: NaiveDate,
  timezone: Tz
) -> Vec<&'a TaskDto> {
  tasks
    .iter()
    .filter(|task| {
      local_date(
        task.updated_at,
        timezone
      ) == day
    })
    .collect()
}
