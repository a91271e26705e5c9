use anyhow::anyhow;
use chrono::{
  DateTime,
  NaiveDate,
  NaiveTime,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;

pub const TIMEZONE_ENV_VAR: &str =
  "SPRINTBOARD_TIMEZONE";
pub const DEFAULT_TIMEZONE: &str =
  "America/Mexico_City";

/// Picks the zone used for bucketing
/// and for "today": the configured id,
/// then the environment, then the
/// built-in default.
pub fn resolve_timezone(
  configured: Option<&str>
) -> Tz {
  if let Some(raw) = configured
    && let Some(tz) =
      parse_timezone(raw, "config")
  {
    return tz;
  }

  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) = parse_timezone(
      &raw,
      TIMEZONE_ENV_VAR
    )
  {
    return tz;
  }

  parse_timezone(
    DEFAULT_TIMEZONE,
    "default"
  )
  .unwrap_or(chrono_tz::UTC)
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "resolved calendar timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

#[must_use]
pub fn local_date(
  instant: DateTime<Utc>,
  timezone: Tz
) -> NaiveDate {
  instant
    .with_timezone(&timezone)
    .date_naive()
}

/// Parses `YYYY-MM` (or a full
/// `YYYY-MM-DD`) into the first day of
/// that month.
pub fn parse_month_arg(
  raw: &str
) -> anyhow::Result<NaiveDate> {
  let month_re = Regex::new(
    r"^(?P<year>\d{4})-(?P<month>\d{1,2})(?:-(?P<day>\d{1,2}))?$",
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;

  let trimmed = raw.trim();
  let caps = month_re
    .captures(trimmed)
    .ok_or_else(|| {
      anyhow!(
        "expected YYYY-MM, got: \
         {trimmed}"
      )
    })?;

  let year = caps["year"]
    .parse::<i32>()
    .map_err(|e| {
      anyhow!("invalid year: {e}")
    })?;
  let month = caps["month"]
    .parse::<u32>()
    .map_err(|e| {
      anyhow!("invalid month: {e}")
    })?;

  let first = NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .ok_or_else(|| {
    anyhow!(
      "month out of range: {trimmed}"
    )
  })?;

  if let Some(day) = caps.name("day") {
    let day = day
      .as_str()
      .parse::<u32>()
      .map_err(|e| {
        anyhow!("invalid day: {e}")
      })?;
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .ok_or_else(|| {
      anyhow!(
        "day out of range: {trimmed}"
      )
    })?;
  }

  Ok(first)
}

/// Accepts `HH:MM` (24h) and `H:MM am`
/// / `H:MM pm`.
pub fn parse_time_of_day(
  token: &str
) -> Option<NaiveTime> {
  let clock_re = Regex::new(
    r"(?i)^(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<ampm>[ap]m)?$",
  )
  .ok()?;
  let captures =
    clock_re.captures(token.trim())?;

  let raw_hour = captures
    .name("hour")?
    .as_str()
    .parse::<u32>()
    .ok()?;
  let minute = captures
    .name("minute")?
    .as_str()
    .parse::<u32>()
    .ok()?;

  let hour = if let Some(ampm_match) =
    captures.name("ampm")
  {
    if raw_hour == 0 || raw_hour > 12 {
      return None;
    }
    match ampm_match
      .as_str()
      .to_ascii_lowercase()
      .as_str()
    {
      | "am" => raw_hour % 12,
      | "pm" => raw_hour % 12 + 12,
      | _ => return None
    }
  } else {
    raw_hour
  };

  NaiveTime::from_hms_opt(
    hour, minute, 0
  )
}
