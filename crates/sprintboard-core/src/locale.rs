use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};
use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
  #[default]
  Es,
  En
}

const MONTHS_ES: [&str; 12] = [
  "Enero",
  "Febrero",
  "Marzo",
  "Abril",
  "Mayo",
  "Junio",
  "Julio",
  "Agosto",
  "Septiembre",
  "Octubre",
  "Noviembre",
  "Diciembre"
];

const MONTHS_EN: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

// Sunday first.
const WEEKDAYS_ES: [&str; 7] = [
  "Dom", "Lun", "Mar", "Mié", "Jue",
  "Vie", "Sáb"
];
const WEEKDAYS_EN: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

impl Locale {
  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "es" | "es-es" | "es-mx"
      | "spanish" => Some(Locale::Es),
      | "en" | "en-us" | "en-gb"
      | "english" => Some(Locale::En),
      | _ => None
    }
  }

  pub fn month_name(
    self,
    month: u32
  ) -> &'static str {
    let idx = month
      .saturating_sub(1)
      .min(11) as usize;
    match self {
      | Locale::Es => MONTHS_ES[idx],
      | Locale::En => MONTHS_EN[idx]
    }
  }

  /// Seven labels starting at
  /// `week_start`.
  pub fn weekday_labels(
    self,
    week_start: Weekday
  ) -> Vec<&'static str> {
    let table = match self {
      | Locale::Es => &WEEKDAYS_ES,
      | Locale::En => &WEEKDAYS_EN
    };
    let offset = week_start
      .num_days_from_sunday()
      as usize;
    (0..7)
      .map(|i| table[(offset + i) % 7])
      .collect()
  }

  pub fn month_header(
    self,
    reference: NaiveDate
  ) -> String {
    format!(
      "{} {}",
      self.month_name(reference.month()),
      reference.year()
    )
  }

  pub fn agenda_title(
    self,
    day: NaiveDate
  ) -> String {
    let month =
      self.month_name(day.month());
    match self {
      | Locale::Es => {
        format!(
          "Agenda del {} de {}",
          day.day(),
          month
        )
      }
      | Locale::En => {
        format!(
          "Agenda for {} {}",
          month,
          day.day()
        )
      }
    }
  }

  pub fn today_label(
    self
  ) -> &'static str {
    match self {
      | Locale::Es => "Hoy",
      | Locale::En => "Today"
    }
  }

  pub fn quick_view_label(
    self
  ) -> &'static str {
    match self {
      | Locale::Es => "Vista Rápida",
      | Locale::En => "Quick view"
    }
  }

  pub fn empty_agenda_label(
    self
  ) -> &'static str {
    match self {
      | Locale::Es => "Sin eventos",
      | Locale::En => "No events"
    }
  }
}
