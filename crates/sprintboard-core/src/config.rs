use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::Weekday;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::view::ViewSettings;
use crate::datetime::resolve_timezone;
use crate::locale::Locale;

pub const CONFIG_ENV_VAR: &str =
  "SPRINTBOARD_CONFIG";
const CONFIG_DIR_NAME: &str =
  "sprintboard";
const CONFIG_FILE_NAME: &str =
  "config.toml";
const STORE_FILE_NAME: &str =
  "board.json";

fn default_locale() -> String {
  "es".to_string()
}

fn default_week_start() -> String {
  "sunday".to_string()
}

fn default_true() -> bool {
  true
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct Config {
  #[serde(default = "default_locale")]
  pub locale:       String,
  #[serde(default = "default_week_start")]
  pub week_start:   String,
  #[serde(default)]
  pub timezone:     Option<String>,
  #[serde(default = "default_true")]
  pub color:        bool,
  #[serde(default)]
  pub store:        Option<PathBuf>,
  #[serde(skip)]
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      locale:       default_locale(),
      week_start:   default_week_start(),
      timezone:     None,
      color:        true,
      store:        None,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) = resolve_config_path(
      config_override
    )?
    else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    Self::load_file(&path)
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    let mut cfg = Self::parse(&text)
      .with_context(|| {
        format!(
          "invalid config {}",
          path.display()
        )
      })?;
    cfg.loaded_files.push(path);
    Ok(cfg)
  }

  pub fn parse(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut cfg: Config =
      toml::from_str(text)?;
    cfg.sanitize();
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k.trim();
      let value = v.trim().to_string();
      debug!(key = %key, value = %value, "applying override");
      match key {
        | "locale" => self.locale = value,
        | "week_start" => {
          self.week_start = value
        }
        | "timezone" => {
          self.timezone = (!value
            .is_empty())
          .then_some(value)
        }
        | "color" => {
          self.color = parse_bool(&value)
        }
        | "store" => {
          self.store =
            Some(PathBuf::from(value))
        }
        | other => {
          return Err(anyhow!(
            "unknown config key: {other}"
          ));
        }
      }
    }
    self.sanitize();
    Ok(())
  }

  pub fn locale(&self) -> Locale {
    Locale::from_key(&self.locale)
      .unwrap_or_default()
  }

  pub fn week_start(&self) -> Weekday {
    if self
      .week_start
      .trim()
      .eq_ignore_ascii_case("monday")
    {
      Weekday::Mon
    } else {
      Weekday::Sun
    }
  }

  pub fn view_settings(
    &self
  ) -> ViewSettings {
    ViewSettings {
      week_start: self.week_start(),
      timezone:   resolve_timezone(
        self.timezone.as_deref()
      ),
      locale:     self.locale()
    }
  }

  fn sanitize(&mut self) {
    if Locale::from_key(&self.locale)
      .is_none()
    {
      warn!(
        locale = %self.locale,
        "unsupported locale; falling \
         back to es"
      );
      self.locale = default_locale();
    }

    let week_start = self
      .week_start
      .trim()
      .to_ascii_lowercase();
    if week_start != "sunday"
      && week_start != "monday"
    {
      warn!(
        week_start = %self.week_start,
        "unsupported week start; \
         falling back to sunday"
      );
      self.week_start =
        default_week_start();
    }

    if self
      .timezone
      .as_deref()
      .is_some_and(|tz| tz.trim().is_empty())
    {
      self.timezone = None;
    }
  }
}

#[tracing::instrument(skip(
  cfg,
  override_path
))]
pub fn resolve_store_path(
  cfg: &Config,
  override_path: Option<&Path>
) -> anyhow::Result<PathBuf> {
  if let Some(path) = override_path {
    return Ok(expand_tilde(path));
  }
  if let Some(path) = cfg.store.as_deref()
  {
    return Ok(expand_tilde(path));
  }

  let data = dirs::data_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine data \
         directory"
      )
    })?;
  Ok(
    data
      .join(CONFIG_DIR_NAME)
      .join(STORE_FILE_NAME)
  )
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(env_path) =
    std::env::var(CONFIG_ENV_VAR)
  {
    if env_path == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      env_path
    )));
  }

  let Some(dir) = dirs::config_dir()
  else {
    debug!(
      "no config directory on this \
       platform"
    );
    return Ok(None);
  };
  let candidate = dir
    .join(CONFIG_DIR_NAME)
    .join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}
