pub mod calendar;
pub mod cli;
pub mod config;
pub mod datetime;
pub mod locale;
pub mod render;
pub mod session;
pub mod store;

use std::ffi::OsString;
use std::io::{
  self,
  Write
};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::CalendarView;
use crate::cli::Command;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting sprintboard"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;
  debug!(?cfg, "effective config");

  let store_path =
    config::resolve_store_path(
      &cfg,
      cli.store.as_deref()
    )
    .context(
      "failed to resolve board \
       snapshot path"
    )?;
  let board =
    store::BoardStore::open(&store_path)
      .with_context(|| {
        format!(
          "failed to open board at {}",
          store_path.display()
        )
      })?;

  let selection = board.select(
    cli.project.as_deref(),
    cli.sprint.as_deref()
  );

  let settings = cfg.view_settings();
  let today = datetime::today_in_timezone(
    settings.timezone
  );
  let mut view =
    CalendarView::new(settings, today);
  if let Some(raw) = cli.month.as_deref()
  {
    view = view.starting_at(
      datetime::parse_month_arg(raw)?
    );
  }

  let renderer =
    render::Renderer::new(&cfg);

  match cli.command.unwrap_or(Command::Show)
  {
    | Command::Show => {
      let Some(snapshot) = view.snapshot(
        selection.project,
        selection.sprint
      ) else {
        warn!(
          "nothing to show without a \
           project and sprint"
        );
        return Ok(());
      };
      let stdout = io::stdout();
      let mut out = stdout.lock();
      renderer
        .write_calendar(&mut out, &snapshot)?;
      out.flush()?;
    }
    | Command::Shell => {
      let timezone = settings.timezone;
      let mut session =
        session::Session::new(
          view,
          selection,
          renderer,
          move || {
            datetime::today_in_timezone(
              timezone
            )
          }
        );
      let stdin = io::stdin();
      let stdout = io::stdout();
      session.run(
        stdin.lock(),
        stdout.lock()
      )?;
    }
  }

  info!("done");
  Ok(())
}
