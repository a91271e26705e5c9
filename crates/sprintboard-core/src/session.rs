use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::calendar::{CalendarView, ScheduleDraft};
use crate::render::Renderer;
use crate::store::Selection;

const COMMANDS: &[&str] = &[
    "next", "prev", "today", "show", "open", "new", "save", "cancel", "delete", "close", "help",
    "quit",
];

/// Resolves a typed command word: exact names first, then a unique prefix.
pub fn resolve_command(word: &str) -> Option<&'static str> {
    let word = word.to_ascii_lowercase();
    if let Some(exact) = COMMANDS.iter().copied().find(|name| *name == word) {
        return Some(exact);
    }

    let candidates = COMMANDS
        .iter()
        .copied()
        .filter(|name| name.starts_with(word.as_str()))
        .collect::<Vec<_>>();
    match candidates.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive calendar session. The agenda lives exactly as long as the
/// session does.
pub struct Session<'a> {
    view: CalendarView,
    selection: Selection<'a>,
    renderer: Renderer,
    clock: Box<dyn Fn() -> NaiveDate + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(
        view: CalendarView,
        selection: Selection<'a>,
        renderer: Renderer,
        clock: impl Fn() -> NaiveDate + 'a,
    ) -> Self {
        Self {
            view,
            selection,
            renderer,
            clock: Box::new(clock),
        }
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    /// Reads commands until `quit` or end of input, redrawing after each one.
    /// A failed command is reported and the session keeps going.
    #[instrument(skip_all)]
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> anyhow::Result<()> {
        info!("calendar session started");
        self.render(&mut out)?;

        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match self.execute(trimmed, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    warn!(command = %trimmed, error = %err, "command failed");
                    writeln!(out, "error: {err:#}")?;
                }
            }
        }

        info!(
            entries = self.view.schedules().total_entries(),
            "calendar session ended; agenda discarded"
        );
        Ok(())
    }

    #[instrument(skip(self, out))]
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<Flow> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        let Some((first, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };

        let command = resolve_command(first)
            .ok_or_else(|| anyhow!("unknown command: {first} (try `help`)"))?;
        debug!(command, ?args, "dispatching session command");

        match command {
            "next" => self.view.next_month(),
            "prev" => self.view.previous_month(),
            "today" => {
                let today = (self.clock)();
                self.view.jump_to_today(today);
            }
            "show" => {}
            "open" => {
                let raw = args.first().ok_or_else(|| anyhow!("usage: open <day>"))?;
                let day = raw
                    .parse::<u32>()
                    .map_err(|_| anyhow!("not a day number: {raw}"))?;
                self.view.select_day(day)?;
            }
            "new" => self.view.begin_create()?,
            "save" => {
                let draft = parse_save_args(args)?;
                self.view.submit_entry(draft)?;
            }
            "cancel" => self.view.cancel_create()?,
            "delete" => {
                let prefix = args.first().ok_or_else(|| anyhow!("usage: delete <id>"))?;
                let id = self
                    .view
                    .resolve_entry(prefix)?
                    .ok_or_else(|| anyhow!("no single event matches {prefix}"))?;
                self.view.delete_entry(id)?;
            }
            "close" => self.view.close_modal(),
            "help" => {
                write_help(out)?;
                return Ok(Flow::Continue);
            }
            "quit" => return Ok(Flow::Quit),
            other => return Err(anyhow!("unhandled command: {other}")),
        }

        self.render(out)?;
        Ok(Flow::Continue)
    }

    /// Draws one frame. The today marker follows the clock on every frame;
    /// only `today` moves the displayed month.
    fn render<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        self.view.set_today((self.clock)());
        let Some(snapshot) = self
            .view
            .snapshot(self.selection.project, self.selection.sprint)
        else {
            return Ok(());
        };
        self.renderer.write_calendar(&mut *out, &snapshot)?;
        writeln!(out)?;
        Ok(())
    }
}

/// `save <HH:MM> [am|pm] <title words> [-- <description words>]`
fn parse_save_args(args: &[&str]) -> anyhow::Result<ScheduleDraft> {
    let (time, rest) = match args {
        [time, meridiem, rest @ ..]
            if meridiem.eq_ignore_ascii_case("am") || meridiem.eq_ignore_ascii_case("pm") =>
        {
            (format!("{time} {meridiem}"), rest)
        }
        [time, rest @ ..] => (time.to_string(), rest),
        [] => return Err(anyhow!("usage: save <HH:MM> <title> [-- <description>]")),
    };

    let (title, description) = match rest.iter().position(|tok| *tok == "--") {
        Some(split) => (rest[..split].join(" "), rest[split + 1..].join(" ")),
        None => (rest.join(" "), String::new()),
    };

    Ok(ScheduleDraft::new(title, time).with_description(description))
}

fn write_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "next | prev | today        move the displayed month")?;
    writeln!(out, "show                       redraw")?;
    writeln!(out, "open <day>                 open a day of the displayed month")?;
    writeln!(out, "new                        start a new event on the open day")?;
    writeln!(out, "save <HH:MM> <title> [-- <description>]")?;
    writeln!(out, "cancel                     discard the new event form")?;
    writeln!(out, "delete <id>                remove an event (id prefix is enough)")?;
    writeln!(out, "close                      close the open day")?;
    writeln!(out, "quit                       end the session")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    use chrono::Weekday;
    use sprintboard_shared::{ProjectDto, SprintDto};
    use uuid::Uuid;

    use super::*;
    use crate::calendar::view::ViewSettings;
    use crate::calendar::{DateKey, DayModal, ScheduleBook};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn fixtures() -> (ProjectDto, SprintDto) {
        let sprint = SprintDto {
            id: Uuid::new_v4(),
            name: "Sprint 1".to_string(),
            start_date: ymd(2024, 3, 1),
            end_date: ymd(2024, 3, 14),
            tasks: vec![],
        };
        let project = ProjectDto {
            id: Uuid::new_v4(),
            name: "Portal".to_string(),
            sprints: vec![sprint.clone()],
        };
        (project, sprint)
    }

    fn session<'a>(project: &'a ProjectDto, sprint: &'a SprintDto) -> Session<'a> {
        let view = CalendarView::new(ViewSettings::default(), ymd(2024, 3, 5));
        Session::new(
            view,
            Selection {
                project: Some(project),
                sprint: Some(sprint),
            },
            Renderer::plain(),
            || ymd(2024, 6, 20),
        )
    }

    #[test]
    fn abbreviations_expand_when_unique() {
        assert_eq!(resolve_command("ne"), None);
        assert_eq!(resolve_command("nex"), Some("next"));
        assert_eq!(resolve_command("O"), Some("open"));
        assert_eq!(resolve_command("new"), Some("new"));
        assert_eq!(resolve_command("zzz"), None);
    }

    #[test]
    fn save_args_split_title_and_description() {
        let draft = parse_save_args(&["09:00", "Daily", "standup", "--", "team", "sync"])
            .expect("parse");
        assert_eq!(draft.time, "09:00");
        assert_eq!(draft.title, "Daily standup");
        assert_eq!(draft.description, "team sync");

        let draft = parse_save_args(&["1:30", "PM", "Demo"]).expect("parse");
        assert_eq!(draft.time, "1:30 PM");
        assert_eq!(draft.title, "Demo");

        assert!(parse_save_args(&[]).is_err());
    }

    #[test]
    fn scripted_session_drives_the_modal() {
        let (project, sprint) = fixtures();
        let mut session = session(&project, &sprint);
        let script = "open 5\nnew\nsave 09:00 Standup -- daily sync\nsave 10:00 Again\nnew\nsave 11:00 Review\nquit\nnext\n";
        let mut out = Vec::new();
        session
            .run(Cursor::new(script), &mut out)
            .expect("run session");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Agenda del 5 de Marzo"));
        assert!(text.contains("error: cannot save while the agenda is viewing"));

        let key = DateKey::from(ymd(2024, 3, 5));
        let titles = session
            .view()
            .schedules()
            .entries(key)
            .iter()
            .map(|entry| entry.title.clone())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Standup", "Review"]);
        // `next` came after `quit`.
        assert_eq!(session.view().reference(), ymd(2024, 3, 1));
    }

    #[test]
    fn delete_by_prefix_and_today_jump() {
        let (project, sprint) = fixtures();
        let mut session = session(&project, &sprint);
        let mut out = Vec::new();

        for line in ["open 5", "new", "save 09:00 Standup"] {
            session.execute(line, &mut out).expect("command");
        }
        let id = session.view().schedules().entries(ymd(2024, 3, 5).into())[0].id;
        let prefix = &id.to_string()[..8];
        session
            .execute(&format!("delete {prefix}"), &mut out)
            .expect("delete");
        assert!(session.view().schedules().entries(ymd(2024, 3, 5).into()).is_empty());
        assert!(session.view().schedules().contains_day(ymd(2024, 3, 5).into()));

        session.execute("close", &mut out).expect("close");
        assert_eq!(session.view().modal(), DayModal::Closed);
        session.execute("today", &mut out).expect("today");
        assert_eq!(session.view().reference(), ymd(2024, 6, 1));
        assert!(session.execute("open 31", &mut out).is_err());
        assert!(session.execute("frobnicate", &mut out).is_err());
    }

    #[test]
    fn today_marker_follows_clock_between_commands() {
        let (project, sprint) = fixtures();
        let clock = Rc::new(Cell::new(ymd(2024, 3, 5)));
        let view = CalendarView::new(ViewSettings::default(), ymd(2024, 3, 5));
        let mut session = Session::new(
            view,
            Selection {
                project: Some(&project),
                sprint: Some(&sprint),
            },
            Renderer::plain(),
            {
                let clock = Rc::clone(&clock);
                move || clock.get()
            },
        );
        let highlighted = |session: &Session<'_>| {
            session
                .view()
                .snapshot(Some(&project), Some(&sprint))
                .expect("snapshot")
                .cells
                .iter()
                .filter(|cell| cell.is_today)
                .map(|cell| cell.day)
                .collect::<Vec<_>>()
        };

        let mut out = Vec::new();
        session.execute("show", &mut out).expect("show");
        assert_eq!(highlighted(&session), vec![Some(5)]);

        clock.set(ymd(2024, 3, 6));
        session.execute("show", &mut out).expect("show");
        assert_eq!(session.view().today(), ymd(2024, 3, 6));
        assert_eq!(highlighted(&session), vec![Some(6)]);
        assert_eq!(session.view().reference(), ymd(2024, 3, 1));

        clock.set(ymd(2024, 4, 1));
        session.execute("show", &mut out).expect("show");
        assert!(highlighted(&session).is_empty());
        assert_eq!(session.view().reference(), ymd(2024, 3, 1));
    }

    #[test]
    fn missing_selection_renders_nothing() {
        let view = CalendarView::new(
            ViewSettings {
                week_start: Weekday::Mon,
                ..ViewSettings::default()
            },
            ymd(2024, 3, 5),
        );
        let mut session = Session::new(view, Selection::default(), Renderer::plain(), || {
            ymd(2024, 3, 5)
        });
        let mut out = Vec::new();
        session
            .run(Cursor::new("next\nopen 3\n"), &mut out)
            .expect("run session");
        assert!(out.is_empty());
        assert_eq!(session.view().reference(), ymd(2024, 4, 1));
    }
}
