use std::io::{self, IsTerminal, Write};

use sprintboard_shared::{TaskDto, TaskStatus};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::calendar::view::{AgendaSnapshot, CalendarSnapshot, CellSnapshot};
use crate::calendar::ScheduleEntry;
use crate::config::Config;

const CELL_WIDTH: usize = 16;
const ID_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip_all, fields(header = %snapshot.header))]
    pub fn write_calendar<W: Write>(
        &self,
        mut out: W,
        snapshot: &CalendarSnapshot,
    ) -> anyhow::Result<()> {
        let sprint = &snapshot.sprint;
        writeln!(
            out,
            "{}: {} / {} ({} - {}, {} tasks)",
            snapshot.locale.quick_view_label(),
            sprint.project_name,
            sprint.name,
            sprint.start_date.format("%Y-%m-%d"),
            sprint.end_date.format("%Y-%m-%d"),
            sprint.task_count
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "{}  ({}: {})",
            self.paint(&snapshot.header, "1"),
            snapshot.locale.today_label(),
            snapshot.today.format("%Y-%m-%d")
        )?;

        let header = snapshot
            .weekdays
            .iter()
            .map(|label| pad(label, CELL_WIDTH))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(out, "{header}")?;
        writeln!(out, "{}", "-".repeat((CELL_WIDTH + 1) * 7 - 1))?;

        for week in snapshot.cells.chunks(7) {
            self.write_week(&mut out, week)?;
            writeln!(out, "{}", "-".repeat((CELL_WIDTH + 1) * 7 - 1))?;
        }

        if let Some(agenda) = &snapshot.agenda {
            writeln!(out)?;
            self.write_agenda(&mut out, agenda, snapshot)?;
        }

        Ok(())
    }

    fn write_week<W: Write>(&self, out: &mut W, week: &[CellSnapshot]) -> anyhow::Result<()> {
        let day_line = week
            .iter()
            .map(|cell| {
                let label = match cell.day {
                    Some(day) if cell.is_today => format!("*{day}"),
                    Some(day) => day.to_string(),
                    None => String::new(),
                };
                let padded = pad(&label, CELL_WIDTH);
                if cell.is_today {
                    self.paint(&padded, "1;36")
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        writeln!(out, "{day_line}")?;

        let chips = week.iter().map(|cell| self.cell_chips(cell)).collect::<Vec<_>>();
        let rows = chips.iter().map(Vec::len).max().unwrap_or(0);

        for row in 0..rows {
            let line = chips
                .iter()
                .map(|cell| {
                    cell.get(row)
                        .cloned()
                        .unwrap_or_else(|| " ".repeat(CELL_WIDTH))
                })
                .collect::<Vec<_>>()
                .join("|");
            writeln!(out, "{line}")?;
        }

        Ok(())
    }

    /// Tasks first, then schedule entries, each already padded to the cell.
    fn cell_chips(&self, cell: &CellSnapshot) -> Vec<String> {
        let tasks = cell.tasks.iter().map(|task| {
            let text = pad(&task_chip(task), CELL_WIDTH);
            self.paint(&text, status_color(task.status))
        });
        let schedules = cell.schedules.iter().map(|entry| {
            let text = pad(&schedule_chip(entry), CELL_WIDTH);
            self.paint(&text, SCHEDULE_COLOR)
        });
        tasks.chain(schedules).collect()
    }

    fn write_agenda<W: Write>(
        &self,
        out: &mut W,
        agenda: &AgendaSnapshot,
        snapshot: &CalendarSnapshot,
    ) -> anyhow::Result<()> {
        writeln!(out, "== {} ({}) ==", agenda.title, agenda.key)?;

        if agenda.entries.is_empty() {
            writeln!(out, "  ({})", snapshot.locale.empty_agenda_label())?;
        }

        for entry in &agenda.entries {
            let id = entry.id.to_string();
            let short = &id[..ID_PREFIX_LEN.min(id.len())];
            writeln!(
                out,
                "  [{}] {}  {}",
                short,
                entry.time_label(),
                self.paint(&entry.title, SCHEDULE_COLOR)
            )?;
            if !entry.description.is_empty() {
                writeln!(out, "  {:width$}  {}", "", entry.description, width = ID_PREFIX_LEN + 8)?;
            }
        }

        if agenda.creating {
            writeln!(out, "  new event: save <HH:MM> <title> [-- <description>] | cancel")?;
        } else {
            writeln!(out, "  new | delete <id> | close")?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

const SCHEDULE_COLOR: &str = "35";

fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => "32",
        TaskStatus::InProgress => "34",
        TaskStatus::Todo => "33",
    }
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => "[x]",
        TaskStatus::InProgress => "[~]",
        TaskStatus::Todo => "[ ]",
    }
}

fn task_chip(task: &TaskDto) -> String {
    format!("{} {}", status_marker(task.status), task.title)
}

fn schedule_chip(entry: &ScheduleEntry) -> String {
    format!("{} - {}", entry.time_label(), entry.title)
}

/// Truncates to `width` display columns and pads with spaces.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0usize;

    if UnicodeWidthStr::width(text) > width {
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    } else {
        out.push_str(text);
        used = UnicodeWidthStr::width(text);
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
