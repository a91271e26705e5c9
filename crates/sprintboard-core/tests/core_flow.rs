use std::fs;
use std::io::Cursor;

use chrono::{NaiveDate, Weekday};
use sprintboard_core::calendar::{CalendarView, DateKey, ScheduleBook};
use sprintboard_core::config::Config;
use sprintboard_core::render::Renderer;
use sprintboard_core::session::Session;
use sprintboard_core::store::BoardStore;
use tempfile::tempdir;

const BOARD: &str = r#"{
  "selected_project": "6f1c2b1e-8d7a-4a55-9a47-3f0f5d1f2c11",
  "selected_sprint": "0b3c6a3e-93b1-4d1c-a1a4-6b7c36f1d001",
  "projects": [{
    "id": "6f1c2b1e-8d7a-4a55-9a47-3f0f5d1f2c11",
    "name": "Portal",
    "sprints": [{
      "id": "0b3c6a3e-93b1-4d1c-a1a4-6b7c36f1d001",
      "name": "Sprint 1",
      "start_date": "2024-03-04",
      "end_date": "2024-03-15",
      "tasks": [
        {
          "id": "a3e4c1f0-7a55-4c6e-8f5e-0f0a7d6c9b10",
          "title": "Login form",
          "status": "in_progress",
          "updated_at": "2024-03-05T15:30:00Z"
        },
        {
          "id": "b3e4c1f0-7a55-4c6e-8f5e-0f0a7d6c9b11",
          "title": "Late night fix",
          "status": "done",
          "updated_at": "2024-03-07T03:00:00Z"
        }
      ]
    }]
  }]
}"#;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn board_snapshot_to_rendered_session() {
    let temp = tempdir().expect("tempdir");
    let board_path = temp.path().join("board.json");
    let config_path = temp.path().join("config.toml");
    fs::write(&board_path, BOARD).expect("write board");
    fs::write(
        &config_path,
        "locale = \"es\"\nweek_start = \"sunday\"\ntimezone = \"America/Mexico_City\"\ncolor = false\n",
    )
    .expect("write config");

    let cfg = Config::load(Some(config_path.as_path())).expect("load config");
    assert_eq!(cfg.loaded_files, vec![config_path.clone()]);
    let settings = cfg.view_settings();
    assert_eq!(settings.week_start, Weekday::Sun);

    let board = BoardStore::open(&board_path).expect("open board");
    let selection = board.select(None, None);
    assert!(selection.sprint.is_some());

    let view = CalendarView::new(settings, ymd(2024, 3, 5));
    let mut session = Session::new(view, selection, Renderer::new(&cfg), || ymd(2024, 3, 5));
    let script = "open 5\nnew\nsave 09:00 Standup -- daily sync\nclose\nopen 6\nclose\n";
    let mut out = Vec::new();
    session
        .run(Cursor::new(script), &mut out)
        .expect("run session");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Marzo 2024"));
    assert!(text.contains("[~] Login form"));
    // 03:00Z on the 7th is still the 6th in Mexico City.
    let snapshot = session
        .view()
        .snapshot(selection.project, selection.sprint)
        .expect("snapshot");
    let sixth = snapshot
        .cells
        .iter()
        .find(|cell| cell.day == Some(6))
        .expect("sixth cell");
    assert_eq!(sixth.tasks.len(), 1);
    assert_eq!(sixth.tasks[0].title, "Late night fix");

    let key: DateKey = "2024-3-5".parse().expect("key");
    assert_eq!(session.view().schedules().entries(key).len(), 1);
    assert!(text.contains("09:00 - Standup"));
    assert!(text.contains("(Sin eventos)"));
}

#[test]
fn missing_board_file_is_reported() {
    let temp = tempdir().expect("tempdir");
    let err = BoardStore::open(&temp.path().join("absent.json")).expect_err("missing board");
    assert!(format!("{err:#}").contains("failed to read board snapshot"));

    let bad = temp.path().join("bad.json");
    fs::write(&bad, "{ not json").expect("write bad board");
    let err = BoardStore::open(&bad).expect_err("bad board");
    assert!(format!("{err:#}").contains("failed to parse board snapshot"));
}

#[test]
fn month_cells_match_month_length_across_a_year() {
    let mut view = CalendarView::new(Default::default(), ymd(2024, 1, 10));
    let expected = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for len in expected {
        let grid = view.grid();
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.in_month_count(), len);
        view.next_month();
    }
    assert_eq!(view.reference(), ymd(2025, 1, 1));
}
