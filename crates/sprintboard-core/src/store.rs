use std::fs;
use std::path::Path;

use anyhow::Context;
use sprintboard_shared::{BoardSnapshot, ProjectDto, SprintDto};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Read-only view over the board snapshot that owns projects, sprints and
/// tasks. The calendar never writes back.
#[derive(Debug, Clone)]
pub struct BoardStore {
    snapshot: BoardSnapshot,
}

/// Project and sprint the calendar is drawn for. Either may be missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection<'a> {
    pub project: Option<&'a ProjectDto>,
    pub sprint: Option<&'a SprintDto>,
}

impl BoardStore {
    #[tracing::instrument]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read board snapshot {}", path.display()))?;
        let snapshot: BoardSnapshot = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse board snapshot {}", path.display()))?;

        info!(
            path = %path.display(),
            projects = snapshot.projects.len(),
            "opened board snapshot"
        );

        Ok(Self { snapshot })
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn projects(&self) -> &[ProjectDto] {
        &self.snapshot.projects
    }

    /// Resolves the selection. Explicit selectors (id or case-insensitive
    /// name) win over the ids stored in the snapshot; a sprint is only looked
    /// up inside the selected project.
    #[tracing::instrument(skip(self))]
    pub fn select(
        &self,
        project_selector: Option<&str>,
        sprint_selector: Option<&str>,
    ) -> Selection<'_> {
        let project = match project_selector {
            Some(selector) => find_by_selector(&self.snapshot.projects, selector, |p| {
                (p.id, p.name.as_str())
            }),
            None => self
                .snapshot
                .selected_project
                .and_then(|id| self.snapshot.projects.iter().find(|p| p.id == id)),
        };

        let Some(project) = project else {
            warn!("no project selected");
            return Selection::default();
        };

        let sprint = match sprint_selector {
            Some(selector) => {
                find_by_selector(&project.sprints, selector, |s| (s.id, s.name.as_str()))
            }
            None => self
                .snapshot
                .selected_sprint
                .and_then(|id| project.sprints.iter().find(|s| s.id == id)),
        };

        if sprint.is_none() {
            warn!(project = %project.name, "no sprint selected");
        } else {
            debug!(
                project = %project.name,
                sprint = ?sprint.map(|s| s.name.as_str()),
                "resolved selection"
            );
        }

        Selection {
            project: Some(project),
            sprint,
        }
    }
}

fn find_by_selector<'a, T>(
    items: &'a [T],
    selector: &str,
    identity: impl Fn(&T) -> (Uuid, &str),
) -> Option<&'a T> {
    let selector = selector.trim();
    if let Ok(id) = Uuid::parse_str(selector) {
        return items.iter().find(|item| identity(item).0 == id);
    }
    items
        .iter()
        .find(|item| identity(item).1.eq_ignore_ascii_case(selector))
}
