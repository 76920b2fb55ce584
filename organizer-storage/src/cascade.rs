//! Manual cascade delete across tables with no enforced foreign keys.
//!
//! Deletion runs leaf-first so an interrupted sweep leaves the parent rows
//! in place rather than orphaned children. Each step commits on its own; a
//! failed step is recorded and the sweep carries on.

use crate::repos::Repositories;
use crate::repository::{ProjectScopedRepository, Repository};
use organizer_types::{ChecklistId, IdeaId, ProjectId};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

/// One deletion statement in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    Reminders,
    Documents,
    Notes,
    Expenses,
    ExpenseCategories,
    WorkLogs,
    ActivityLogs,
    ChecklistItems(Option<ChecklistId>),
    Checklists(Option<ChecklistId>),
    IdeaTagLinks(Option<IdeaId>),
    Ideas(Option<IdeaId>),
    Tags,
    Projects,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeStep::Reminders => write!(f, "reminders"),
            CascadeStep::Documents => write!(f, "documents"),
            CascadeStep::Notes => write!(f, "notes"),
            CascadeStep::Expenses => write!(f, "expenses"),
            CascadeStep::ExpenseCategories => write!(f, "expense categories"),
            CascadeStep::WorkLogs => write!(f, "work logs"),
            CascadeStep::ActivityLogs => write!(f, "activity logs"),
            CascadeStep::ChecklistItems(Some(id)) => write!(f, "items of checklist {id}"),
            CascadeStep::ChecklistItems(None) => write!(f, "checklist items"),
            CascadeStep::Checklists(Some(id)) => write!(f, "checklist {id}"),
            CascadeStep::Checklists(None) => write!(f, "checklists"),
            CascadeStep::IdeaTagLinks(Some(id)) => write!(f, "tag links of idea {id}"),
            CascadeStep::IdeaTagLinks(None) => write!(f, "idea tag links"),
            CascadeStep::Ideas(Some(id)) => write!(f, "idea {id}"),
            CascadeStep::Ideas(None) => write!(f, "ideas"),
            CascadeStep::Tags => write!(f, "tags"),
            CascadeStep::Projects => write!(f, "projects"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: CascadeStep,
    pub succeeded: bool,
}

/// Per-step result of a sweep, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub steps: Vec<StepOutcome>,
}

impl CascadeReport {
    /// Logical AND over every step.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = CascadeStep> + '_ {
        self.steps.iter().filter(|s| !s.succeeded).map(|s| s.step)
    }

    fn record(&mut self, step: CascadeStep, succeeded: bool) {
        if !succeeded {
            error!(%step, "Cascade step failed");
        }
        self.steps.push(StepOutcome { step, succeeded });
    }
}

/// Removes a project and everything that references it, or wipes the store.
#[derive(Clone, Debug)]
pub struct CascadeDeleter {
    repos: Repositories,
}

impl CascadeDeleter {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Delete `project_id` and every row that references it, directly or
    /// through a checklist or idea. False if any step failed; every step is
    /// attempted regardless.
    pub fn delete_project_cascade(&self, project_id: &ProjectId) -> bool {
        self.delete_project_cascade_report(project_id).succeeded()
    }

    pub fn delete_project_cascade_report(&self, project_id: &ProjectId) -> CascadeReport {
        let r = &self.repos;
        let mut report = CascadeReport::default();

        report.record(CascadeStep::Reminders, r.reminders.delete_by_project_id(project_id));
        report.record(CascadeStep::Documents, r.documents.delete_by_project_id(project_id));
        report.record(CascadeStep::Notes, r.notes.delete_by_project_id(project_id));
        report.record(CascadeStep::Expenses, r.expenses.delete_by_project_id(project_id));
        report.record(
            CascadeStep::ExpenseCategories,
            r.expense_categories.delete_by_project_id(project_id),
        );
        // Work logs point at checklist items, so they go before checklists.
        report.record(CascadeStep::WorkLogs, r.work_logs.delete_by_project_id(project_id));
        report.record(
            CascadeStep::ActivityLogs,
            r.activity_logs.delete_by_project_id(project_id),
        );

        // Per checklist first, then a set-based sweep that also catches rows
        // whose id could not be decoded or that appeared meanwhile.
        match r.checklists.ids_for_project(project_id) {
            Some(ids) => {
                for id in parse_ids::<ChecklistId>(&ids, "checklist") {
                    report.record(
                        CascadeStep::ChecklistItems(Some(id)),
                        r.checklist_items.delete_by_checklist_id(&id),
                    );
                    report.record(CascadeStep::Checklists(Some(id)), r.checklists.delete(&id));
                }
            }
            None => report.record(CascadeStep::Checklists(None), false),
        }
        report.record(
            CascadeStep::ChecklistItems(None),
            r.checklist_items.delete_by_project_id(project_id),
        );
        report.record(
            CascadeStep::Checklists(None),
            r.checklists.delete_by_project_id(project_id),
        );

        match r.ideas.ids_for_project(project_id) {
            Some(ids) => {
                for id in parse_ids::<IdeaId>(&ids, "idea") {
                    report.record(
                        CascadeStep::IdeaTagLinks(Some(id)),
                        r.idea_tags.delete_by_idea_id(&id),
                    );
                    report.record(CascadeStep::Ideas(Some(id)), r.ideas.delete(&id));
                }
            }
            None => report.record(CascadeStep::Ideas(None), false),
        }
        report.record(
            CascadeStep::IdeaTagLinks(None),
            r.idea_tags.delete_by_project_id(project_id),
        );
        report.record(CascadeStep::Ideas(None), r.ideas.delete_by_project_id(project_id));

        report.record(CascadeStep::Projects, r.projects.delete(project_id));

        if report.succeeded() {
            info!(%project_id, steps = report.steps.len(), "Project deleted");
        } else {
            warn!(
                %project_id,
                failed = report.failed_steps().count(),
                "Project delete left rows behind"
            );
        }
        report
    }

    /// Empty every entity table, children before parents. The migration
    /// ledger and user settings are kept.
    pub fn delete_all_data(&self) -> bool {
        self.delete_all_data_report().succeeded()
    }

    pub fn delete_all_data_report(&self) -> CascadeReport {
        let r = &self.repos;
        let mut report = CascadeReport::default();

        report.record(CascadeStep::Reminders, r.reminders.delete_all());
        report.record(CascadeStep::Documents, r.documents.delete_all());
        report.record(CascadeStep::Notes, r.notes.delete_all());
        report.record(CascadeStep::Expenses, r.expenses.delete_all());
        report.record(CascadeStep::ExpenseCategories, r.expense_categories.delete_all());
        report.record(CascadeStep::WorkLogs, r.work_logs.delete_all());
        report.record(CascadeStep::ActivityLogs, r.activity_logs.delete_all());
        report.record(CascadeStep::ChecklistItems(None), r.checklist_items.delete_all());
        report.record(CascadeStep::Checklists(None), r.checklists.delete_all());
        report.record(CascadeStep::IdeaTagLinks(None), r.idea_tags.delete_all());
        report.record(CascadeStep::Ideas(None), r.ideas.delete_all());
        report.record(CascadeStep::Tags, r.tags.delete_all());
        report.record(CascadeStep::Projects, r.projects.delete_all());

        if report.succeeded() {
            info!("All data deleted");
        } else {
            warn!(failed = report.failed_steps().count(), "Data wipe incomplete");
        }
        report
    }
}

/// Typed ids out of raw column values. Undecodable ids are skipped here and
/// left to the set-based sweep.
fn parse_ids<I: FromStr>(raw: &[String], kind: &'static str) -> Vec<I> {
    raw.iter()
        .filter_map(|value| match value.parse::<I>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(kind, id = %value, "Undecodable id, leaving it to the sweep");
                None
            }
        })
        .collect()
}
