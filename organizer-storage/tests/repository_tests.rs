//! Tests for the generic repository contract and entity-specific queries.

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use organizer_storage::{
    ActivityLogRepository, ChecklistItemRepository, ChecklistRepository, DailyCount, Database,
    DocumentRepository, ExpenseRepository, IdeaRepository, IdeaTagLinkRepository,
    MigrationRunner, NoteRepository, ProjectRepository, ProjectScopedRepository,
    ReminderRepository, Repository, TagRepository, WorkLogRepository,
};
use organizer_types::{
    ActivityKind, ActivityLog, Checklist, ChecklistItem, Document, Expense, Idea, Money, Note,
    Priority, Project, ProjectId, ProjectStatus, Reminder, Tag, WorkLog,
};
use pretty_assertions::assert_eq;

fn migrated_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    MigrationRunner::builtin().migrate_to_latest(&db).unwrap();
    db
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn titles(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(|n| n.title.as_str()).collect()
}

// ── Basic CRUD ───────────────────────────────────────────────────

#[test]
fn insert_and_fetch_project() {
    let repo = ProjectRepository::new(migrated_db());
    let mut project = Project::new("Kitchen remodel");
    project.description = Some("New cabinets".into());
    project.status = ProjectStatus::Completed;
    project.start_date = Some(day(2024, 3, 1));
    project.end_date = Some(day(2024, 6, 30));
    project.budget = Some(Money::new(1_250_000, "EUR"));

    assert!(repo.insert(&project));
    assert_eq!(repo.fetch_by_id(&project.id), Some(project));
}

#[test]
fn fetch_missing_id_returns_none() {
    let repo = ProjectRepository::new(migrated_db());
    assert!(repo.fetch_by_id(&ProjectId::new()).is_none());
}

#[test]
fn duplicate_insert_returns_false() {
    let repo = ProjectRepository::new(migrated_db());
    let project = Project::new("Once");
    assert!(repo.insert(&project));
    assert!(!repo.insert(&project));
    assert_eq!(repo.count(), 1);
}

#[test]
fn update_replaces_row() {
    let repo = NoteRepository::new(migrated_db());
    let mut note = Note::new(ProjectId::new(), "Draft", "v1");
    assert!(repo.insert(&note));

    note.title = "Final".into();
    note.body = "v2".into();
    note.is_pinned = true;
    assert!(repo.update(&note));
    assert_eq!(repo.fetch_by_id(&note.id), Some(note));
}

#[test]
fn update_missing_row_returns_false() {
    let repo = NoteRepository::new(migrated_db());
    let note = Note::new(ProjectId::new(), "Ghost", "");
    assert!(!repo.update(&note));
    assert_eq!(repo.count(), 0);
}

#[test]
fn delete_and_delete_all() {
    let repo = TagRepository::new(migrated_db());
    let a = Tag::new("alpha", "#f00");
    let b = Tag::new("beta", "#0f0");
    assert!(repo.insert(&a));
    assert!(repo.insert(&b));

    assert!(repo.delete(&a.id));
    assert!(repo.fetch_by_id(&a.id).is_none());
    // Deleting again is not an error.
    assert!(repo.delete(&a.id));

    assert!(repo.delete_all());
    assert_eq!(repo.count(), 0);
}

// ── Ordering ─────────────────────────────────────────────────────

#[test]
fn notes_order_pinned_then_recent() {
    let repo = NoteRepository::new(migrated_db());
    let project = ProjectId::new();

    let mut old = Note::new(project, "old", "");
    old.updated_at = 100;
    let mut new = Note::new(project, "new", "");
    new.updated_at = 300;
    let mut pinned = Note::new(project, "pinned", "");
    pinned.updated_at = 10;
    pinned.is_pinned = true;

    for note in [&old, &new, &pinned] {
        assert!(repo.insert(note));
    }

    let fetched = repo.fetch_by_project_id(&project);
    assert_eq!(titles(&fetched), vec!["pinned", "new", "old"]);
}

#[test]
fn ties_break_on_creation_time() {
    let repo = ProjectRepository::new(migrated_db());
    let mut first = Project::new("first");
    first.created_at = 1;
    let mut second = Project::new("second");
    second.created_at = 2;
    // Insert out of order; same pin flag and sort order.
    assert!(repo.insert(&second));
    assert!(repo.insert(&first));

    let names: Vec<String> = repo.fetch_all().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn checklist_items_open_and_high_priority_first() {
    let db = migrated_db();
    let items = ChecklistItemRepository::new(db);
    let checklist = Checklist::new(ProjectId::new(), "Shopping");

    let mut done = ChecklistItem::new(checklist.id, "done");
    done.is_completed = true;
    done.priority = Priority::High;
    let mut low = ChecklistItem::new(checklist.id, "low");
    low.priority = Priority::Low;
    let mut high = ChecklistItem::new(checklist.id, "high");
    high.priority = Priority::High;

    for item in [&done, &low, &high] {
        assert!(items.insert(item));
    }

    let order: Vec<String> = items
        .fetch_by_checklist_id(&checklist.id)
        .into_iter()
        .map(|i| i.title)
        .collect();
    assert_eq!(order, vec!["high", "low", "done"]);
}

// ── Search ───────────────────────────────────────────────────────

#[test]
fn search_is_case_insensitive_across_fields() {
    let repo = ExpenseRepository::new(migrated_db());
    let project = ProjectId::new();
    let mut by_vendor = Expense::new(project, "Paint", Money::new(4500, "USD"), day(2024, 1, 5));
    by_vendor.vendor = Some("Hardware Depot".into());
    let mut by_notes = Expense::new(project, "Brushes", Money::new(900, "USD"), day(2024, 1, 6));
    by_notes.notes = Some("bought at the DEPOT sale".into());
    let other = Expense::new(project, "Pizza", Money::new(1800, "USD"), day(2024, 1, 7));

    for e in [&by_vendor, &by_notes, &other] {
        assert!(repo.insert(e));
    }

    let mut found: Vec<String> = repo.search("depot").into_iter().map(|e| e.title).collect();
    found.sort();
    assert_eq!(found, vec!["Brushes", "Paint"]);
}

#[test]
fn short_or_empty_query_returns_nothing() {
    let repo = NoteRepository::new(migrated_db());
    assert!(repo.insert(&Note::new(ProjectId::new(), "a", "a")));
    assert!(repo.search("").is_empty());
    assert!(repo.search("   ").is_empty());
    assert!(repo.search("a").is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let repo = NoteRepository::new(migrated_db());
    let project = ProjectId::new();
    assert!(repo.insert(&Note::new(project, "50% off", "")));
    assert!(repo.insert(&Note::new(project, "500 items", "")));

    let found = repo.search("0%");
    assert_eq!(titles(&found), vec!["50% off"]);
}

#[test]
fn search_folds_non_ascii_case() {
    let repo = NoteRepository::new(migrated_db());
    let project = ProjectId::new();
    assert!(repo.insert(&Note::new(project, "Über Renovierung", "")));
    assert!(repo.insert(&Note::new(project, "Ölwechsel", "Straße sperren")));

    assert_eq!(titles(&repo.search("über")), vec!["Über Renovierung"]);
    assert_eq!(titles(&repo.search("ÜBER")), vec!["Über Renovierung"]);
    assert_eq!(titles(&repo.search("renov")), vec!["Über Renovierung"]);
    assert_eq!(titles(&repo.search("ölw")), vec!["Ölwechsel"]);
    assert_eq!(titles(&repo.search("STRASSE")), Vec::<&str>::new());
    assert_eq!(titles(&repo.search("STRAßE")), vec!["Ölwechsel"]);
}

#[test]
fn link_table_has_nothing_to_search() {
    let repo = IdeaTagLinkRepository::new(migrated_db());
    assert!(repo.search("anything").is_empty());
}

// ── Project scoping ──────────────────────────────────────────────

#[test]
fn fetch_by_project_is_scoped() {
    let repo = DocumentRepository::new(migrated_db());
    let p1 = ProjectId::new();
    let p2 = ProjectId::new();
    let mut doc = Document::new(p1, "Plan", "plan.pdf");
    doc.byte_size = 2048;
    doc.mime_type = Some("application/pdf".into());
    assert!(repo.insert(&doc));
    assert!(repo.insert(&Document::new(p1, "Quote", "quote.pdf")));
    assert!(repo.insert(&Document::new(p2, "Other", "other.pdf")));

    assert_eq!(repo.fetch_by_project_id(&p1).len(), 2);
    assert_eq!(repo.fetch_by_project_id(&p2).len(), 1);
    assert_eq!(repo.total_bytes(&p1), 2048);

    let mut files = repo.file_names_for_project(&p1);
    files.sort();
    assert_eq!(files, vec!["plan.pdf", "quote.pdf"]);

    assert!(repo.delete_by_project_id(&p1));
    assert!(repo.fetch_by_project_id(&p1).is_empty());
    assert_eq!(repo.count(), 1);
}

#[test]
fn projects_by_status_and_pin() {
    let repo = ProjectRepository::new(migrated_db());
    let active = Project::new("active");
    let mut archived = Project::new("archived");
    archived.status = ProjectStatus::Archived;
    assert!(repo.insert(&active));
    assert!(repo.insert(&archived));

    let found = repo.fetch_by_status(ProjectStatus::Archived);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, archived.id);

    assert!(repo.set_pinned(&archived.id, true));
    assert_eq!(repo.fetch_all()[0].id, archived.id);
    assert!(!repo.set_pinned(&ProjectId::new(), true));
}

// ── Checklists ───────────────────────────────────────────────────

#[test]
fn checklist_items_by_project_and_progress() {
    let db = migrated_db();
    let checklists = ChecklistRepository::new(db.clone());
    let items = ChecklistItemRepository::new(db);
    let project = ProjectId::new();
    let list = Checklist::new(project, "Prep");
    assert!(checklists.insert(&list));
    assert_eq!(checklists.count_by_project_id(&project), 1);

    let mut estimate = ChecklistItem::new(list.id, "Buy tiles");
    estimate.cost_estimate = Some(Money::new(30_000, "USD"));
    estimate.due_date = Some(day(2024, 5, 1));
    let other = ChecklistItem::new(list.id, "Measure");
    assert!(items.insert(&estimate));
    assert!(items.insert(&other));

    assert_eq!(items.fetch_by_project_id(&project).len(), 2);
    assert_eq!(items.fetch_by_id(&estimate.id), Some(estimate.clone()));

    assert!(items.set_completed(&estimate.id, true));
    assert_eq!(items.progress(&list.id), (1, 2));

    assert!(items.delete_by_checklist_id(&list.id));
    assert!(items.fetch_by_checklist_id(&list.id).is_empty());
}

// ── Ideas and tags ───────────────────────────────────────────────

#[test]
fn duplicate_tag_links_are_tolerated() {
    let db = migrated_db();
    let ideas = IdeaRepository::new(db.clone());
    let tags = TagRepository::new(db.clone());
    let links = IdeaTagLinkRepository::new(db);

    let idea = Idea::new(ProjectId::new(), "Skylight");
    let tag = Tag::new("Lighting", "#ff0");
    assert!(ideas.insert(&idea));
    assert!(tags.insert(&tag));

    assert!(links.link(&idea.id, &tag.id).is_some());
    assert!(links.link(&idea.id, &tag.id).is_some());

    assert_eq!(links.fetch_by_idea_id(&idea.id).len(), 2);
    assert_eq!(tags.fetch_by_idea_id(&idea.id), vec![tag.clone()]);
    assert_eq!(ideas.fetch_by_tag_id(&tag.id).len(), 1);
    assert_eq!(tags.fetch_by_name("lighting"), Some(tag.clone()));

    assert!(links.delete_by_tag_id(&tag.id));
    assert!(links.fetch_by_idea_id(&idea.id).is_empty());
}

#[test]
fn tag_lookup_by_name_folds_non_ascii_case() {
    let repo = TagRepository::new(migrated_db());
    let tag = Tag::new("Küche", "#aa8800");
    assert!(repo.insert(&tag));
    assert_eq!(repo.fetch_by_name("KÜCHE"), Some(tag.clone()));
    assert_eq!(repo.fetch_by_name(" küche "), Some(tag));
    assert_eq!(repo.fetch_by_name("kuche"), None);
}

#[test]
fn tags_sort_by_name_ignoring_case() {
    let repo = TagRepository::new(migrated_db());
    for name in ["beta", "Alpha", "gamma"] {
        assert!(repo.insert(&Tag::new(name, "#000")));
    }
    let names: Vec<String> = repo.fetch_all().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
}

// ── Expenses ─────────────────────────────────────────────────────

#[test]
fn expense_totals_per_currency() {
    let repo = ExpenseRepository::new(migrated_db());
    let project = ProjectId::new();
    for (amount, currency) in [(1000, "USD"), (250, "USD"), (700, "EUR")] {
        let e = Expense::new(project, "x", Money::new(amount, currency), day(2024, 2, 1));
        assert!(repo.insert(&e));
    }
    let totals = repo.totals_by_currency(&project);
    assert_eq!(totals.get("USD"), Some(&1250));
    assert_eq!(totals.get("EUR"), Some(&700));
    assert!(repo.totals_by_currency(&ProjectId::new()).is_empty());
}

#[test]
fn detach_category_clears_reference() {
    let repo = ExpenseRepository::new(migrated_db());
    let project = ProjectId::new();
    let category = organizer_types::ExpenseCategory::new(project, "Materials");
    let mut expense = Expense::new(project, "Wood", Money::new(5000, "USD"), day(2024, 2, 2));
    expense.category_id = Some(category.id);
    assert!(repo.insert(&expense));
    assert_eq!(repo.fetch_by_category_id(&category.id).len(), 1);

    assert!(repo.detach_category(&category.id));
    assert!(repo.fetch_by_category_id(&category.id).is_empty());
    assert_eq!(repo.fetch_by_id(&expense.id).unwrap().category_id, None);
}

// ── Reminders and work logs ──────────────────────────────────────

#[test]
fn upcoming_reminders_skip_past_and_completed() {
    let repo = ReminderRepository::new(migrated_db());
    let project = ProjectId::new();
    let past = Reminder::new(project, "past", 100);
    let soon = Reminder::new(project, "soon", 2_000);
    let later = Reminder::new(project, "later", 3_000);
    let mut done = Reminder::new(project, "done", 2_500);
    done.is_completed = true;
    for r in [&past, &soon, &later, &done] {
        assert!(repo.insert(r));
    }

    let upcoming: Vec<String> = repo
        .fetch_upcoming(1_000, 10)
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(upcoming, vec!["soon", "later"]);
    assert_eq!(repo.fetch_upcoming(1_000, 1).len(), 1);

    assert!(repo.set_completed(&soon.id, true));
    assert_eq!(repo.fetch_upcoming(1_000, 10)[0].title, "later");
}

#[test]
fn unbounded_limits_return_every_row() {
    let db = migrated_db();
    let reminders = ReminderRepository::new(db.clone());
    let notes = NoteRepository::new(db);
    let project = ProjectId::new();
    for (i, due) in [2_000, 3_000, 4_000].into_iter().enumerate() {
        assert!(reminders.insert(&Reminder::new(project, format!("r{i}"), due)));
        assert!(notes.insert(&Note::new(project, format!("n{i}"), "")));
    }

    assert_eq!(reminders.fetch_upcoming(1_000, usize::MAX).len(), 3);
    assert_eq!(notes.fetch_recent(&project, usize::MAX).len(), 3);
    assert_eq!(notes.fetch_recent(&project, 2).len(), 2);
}

#[test]
fn work_log_minutes_sum() {
    let repo = WorkLogRepository::new(migrated_db());
    let project = ProjectId::new();
    let item = organizer_types::ChecklistItemId::new();
    let mut linked = WorkLog::new(project, "Tiling", 90, day(2024, 4, 1));
    linked.checklist_item_id = Some(item);
    assert!(repo.insert(&linked));
    assert!(repo.insert(&WorkLog::new(project, "Grout", 30, day(2024, 4, 2))));

    assert_eq!(repo.total_minutes(&project), 120);
    assert_eq!(repo.fetch_by_checklist_item_id(&item), vec![linked]);
    assert_eq!(repo.total_minutes(&ProjectId::new()), 0);
}

// ── Activity logs ────────────────────────────────────────────────

fn at(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp_millis()
}

#[test]
fn daily_counts_are_sparse_and_half_open() {
    let repo = ActivityLogRepository::new(migrated_db());
    let project = ProjectId::new();
    for ts in [
        at(2024, 1, 1, 9),
        at(2024, 1, 2, 8),
        at(2024, 1, 2, 20),
        at(2024, 1, 4, 12),
    ] {
        assert!(repo.insert(&ActivityLog::new(project, ActivityKind::Updated, ts)));
    }
    // Another project's activity is ignored.
    assert!(repo.insert(&ActivityLog::new(ProjectId::new(), ActivityKind::Updated, at(2024, 1, 2, 9))));

    let utc = FixedOffset::east_opt(0).unwrap();
    let counts = repo.daily_counts(&project, day(2024, 1, 1), day(2024, 1, 4), utc);
    assert_eq!(
        counts,
        vec![
            DailyCount { day: day(2024, 1, 1), count: 1 },
            DailyCount { day: day(2024, 1, 2), count: 2 },
        ]
    );
    assert!(repo.daily_counts(&project, day(2024, 1, 4), day(2024, 1, 4), utc).is_empty());
}

#[test]
fn daily_counts_respect_utc_offset() {
    let repo = ActivityLogRepository::new(migrated_db());
    let project = ProjectId::new();
    // 23:00 UTC on Jan 1 is already Jan 2 at UTC+2.
    assert!(repo.insert(&ActivityLog::new(project, ActivityKind::Created, at(2024, 1, 1, 23))));

    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let counts = repo.daily_counts(&project, day(2024, 1, 1), day(2024, 1, 3), plus_two);
    assert_eq!(counts, vec![DailyCount { day: day(2024, 1, 2), count: 1 }]);
}

#[test]
fn daily_counts_place_pre_epoch_instants_on_their_own_day() {
    let repo = ActivityLogRepository::new(migrated_db());
    let project = ProjectId::new();
    // The negative instants fall in the last second of 1969-12-31 UTC.
    for ts in [-1, -999, 0] {
        assert!(repo.insert(&ActivityLog::new(project, ActivityKind::Updated, ts)));
    }

    let utc = FixedOffset::east_opt(0).unwrap();
    let counts = repo.daily_counts(&project, day(1969, 12, 31), day(1970, 1, 2), utc);
    assert_eq!(
        counts,
        vec![
            DailyCount { day: day(1969, 12, 31), count: 2 },
            DailyCount { day: day(1970, 1, 1), count: 1 },
        ]
    );
}

#[test]
fn record_appends_activity() {
    let repo = ActivityLogRepository::new(migrated_db());
    let project = ProjectId::new();
    let log = repo
        .record(&project, ActivityKind::NoteAdded, Some("Added a note"))
        .unwrap();
    assert_eq!(repo.fetch_by_project_id(&project), vec![log]);
    assert_eq!(repo.search("added a").len(), 1);
}
