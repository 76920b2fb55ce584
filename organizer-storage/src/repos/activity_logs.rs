use super::{opt_text, parse_col, text, ActivityLogRepository};
use crate::repository::{ProjectScoped, Record, Repository};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use organizer_types::{now_millis, ActivityKind, ActivityLog, ActivityLogId, ProjectId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

/// Number of activity rows on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

impl Record for ActivityLog {
    type Id = ActivityLogId;

    const TABLE: &'static str = "activity_logs";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "kind",
        "detail",
        "occurred_at",
        "created_at",
    ];
    const ORDER_BY: &'static str = "occurred_at DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["detail"];

    fn id(&self) -> ActivityLogId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(self.kind.as_str()),
            opt_text(self.detail.as_ref()),
            Value::Integer(self.occurred_at),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ActivityLog {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            kind: parse_col(row, 2)?,
            detail: row.get(3)?,
            occurred_at: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl ProjectScoped for ActivityLog {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl ActivityLogRepository {
    /// Append an event that happened now.
    pub fn record(
        &self,
        project_id: &ProjectId,
        kind: ActivityKind,
        detail: Option<&str>,
    ) -> Option<ActivityLog> {
        let mut log = ActivityLog::new(*project_id, kind, now_millis());
        log.detail = detail.map(str::to_string);
        self.insert(&log).then_some(log)
    }

    /// Sparse per-day counts for `[start, end)`, with days taken in the
    /// given UTC offset. Days without activity are absent. Milliseconds are
    /// floored to seconds so pre-1970 instants land on their own day.
    pub fn daily_counts(
        &self,
        project_id: &ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        utc_offset: FixedOffset,
    ) -> Vec<DailyCount> {
        if end <= start {
            return Vec::new();
        }
        let offset_secs = i64::from(utc_offset.local_minus_utc());
        let start_ms = local_midnight_millis(start, offset_secs);
        let end_ms = local_midnight_millis(end, offset_secs);
        self.read_mapped(
            "daily_counts",
            "SELECT date(((occurred_at - ((occurred_at % 1000) + 1000) % 1000) / 1000) + ?4, \
                         'unixepoch') AS day, COUNT(*) \
             FROM activity_logs \
             WHERE project_id = ?1 AND occurred_at >= ?2 AND occurred_at < ?3 \
             GROUP BY day ORDER BY day ASC",
            params![project_id.to_string(), start_ms, end_ms, offset_secs],
            |row| {
                Ok(DailyCount {
                    day: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )
    }
}

/// Millisecond timestamp of local midnight starting `day`.
fn local_midnight_millis(day: NaiveDate, offset_secs: i64) -> i64 {
    day.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - offset_secs * 1000
}
