use crate::range::{ActivityRange, DateSpan};
use chrono::{Datelike, Days, FixedOffset, NaiveDate, Offset, Utc};
use organizer_storage::ActivityLogRepository;
use organizer_types::ProjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Width of a biweekly bucket.
const BIWEEKLY_DAYS: u64 = 14;

/// Supplier of sparse per-day event counts for one project.
pub trait DailyActivitySource {
    /// Counts for days in `[start, end)` taken in `utc_offset`. Days without
    /// activity may be absent.
    fn counts_by_day(
        &self,
        project_id: &ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        utc_offset: FixedOffset,
    ) -> BTreeMap<NaiveDate, i64>;
}

impl DailyActivitySource for ActivityLogRepository {
    fn counts_by_day(
        &self,
        project_id: &ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        utc_offset: FixedOffset,
    ) -> BTreeMap<NaiveDate, i64> {
        self.daily_counts(project_id, start, end, utc_offset)
            .into_iter()
            .map(|c| (c.day, c.count))
            .collect()
    }
}

impl<S: DailyActivitySource + ?Sized> DailyActivitySource for &S {
    fn counts_by_day(
        &self,
        project_id: &ProjectId,
        start: NaiveDate,
        end: NaiveDate,
        utc_offset: FixedOffset,
    ) -> BTreeMap<NaiveDate, i64> {
        (**self).counts_by_day(project_id, start, end, utc_offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    /// ISO weeks, starting Monday.
    Weekly,
    /// 14-day spans anchored at the range start.
    Biweekly,
}

/// One bar of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub bucket_start: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Offset in which timestamps are assigned to calendar days.
    pub utc_offset: FixedOffset,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl AggregatorConfig {
    /// Config for an offset in seconds east of UTC. Out-of-range offsets
    /// fall back to UTC.
    pub fn with_offset_seconds(seconds: i32) -> Self {
        match FixedOffset::east_opt(seconds) {
            Some(utc_offset) => Self { utc_offset },
            None => {
                warn!(seconds, "Invalid UTC offset, using UTC");
                Self::default()
            }
        }
    }
}

/// Folds sparse daily counts into gap-free series. Holds no state between
/// calls; identical arguments give identical output.
#[derive(Debug, Clone)]
pub struct ActivityAggregator<S> {
    source: S,
    config: AggregatorConfig,
}

impl<S: DailyActivitySource> ActivityAggregator<S> {
    pub fn new(source: S, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Today's date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.config.utc_offset).date_naive()
    }

    /// One point per day in range, zero-filled.
    pub fn daily_activity_counts(
        &self,
        project_id: &ProjectId,
        range: ActivityRange,
    ) -> Vec<ActivityPoint> {
        self.aggregate(project_id, range, Granularity::Daily)
    }

    /// One point per ISO week touching the range, zero-filled.
    pub fn weekly_activity_counts(
        &self,
        project_id: &ProjectId,
        range: ActivityRange,
    ) -> Vec<ActivityPoint> {
        self.aggregate(project_id, range, Granularity::Weekly)
    }

    /// One point per 14-day span from the range start. The last span may
    /// run past the range end; it only counts days inside the range.
    pub fn biweekly_activity_counts(
        &self,
        project_id: &ProjectId,
        range: ActivityRange,
    ) -> Vec<ActivityPoint> {
        self.aggregate(project_id, range, Granularity::Biweekly)
    }

    /// Aggregate with "last N" shorthands resolved against the current day.
    pub fn aggregate(
        &self,
        project_id: &ProjectId,
        range: ActivityRange,
        granularity: Granularity,
    ) -> Vec<ActivityPoint> {
        self.aggregate_at(project_id, range, granularity, self.today())
    }

    /// Aggregate with shorthands resolved against an explicit `today`.
    pub fn aggregate_at(
        &self,
        project_id: &ProjectId,
        range: ActivityRange,
        granularity: Granularity,
        today: NaiveDate,
    ) -> Vec<ActivityPoint> {
        let Some(span) = range.resolve(today) else {
            debug!(?range, "Empty activity range");
            return Vec::new();
        };
        let sparse =
            self.source
                .counts_by_day(project_id, span.start, span.end, self.config.utc_offset);
        let points = match granularity {
            Granularity::Daily => daily_buckets(&span, &sparse),
            Granularity::Weekly => weekly_buckets(&span, &sparse),
            Granularity::Biweekly => biweekly_buckets(&span, &sparse),
        };
        debug!(
            %project_id,
            ?granularity,
            start = %span.start,
            end = %span.end,
            buckets = points.len(),
            "Activity aggregated"
        );
        points
    }
}

fn daily_buckets(span: &DateSpan, sparse: &BTreeMap<NaiveDate, i64>) -> Vec<ActivityPoint> {
    span.days()
        .map(|day| ActivityPoint {
            bucket_start: day,
            count: sparse.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Monday of the ISO week containing `day`.
fn week_start(day: NaiveDate) -> NaiveDate {
    let back = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

fn weekly_buckets(span: &DateSpan, sparse: &BTreeMap<NaiveDate, i64>) -> Vec<ActivityPoint> {
    let first = week_start(span.start);
    let Some(last_day) = span.end.pred_opt() else {
        return Vec::new();
    };
    let last = week_start(last_day);
    fill_buckets(span, sparse, first, last, 7, week_start)
}

fn biweekly_buckets(span: &DateSpan, sparse: &BTreeMap<NaiveDate, i64>) -> Vec<ActivityPoint> {
    let anchor = span.start;
    let bucket_of = |day: NaiveDate| {
        let offset = (day - anchor).num_days().max(0) as u64;
        let whole = offset / BIWEEKLY_DAYS * BIWEEKLY_DAYS;
        anchor.checked_add_days(Days::new(whole)).unwrap_or(anchor)
    };
    let Some(last_day) = span.end.pred_opt() else {
        return Vec::new();
    };
    let last = bucket_of(last_day);
    fill_buckets(span, sparse, anchor, last, BIWEEKLY_DAYS, bucket_of)
}

/// Zero-filled buckets `first, first + width, ..., last`, then add every
/// in-range count to the bucket `bucket_of` assigns it.
fn fill_buckets(
    span: &DateSpan,
    sparse: &BTreeMap<NaiveDate, i64>,
    first: NaiveDate,
    last: NaiveDate,
    width: u64,
    bucket_of: impl Fn(NaiveDate) -> NaiveDate,
) -> Vec<ActivityPoint> {
    let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor.filter(|d| *d <= last) {
        buckets.insert(start, 0);
        cursor = start.checked_add_days(Days::new(width));
    }
    for (day, count) in sparse.range(span.start..span.end) {
        if let Some(total) = buckets.get_mut(&bucket_of(*day)) {
            *total += count;
        }
    }
    buckets
        .into_iter()
        .map(|(bucket_start, count)| ActivityPoint {
            bucket_start,
            count,
        })
        .collect()
}
