use time::{Date, Month, OffsetDateTime};

use crate::complaints::repo::ComplaintStatus;
use crate::stats::dto::{ActivityEntry, ActivityKind, ChartPoint};
use crate::stats::repo::{MonthRow, RecentComplaint, RecentUser};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How many trailing months the dashboard chart covers, current month included.
pub const SERIES_MONTHS: u32 = 6;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
}

pub fn fold_status_counts(rows: &[(String, i64)]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for (status, n) in rows {
        counts.total += n;
        match status.as_str() {
            "pending" => counts.pending += n,
            "in_progress" => counts.in_progress += n,
            "resolved" => counts.resolved += n,
            "rejected" => counts.rejected += n,
            _ => {}
        }
    }
    counts
}

/// `(year, month)` of the calendar month `back` months before the given one.
fn months_back(year: i32, month: u8, back: u32) -> (i32, u8) {
    let mut y = year;
    let mut m = month as i32 - back as i32;
    while m < 1 {
        m += 12;
        y -= 1;
    }
    (y, m as u8)
}

/// First instant of the earliest month the series displays; rows older than
/// this cannot land in any visible bucket.
pub fn series_start(now: OffsetDateTime) -> OffsetDateTime {
    let (year, month) = months_back(now.year(), u8::from(now.month()), SERIES_MONTHS - 1);
    let month = Month::try_from(month).unwrap_or(Month::January);
    Date::from_calendar_date(year, month, 1)
        .unwrap_or(now.date())
        .midnight()
        .assume_utc()
}

/// Builds the six-entry series ending at the current month, zero-filling
/// months with no complaints.
pub fn build_month_series(now: OffsetDateTime, rows: &[MonthRow]) -> Vec<ChartPoint> {
    let year = now.year();
    let month = u8::from(now.month());

    (0..SERIES_MONTHS)
        .rev()
        .map(|back| {
            let (y, m) = months_back(year, month, back);
            let found = rows.iter().find(|r| r.year == y && r.month == m as i32);
            ChartPoint {
                name: MONTH_LABELS[(m - 1) as usize].to_string(),
                complaints: found.map_or(0, |r| r.complaints),
                resolved: found.map_or(0, |r| r.resolved),
            }
        })
        .collect()
}

/// Coarse human label for how long ago something happened.
pub fn relative_age(now: OffsetDateTime, then: OffsetDateTime) -> String {
    let elapsed = now - then;
    let days = elapsed.whole_days();
    let hours = elapsed.whole_hours();
    let minutes = elapsed.whole_minutes();

    if days > 0 {
        format!("{days} days ago")
    } else if hours > 0 {
        format!("{hours} hours ago")
    } else if minutes > 0 {
        format!("{minutes} minutes ago")
    } else {
        "just now".to_string()
    }
}

/// Merges recent complaint activity with recent registrations into one feed,
/// most recent first, capped at eight entries. Rejected complaints carry no
/// feed message and are skipped.
pub fn build_activity_feed(
    now: OffsetDateTime,
    complaints: &[RecentComplaint],
    users: &[RecentUser],
) -> Vec<ActivityEntry> {
    let mut timed: Vec<(OffsetDateTime, ActivityEntry)> = Vec::new();

    for c in complaints {
        let (kind, message) = match c.status {
            ComplaintStatus::Pending => (
                ActivityKind::New,
                format!("New complaint received - {}", c.title),
            ),
            ComplaintStatus::InProgress => (
                ActivityKind::Update,
                format!("Complaint \"{}\" moved to in progress", c.title),
            ),
            ComplaintStatus::Resolved => (
                ActivityKind::Resolved,
                format!("Complaint \"{}\" has been resolved", c.title),
            ),
            ComplaintStatus::Rejected => continue,
        };
        timed.push((
            c.updated_at,
            ActivityEntry {
                kind,
                message,
                time: relative_age(now, c.updated_at),
            },
        ));
    }

    for u in users {
        timed.push((
            u.created_at,
            ActivityEntry {
                kind: ActivityKind::User,
                message: format!("New user registered: {}", u.name),
                time: relative_age(now, u.created_at),
            },
        ));
    }

    timed.sort_by(|a, b| b.0.cmp(&a.0));
    timed.into_iter().take(8).map(|(_, e)| e).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn complaint(title: &str, status: ComplaintStatus, updated_at: OffsetDateTime) -> RecentComplaint {
        RecentComplaint {
            title: title.into(),
            status,
            updated_at,
        }
    }

    #[test]
    fn folds_known_status_distribution_exactly() {
        let rows = vec![
            ("pending".to_string(), 4),
            ("in_progress".to_string(), 2),
            ("resolved".to_string(), 7),
            ("rejected".to_string(), 1),
        ];
        let counts = fold_status_counts(&rows);
        assert_eq!(
            counts,
            StatusCounts {
                total: 14,
                pending: 4,
                in_progress: 2,
                resolved: 7,
                rejected: 1,
            }
        );
    }

    #[test]
    fn empty_distribution_is_all_zero() {
        assert_eq!(fold_status_counts(&[]), StatusCounts::default());
    }

    #[test]
    fn month_series_covers_trailing_six_months_with_zero_fill() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let rows = vec![
            MonthRow { year: 2026, month: 8, complaints: 3, resolved: 1 },
            MonthRow { year: 2026, month: 5, complaints: 2, resolved: 2 },
        ];
        let series = build_month_series(now, &rows);
        assert_eq!(series.len(), 6);
        let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mar", "Apr", "May", "Jun", "Jul", "Aug"]);
        assert_eq!(series[2].complaints, 2);
        assert_eq!(series[2].resolved, 2);
        assert_eq!(series[5].complaints, 3);
        assert_eq!(series[5].resolved, 1);
        // untouched months are zero, not missing
        assert_eq!(series[0].complaints, 0);
        assert_eq!(series[3].complaints, 0);
    }

    #[test]
    fn month_series_crosses_year_boundary() {
        let now = datetime!(2026-01-15 00:00 UTC);
        let rows = vec![MonthRow { year: 2025, month: 12, complaints: 5, resolved: 3 }];
        let series = build_month_series(now, &rows);
        let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Aug", "Sep", "Oct", "Nov", "Dec", "Jan"]);
        assert_eq!(series[4].complaints, 5);
    }

    #[test]
    fn series_start_is_first_day_of_earliest_month() {
        let now = datetime!(2026-08-26 12:00 UTC);
        assert_eq!(series_start(now), datetime!(2026-03-01 00:00 UTC));
        let january = datetime!(2026-01-02 00:00 UTC);
        assert_eq!(series_start(january), datetime!(2025-08-01 00:00 UTC));
    }

    #[test]
    fn relative_age_picks_the_coarsest_unit() {
        let now = datetime!(2026-08-26 12:00 UTC);
        assert_eq!(relative_age(now, now), "just now");
        assert_eq!(
            relative_age(now, datetime!(2026-08-26 11:45 UTC)),
            "15 minutes ago"
        );
        assert_eq!(
            relative_age(now, datetime!(2026-08-26 09:00 UTC)),
            "3 hours ago"
        );
        assert_eq!(
            relative_age(now, datetime!(2026-08-22 12:00 UTC)),
            "4 days ago"
        );
    }

    #[test]
    fn feed_classifies_and_sorts_most_recent_first() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let complaints = vec![
            complaint("Outage block C", ComplaintStatus::Pending, datetime!(2026-08-26 11:00 UTC)),
            complaint("Billing errors", ComplaintStatus::Resolved, datetime!(2026-08-26 10:00 UTC)),
            complaint("Meter install", ComplaintStatus::InProgress, datetime!(2026-08-25 09:00 UTC)),
            complaint("Spam", ComplaintStatus::Rejected, datetime!(2026-08-26 11:30 UTC)),
        ];
        let users = vec![RecentUser {
            name: "Dewi".into(),
            created_at: datetime!(2026-08-26 10:30 UTC),
        }];

        let feed = build_activity_feed(now, &complaints, &users);
        // rejected complaint is skipped
        assert_eq!(feed.len(), 4);
        assert_eq!(feed[0].kind, ActivityKind::New);
        assert!(feed[0].message.contains("Outage block C"));
        assert_eq!(feed[1].kind, ActivityKind::User);
        assert!(feed[1].message.contains("Dewi"));
        assert_eq!(feed[2].kind, ActivityKind::Resolved);
        assert_eq!(feed[3].kind, ActivityKind::Update);
    }

    #[test]
    fn feed_is_truncated_to_eight_entries() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let complaints: Vec<_> = (0..10)
            .map(|i| {
                complaint(
                    &format!("Complaint {i}"),
                    ComplaintStatus::Pending,
                    now - time::Duration::minutes(i as i64),
                )
            })
            .collect();
        let users: Vec<_> = (0..5)
            .map(|i| RecentUser {
                name: format!("User {i}"),
                created_at: now - time::Duration::hours(i as i64),
            })
            .collect();

        let feed = build_activity_feed(now, &complaints, &users);
        assert_eq!(feed.len(), 8);
    }
}
