use serde::Serialize;

/// Everything the admin dashboard renders, recomputed on every request.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_complaints: i64,
    pub pending_complaints: i64,
    pub in_progress_complaints: i64,
    pub resolved_complaints: i64,
    pub rejected_complaints: i64,
    pub total_users: i64,
    pub chart_data: Vec<ChartPoint>,
    pub recent_activities: Vec<ActivityEntry>,
}

/// One month of the trailing six-month series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub complaints: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    New,
    Update,
    Resolved,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub time: String,
}
