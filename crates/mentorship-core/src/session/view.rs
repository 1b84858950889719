use chrono::{DateTime, Utc};
use serde::Serialize;

/// A participant resolved from a session's allocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A mentor's session with its participants resolved to people.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub venue: String,
    pub datetime: DateTime<Utc>,
    pub students: Vec<StudentInfo>,
}
