use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::migrate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub streak: u64,
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCategory {
    Habit,
    Task,
    FocusSession,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub date: NaiveDate,
    pub category: HistoryCategory,
    pub xp_awarded: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    #[serde(default = "current_schema_version")]
    pub schema_version: u64,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default = "default_level")]
    pub level: u64,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub developer_mode: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            schema_version: migrate::CURRENT_VERSION,
            habits: Vec::new(),
            tasks: Vec::new(),
            total_xp: 0,
            level: 1,
            history: Vec::new(),
            developer_mode: false,
        }
    }
}

fn current_schema_version() -> u64 {
    migrate::CURRENT_VERSION
}

fn default_level() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub minutes: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HabitView {
    pub name: String,
    pub streak: u64,
    pub completed_today: bool,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub date: String,
    pub habits: Vec<HabitView>,
    pub tasks: Vec<Task>,
    pub total_xp: u64,
    pub level: u64,
    pub xp_into_level: u64,
    pub developer_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct StreakPoint {
    pub name: String,
    pub streak: u64,
    pub completed_today: bool,
}

#[derive(Debug, Serialize)]
pub struct XpDayPoint {
    pub date: String,
    pub xp: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoryTotals {
    pub habits: u64,
    pub tasks: u64,
    pub focus_sessions: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub streaks: Vec<StreakPoint>,
    pub last_7_days: Vec<XpDayPoint>,
    pub totals: CategoryTotals,
    pub total_xp: u64,
    pub level: u64,
}
