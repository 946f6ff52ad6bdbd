use crate::models::{
    CategoryTotals, HistoryCategory, StatsResponse, StreakPoint, TrackerState, XpDayPoint,
};
use crate::streak;
use chrono::{Duration, NaiveDate};

pub fn build_stats_at(today: NaiveDate, state: &TrackerState) -> StatsResponse {
    let mut streaks: Vec<StreakPoint> = state
        .habits
        .iter()
        .map(|habit| StreakPoint {
            name: habit.name.clone(),
            streak: habit.streak,
            completed_today: streak::is_completed_today(habit, today),
        })
        .collect();
    streaks.sort_by(|a, b| b.streak.cmp(&a.streak).then_with(|| a.name.cmp(&b.name)));

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let xp = state
            .history
            .iter()
            .filter(|entry| entry.date == date)
            .map(|entry| entry.xp_awarded)
            .sum();
        last_7_days.push(XpDayPoint {
            date: date.to_string(),
            xp,
        });
    }

    let totals = CategoryTotals {
        habits: count_category(state, HistoryCategory::Habit),
        tasks: count_category(state, HistoryCategory::Task),
        focus_sessions: count_category(state, HistoryCategory::FocusSession),
    };

    StatsResponse {
        streaks,
        last_7_days,
        totals,
        total_xp: state.total_xp,
        level: state.level,
    }
}

fn count_category(state: &TrackerState, category: HistoryCategory) -> u64 {
    state
        .history
        .iter()
        .filter(|entry| entry.category == category)
        .count() as u64
}
