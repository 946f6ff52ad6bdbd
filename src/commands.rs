use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Habit, HistoryCategory, HistoryEntry, Task, TrackerState};
use crate::progress::{self, Progress};
use crate::streak;

pub const MIN_FOCUS_MINUTES: u64 = 1;
pub const MAX_FOCUS_MINUTES: u64 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("'{0}' already exists")]
    DuplicateName(String),
    #[error("minutes must be between 1 and 120, got {0}")]
    MinutesOutOfRange(u64),
}

pub fn add_habit(state: &TrackerState, name: &str) -> Result<TrackerState, CommandError> {
    let name = valid_name(name)?;
    if state.habits.iter().any(|habit| habit.name == name) {
        return Err(CommandError::DuplicateName(name));
    }

    let mut next = state.clone();
    next.habits.push(Habit {
        name,
        streak: 0,
        last_completed_date: None,
    });
    Ok(next)
}

pub fn complete_habit(
    state: &TrackerState,
    name: &str,
    today: NaiveDate,
    yesterday: NaiveDate,
    xp: u64,
) -> Result<TrackerState, CommandError> {
    let Some(index) = state.habits.iter().position(|habit| habit.name == name) else {
        return Ok(state.clone());
    };
    if streak::is_completed_today(&state.habits[index], today) {
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.habits[index] = streak::complete(&next.habits[index], today, yesterday);
    next.history.push(HistoryEntry {
        name: next.habits[index].name.clone(),
        date: today,
        category: HistoryCategory::Habit,
        xp_awarded: xp,
    });
    apply_award(&mut next, xp);
    Ok(next)
}

pub fn delete_habit(state: &TrackerState, name: &str) -> Result<TrackerState, CommandError> {
    let mut next = state.clone();
    next.habits.retain(|habit| habit.name != name);
    Ok(next)
}

pub fn add_task(state: &TrackerState, name: &str) -> Result<TrackerState, CommandError> {
    let name = valid_name(name)?;
    if state.tasks.iter().any(|task| task.name == name) {
        return Err(CommandError::DuplicateName(name));
    }

    let mut next = state.clone();
    next.tasks.push(Task { name });
    Ok(next)
}

pub fn complete_task(
    state: &TrackerState,
    name: &str,
    today: NaiveDate,
    xp: u64,
) -> Result<TrackerState, CommandError> {
    let Some(index) = state.tasks.iter().position(|task| task.name == name) else {
        return Ok(state.clone());
    };

    let mut next = state.clone();
    let task = next.tasks.remove(index);
    next.history.push(HistoryEntry {
        name: task.name,
        date: today,
        category: HistoryCategory::Task,
        xp_awarded: xp,
    });
    apply_award(&mut next, xp);
    Ok(next)
}

pub fn complete_focus(
    state: &TrackerState,
    minutes: u64,
    today: NaiveDate,
    xp: u64,
) -> Result<TrackerState, CommandError> {
    if !(MIN_FOCUS_MINUTES..=MAX_FOCUS_MINUTES).contains(&minutes) {
        return Err(CommandError::MinutesOutOfRange(minutes));
    }

    let mut next = state.clone();
    next.history.push(HistoryEntry {
        name: format!("{minutes} min focus"),
        date: today,
        category: HistoryCategory::FocusSession,
        xp_awarded: xp,
    });
    apply_award(&mut next, xp);
    Ok(next)
}

pub fn toggle_developer_mode(state: &TrackerState) -> Result<TrackerState, CommandError> {
    let mut next = state.clone();
    next.developer_mode = !next.developer_mode;
    Ok(next)
}

pub fn reset(_state: &TrackerState) -> Result<TrackerState, CommandError> {
    Ok(TrackerState::default())
}

fn valid_name(name: &str) -> Result<String, CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::EmptyName);
    }
    Ok(name.to_string())
}

fn apply_award(state: &mut TrackerState, amount: u64) {
    let awarded = progress::award(
        Progress {
            total_xp: state.total_xp,
            level: state.level,
        },
        amount,
    );
    state.total_xp = awarded.total_xp;
    state.level = awarded.level;
}
