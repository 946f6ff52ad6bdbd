use chrono::NaiveDate;

use crate::models::Habit;

pub fn complete(habit: &Habit, today: NaiveDate, yesterday: NaiveDate) -> Habit {
    let streak = match habit.last_completed_date {
        Some(date) if date == today => return habit.clone(),
        Some(date) if date == yesterday => habit.streak + 1,
        // gap of two or more days, first-ever completion, or a recorded
        // date in the future (clock skew): the run starts over
        _ => 1,
    };

    Habit {
        name: habit.name.clone(),
        streak,
        last_completed_date: Some(today),
    }
}

pub fn is_completed_today(habit: &Habit, today: NaiveDate) -> bool {
    habit.last_completed_date == Some(today)
}
