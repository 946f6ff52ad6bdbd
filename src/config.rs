use std::env;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpConfig {
    pub habit: u64,
    pub task: u64,
    pub focus: u64,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            habit: 25,
            task: 10,
            focus: 15,
        }
    }
}

impl XpConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            habit: read_amount("HABIT_XP", defaults.habit),
            task: read_amount("TASK_XP", defaults.task),
            focus: read_amount("FOCUS_XP", defaults.focus),
        }
    }
}

fn read_amount(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(amount) => amount,
            Err(_) => {
                warn!("ignoring {key}={raw}: expected a non-negative integer");
                default
            }
        },
        Err(_) => default,
    }
}
