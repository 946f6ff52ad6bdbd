use serde_json::{Map, Value};

pub const CURRENT_VERSION: u64 = 4;

// Historical blobs were written without a version tag; the shape tells the
// versions apart:
//   v1: habits + total_xp + level
//   v2: adds tasks
//   v3: adds history (entries keyed "item_name") and dev_mode
//   v4: developer_mode, history entries keyed "name", null for never-completed
pub fn run(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    let mut version = detect_version(map);
    while version < CURRENT_VERSION {
        match version {
            1 => v1_to_v2(map),
            2 => v2_to_v3(map),
            3 => v3_to_v4(map),
            _ => {}
        }
        version += 1;
    }
    map.insert("schema_version".to_string(), Value::from(CURRENT_VERSION));
}

fn detect_version(map: &Map<String, Value>) -> u64 {
    if let Some(version) = map.get("schema_version").and_then(Value::as_u64) {
        return version.min(CURRENT_VERSION);
    }
    if map.contains_key("developer_mode") {
        4
    } else if map.contains_key("history") || map.contains_key("dev_mode") {
        3
    } else if map.contains_key("tasks") {
        2
    } else {
        1
    }
}

fn v1_to_v2(map: &mut Map<String, Value>) {
    map.entry("tasks").or_insert_with(|| Value::Array(Vec::new()));
}

fn v2_to_v3(map: &mut Map<String, Value>) {
    map.entry("history")
        .or_insert_with(|| Value::Array(Vec::new()));
    map.entry("dev_mode").or_insert(Value::Bool(false));
}

fn v3_to_v4(map: &mut Map<String, Value>) {
    let dev_mode = map.remove("dev_mode").unwrap_or(Value::Bool(false));
    map.entry("developer_mode").or_insert(dev_mode);

    if let Some(Value::Array(entries)) = map.get_mut("history") {
        for entry in entries.iter_mut() {
            if let Value::Object(entry) = entry {
                if let Some(name) = entry.remove("item_name") {
                    entry.entry("name").or_insert(name);
                }
            }
        }
    }

    if let Some(Value::Array(habits)) = map.get_mut("habits") {
        for habit in habits.iter_mut() {
            if let Value::Object(habit) = habit {
                if habit.get("last_completed_date") == Some(&Value::String(String::new())) {
                    habit.insert("last_completed_date".to_string(), Value::Null);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryCategory, TrackerState};
    use serde_json::json;

    fn load(mut value: Value) -> TrackerState {
        run(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn v1_blob_backfills_tasks_history_and_developer_mode() {
        let state = load(json!({
            "habits": [
                {"name": "Read", "streak": 4, "last_completed_date": "2024-01-01"}
            ],
            "total_xp": 75,
            "level": 1
        }));

        assert_eq!(state.schema_version, CURRENT_VERSION);
        assert_eq!(state.habits.len(), 1);
        assert_eq!(state.habits[0].streak, 4);
        assert_eq!(state.total_xp, 75);
        assert!(state.tasks.is_empty());
        assert!(state.history.is_empty());
        assert!(!state.developer_mode);
    }

    #[test]
    fn v2_blob_missing_history_and_dev_mode_keeps_existing_data() {
        let state = load(json!({
            "habits": [
                {"name": "Read", "streak": 2, "last_completed_date": "2024-01-01"}
            ],
            "tasks": [{"name": "Renew passport"}],
            "total_xp": 50,
            "level": 1
        }));

        assert_eq!(state.habits[0].name, "Read");
        assert_eq!(state.habits[0].streak, 2);
        assert_eq!(state.tasks[0].name, "Renew passport");
        assert_eq!(state.total_xp, 50);
        assert!(state.history.is_empty());
        assert!(!state.developer_mode);
    }

    #[test]
    fn v3_dev_mode_is_renamed() {
        let state = load(json!({
            "habits": [],
            "tasks": [],
            "total_xp": 0,
            "level": 1,
            "history": [],
            "dev_mode": true
        }));
        assert!(state.developer_mode);
    }

    #[test]
    fn v3_history_item_name_is_renamed() {
        let state = load(json!({
            "habits": [],
            "tasks": [],
            "total_xp": 25,
            "level": 1,
            "history": [
                {"item_name": "Read", "date": "2024-01-01", "category": "habit", "xp_awarded": 25}
            ],
            "dev_mode": false
        }));

        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].name, "Read");
        assert_eq!(state.history[0].category, HistoryCategory::Habit);
    }

    #[test]
    fn empty_string_dates_become_null() {
        let state = load(json!({
            "habits": [
                {"name": "Read", "streak": 0, "last_completed_date": ""}
            ],
            "total_xp": 0,
            "level": 1
        }));
        assert_eq!(state.habits[0].last_completed_date, None);
    }

    #[test]
    fn current_blob_passes_through_unchanged() {
        let original = json!({
            "schema_version": CURRENT_VERSION,
            "habits": [
                {"name": "Read", "streak": 2, "last_completed_date": "2024-01-02"}
            ],
            "tasks": [{"name": "Renew passport"}],
            "total_xp": 60,
            "level": 1,
            "history": [],
            "developer_mode": true
        });

        let mut migrated = original.clone();
        run(&mut migrated);
        assert_eq!(migrated, original);
    }

    #[test]
    fn untagged_v4_shape_only_gains_the_version_tag() {
        let mut value = json!({
            "habits": [],
            "tasks": [],
            "total_xp": 0,
            "level": 1,
            "history": [],
            "developer_mode": true
        });
        run(&mut value);

        assert_eq!(value["schema_version"], json!(CURRENT_VERSION));
        assert_eq!(value["developer_mode"], json!(true));
    }

    #[test]
    fn version_tags_newer_than_current_are_clamped() {
        let mut value = json!({
            "schema_version": 99,
            "habits": [],
            "tasks": [],
            "total_xp": 0,
            "level": 1,
            "history": [],
            "developer_mode": false
        });
        run(&mut value);
        assert_eq!(value["schema_version"], json!(CURRENT_VERSION));
    }
}
