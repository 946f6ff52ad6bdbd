use crate::errors::AppError;
use crate::migrate;
use crate::models::TrackerState;
use crate::progress;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

pub async fn load_state(path: &Path) -> TrackerState {
    match fs::read(path).await {
        Ok(bytes) => parse_state(&bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => TrackerState::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            TrackerState::default()
        }
    }
}

pub fn parse_state(bytes: &[u8]) -> TrackerState {
    let mut value = match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to parse data file: {err}");
            return TrackerState::default();
        }
    };

    migrate::run(&mut value);

    match serde_json::from_value::<TrackerState>(value) {
        Ok(mut state) => {
            // level is derived; never trust the stored value
            state.level = progress::level_for(state.total_xp);
            state
        }
        Err(err) => {
            error!("data file does not match any known schema: {err}");
            TrackerState::default()
        }
    }
}

pub async fn persist_state(path: &Path, state: &TrackerState) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(state).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
