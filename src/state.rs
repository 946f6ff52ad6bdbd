use crate::config::XpConfig;
use crate::models::TrackerState;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub xp: XpConfig,
    pub data: Arc<Mutex<TrackerState>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, xp: XpConfig, data: TrackerState) -> Self {
        Self {
            data_path,
            xp,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
