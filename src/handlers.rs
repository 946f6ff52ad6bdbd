use crate::commands::{self, CommandError};
use crate::errors::AppError;
use crate::models::{
    FocusRequest, HabitView, NameRequest, OverviewResponse, PageQuery, StatsResponse, TrackerState,
};
use crate::pages::{self, Page};
use crate::state::AppState;
use crate::stats::build_stats_at;
use crate::storage::persist_state;
use crate::streak;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Duration, Local, NaiveDate};

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let page = query
        .page
        .as_deref()
        .and_then(Page::from_key)
        .unwrap_or(Page::Dashboard);
    let data = state.data.lock().await;
    Html(pages::render(page, &data, today()))
}

pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(overview(&data, today())))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats_at(today(), &data)))
}

pub async fn export_state(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let payload = serde_json::to_string_pretty(&*data).map_err(AppError::internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"habit-tracker-export.json\"",
            ),
        ],
        payload,
    ))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    commit(&state, today(), |data| {
        commands::add_habit(data, &payload.name)
    })
    .await
}

pub async fn complete_habit(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    let today = today();
    let yesterday = today - Duration::days(1);
    let xp = state.xp.habit;
    commit(&state, today, |data| {
        commands::complete_habit(data, &payload.name, today, yesterday, xp)
    })
    .await
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    commit(&state, today(), |data| {
        commands::delete_habit(data, &payload.name)
    })
    .await
}

pub async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    commit(&state, today(), |data| commands::add_task(data, &payload.name)).await
}

pub async fn complete_task(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    let today = today();
    let xp = state.xp.task;
    commit(&state, today, |data| {
        commands::complete_task(data, &payload.name, today, xp)
    })
    .await
}

pub async fn complete_focus(
    State(state): State<AppState>,
    Json(payload): Json<FocusRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    let today = today();
    let xp = state.xp.focus;
    commit(&state, today, |data| {
        commands::complete_focus(data, payload.minutes, today, xp)
    })
    .await
}

pub async fn toggle_developer(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    commit(&state, today(), commands::toggle_developer_mode).await
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<OverviewResponse>, AppError> {
    commit(&state, today(), commands::reset).await
}

async fn commit(
    state: &AppState,
    today: NaiveDate,
    run: impl FnOnce(&TrackerState) -> Result<TrackerState, CommandError>,
) -> Result<Json<OverviewResponse>, AppError> {
    let mut data = state.data.lock().await;
    let next = run(&data)?;
    *data = next;
    // a failed write is surfaced; the in-memory state stays authoritative
    persist_state(&state.data_path, &data).await?;
    Ok(Json(overview(&data, today)))
}

fn overview(state: &TrackerState, today: NaiveDate) -> OverviewResponse {
    OverviewResponse {
        date: today.to_string(),
        habits: state
            .habits
            .iter()
            .map(|habit| HabitView {
                name: habit.name.clone(),
                streak: habit.streak,
                completed_today: streak::is_completed_today(habit, today),
            })
            .collect(),
        tasks: state.tasks.clone(),
        total_xp: state.total_xp,
        level: state.level,
        xp_into_level: state.total_xp % 100,
        developer_mode: state.developer_mode,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
