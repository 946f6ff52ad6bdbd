use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Overview {
    date: String,
    habits: Vec<HabitView>,
    tasks: Vec<TaskView>,
    total_xp: u64,
    level: u64,
    xp_into_level: u64,
    developer_mode: bool,
}

#[derive(Debug, Deserialize)]
struct HabitView {
    name: String,
    streak: u64,
    completed_today: bool,
}

#[derive(Debug, Deserialize)]
struct TaskView {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Stats {
    streaks: Vec<StreakPoint>,
    last_7_days: Vec<XpDayPoint>,
    totals: Totals,
}

#[derive(Debug, Deserialize)]
struct StreakPoint {
    name: String,
    streak: u64,
}

#[derive(Debug, Deserialize)]
struct XpDayPoint {
    xp: u64,
}

#[derive(Debug, Deserialize)]
struct Totals {
    habits: u64,
    tasks: u64,
    focus_sessions: u64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "habit_tracker_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/overview")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server_at(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server_at(&unique_data_path()).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_overview(client: &Client, base_url: &str) -> Overview {
    client
        .get(format!("{base_url}/api/overview"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post(client: &Client, base_url: &str, path: &str, body: serde_json::Value) -> Overview {
    let response = client
        .post(format!("{base_url}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "POST {path} failed");
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_habit_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("read");

    let before = get_overview(&client, &server.base_url).await;

    let added = post(
        &client,
        &server.base_url,
        "/api/habits",
        serde_json::json!({ "name": name }),
    )
    .await;
    let habit = added.habits.iter().find(|h| h.name == name).unwrap();
    assert_eq!(habit.streak, 0);
    assert!(!habit.completed_today);

    let completed = post(
        &client,
        &server.base_url,
        "/api/habits/complete",
        serde_json::json!({ "name": name }),
    )
    .await;
    let habit = completed.habits.iter().find(|h| h.name == name).unwrap();
    assert_eq!(habit.streak, 1);
    assert!(habit.completed_today);
    assert_eq!(completed.total_xp, before.total_xp + 25);
    assert_eq!(completed.level, completed.total_xp / 100 + 1);
    assert_eq!(completed.xp_into_level, completed.total_xp % 100);
    assert!(!completed.date.is_empty());

    let repeated = post(
        &client,
        &server.base_url,
        "/api/habits/complete",
        serde_json::json!({ "name": name }),
    )
    .await;
    let habit = repeated.habits.iter().find(|h| h.name == name).unwrap();
    assert_eq!(habit.streak, 1);
    assert_eq!(repeated.total_xp, completed.total_xp);

    let deleted = post(
        &client,
        &server.base_url,
        "/api/habits/delete",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert!(deleted.habits.iter().all(|h| h.name != name));
}

#[tokio::test]
async fn http_task_lifecycle_reaches_history() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("task");

    let before = get_overview(&client, &server.base_url).await;

    let added = post(
        &client,
        &server.base_url,
        "/api/tasks",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert!(added.tasks.iter().any(|t| t.name == name));

    let completed = post(
        &client,
        &server.base_url,
        "/api/tasks/complete",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert!(completed.tasks.iter().all(|t| t.name != name));
    assert_eq!(completed.total_xp, before.total_xp + 10);

    let stats: Stats = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(stats.totals.tasks >= 1);
    assert_eq!(stats.last_7_days.len(), 7);
    assert!(stats.last_7_days.iter().map(|d| d.xp).sum::<u64>() >= 10);
}

#[tokio::test]
async fn http_focus_completion_awards_xp() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_overview(&client, &server.base_url).await;

    let after = post(
        &client,
        &server.base_url,
        "/api/focus/complete",
        serde_json::json!({ "minutes": 25 }),
    )
    .await;
    assert_eq!(after.total_xp, before.total_xp + 15);

    let stats: Stats = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(stats.totals.focus_sessions >= 1);
}

#[tokio::test]
async fn http_rejects_invalid_commands_without_breaking_the_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for (path, body) in [
        ("/api/habits", serde_json::json!({ "name": "   " })),
        ("/api/tasks", serde_json::json!({ "name": "" })),
        ("/api/focus/complete", serde_json::json!({ "minutes": 0 })),
        ("/api/focus/complete", serde_json::json!({ "minutes": 121 })),
    ] {
        let response = client
            .post(format!("{}{path}", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status().as_u16(),
            400,
            "POST {path} should be rejected"
        );
    }

    // the session stays usable after declined commands
    let overview = get_overview(&client, &server.base_url).await;
    assert!(!overview.date.is_empty());
}

#[tokio::test]
async fn http_reset_restores_defaults() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post(
        &client,
        &server.base_url,
        "/api/habits",
        serde_json::json!({ "name": unique_name("doomed") }),
    )
    .await;

    let after = post(
        &client,
        &server.base_url,
        "/api/reset",
        serde_json::json!({}),
    )
    .await;
    assert!(after.habits.is_empty());
    assert!(after.tasks.is_empty());
    assert_eq!(after.total_xp, 0);
    assert_eq!(after.level, 1);
    assert!(!after.developer_mode);
}

#[tokio::test]
async fn http_export_returns_state_json() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .get("content-disposition")
            .is_some_and(|v| v.to_str().unwrap().contains("attachment"))
    );

    let exported: serde_json::Value = response.json().await.unwrap();
    assert!(exported.get("habits").is_some());
    assert!(exported.get("schema_version").is_some());
}

#[tokio::test]
async fn http_state_survives_restart() {
    let _guard = TEST_LOCK.lock().await;
    let data_path = unique_data_path();
    let client = Client::new();
    let name = unique_name("persist");

    {
        let server = spawn_server_at(&data_path).await;
        post(
            &client,
            &server.base_url,
            "/api/habits",
            serde_json::json!({ "name": name }),
        )
        .await;
        post(
            &client,
            &server.base_url,
            "/api/habits/complete",
            serde_json::json!({ "name": name }),
        )
        .await;
    }

    let server = spawn_server_at(&data_path).await;
    let overview = get_overview(&client, &server.base_url).await;
    let habit = overview.habits.iter().find(|h| h.name == name).unwrap();
    assert_eq!(habit.streak, 1);
    assert!(habit.completed_today);
    assert_eq!(overview.total_xp, 25);
    assert_eq!(overview.level, 1);

    let stats: Stats = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.streaks.len(), 1);
    assert_eq!(stats.streaks[0].name, name);
    assert_eq!(stats.streaks[0].streak, 1);
    assert_eq!(stats.totals.habits, 1);
}
