use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DailySummaryResponse {
    date: String,
    merit: u64,
    demerit: u64,
    net: i64,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    id: String,
    date: String,
    kind: String,
    points: u32,
    signed_points: i64,
}

#[derive(Debug, Deserialize)]
struct CreatedEntryResponse {
    entry: EntryResponse,
    summary: DailySummaryResponse,
}

#[derive(Debug, Deserialize)]
struct DeletedEntryResponse {
    deleted: EntryResponse,
    summary: DailySummaryResponse,
}

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    date: String,
    entries: Vec<EntryResponse>,
    summary: DailySummaryResponse,
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    month: String,
    prev_month: String,
    next_month: String,
    selected: String,
    cells: Vec<Value>,
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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_merit_ledger"))
        .env("PORT", port.to_string())
        .env("APP_SEED_SAMPLE", "false")
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
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post_entry(
    client: &Client,
    base_url: &str,
    date: &str,
    kind: &str,
    points: u32,
) -> CreatedEntryResponse {
    let response = client
        .post(format!("{base_url}/api/entries"))
        .json(&serde_json::json!({
            "date": date,
            "kind": kind,
            "title": format!("{kind} worth {points}"),
            "points": points,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_entries_update_daily_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let date = "2031-05-14";

    post_entry(&client, &server.base_url, date, "merit", 5).await;
    post_entry(&client, &server.base_url, date, "merit", 3).await;
    let demerit = post_entry(&client, &server.base_url, date, "demerit", 2).await;

    assert_eq!(demerit.entry.date, date);
    assert_eq!(demerit.entry.kind, "demerit");
    assert_eq!(demerit.entry.signed_points, -2);
    assert_eq!(demerit.summary.merit, 8);
    assert_eq!(demerit.summary.demerit, 2);
    assert_eq!(demerit.summary.net, 6);

    let deleted: DeletedEntryResponse = client
        .delete(format!("{}/api/entries/{}", server.base_url, demerit.entry.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted.deleted.id, demerit.entry.id);
    assert_eq!(deleted.deleted.points, 2);
    assert_eq!(deleted.summary.date, date);
    assert_eq!(deleted.summary.merit, 8);
    assert_eq!(deleted.summary.demerit, 0);

    let listed: EntriesResponse = client
        .get(format!("{}/api/entries?date={date}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.date, date);
    assert_eq!(listed.entries.len(), 2);
    assert!(listed.entries.iter().all(|entry| entry.kind == "merit"));
    assert_eq!(listed.summary.net, 8);
}

#[tokio::test]
async fn http_calendar_lays_out_month() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_entry(&client, &server.base_url, "2025-03-10", "merit", 4).await;

    let calendar: CalendarResponse = client
        .get(format!(
            "{}/api/calendar?month=2025-03&selected=2025-03-10",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(calendar.month, "2025-03");
    assert_eq!(calendar.prev_month, "2025-02");
    assert_eq!(calendar.next_month, "2025-04");
    assert_eq!(calendar.selected, "2025-03-10");
    assert_eq!(calendar.cells.len(), 37);
    assert!(calendar.cells[..6].iter().all(|cell| cell["type"] == "blank"));

    let selected: Vec<&Value> = calendar
        .cells
        .iter()
        .filter(|cell| cell["is_selected"] == true)
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["day"], 10);
    assert_eq!(selected[0]["summary"]["merit"], 4);

    let january: CalendarResponse = client
        .get(format!("{}/api/calendar?month=2026-01", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(january.prev_month, "2025-12");
}

#[tokio::test]
async fn http_rejects_invalid_requests() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let zero_points = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({
            "date": "2031-06-01",
            "kind": "merit",
            "title": "nothing",
            "points": 0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(zero_points.status(), StatusCode::BAD_REQUEST);

    let bad_kind = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({
            "kind": "bonus",
            "title": "mystery",
            "points": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_kind.status(), StatusCode::BAD_REQUEST);

    let bad_month = client
        .get(format!("{}/api/calendar?month=2026-13", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_month.status(), StatusCode::BAD_REQUEST);

    let missing = client
        .delete(format!("{}/api/entries/does-not-exist", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let untouched: EntriesResponse = client
        .get(format!("{}/api/entries?date=2031-06-01", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(untouched.entries.is_empty());
    assert_eq!(untouched.summary.merit, 0);
    assert_eq!(untouched.summary.demerit, 0);
}
