//! Per-bill synchronization: fetch stage tree, derive timeline and status,
//! replace what the store holds.

use thiserror::Error;
use tracing::{info, warn};

use sejmoskop_core::{BillStatus, InvalidDateError, StageNode, classify, flatten, sort_by_date};
use sejmoskop_store::{BillStore, StoreError};

use crate::http::{SejmClient, SyncError};

#[derive(Debug, Error)]
pub enum BillSyncError {
    #[error(transparent)]
    Fetch(#[from] SyncError),
    #[error(transparent)]
    Date(#[from] InvalidDateError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a term-wide sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

/// Derive and persist one bill's timeline and status from its stage tree.
///
/// The store's view is replaced wholesale (delete-all, insert-all), never
/// merged — the tree is the complete source of truth for this bill. Runs
/// the derivation before touching the store, so a date-parse failure leaves
/// the previously persisted rows (and status) intact.
pub fn apply_process(
    store: &mut BillStore,
    term: i64,
    number: &str,
    title: &str,
    stages: &[StageNode],
) -> Result<BillStatus, BillSyncError> {
    let events = sort_by_date(flatten(stages))?;
    let status = classify(&events);

    store.upsert_bill(term, number, title)?;
    store.replace_events(term, number, &events)?;
    store.set_status(term, number, status)?;

    info!(term, number, %status, events = events.len(), "bill synced");
    Ok(status)
}

/// Fetch one bill's process from the Sejm API and persist the derivation.
pub async fn sync_bill(
    client: &SejmClient,
    store: &mut BillStore,
    term: i64,
    number: &str,
) -> Result<BillStatus, BillSyncError> {
    let process = client.get_process(term, number).await?;
    let title = process.title.as_deref().unwrap_or("");
    apply_process(store, term, number, title, &process.stages)
}

/// Sync every process of a term.
///
/// A failing bill is logged and counted, never fatal — one bad date or one
/// 404 must not abort the batch. Only the initial listing call can fail the
/// whole pass.
pub async fn sync_term(
    client: &SejmClient,
    store: &mut BillStore,
    term: i64,
) -> Result<SyncReport, BillSyncError> {
    let headers = client.list_processes(term).await?;
    let mut report = SyncReport::default();

    for header in headers {
        let Some(number) = header.number.as_deref() else {
            warn!(term, "process header without a print number, skipping");
            report.failed += 1;
            continue;
        };
        match sync_bill(client, store, term, number).await {
            Ok(_) => report.synced += 1,
            Err(err) => {
                warn!(term, number, %err, "bill sync failed, skipping");
                report.failed += 1;
            }
        }
    }

    info!(term, synced = report.synced, failed = report.failed, "term sync complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sejmoskop_core::Event;

    fn node(name: &str, date: &str) -> StageNode {
        StageNode {
            name: Some(name.into()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    #[test]
    fn apply_persists_sorted_events_and_status() {
        let mut store = BillStore::open().unwrap();
        let mut report = node("Sprawozdanie Komisji", "2024-03-01");
        report.children = vec![node("Podkomisja", "2024-02-15")];
        let stages = vec![node("I czytanie", "2024-01-10"), report];

        let status = apply_process(&mut store, 10, "123", "Ustawa", &stages).unwrap();
        assert_eq!(status, BillStatus::Committee);
        assert_eq!(store.get_status(10, "123").unwrap(), BillStatus::Committee);

        let dates: Vec<String> = store
            .get_events(10, "123")
            .unwrap()
            .into_iter()
            .map(|e| e.event_date)
            .collect();
        assert_eq!(dates, ["2024-01-10", "2024-02-15", "2024-03-01"]);
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let mut store = BillStore::open().unwrap();
        let stages = vec![node("I czytanie", "2024-01-10")];

        apply_process(&mut store, 10, "7", "Ustawa", &stages).unwrap();
        let first: Vec<Event> = store.get_events(10, "7").unwrap();

        apply_process(&mut store, 10, "7", "Ustawa", &stages).unwrap();
        assert_eq!(store.get_events(10, "7").unwrap(), first);
        assert_eq!(store.event_count().unwrap(), 1);
        assert_eq!(store.get_status(10, "7").unwrap(), BillStatus::FirstReading);
    }

    #[test]
    fn empty_tree_yields_submitted_and_no_rows() {
        let mut store = BillStore::open().unwrap();
        let status = apply_process(&mut store, 10, "42", "Ustawa", &[]).unwrap();
        assert_eq!(status, BillStatus::Submitted);
        assert!(store.get_events(10, "42").unwrap().is_empty());
    }

    #[test]
    fn bad_date_leaves_previous_state_untouched() {
        let mut store = BillStore::open().unwrap();
        apply_process(
            &mut store,
            10,
            "9",
            "Ustawa",
            &[node("I czytanie", "2024-01-10")],
        )
        .unwrap();

        let corrupted = vec![
            node("I czytanie", "2024-01-10"),
            node("II czytanie", "wkrótce"),
        ];
        let err = apply_process(&mut store, 10, "9", "Ustawa", &corrupted).unwrap_err();
        assert!(matches!(err, BillSyncError::Date(_)));

        // Stale but consistent: the earlier sync's rows and status survive.
        assert_eq!(store.get_events(10, "9").unwrap().len(), 1);
        assert_eq!(store.get_status(10, "9").unwrap(), BillStatus::FirstReading);
    }

    /// Minimal canned-JSON Sejm API: one good process, one with an
    /// unparseable stage date, one missing entirely, and a listing entry
    /// without a print number.
    async fn spawn_fixture_api() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&buf);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = respond(path);
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len(),
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        format!("http://{addr}")
    }

    fn respond(path: &str) -> (&'static str, &'static str) {
        match path {
            "/sejm/term10/processes" => (
                "200 OK",
                r#"[
                    { "number": "1", "title": "Dobry projekt" },
                    { "number": "2", "title": "Projekt ze złą datą" },
                    { "number": "3", "title": "Projekt bez rekordu" },
                    { "title": "Wpis bez numeru druku" }
                ]"#,
            ),
            "/sejm/term10/processes/1" => (
                "200 OK",
                r#"{
                    "number": "1",
                    "title": "Dobry projekt",
                    "stages": [ { "stageName": "I czytanie", "date": "2024-01-10" } ]
                }"#,
            ),
            "/sejm/term10/processes/2" => (
                "200 OK",
                r#"{
                    "number": "2",
                    "title": "Projekt ze złą datą",
                    "stages": [ { "stageName": "II czytanie", "date": "wkrótce" } ]
                }"#,
            ),
            _ => ("404 Not Found", r#"{ "message": "not found" }"#),
        }
    }

    #[tokio::test]
    async fn sync_term_counts_failures_without_aborting() {
        let base_url = spawn_fixture_api().await;
        let client = SejmClient::new(base_url);
        let mut store = BillStore::open().unwrap();

        let report = sync_term(&client, &mut store, 10).await.unwrap();

        // One clean bill; bad date, 404, and the numberless header all fail
        // individually without killing the batch.
        assert_eq!(report, SyncReport { synced: 1, failed: 3 });

        assert_eq!(store.get_status(10, "1").unwrap(), BillStatus::FirstReading);
        assert_eq!(store.get_events(10, "1").unwrap().len(), 1);
        // The failing bills left nothing behind.
        assert_eq!(store.event_count().unwrap(), 1);
    }
}
