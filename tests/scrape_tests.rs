//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the catalog origin and exercise
//! the full scrape cycle end-to-end: list extraction, detail enrichment,
//! artifact download, persistence, and resumption.

use jarhound::config::{CatalogConfig, Config, HttpConfig, OutputConfig};
use jarhound::scraper::{scrape, ScrapeOptions};
use jarhound::storage::{CatalogStore, LogStatus, SqliteStorage};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(catalog_base: &str, db_path: &str, download_dir: &str) -> Config {
    Config {
        catalog: CatalogConfig {
            base_url: catalog_base.to_string(),
            default_end_page: 528,
            request_delay_ms: 0, // No pacing needed against the mock
        },
        http: HttpConfig {
            user_agent: "TestBot/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
            download_dir: download_dir.to_string(),
        },
    }
}

fn entry_html(title: &str, id: &str) -> String {
    format!(
        r##"<li>
            <a title="{title}" href="/games/?p=view-item&amp;id={id}">
                <h3 class="title">{title}</h3>
            </a>
            <img class="photoThumb" src="https://cdn.example.com/{id}.png"/>
            <div class="id-num"><a href="#">Action</a></div>
            <span class="fsize">245 KB</span>
        </li>"##
    )
}

fn list_html(entries: &[String]) -> String {
    format!(
        r#"<html><body><ul class="prd-details">{}</ul></body></html>"#,
        entries.join("\n")
    )
}

fn detail_html(screen_size: &str) -> String {
    format!(
        r#"<html><body><dl class="prd-meta">
            <dt>OS:</dt><dd>Java</dd>
            <dt>Screen:</dt><dd>{screen_size}</dd>
        </dl></body></html>"#
    )
}

async fn mount_list_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/games/"))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail_page(server: &MockServer, id: &str, screen_size: &str) {
    Mock::given(method("GET"))
        .and(path("/games/"))
        .and(query_param("p", "view-item"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(screen_size)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_single_page() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    mount_list_page(
        &server,
        1,
        list_html(&[entry_html("Super Game", "j1"), entry_html("Mega Game", "j2")]),
    )
    .await;
    mount_detail_page(&server, "j1", "128x128").await;
    mount_detail_page(&server, "j2", "176x208").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_items().unwrap(), 2);
    assert_eq!(
        storage
            .count_log_entries_for_page(1, LogStatus::Success)
            .unwrap(),
        1
    );
    assert_eq!(storage.count_log_entries(LogStatus::Error).unwrap(), 0);

    let item = storage
        .get_item_by_url(&format!("{}?p=view-item&id=j1", base))
        .unwrap()
        .expect("item not stored");
    assert_eq!(item.title, "Super Game");
    assert_eq!(item.screen_size, "128x128");
    assert_eq!(item.category, "Action");
    assert_eq!(item.size, "245 KB");
    assert_eq!(
        item.game_file_url,
        Some(format!("{}?p=download-item&id=j1&tt=181", base))
    );
    assert_eq!(item.local_name, None);
}

#[tokio::test]
async fn test_same_range_twice_is_idempotent() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    mount_list_page(
        &server,
        1,
        list_html(&[entry_html("Repeat Game", "r1"), entry_html("Other Game", "r2")]),
    )
    .await;
    mount_detail_page(&server, "r1", "128x160").await;
    mount_detail_page(&server, "r2", "128x160").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    for _ in 0..2 {
        let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");
        scrape(
            config,
            ScrapeOptions {
                download: false,
                start_page: Some(1),
                end_page: Some(1),
            },
        )
        .await
        .expect("scrape failed");
    }

    let storage = SqliteStorage::new(&db_path).unwrap();
    // Same row count as a single run; the retry is a new log row
    assert_eq!(storage.count_items().unwrap(), 2);
    assert_eq!(
        storage
            .count_log_entries_for_page(1, LogStatus::Success)
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_partial_page_tolerance() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    // Five entries, one missing its title
    let broken = r##"<li>
        <a title="Ghost" href="/games/?p=view-item&amp;id=g0"></a>
        <img class="photoThumb" src="https://cdn.example.com/g0.png"/>
        <div class="id-num"><a href="#">Puzzle</a></div>
        <span class="fsize">100 KB</span>
    </li>"##
        .to_string();

    let mut entries = vec![broken];
    for i in 1..=4 {
        let id = format!("g{}", i);
        entries.push(entry_html(&format!("Game {}", i), &id));
        mount_detail_page(&server, &id, "128x128").await;
    }
    mount_list_page(&server, 1, list_html(&entries)).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    // Exactly the four well-formed entries, and the page still succeeds
    assert_eq!(storage.count_items().unwrap(), 4);
    assert_eq!(
        storage
            .count_log_entries_for_page(1, LogStatus::Success)
            .unwrap(),
        1
    );
    assert_eq!(storage.count_log_entries(LogStatus::Error).unwrap(), 0);
}

#[tokio::test]
async fn test_detail_fetch_failure_degrades_to_unknown() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    // Detail link points at an unbound port, so enrichment hits a
    // connection failure and must degrade rather than drop the item
    let dead_detail = r##"<li>
        <a title="Lost Game" href="http://127.0.0.1:1/games/?p=view-item&amp;id=x9">
            <h3 class="title">Lost Game</h3>
        </a>
        <img class="photoThumb" src="https://cdn.example.com/x9.png"/>
        <div class="id-num"><a href="#">Arcade</a></div>
        <span class="fsize">90 KB</span>
    </li>"##
        .to_string();
    mount_list_page(&server, 1, list_html(&[dead_detail])).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_items().unwrap(), 1);

    let item = storage
        .get_item_by_url("http://127.0.0.1:1/games/?p=view-item&id=x9")
        .unwrap()
        .expect("degraded item should still be stored");
    assert_eq!(item.screen_size, "unknown");
    assert_eq!(item.game_file_url, None);
}

#[tokio::test]
async fn test_missing_id_still_enriches_screen_size() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    // Entry whose source URL carries no `id` query parameter: the detail
    // page is still fetched for the screen size, only the artifact URL
    // stays null
    let idless = r##"<li>
        <a title="Nameless Game" href="/games/?p=view-item">
            <h3 class="title">Nameless Game</h3>
        </a>
        <img class="photoThumb" src="https://cdn.example.com/nameless.png"/>
        <div class="id-num"><a href="#">Sports</a></div>
        <span class="fsize">150 KB</span>
    </li>"##
        .to_string();
    mount_list_page(&server, 1, list_html(&[idless])).await;

    Mock::given(method("GET"))
        .and(path("/games/"))
        .and(query_param("p", "view-item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html("176x220")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    let item = storage
        .get_item_by_url(&format!("{}?p=view-item", base))
        .unwrap()
        .expect("id-less item should still be stored");
    assert_eq!(item.screen_size, "176x220");
    assert_eq!(item.game_file_url, None);
}

#[tokio::test]
async fn test_resumes_after_last_successful_page() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    mount_list_page(&server, 3, list_html(&[entry_html("Page Three Game", "p3")])).await;
    mount_detail_page(&server, "p3", "240x320").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    // Seed successes for pages 1 and 2, as a previous run would have
    {
        let mut storage = SqliteStorage::new(&db_path).unwrap();
        storage
            .append_log(1, LogStatus::Success, "Scraped 12 items")
            .unwrap();
        storage
            .append_log(2, LogStatus::Success, "Scraped 12 items")
            .unwrap();
    }

    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");
    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: None,
            end_page: Some(3),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_items().unwrap(), 1);
    assert_eq!(
        storage
            .count_log_entries_for_page(3, LogStatus::Success)
            .unwrap(),
        1
    );
    // Pages 1 and 2 were not re-fetched: only the seeded rows exist
    assert_eq!(
        storage
            .count_log_entries_for_page(1, LogStatus::Success)
            .unwrap(),
        1
    );
    assert_eq!(
        storage
            .count_log_entries_for_page(2, LogStatus::Success)
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_download_writes_sanitized_filename() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    mount_list_page(&server, 1, list_html(&[entry_html("Super Game: Part 2!", "d1")])).await;
    mount_detail_page(&server, "d1", "128x128").await;

    Mock::given(method("GET"))
        .and(path("/games/"))
        .and(query_param("p", "download-item"))
        .and(query_param("id", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"JARBYTES".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let download_dir = dir.path().join("jars");
    let config = create_test_config(
        &base,
        db_path.to_str().unwrap(),
        download_dir.to_str().unwrap(),
    );

    scrape(
        config,
        ScrapeOptions {
            download: true,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let expected = download_dir.join("Super-Game-Part-2-128x128.jar");
    assert!(expected.exists(), "artifact file should exist");
    assert_eq!(std::fs::read(&expected).unwrap(), b"JARBYTES");

    let storage = SqliteStorage::new(&db_path).unwrap();
    let item = storage
        .get_item_by_url(&format!("{}?p=view-item&id=d1", base))
        .unwrap()
        .unwrap();
    assert_eq!(
        item.local_name,
        Some("Super-Game-Part-2-128x128.jar".to_string())
    );
}

#[tokio::test]
async fn test_list_transport_failure_leaves_no_rows() {
    // No server at all: every list fetch is a transport error
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(
        "http://127.0.0.1:1/games/",
        db_path.to_str().unwrap(),
        "unused",
    );

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(2),
        },
    )
    .await
    .expect("run should complete despite transport failures");

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_items().unwrap(), 0);
    // Unfetched pages are simply absent from the log, not errored
    assert_eq!(storage.count_log_entries(LogStatus::Success).unwrap(), 0);
    assert_eq!(storage.count_log_entries(LogStatus::Error).unwrap(), 0);
    assert_eq!(storage.last_successful_page().unwrap(), 0);
}

#[tokio::test]
async fn test_error_page_commits_as_empty_success() {
    let server = MockServer::start().await;
    let base = format!("{}/games/", server.uri());

    // Non-2xx status with an error body: not a transport failure, so the
    // page is treated as a normal (empty) successful page
    Mock::given(method("GET"))
        .and(path("/games/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>Unavailable</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = create_test_config(&base, db_path.to_str().unwrap(), "unused");

    scrape(
        config,
        ScrapeOptions {
            download: false,
            start_page: Some(1),
            end_page: Some(1),
        },
    )
    .await
    .expect("scrape failed");

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_items().unwrap(), 0);
    assert_eq!(
        storage
            .count_log_entries_for_page(1, LogStatus::Success)
            .unwrap(),
        1
    );
}

#[test]
fn test_resolve_start_page_is_storage_driven() {
    use jarhound::scraper::resolve_start_page;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    assert_eq!(resolve_start_page(None, &storage).unwrap(), 1);

    storage
        .append_log(7, LogStatus::Success, "Scraped 12 items")
        .unwrap();
    assert_eq!(resolve_start_page(None, &storage).unwrap(), 8);
    assert_eq!(resolve_start_page(Some(2), &storage).unwrap(), 2);
}
