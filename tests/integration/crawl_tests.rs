//! Integration tests for the crawler
//!
//! These tests use wiremock to serve directory listings and run full crawl
//! cycles end-to-end against catalog files in a temporary directory.

use async_trait::async_trait;
use reel_harvest::catalog::{stable_id, Category, ExternalMetadata, MetadataLookup};
use reel_harvest::config::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, TargetEntry, UserAgentConfig,
};
use reel_harvest::crawler::{CrawlMode, Coordinator};
use reel_harvest::output::CrawlStatistics;
use reel_harvest::state::PageState;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing its catalog into `dir`
fn create_test_config(dir: &TempDir, targets: Vec<TargetEntry>) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_delay: 1, // Very short for testing
            rate_limit_cooldown: 10,
            request_timeout: 5,
            flush_every: 100,
            max_depth: None,
            max_rate_limit_retries: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            movies_path: catalog_path(dir, "movies.json").display().to_string(),
            series_path: catalog_path(dir, "series.json").display().to_string(),
            episodes_path: catalog_path(dir, "episodes.json").display().to_string(),
        },
        filter: FilterConfig::default(),
        targets,
    }
}

fn movie_target(server: &MockServer) -> TargetEntry {
    TargetEntry {
        category: Category::Movie,
        root: format!("{}/movies/", server.uri()),
        label: None,
    }
}

fn series_target(server: &MockServer) -> TargetEntry {
    TargetEntry {
        category: Category::Series,
        root: format!("{}/tv/", server.uri()),
        label: Some("TV Shows".to_string()),
    }
}

fn catalog_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn read_catalog(dir: &TempDir, name: &str) -> Vec<Value> {
    let content = fs::read_to_string(catalog_path(dir, name)).expect("catalog file missing");
    serde_json::from_str(&content).expect("catalog file is not a JSON array")
}

/// nginx-style autoindex page
fn listing(title: &str, entries: &[(&str, &str)]) -> String {
    let mut body = format!(
        "<html><head><title>Index of {0}</title></head><body><h1>Index of {0}</h1><hr><pre>\
         <a href=\"../\">../</a>\n",
        title
    );
    for (href, text) in entries {
        body.push_str(&format!(
            "<a href=\"{}\">{}</a>      01-Jan-2024 10:00      -\n",
            href, text
        ));
    }
    body.push_str("</pre><hr></body></html>");
    body
}

async fn mount_listing(server: &MockServer, at: &str, entries: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(listing(at, entries), "text/html"))
        .mount(server)
        .await;
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

async fn crawl(config: &Config, mode: CrawlMode) -> CrawlStatistics {
    let mut coordinator =
        Coordinator::new(config.clone(), mode).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

#[tokio::test]
async fn test_movie_folder_cataloged_once() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Alita%20(2019)/", "Alita (2019)/")]).await;
    mount_listing(
        &server,
        "/movies/Alita%20(2019)/",
        &[
            ("Alita.2019.sample.mkv", "Alita.2019.sample.mkv"),
            ("Alita.2019.1080p.mkv", "Alita.2019.1080p.mkv"),
            ("poster.jpg", "poster.jpg"),
        ],
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;
    assert_eq!(stats.new_movies, 1);
    assert_eq!(stats.count(PageState::Processed), 2);

    let movies = read_catalog(&dir, "movies.json");
    assert_eq!(movies.len(), 1);

    let movie = &movies[0];
    assert_eq!(movie["name"], "Alita.2019.1080p");
    assert_eq!(movie["id"], stable_id("Alita.2019.1080p"));
    assert_eq!(movie["id"], 465297064);
    assert_eq!(
        movie["url"],
        format!("{}/movies/Alita%20(2019)/Alita.2019.1080p.mkv", server.uri())
    );
    assert_eq!(movie["folder"], format!("{}/movies/Alita (2019)/", server.uri()));
    assert_eq!(movie["category_id"], "Movies");
    assert_eq!(movie["image"], "");

    // A second run finds nothing new and never revisits the movie folder
    let stats = crawl(&config, CrawlMode::Movies).await;
    assert_eq!(stats.new_entries(), 0);
    assert_eq!(stats.folders_known, 1);
    assert_eq!(read_catalog(&dir, "movies.json"), movies);

    let alita_fetches = requested_paths(&server)
        .await
        .iter()
        .filter(|p| p.as_str() == "/movies/Alita%20(2019)/")
        .count();
    assert_eq!(alita_fetches, 1);
}

#[tokio::test]
async fn test_series_new_season_appends_episodes() {
    let server = MockServer::start().await;

    mount_listing(&server, "/tv/", &[("Show/", "Show/")]).await;
    mount_listing(&server, "/tv/Show/", &[("Season%201/", "Season 1/")]).await;
    mount_listing(
        &server,
        "/tv/Show/Season%201/",
        &[("E01.mkv", "E01.mkv"), ("E02.mkv", "E02.mkv")],
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![series_target(&server)]);

    let stats = crawl(&config, CrawlMode::Series).await;
    assert_eq!(stats.new_series, 1);
    assert_eq!(stats.new_episodes, 2);

    let series = read_catalog(&dir, "series.json");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["name"], "Show");
    assert_eq!(series[0]["id"], stable_id("Show"));
    assert_eq!(series[0]["category_id"], "TV Shows");
    assert_eq!(series[0]["folder"], format!("{}/tv/Show/", server.uri()));

    let episodes = read_catalog(&dir, "episodes.json");
    let ids: Vec<_> = episodes.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["3529469-1", "3529469-2"]);
    assert!(episodes.iter().all(|e| e["season"] == "Season 1"));
    assert!(episodes.iter().all(|e| e["series_id"] == 3529469));

    // Season 2 appears on the server
    server.reset().await;
    mount_listing(&server, "/tv/", &[("Show/", "Show/")]).await;
    mount_listing(
        &server,
        "/tv/Show/",
        &[("Season%201/", "Season 1/"), ("Season%202/", "Season 2/")],
    )
    .await;
    mount_listing(
        &server,
        "/tv/Show/Season%201/",
        &[("E01.mkv", "E01.mkv"), ("E02.mkv", "E02.mkv")],
    )
    .await;
    mount_listing(&server, "/tv/Show/Season%202/", &[("E01.mkv", "E01.mkv")]).await;

    let stats = crawl(&config, CrawlMode::Series).await;
    assert_eq!(stats.new_series, 0);
    assert_eq!(stats.new_episodes, 1);

    assert_eq!(read_catalog(&dir, "series.json").len(), 1);

    let episodes = read_catalog(&dir, "episodes.json");
    assert_eq!(episodes.len(), 3);
    assert_eq!(episodes[2]["id"], "3529469-3");
    assert_eq!(episodes[2]["season"], "Season 2");
    assert_eq!(
        episodes[2]["url"],
        format!("{}/tv/Show/Season%202/E01.mkv", server.uri())
    );
}

#[tokio::test]
async fn test_never_leaves_target_root() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/movies/",
        &[
            ("../", "Parent Directory"),
            ("/", "Home"),
            ("/other/", "other/"),
            ("/movies-old/", "movies-old/"),
            ("https://elsewhere.invalid/movies/x/", "mirror/"),
            ("?C=N;O=D", "Name"),
            ("Heat/", "Heat/"),
        ],
    )
    .await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    for forbidden in ["/", "/other/", "/movies-old/"] {
        Mock::given(method("GET"))
            .and(path(forbidden))
            .respond_with(ResponseTemplate::new(200).set_body_raw(listing(forbidden, &[]), "text/html"))
            .expect(0)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(stats.new_movies, 1);
    assert!(stats.links_out_of_scope >= 2);

    let paths = requested_paths(&server).await;
    assert_eq!(paths, vec!["/movies/", "/movies/Heat/"]);
}

#[tokio::test]
async fn test_encoded_separators_stay_in_root() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/movies/",
        &[
            ("/movies%2F..%2Fsecret/", "secret/"),
            ("/movies%2Fevil/", "evil/"),
            ("Heat%2F..%2F..%2Fleak/", "leak/"),
            ("/movies%2F..%2Fleak.mkv", "leak.mkv"),
            ("Heat/", "Heat/"),
        ],
    )
    .await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    for forbidden in ["/movies%2F..%2Fsecret/", "/movies%2Fevil/", "/movies/Heat%2F..%2F..%2Fleak/"] {
        Mock::given(method("GET"))
            .and(path(forbidden))
            .respond_with(ResponseTemplate::new(200).set_body_raw(listing(forbidden, &[]), "text/html"))
            .expect(0)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(requested_paths(&server).await, vec!["/movies/", "/movies/Heat/"]);
    assert_eq!(stats.links_out_of_scope, 4);

    let movies = read_catalog(&dir, "movies.json");
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["name"], "Heat.1995");
}

#[tokio::test]
async fn test_rate_limited_folder_is_retried_before_others() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("A/", "A/"), ("B/", "B/")]).await;

    // First answer for A is a rate limit, later answers succeed
    Mock::given(method("GET"))
        .and(path("/movies/A/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_listing(&server, "/movies/A/", &[("a.mkv", "a.mkv")]).await;
    mount_listing(&server, "/movies/B/", &[("b.mkv", "b.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(
        requested_paths(&server).await,
        vec!["/movies/", "/movies/A/", "/movies/A/", "/movies/B/"]
    );
    assert_eq!(stats.count(PageState::RateLimited), 1);
    assert_eq!(stats.count(PageState::Processed), 3);
    assert_eq!(stats.new_movies, 2);
}

#[tokio::test]
async fn test_rate_limit_retry_cap() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("A/", "A/"), ("B/", "B/")]).await;
    Mock::given(method("GET"))
        .and(path("/movies/A/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    mount_listing(&server, "/movies/B/", &[("b.mkv", "b.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, vec![movie_target(&server)]);
    config.crawler.max_rate_limit_retries = Some(2);

    let stats = crawl(&config, CrawlMode::Movies).await;

    let a_fetches = requested_paths(&server)
        .await
        .iter()
        .filter(|p| p.as_str() == "/movies/A/")
        .count();
    assert_eq!(a_fetches, 3);
    assert_eq!(stats.count(PageState::RetryLimitHit), 1);
    assert_eq!(stats.new_movies, 1);
}

#[tokio::test]
async fn test_failed_folders_do_not_stop_the_crawl() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/movies/",
        &[("Broken/", "Broken/"), ("Gone/", "Gone/"), ("Heat/", "Heat/")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/movies/Broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(stats.count(PageState::Failed), 2);
    assert_eq!(stats.new_movies, 1);
    assert_eq!(read_catalog(&dir, "movies.json")[0]["name"], "Heat.1995");
}

#[tokio::test]
async fn test_redirect_outside_root_is_not_followed() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Moved/", "Moved/"), ("Renamed/", "Renamed/")]).await;
    Mock::given(method("GET"))
        .and(path("/movies/Moved/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies/Renamed/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/movies/Ronin/"))
        .mount(&server)
        .await;
    mount_listing(&server, "/movies/Ronin/", &[("Ronin.1998.mkv", "Ronin.1998.mkv")]).await;
    Mock::given(method("GET"))
        .and(path("/elsewhere/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(listing("/elsewhere/", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(stats.count(PageState::Failed), 1);
    assert!(!requested_paths(&server).await.contains(&"/elsewhere/".to_string()));

    let movies = read_catalog(&dir, "movies.json");
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["folder"], format!("{}/movies/Ronin/", server.uri()));
}

#[tokio::test]
async fn test_corrupt_catalog_is_preserved_and_rebuilt() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Heat/", "Heat/")]).await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    let dir = TempDir::new().unwrap();
    fs::write(catalog_path(&dir, "movies.json"), "[{\"id\": 12, \"name\": ").unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;
    assert_eq!(stats.new_movies, 1);

    let preserved = fs::read_to_string(catalog_path(&dir, "movies.json.corrupt")).unwrap();
    assert_eq!(preserved, "[{\"id\": 12, \"name\": ");
    assert_eq!(read_catalog(&dir, "movies.json").len(), 1);
}

#[tokio::test]
async fn test_series_mode_leaves_movies_untouched() {
    let server = MockServer::start().await;

    mount_listing(&server, "/tv/", &[("Mini/", "Mini/")]).await;
    mount_listing(&server, "/tv/Mini/", &[("Part.1.mkv", "Part.1.mkv")]).await;
    Mock::given(method("GET"))
        .and(path("/movies/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(listing("/movies/", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let existing = "[\n  {\"id\": 1, \"name\": \"Kept\", \"url\": \"https://x/m/k.mkv\", \"folder\": \"https://x/m/\", \"category_id\": \"Movies\"}\n]";
    fs::write(catalog_path(&dir, "movies.json"), existing).unwrap();

    let config = create_test_config(&dir, vec![movie_target(&server), series_target(&server)]);
    let stats = crawl(&config, CrawlMode::Series).await;

    assert_eq!(stats.new_series, 1);
    assert_eq!(stats.new_episodes, 1);
    assert_eq!(
        fs::read_to_string(catalog_path(&dir, "movies.json")).unwrap(),
        existing
    );

    let episodes = read_catalog(&dir, "episodes.json");
    assert_eq!(episodes[0]["name"], "Part.1");
    assert_eq!(episodes[0]["season"], "Season 1");
}

#[tokio::test]
async fn test_size_filter_uses_listing_sizes() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Small/", "Small/"), ("Big/", "Big/")]).await;

    let table = |file: &str, size: &str| {
        format!(
            "<html><body><table>\
             <tr><th>Name</th><th>Last modified</th><th>Size</th></tr>\
             <tr><td><a href=\"/movies/\">Parent Directory</a></td><td></td><td>-</td></tr>\
             <tr><td><a href=\"{0}\">{0}</a></td><td>2024-01-01 10:00</td><td>{1}</td></tr>\
             </table></body></html>",
            file, size
        )
    };
    Mock::given(method("GET"))
        .and(path("/movies/Small/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(table("tiny.mkv", "10M"), "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies/Big/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(table("big.mkv", "2.1G"), "text/html"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, vec![movie_target(&server)]);
    config.filter = FilterConfig {
        min_size_gb: Some(1.0),
        max_size_gb: None,
    };

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(stats.new_movies, 1);
    assert_eq!(read_catalog(&dir, "movies.json")[0]["name"], "big");
}

#[tokio::test]
async fn test_depth_cap() {
    let server = MockServer::start().await;

    mount_listing(&server, "/tv/", &[("Show/", "Show/")]).await;
    mount_listing(&server, "/tv/Show/", &[("Season%201/", "Season 1/")]).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, vec![series_target(&server)]);
    config.crawler.max_depth = Some(1);

    let stats = crawl(&config, CrawlMode::Series).await;

    assert_eq!(stats.count(PageState::DepthExceeded), 1);
    assert_eq!(requested_paths(&server).await, vec!["/tv/", "/tv/Show/"]);
}

/// Lookup that knows a single title
struct FixedLookup;

#[async_trait]
impl MetadataLookup for FixedLookup {
    async fn lookup(&self, name: &str, category: Category) -> Option<ExternalMetadata> {
        (category == Category::Movie && name.starts_with("Heat")).then(|| ExternalMetadata {
            display_name: Some("Heat".to_string()),
            poster_url: Some("https://images.example/heat.jpg".to_string()),
            rating: Some(8.3),
            genre: Some("Crime".to_string()),
        })
    }
}

#[tokio::test]
async fn test_metadata_enriches_without_changing_identity() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Heat/", "Heat/")]).await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let mut coordinator = Coordinator::new(config, CrawlMode::Movies)
        .expect("Failed to create coordinator")
        .with_metadata(Arc::new(FixedLookup));
    coordinator.run().await.expect("Crawl failed");

    let movie = &read_catalog(&dir, "movies.json")[0];
    assert_eq!(movie["id"], stable_id("Heat.1995"));
    assert_eq!(movie["name"], "Heat.1995");
    assert_eq!(movie["title"], "Heat");
    assert_eq!(movie["image"], "https://images.example/heat.jpg");
    assert_eq!(movie["genre"], "Crime");
}

#[tokio::test]
async fn test_only_http_200_is_a_listing() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Empty/", "Empty/"), ("Heat/", "Heat/")]).await;
    Mock::given(method("GET"))
        .and(path("/movies/Empty/"))
        .respond_with(
            ResponseTemplate::new(203)
                .set_body_raw(listing("/movies/Empty/", &[("Ghost.mkv", "Ghost.mkv")]), "text/html"),
        )
        .mount(&server)
        .await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, vec![movie_target(&server)]);

    let stats = crawl(&config, CrawlMode::Movies).await;

    assert_eq!(stats.count(PageState::Failed), 1);
    assert_eq!(stats.count(PageState::Processed), 2);

    let movies = read_catalog(&dir, "movies.json");
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["name"], "Heat.1995");
}

/// Lookup that records how many movies are on disk each time it is asked
struct DiskWatcher {
    movies_path: PathBuf,
    on_disk: Mutex<Vec<usize>>,
}

#[async_trait]
impl MetadataLookup for DiskWatcher {
    async fn lookup(&self, _name: &str, _category: Category) -> Option<ExternalMetadata> {
        let count = fs::read_to_string(&self.movies_path)
            .ok()
            .and_then(|content| serde_json::from_str::<Vec<Value>>(&content).ok())
            .map_or(0, |movies| movies.len());
        self.on_disk.lock().unwrap().push(count);
        None
    }
}

#[tokio::test]
async fn test_catalog_flushed_during_the_run() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Heat/", "Heat/"), ("Ronin/", "Ronin/")]).await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;
    mount_listing(&server, "/movies/Ronin/", &[("Ronin.1998.mkv", "Ronin.1998.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, vec![movie_target(&server)]);
    config.crawler.flush_every = 1;

    let watcher = Arc::new(DiskWatcher {
        movies_path: catalog_path(&dir, "movies.json"),
        on_disk: Mutex::new(Vec::new()),
    });

    let mut coordinator = Coordinator::new(config, CrawlMode::Movies)
        .expect("Failed to create coordinator")
        .with_metadata(watcher.clone());
    let stats = coordinator.run().await.expect("Crawl failed");

    // one flush per new movie, then the final flush
    assert_eq!(stats.flushes, 3);

    // Heat was already on disk while Ronin was being cataloged
    assert_eq!(*watcher.on_disk.lock().unwrap(), vec![0, 1]);
    assert_eq!(read_catalog(&dir, "movies.json").len(), 2);
}

#[tokio::test]
async fn test_catalog_write_failure_aborts_the_run() {
    let server = MockServer::start().await;

    mount_listing(&server, "/movies/", &[("Heat/", "Heat/")]).await;
    mount_listing(&server, "/movies/Heat/", &[("Heat.1995.mkv", "Heat.1995.mkv")]).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, vec![movie_target(&server)]);
    let blocker = dir.path().join("blocker");
    config.output.movies_path = blocker.join("movies.json").display().to_string();

    let mut coordinator =
        Coordinator::new(config, CrawlMode::Movies).expect("Failed to create coordinator");

    // The output directory turns out to be a regular file when the catalog is written
    fs::write(&blocker, "not a directory").unwrap();

    let result = coordinator.run().await;

    let error = result.expect_err("write failure must abort the run");
    assert!(error.to_string().contains("movies.json"));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}
