// End-to-end tests of a pipeline run against mocked sources

use async_trait::async_trait;
use job_radar::config::{parse_config, ClassifierConfig};
use job_radar::model::{RawListing, SourceError};
use job_radar::pipeline::{Pipeline, SourceEntry};
use job_radar::scraper::{FileSource, HttpClient, ListingSource};
use job_radar::storage::SqliteStorage;
use job_radar::UNCATEGORIZED;
use std::io::Write;

struct StaticSource {
    name: String,
    listings: Vec<RawListing>,
}

#[async_trait]
impl ListingSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_listings(&self) -> Result<Vec<RawListing>, SourceError> {
        Ok(self.listings.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl ListingSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn fetch_listings(&self) -> Result<Vec<RawListing>, SourceError> {
        Err(SourceError::InvalidResponse(500, "http://broken".into()))
    }
}

fn client() -> HttpClient {
    HttpClient::new("test-agent", 5).unwrap()
}

fn static_entry(name: &str, mut listings: Vec<RawListing>, filter: bool) -> SourceEntry {
    for listing in listings.iter_mut() {
        listing.source = name.to_string();
    }
    let mut entry = SourceEntry::new(Box::new(StaticSource {
        name: name.to_string(),
        listings,
    }));
    entry.apply_relevance_filter = filter;
    entry
}

#[tokio::test]
async fn test_run_filters_dedupes_and_persists() {
    let listings = vec![
        RawListing::new("Senior Python Developer").with_link("https://a/1"),
        RawListing::new("Staff Nurse").with_description("hospital ward duties").with_link("https://a/2"),
        RawListing::new("Video Editor").with_link("https://a/3"),
        RawListing::new("Video Editor").with_link("https://a/3"),
    ];
    let pipeline = Pipeline::new(
        &ClassifierConfig::default(),
        vec![static_entry("shomvob", listings, true)],
        client(),
    )
    .unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();

    let report = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(report.fetched(), 4);
    assert_eq!(report.relevant(), 3);
    assert_eq!(report.sources[0].new, 2);
    assert_eq!(report.saved, 2);
    assert_eq!(report.categories.get("Software Engineering"), Some(&1));
    assert_eq!(report.categories.get("Design & Creative"), Some(&1));

    let jobs = storage.all_jobs().unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j.heuristic.is_some()));

    // Second run sees everything as already stored.
    let again = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(again.sources[0].new, 0);
    assert_eq!(again.saved, 0);
}

#[tokio::test]
async fn test_unfiltered_source_keeps_everything() {
    let listings = vec![
        RawListing::new("Staff Nurse").with_link("n1"),
        RawListing::new("").with_link("n2"),
    ];
    let pipeline = Pipeline::new(
        &ClassifierConfig::default(),
        vec![static_entry("bdjobs", listings, false)],
        client(),
    )
    .unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();

    let report = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(report.saved, 2);
    assert_eq!(report.categories.get(UNCATEGORIZED), Some(&2));
}

#[tokio::test]
async fn test_broken_source_does_not_stop_others() {
    let pipeline = Pipeline::new(
        &ClassifierConfig::default(),
        vec![
            SourceEntry::new(Box::new(BrokenSource)),
            static_entry("ok", vec![RawListing::new("QA Tester").with_link("q1")], true),
        ],
        client(),
    )
    .unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();

    let report = pipeline.run(&mut storage).await.unwrap();
    assert!(report.sources[0].error.is_some());
    assert_eq!(report.sources[1].new, 1);
    assert_eq!(report.saved, 1);
}

#[tokio::test]
async fn test_duplicate_keys_across_sources_saved_once() {
    let pipeline = Pipeline::new(
        &ClassifierConfig::default(),
        vec![
            static_entry("a", vec![RawListing::new("Web Developer").with_link("same")], true),
            static_entry("b", vec![RawListing::new("Web Developer").with_link("same")], true),
        ],
        client(),
    )
    .unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();

    let report = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(report.saved, 1);
    assert_eq!(storage.all_jobs().unwrap()[0].listing.source, "a");
}

#[tokio::test]
async fn test_from_config_with_details_and_export() {
    let mut server = mockito::Server::new_async().await;
    let feed = format!(
        r#"[{{"job_title": "Laravel Developer", "url": "{0}/job/1"}},
            {{"title": "Driver", "link": "{0}/job/2"}}]"#,
        server.url()
    );
    let _feed = server
        .mock("GET", "/feed.json")
        .with_status(200)
        .with_body(feed)
        .create_async()
        .await;
    let _detail = server
        .mock("GET", "/job/1")
        .with_status(200)
        .with_body(r#"<div class="company">Acme</div><span class="skill">PHP</span>"#)
        .create_async()
        .await;

    let mut links = tempfile::NamedTempFile::new().unwrap();
    write!(links, r#"[{{"title": "Graphics Designer", "link": "file/1"}}]"#).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("jobs.json");
    let config_json = serde_json::json!({
        "export_path": export.to_string_lossy(),
        "sources": [
            {
                "name": "feed",
                "type": "feed",
                "url": format!("{}/feed.json", server.url()),
                "details": {"company": ".company", "skills": ".skill"}
            },
            {"name": "files", "type": "file", "path": links.path().to_string_lossy()},
            {"name": "off", "type": "file", "path": "/nonexistent", "enabled": false}
        ]
    });
    let config = parse_config(&config_json.to_string()).unwrap();
    let pipeline = Pipeline::from_config(&config, client()).unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();

    let report = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.saved, 2);

    let jobs = storage.all_jobs().unwrap();
    let laravel = jobs.iter().find(|j| j.listing.title == "Laravel Developer").unwrap();
    let details = laravel.details.as_ref().unwrap();
    assert_eq!(details.company.as_deref(), Some("Acme"));
    assert_eq!(details.skills, vec!["PHP"]);
    assert_eq!(laravel.category, "Software Engineering");

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(exported.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn test_file_source_in_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"title": "React Developer", "link": "r1"}}]"#).unwrap();
    let pipeline = Pipeline::new(
        &ClassifierConfig::default(),
        vec![SourceEntry::new(Box::new(FileSource::new("disk", file.path())))],
        client(),
    )
    .unwrap();
    let mut storage = SqliteStorage::in_memory().unwrap();
    let report = pipeline.run(&mut storage).await.unwrap();
    assert_eq!(report.saved, 1);
    assert!(storage.contains_key("r1").unwrap());
}
