//! End-to-end tests: aggregate several in-memory regions and write the report

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tagscan::aws::memory::synthetic_entries;
use tagscan::aws::{CollectError, InMemoryConnector, InMemoryTagging, TaggedEntry};
use tagscan::progress::ProgressObserver;
use tagscan::report::{finish, ExitStatus, LocalReport, ReportFormat, FULL_HEADER};
use tagscan::resource::{Aggregator, Inventory, Tag, Throttle};
use tokio_test::{assert_err, assert_ok};

#[derive(Default)]
struct CountingObserver {
    done_calls: AtomicUsize,
    last_count: AtomicUsize,
}

impl ProgressObserver for CountingObserver {
    fn on_tick(&self) {}

    fn on_done(&self, count: usize) {
        self.done_calls.fetch_add(1, Ordering::SeqCst);
        self.last_count.store(count, Ordering::SeqCst);
    }
}

fn connector() -> InMemoryConnector {
    let mut tokyo = synthetic_entries("ap-northeast-1", "123456789012", 120);
    tokyo.push(TaggedEntry {
        arn: "arn:aws:secretsmanager:ap-northeast-1:123456789012:secret:db/password-AbCdEf"
            .to_string(),
        tags: vec![Tag::new("team", "core"), Tag::new("env", "prod")],
    });

    InMemoryConnector::new()
        .with_region("ap-northeast-1", InMemoryTagging::new(tokyo))
        .with_region(
            "us-east-1",
            InMemoryTagging::new(vec![TaggedEntry {
                arn: "arn:aws:s3:::audit-logs".to_string(),
                tags: Vec::new(),
            }]),
        )
        .with_region(
            "eu-west-1",
            InMemoryTagging::new(synthetic_entries("eu-west-1", "123456789012", 300))
                .failing_on_page(3),
        )
        .with_config_failure("af-south-1")
}

fn regions() -> Vec<String> {
    ["ap-northeast-1", "us-east-1", "eu-west-1", "af-south-1"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}

#[tokio::test]
async fn test_report_contains_only_successful_regions() {
    let connector = Arc::new(connector());
    let observer = CountingObserver::default();

    let inventory = Aggregator::new(connector.clone())
        .with_throttle(Throttle::disabled())
        .run(&regions(), &observer)
        .await;

    assert_eq!(inventory.resources.len(), 122);
    assert_eq!(observer.done_calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.last_count.load(Ordering::SeqCst), 122);
    assert_eq!(connector.backend("eu-west-1").unwrap().requests(), 3);

    let mut failed: Vec<&str> = inventory.errors.iter().map(|e| e.region.as_str()).collect();
    failed.sort();
    assert_eq!(failed, vec!["af-south-1", "eu-west-1"]);
    assert!(inventory
        .errors
        .iter()
        .any(|e| matches!(e.cause, CollectError::Config(_))));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let rows = assert_ok!(LocalReport::new(&path).write(&inventory.resources, ReportFormat::Full));

    // 120 instances with one tag, one secret with two tags, one untagged bucket
    assert_eq!(rows, 123);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 124);
    assert_eq!(lines[0], FULL_HEADER.join(","));
    assert!(lines.contains(&"arn:aws:s3:::audit-logs,,,s3,,audit-logs,,"));
    assert!(lines.iter().any(|line| line.ends_with(
        ",123456789012,ap-northeast-1,secretsmanager,secret,db/password-AbCdEf,env,prod"
    )));
    assert!(!content.contains("eu-west-1"));
}

#[tokio::test]
async fn test_arn_report_lists_each_resource_once() {
    let inventory = Aggregator::new(Arc::new(connector()))
        .with_throttle(Throttle::disabled())
        .run(&regions(), &CountingObserver::default())
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arns.csv");
    let rows = assert_ok!(LocalReport::new(&path).write(&inventory.resources, ReportFormat::Arn));

    assert_eq!(rows, 122);
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.lines().all(|line| line.starts_with("arn:aws:")));
}

#[tokio::test]
async fn test_report_write_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let report = LocalReport::new(dir.path().join("no-such-dir").join("report.csv"));

    assert_err!(report.write(&[], ReportFormat::Full));
}

async fn collect(regions: &[&str]) -> Inventory {
    let regions: Vec<String> = regions.iter().map(|r| r.to_string()).collect();
    Aggregator::new(Arc::new(connector()))
        .with_throttle(Throttle::disabled())
        .run(&regions, &CountingObserver::default())
        .await
}

#[tokio::test]
async fn test_finish_writes_report_then_lists_failed_regions() {
    let inventory = collect(&["us-east-1", "af-south-1"]).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let mut status = Vec::new();

    let outcome = assert_ok!(finish(
        &inventory,
        &LocalReport::new(&path),
        ReportFormat::Full,
        &mut status
    ));

    assert_eq!(outcome, ExitStatus::RegionsFailed);
    assert_eq!(outcome.code(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("arn:aws:s3:::audit-logs"));

    let status = String::from_utf8(status).unwrap();
    assert!(status.starts_with("af-south-1: failed to load AWS configuration"));
    assert!(status.contains("  hint: "));
    assert!(!status.contains("all done!"));
}

#[tokio::test]
async fn test_finish_fails_when_report_cannot_be_written() {
    let inventory = collect(&["us-east-1", "af-south-1"]).await;
    let dir = tempfile::tempdir().unwrap();
    let report = LocalReport::new(dir.path().join("no-such-dir").join("report.csv"));
    let mut status = Vec::new();

    assert_err!(finish(&inventory, &report, ReportFormat::Full, &mut status));
    assert!(status.is_empty());
}

#[tokio::test]
async fn test_finish_succeeds_when_every_region_is_collected() {
    let inventory = collect(&["ap-northeast-1", "us-east-1"]).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let mut status = Vec::new();

    let outcome = assert_ok!(finish(
        &inventory,
        &LocalReport::new(&path),
        ReportFormat::Arn,
        &mut status
    ));

    assert_eq!(outcome, ExitStatus::Success);
    assert_eq!(outcome.code(), 0);
    assert_eq!(String::from_utf8(status).unwrap(), "all done!\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 122);
}
