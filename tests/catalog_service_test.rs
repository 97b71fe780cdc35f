//! Tests for CatalogService against real files

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use coursecat::application::services::CatalogService;
use coursecat::application::ApplicationError;
use coursecat::domain::DomainError;
use coursecat::infrastructure::traits::RealFileSystem;
use coursecat::util::testing;

/// Helper to create a temp course file for testing
fn create_course_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write course file");
    path
}

fn service() -> CatalogService {
    testing::init_test_setup();
    CatalogService::new(Arc::new(RealFileSystem), ',')
}

#[test]
fn given_one_good_and_one_single_field_line_when_loading_then_one_record_and_one_skip() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_course_file(&temp, "courses.csv", "CSCI100,Intro to CS\nCSCI200\n");
    let mut service = service();

    // Act
    let report = service.load(&path).unwrap();

    // Assert
    assert_eq!(report.loaded, 1);
    assert_eq!(service.catalog().len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line_number, 2);
    assert!(matches!(
        report.skipped[0].error,
        DomainError::MalformedLine { ref line, .. } if line == "CSCI200"
    ));
}

#[test]
fn given_crlf_file_when_loading_then_identifiers_have_no_carriage_return() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(
        &temp,
        "courses.csv",
        "CSCI100,Intro\r\nCSCI101,Programming,CSCI100\r\n",
    );
    let mut service = service();

    let report = service.load(&path).unwrap();

    assert!(report.is_clean());
    let course = service.find("CSCI101").unwrap().expect("CSCI101 present");
    assert_eq!(course.name, "Programming");
    assert_eq!(course.prerequisites, vec!["CSCI100"]);
}

#[test]
fn given_nonexistent_file_when_loading_then_source_unreadable() {
    let temp = TempDir::new().unwrap();
    let mut service = service();

    let err = service.load(&temp.path().join("nope.csv")).unwrap_err();

    assert!(matches!(err, ApplicationError::SourceUnreadable { .. }));
    assert!(!service.is_loaded());
}

#[test]
fn given_failed_load_when_retrying_with_good_file_then_succeeds() {
    let temp = TempDir::new().unwrap();
    let good = create_course_file(&temp, "courses.csv", "MATH201,Discrete Mathematics\n");
    let mut service = service();

    assert!(service.load(&temp.path().join("missing.csv")).is_err());
    let report = service.load(&good).unwrap();

    assert_eq!(report.loaded, 1);
}

#[test]
fn given_loaded_catalog_when_loading_second_file_then_refused_and_unchanged() {
    let temp = TempDir::new().unwrap();
    let first = create_course_file(&temp, "a.csv", "A,Alpha\n");
    let second = create_course_file(&temp, "b.csv", "B,Beta\n");
    let mut service = service();
    service.load(&first).unwrap();

    let err = service.load(&second).unwrap_err();

    assert!(matches!(err, ApplicationError::AlreadyLoaded(_)));
    assert!(service.find("B").unwrap().is_none());
}

#[test]
fn given_unknown_prerequisites_when_loading_then_report_lists_them() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(
        &temp,
        "courses.csv",
        "CSCI300,Algorithms,CSCI200,MATH201\nCSCI200,Data Structures,CSCI101\n",
    );
    let mut service = service();

    let report = service.load(&path).unwrap();

    let dropped: Vec<String> = report.dropped.iter().map(|d| d.to_string()).collect();
    assert_eq!(dropped, vec!["CSCI200 -> CSCI101", "CSCI300 -> MATH201"]);
    assert_eq!(
        service.find("CSCI300").unwrap().unwrap().prerequisites,
        vec!["CSCI200"]
    );
}

#[test]
fn given_non_utf8_bytes_in_one_line_when_loading_then_only_that_line_skipped() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("courses.csv");
    std::fs::write(
        &path,
        b"CSCI100,Intro\nCSCI200,Caf\xE9\nCSCI300,Algorithms,CSCI100\n",
    )
    .unwrap();
    let mut service = service();

    let report = service.load(&path).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line_number, 2);
    assert!(matches!(
        report.skipped[0].error,
        DomainError::InvalidEncoding { ref line, valid_up_to: 11 } if line.starts_with("CSCI200,Caf")
    ));
    assert_eq!(
        service.find("CSCI300").unwrap().unwrap().prerequisites,
        vec!["CSCI100"]
    );
}
