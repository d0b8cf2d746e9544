use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use course_library::error::AppError;
use course_library::extract::{ExtractionClient, FixedExtractionClient};
use course_library::models::CourseShell;
use course_library::repository;
use course_library::services::ImportService;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn shell(name_en: &str) -> CourseShell {
    CourseShell {
        name_ar: format!("مادة {}", name_en),
        name_en: name_en.to_string(),
        doctor: "د. اختبار".to_string(),
        ta_name: None,
        lecture_day: Some("السبت".to_string()),
        section_day: None,
    }
}

/// Extraction stub that counts calls, for asserting that validation failures
/// never reach the extraction service.
struct CountingExtractor {
    calls: AtomicUsize,
    shells: Vec<CourseShell>,
}

#[async_trait]
impl ExtractionClient for CountingExtractor {
    async fn extract_course_shells(&self, _pdf: &[u8]) -> Result<Vec<CourseShell>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.shells.clone())
    }
}

struct FailingExtractor;

#[async_trait]
impl ExtractionClient for FailingExtractor {
    async fn extract_course_shells(&self, _pdf: &[u8]) -> Result<Vec<CourseShell>, AppError> {
        Err(AppError::Extraction("upstream unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_import_replaces_catalog_with_extracted_courses() {
    let db = setup_test_db().await;
    repository::replace_catalog(&db, &[shell("Old Course")])
        .await
        .expect("Failed to seed");

    let extractor = Arc::new(FixedExtractionClient {
        shells: vec![shell("Algorithms"), shell("Networks"), shell("Compilers")],
    });
    let service = ImportService::new(db.clone(), extractor);

    let summary = service
        .import_schedule("application/pdf", b"%PDF-1.4 fake")
        .await
        .expect("Import failed");
    assert_eq!(summary.courses, 3);
    assert_eq!(summary.lectures, 36);
    assert_eq!(summary.sections, 36);

    let catalog = repository::fetch_catalog(&db).await.expect("Fetch failed");
    assert_eq!(catalog.len(), 3);
    assert!(catalog.iter().all(|c| c.shell.name_en != "Old Course"));
    for course in &catalog {
        assert_eq!(course.lectures.len(), 12);
        assert_eq!(course.sections.len(), 12);
        assert_eq!(course.lectures[0].name, "المحاضرة 1");
        assert_eq!(course.sections[11].name, "السكشن 12");
        assert!(course.lectures.iter().all(|i| !i.completed));
    }
}

#[tokio::test]
async fn test_non_pdf_is_rejected_before_extraction() {
    let db = setup_test_db().await;
    repository::replace_catalog(&db, &[shell("Untouched")])
        .await
        .expect("Failed to seed");

    let extractor = Arc::new(CountingExtractor {
        calls: AtomicUsize::new(0),
        shells: vec![shell("Should Not Appear")],
    });
    let service = ImportService::new(db.clone(), extractor.clone());

    let result = service.import_schedule("image/png", b"not a pdf").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);

    let catalog = repository::fetch_catalog(&db).await.expect("Fetch failed");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].shell.name_en, "Untouched");
}

#[tokio::test]
async fn test_empty_extraction_leaves_catalog_untouched() {
    let db = setup_test_db().await;
    repository::replace_catalog(&db, &[shell("Keep Me")])
        .await
        .expect("Failed to seed");

    let extractor = Arc::new(FixedExtractionClient { shells: vec![] });
    let service = ImportService::new(db.clone(), extractor);

    let result = service.import_schedule("application/pdf", b"%PDF-1.4").await;
    assert!(matches!(result, Err(AppError::Extraction(_))));

    let catalog = repository::fetch_catalog(&db).await.expect("Fetch failed");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].shell.name_en, "Keep Me");
    assert_eq!(catalog[0].lectures.len(), 12);
}

#[tokio::test]
async fn test_extraction_failure_leaves_catalog_untouched() {
    let db = setup_test_db().await;
    repository::replace_catalog(&db, &[shell("Keep Me")])
        .await
        .expect("Failed to seed");

    let service = ImportService::new(db.clone(), Arc::new(FailingExtractor));

    let result = service.import_schedule("application/pdf", b"%PDF-1.4").await;
    assert!(matches!(result, Err(AppError::Extraction(_))));

    let catalog = repository::fetch_catalog(&db).await.expect("Fetch failed");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].shell.name_en, "Keep Me");
}

#[tokio::test]
async fn test_reset_restores_default_schedule() {
    let db = setup_test_db().await;
    repository::replace_catalog(&db, &[shell("Imported")])
        .await
        .expect("Failed to seed");

    let extractor = Arc::new(FixedExtractionClient { shells: vec![] });
    let service = ImportService::new(db.clone(), extractor);

    let summary = service.reset_to_default().await.expect("Reset failed");
    assert_eq!(summary.courses, course_library::defaults::course_shells().len());

    let catalog = repository::fetch_catalog(&db).await.expect("Fetch failed");
    assert_eq!(catalog.len(), summary.courses);
    assert!(catalog.iter().all(|c| c.shell.name_en != "Imported"));
    assert!(catalog.iter().all(|c| c.lectures.len() == 12 && c.sections.len() == 12));
}
