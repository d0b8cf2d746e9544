use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::defaults;
use crate::error::AppError;
use crate::extract::ExtractionClient;
use crate::models::CourseShell;
use crate::repository::{self, PLACEHOLDER_ITEMS};

/// Orchestrates the destructive catalog replace: schedule PDF -> extracted
/// course shells -> wipe and re-seed, or the same replace from the built-in
/// default list. Extraction must succeed with a non-empty shell list before
/// anything is deleted.
pub struct ImportService {
    db: SqlitePool,
    extractor: Arc<dyn ExtractionClient>,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub courses: usize,
    pub lectures: usize,
    pub sections: usize,
}

impl ImportService {
    pub fn new(db: SqlitePool, extractor: Arc<dyn ExtractionClient>) -> Self {
        Self { db, extractor }
    }

    pub async fn import_schedule(
        &self,
        content_type: &str,
        pdf: &[u8],
    ) -> Result<ImportSummary, AppError> {
        if content_type != "application/pdf" {
            return Err(AppError::Validation(
                "Only PDF schedules are accepted".to_string(),
            ));
        }

        info!("Step 1: extracting course shells from schedule PDF");
        let shells = self.extractor.extract_course_shells(pdf).await?;
        if shells.is_empty() {
            return Err(AppError::Extraction(
                "No courses were found in the document".to_string(),
            ));
        }

        info!("Step 2: replacing catalog with {} extracted courses", shells.len());
        self.replace(&shells).await
    }

    pub async fn reset_to_default(&self) -> Result<ImportSummary, AppError> {
        let shells = defaults::course_shells();
        info!("Resetting catalog to the {} default courses", shells.len());
        self.replace(&shells).await
    }

    async fn replace(&self, shells: &[CourseShell]) -> Result<ImportSummary, AppError> {
        let courses = repository::replace_catalog(&self.db, shells).await?;
        let summary = ImportSummary {
            courses,
            lectures: courses * PLACEHOLDER_ITEMS,
            sections: courses * PLACEHOLDER_ITEMS,
        };
        info!(
            "Catalog replaced: {} courses, {} lectures, {} sections",
            summary.courses, summary.lectures, summary.sections
        );
        Ok(summary)
    }
}
