use std::sync::Arc;

use sqlx::SqlitePool;

use crate::extract::ExtractionClient;
use crate::storage::StorageClient;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub extractor: Arc<dyn ExtractionClient>,
    pub storage: Arc<dyn StorageClient>,
}
