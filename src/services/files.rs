use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::warn;

use crate::error::AppError;
use crate::models::{FileObject, ItemKind};
use crate::repository;
use crate::storage::StorageClient;

/// Attaches uploaded blobs to lecture/section items. Blob first, metadata
/// second; a failed metadata write deletes the just-uploaded blob so no
/// unreferenced file is left behind.
pub struct FileService {
    db: SqlitePool,
    storage: Arc<dyn StorageClient>,
}

pub struct FileUpload {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Blob path for an item's file. Deterministic, so a second upload for the
/// same item overwrites the first.
pub fn object_path(course_id: &str, kind: ItemKind, item_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}-{}-{}",
        course_id,
        kind.as_str(),
        item_id,
        sanitize_file_name(file_name)
    )
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

impl FileService {
    pub fn new(db: SqlitePool, storage: Arc<dyn StorageClient>) -> Self {
        Self { db, storage }
    }

    pub async fn attach_file(
        &self,
        course_id: &str,
        kind: ItemKind,
        item_id: &str,
        upload: FileUpload,
    ) -> Result<FileObject, AppError> {
        let path = object_path(course_id, kind, item_id, &upload.name);

        self.storage
            .upload(&path, &upload.bytes, &upload.media_type)
            .await?;

        let file = FileObject {
            name: upload.name,
            path: path.clone(),
            public_url: self.storage.public_url(&path),
            media_type: upload.media_type,
        };

        let updated =
            match repository::set_item_file(&self.db, kind, course_id, item_id, &file).await {
                Ok(updated) => updated,
                Err(e) => {
                    self.cleanup_blob(&path).await;
                    return Err(e.into());
                }
            };

        if !updated {
            self.cleanup_blob(&path).await;
            return Err(AppError::NotFound);
        }

        Ok(file)
    }

    /// Best-effort removal of a blob whose metadata write did not land.
    async fn cleanup_blob(&self, path: &str) {
        if let Err(e) = self.storage.remove(path).await {
            warn!("failed to remove orphaned blob {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_is_deterministic() {
        let a = object_path("c1", ItemKind::Lecture, "i1", "week one notes.pdf");
        let b = object_path("c1", ItemKind::Lecture, "i1", "week one notes.pdf");
        assert_eq!(a, b);
        assert_eq!(a, "c1/lecture-i1-week_one_notes.pdf");
    }

    #[test]
    fn test_object_path_routes_by_kind() {
        assert_eq!(
            object_path("c1", ItemKind::Section, "i9", "sheet.pdf"),
            "c1/section-i9-sheet.pdf"
        );
    }

    #[test]
    fn test_sanitize_replaces_all_whitespace() {
        assert_eq!(sanitize_file_name("a b\tc\nd.pdf"), "a_b_c_d.pdf");
        assert_eq!(sanitize_file_name("clean.pdf"), "clean.pdf");
    }
}
