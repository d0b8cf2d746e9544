use serde::{Deserialize, Serialize};

/// Lectures and sections are structurally identical; the kind decides which
/// table a mutation routes to and which placeholder label new items get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lecture,
    Section,
}

impl ItemKind {
    pub fn table(self) -> &'static str {
        match self {
            ItemKind::Lecture => "lectures",
            ItemKind::Section => "sections",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Lecture => "lecture",
            ItemKind::Section => "section",
        }
    }

    /// Display label, in the application's language.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Lecture => "المحاضرة",
            ItemKind::Section => "السكشن",
        }
    }

    /// Sequential display name for the n-th item of this kind.
    pub fn placeholder_name(self, n: usize) -> String {
        format!("{} {}", self.label(), n)
    }
}

/// Metadata for one stored blob. At most one per item; re-uploads overwrite
/// the blob at the same path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileObject {
    pub name: String,
    pub path: String,
    #[serde(rename = "publicUrl")]
    pub public_url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub file: Option<FileObject>,
    pub completed: bool,
    pub course_id: String,
}
