use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Course description before it has been persisted: either extracted from a
/// schedule PDF or taken from the built-in default list. Field names on the
/// wire match the extraction output schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseShell {
    #[serde(rename = "nameAr")]
    pub name_ar: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    pub doctor: String,
    #[serde(rename = "taName", default, skip_serializing_if = "Option::is_none")]
    pub ta_name: Option<String>,
    #[serde(rename = "lectureDay", default, skip_serializing_if = "Option::is_none")]
    pub lecture_day: Option<String>,
    #[serde(rename = "sectionDay", default, skip_serializing_if = "Option::is_none")]
    pub section_day: Option<String>,
}

/// Full course as assembled from the database, with its child items already
/// sorted for display.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: String,
    #[serde(flatten)]
    pub shell: CourseShell,
    pub lectures: Vec<Item>,
    pub sections: Vec<Item>,
}
