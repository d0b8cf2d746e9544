use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{Course, CourseShell, FileObject, Item, ItemKind};
use crate::order::natural_cmp;

/// Number of placeholder items of each kind seeded per course on replace.
pub const PLACEHOLDER_ITEMS: usize = 12;

#[derive(Debug, FromRow)]
struct CourseRow {
    id: String,
    name_ar: String,
    name_en: String,
    doctor: String,
    ta_name: Option<String>,
    lecture_day: Option<String>,
    section_day: Option<String>,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            id: self.id,
            shell: CourseShell {
                name_ar: self.name_ar,
                name_en: self.name_en,
                doctor: self.doctor,
                ta_name: self.ta_name,
                lecture_day: self.lecture_day,
                section_day: self.section_day,
            },
            lectures: Vec::new(),
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    course_id: String,
    name: String,
    file: Option<String>,
    completed: bool,
}

impl ItemRow {
    fn into_item(self) -> Result<Item, sqlx::Error> {
        let file = match self.file {
            Some(json) => Some(
                serde_json::from_str::<FileObject>(&json)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            ),
            None => None,
        };
        Ok(Item {
            id: self.id,
            name: self.name,
            file,
            completed: self.completed,
            course_id: self.course_id,
        })
    }
}

/// Assembles the full catalog: every course with its lectures and sections,
/// each child list in natural name order.
pub async fn fetch_catalog(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    let course_rows = sqlx::query_as::<_, CourseRow>(
        r#"
        SELECT id, name_ar, name_en, doctor, ta_name, lecture_day, section_day
        FROM courses
        ORDER BY created_at, name_en
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut lectures = fetch_items_grouped(db, ItemKind::Lecture).await?;
    let mut sections = fetch_items_grouped(db, ItemKind::Section).await?;

    let mut courses = Vec::with_capacity(course_rows.len());
    for row in course_rows {
        let mut course = row.into_course();
        course.lectures = lectures.remove(&course.id).unwrap_or_default();
        course.sections = sections.remove(&course.id).unwrap_or_default();
        course.lectures.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        course.sections.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        courses.push(course);
    }

    Ok(courses)
}

async fn fetch_items_grouped(
    db: &SqlitePool,
    kind: ItemKind,
) -> Result<HashMap<String, Vec<Item>>, sqlx::Error> {
    let sql = format!(
        "SELECT id, course_id, name, file, completed FROM {}",
        kind.table()
    );
    let rows = sqlx::query_as::<_, ItemRow>(&sql).fetch_all(db).await?;

    let mut grouped: HashMap<String, Vec<Item>> = HashMap::new();
    for row in rows {
        let item = row.into_item()?;
        grouped.entry(item.course_id.clone()).or_default().push(item);
    }
    Ok(grouped)
}

/// Destructively replaces the whole catalog with the given shells and seeds
/// the placeholder items for each new course. Runs in one transaction so a
/// failure mid-way leaves the previous catalog intact.
pub async fn replace_catalog(
    db: &SqlitePool,
    shells: &[CourseShell],
) -> Result<usize, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM lectures").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sections").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM courses").execute(&mut *tx).await?;

    let now = Utc::now().to_rfc3339();
    for shell in shells {
        let course_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO courses
                (id, name_ar, name_en, doctor, ta_name, lecture_day, section_day, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course_id)
        .bind(&shell.name_ar)
        .bind(&shell.name_en)
        .bind(&shell.doctor)
        .bind(&shell.ta_name)
        .bind(&shell.lecture_day)
        .bind(&shell.section_day)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        for kind in [ItemKind::Lecture, ItemKind::Section] {
            let sql = format!(
                "INSERT INTO {} (id, course_id, name, file, completed, created_at) VALUES (?, ?, ?, NULL, 0, ?)",
                kind.table()
            );
            for n in 1..=PLACEHOLDER_ITEMS {
                sqlx::query(&sql)
                    .bind(Uuid::new_v4().to_string())
                    .bind(&course_id)
                    .bind(kind.placeholder_name(n))
                    .bind(&now)
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(shells.len())
}

pub async fn find_item(
    db: &SqlitePool,
    kind: ItemKind,
    course_id: &str,
    item_id: &str,
) -> Result<Option<Item>, sqlx::Error> {
    let sql = format!(
        "SELECT id, course_id, name, file, completed FROM {} WHERE id = ? AND course_id = ?",
        kind.table()
    );
    let row = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(item_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;
    row.map(ItemRow::into_item).transpose()
}

/// Persists a FileObject on an item. Returns false when the item does not
/// exist, so the caller can compensate for an already-uploaded blob.
pub async fn set_item_file(
    db: &SqlitePool,
    kind: ItemKind,
    course_id: &str,
    item_id: &str,
    file: &FileObject,
) -> Result<bool, sqlx::Error> {
    let json = serde_json::to_string(file).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let sql = format!(
        "UPDATE {} SET file = ? WHERE id = ? AND course_id = ?",
        kind.table()
    );
    let affected = sqlx::query(&sql)
        .bind(json)
        .bind(item_id)
        .bind(course_id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

/// Flips an item's completed flag. Last writer wins; there is no guard
/// against a concurrent toggle from another client.
pub async fn toggle_item(
    db: &SqlitePool,
    kind: ItemKind,
    course_id: &str,
    item_id: &str,
) -> Result<Option<Item>, sqlx::Error> {
    let mut item = match find_item(db, kind, course_id, item_id).await? {
        Some(item) => item,
        None => return Ok(None),
    };

    item.completed = !item.completed;
    let sql = format!("UPDATE {} SET completed = ? WHERE id = ?", kind.table());
    sqlx::query(&sql)
        .bind(item.completed)
        .bind(&item.id)
        .execute(db)
        .await?;

    Ok(Some(item))
}

/// Appends a new placeholder item to a course, named from the current count
/// of that kind ("المحاضرة 4" after three lectures). Returns None for an
/// unknown course.
pub async fn add_item(
    db: &SqlitePool,
    kind: ItemKind,
    course_id: &str,
) -> Result<Option<Item>, sqlx::Error> {
    let course_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE id = ?")
        .bind(course_id)
        .fetch_one(db)
        .await?;
    if course_exists == 0 {
        return Ok(None);
    }

    let count_sql = format!("SELECT COUNT(*) FROM {} WHERE course_id = ?", kind.table());
    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(course_id)
        .fetch_one(db)
        .await?;

    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: kind.placeholder_name(count as usize + 1),
        file: None,
        completed: false,
        course_id: course_id.to_string(),
    };

    let sql = format!(
        "INSERT INTO {} (id, course_id, name, file, completed, created_at) VALUES (?, ?, ?, NULL, 0, ?)",
        kind.table()
    );
    sqlx::query(&sql)
        .bind(&item.id)
        .bind(&item.course_id)
        .bind(&item.name)
        .bind(Utc::now().to_rfc3339())
        .execute(db)
        .await?;

    Ok(Some(item))
}
