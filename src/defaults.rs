use crate::models::CourseShell;

/// Built-in schedule used by the reset-to-default action.
pub fn course_shells() -> Vec<CourseShell> {
    vec![
        CourseShell {
            name_ar: "مقدمة في البرمجة".to_string(),
            name_en: "Introduction to Programming".to_string(),
            doctor: "د. أحمد مصطفى".to_string(),
            ta_name: Some("م. سارة عبد الله".to_string()),
            lecture_day: Some("السبت".to_string()),
            section_day: Some("الثلاثاء".to_string()),
        },
        CourseShell {
            name_ar: "هياكل البيانات".to_string(),
            name_en: "Data Structures".to_string(),
            doctor: "د. محمد عبد الرحمن".to_string(),
            ta_name: Some("م. كريم حسن".to_string()),
            lecture_day: Some("الأحد".to_string()),
            section_day: Some("الأربعاء".to_string()),
        },
        CourseShell {
            name_ar: "قواعد البيانات".to_string(),
            name_en: "Database Systems".to_string(),
            doctor: "د. هالة إبراهيم".to_string(),
            ta_name: Some("م. منى سمير".to_string()),
            lecture_day: Some("الاثنين".to_string()),
            section_day: Some("الخميس".to_string()),
        },
        CourseShell {
            name_ar: "نظم التشغيل".to_string(),
            name_en: "Operating Systems".to_string(),
            doctor: "د. طارق السيد".to_string(),
            ta_name: None,
            lecture_day: Some("الثلاثاء".to_string()),
            section_day: None,
        },
        CourseShell {
            name_ar: "الرياضيات المتقطعة".to_string(),
            name_en: "Discrete Mathematics".to_string(),
            doctor: "د. نهى فاروق".to_string(),
            ta_name: Some("م. عمر خالد".to_string()),
            lecture_day: Some("الأربعاء".to_string()),
            section_day: Some("السبت".to_string()),
        },
    ]
}
