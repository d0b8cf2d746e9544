pub mod dto;

use std::env;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde_json::json;

use crate::error::AppError;
use crate::models::CourseShell;

const EXTRACTION_PROMPT: &str = "\
حلل ملف PDF هذا الذي يحتوي على جدول دراسي جامعي واستخرج قائمة فريدة من المواد الدراسية.\n\
لكل مادة استخرج: اسم المادة بالعربية (nameAr)، اسم المادة بالإنجليزية (nameEn)، \
اسم الدكتور (doctor)، اسم المعيد إن وجد (taName)، يوم المحاضرة الأسبوعي إن وجد (lectureDay)، \
ويوم السكشن الأسبوعي إن وجد (sectionDay).\n\
المادة الواحدة لها دكتور واحد ومعيد واحد؛ لا تكرر المادة، واجمع المحاضرات والسكاشن تحت مادة واحدة.\n\
إذا كان هناك عدة أيام اختر واحداً فقط، وإذا كان اليوم غير مذكور اترك الحقل فارغاً.\n\
تجاهل الأوقات والأماكن وأرقام القاعات. \
إذا كان الاسم الإنجليزي غير متوفر استنتجه من الاسم العربي.";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::Config("GEMINI_API_KEY is not set".to_string()))?;
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        Ok(Self { api_key, model })
    }
}

/// Document-understanding service that turns a schedule PDF into course
/// shells. The returned array is trusted as the canonical unique set; no
/// client-side deduplication happens on top of it.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn extract_course_shells(&self, pdf: &[u8]) -> Result<Vec<CourseShell>, AppError>;
}

pub struct GeminiHttpClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiHttpClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Output schema sent with every request: nameAr/nameEn/doctor required,
    /// the rest optional.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "nameAr": { "type": "STRING" },
                    "nameEn": { "type": "STRING" },
                    "doctor": { "type": "STRING" },
                    "taName": { "type": "STRING" },
                    "lectureDay": { "type": "STRING" },
                    "sectionDay": { "type": "STRING" },
                },
                "required": ["nameAr", "nameEn", "doctor"],
            },
        })
    }
}

#[async_trait]
impl ExtractionClient for GeminiHttpClient {
    async fn extract_course_shells(&self, pdf: &[u8]) -> Result<Vec<CourseShell>, AppError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.config.model
        );

        let request_body = dto::GenerateContentRequest {
            contents: vec![dto::Content {
                parts: vec![
                    dto::Part {
                        text: Some(EXTRACTION_PROMPT.to_string()),
                        inline_data: None,
                    },
                    dto::Part {
                        text: None,
                        inline_data: Some(dto::InlineData {
                            mime_type: "application/pdf".to_string(),
                            data: BASE64.encode(pdf),
                        }),
                    },
                ],
            }],
            generation_config: dto::GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Self::response_schema(),
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("Extraction request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Extraction(format!(
                "Extraction API error {}: {}",
                status, body
            )));
        }

        let parsed: dto::GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to parse response: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .ok_or_else(|| AppError::Extraction("Empty extraction response".to_string()))?;

        serde_json::from_str::<Vec<CourseShell>>(text).map_err(|e| {
            tracing::error!("malformed extraction payload: {}", e);
            AppError::Extraction(format!("Malformed course list: {}", e))
        })
    }
}

/// Canned client for tests and offline runs: always returns the shells it
/// was constructed with.
pub struct FixedExtractionClient {
    pub shells: Vec<CourseShell>,
}

#[async_trait]
impl ExtractionClient for FixedExtractionClient {
    async fn extract_course_shells(&self, _pdf: &[u8]) -> Result<Vec<CourseShell>, AppError> {
        Ok(self.shells.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_list_parses_with_optional_fields() {
        let payload = r#"[
            {"nameAr": "قواعد البيانات", "nameEn": "Databases", "doctor": "د. هالة"},
            {"nameAr": "شبكات", "nameEn": "Networks", "doctor": "د. طارق",
             "taName": "م. منى", "lectureDay": "السبت", "sectionDay": "الأحد"}
        ]"#;

        let shells: Vec<CourseShell> = serde_json::from_str(payload).expect("Failed to parse");
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].name_en, "Databases");
        assert!(shells[0].ta_name.is_none());
        assert_eq!(shells[1].lecture_day.as_deref(), Some("السبت"));
    }

    #[test]
    fn test_malformed_shell_list_is_rejected() {
        // doctor is required by the schema and by the model.
        let payload = r#"[{"nameAr": "مادة", "nameEn": "Course"}]"#;
        assert!(serde_json::from_str::<Vec<CourseShell>>(payload).is_err());
    }
}
