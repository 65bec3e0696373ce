use std::sync::LazyLock;

use regex::Regex;

use crate::models::{GenerateContentRequest, InlineData, Part, UserContext, Vitals};

pub const DIAGNOSIS_SYSTEM_PROMPT: &str = r#"You are an AI Symptom Analyzer for the HealthMonitor app.
Instructions:
1. Analyze the symptoms provided in text and/or the uploaded image showing a health concern (e.g., skin rash, swelling, pill identification).
2. Provide a preliminary "Clinical Impression" or "Diagnosis Label".
3. List 3-4 actionable "Recommendations".
4. Categorize the "Severity" as one of: [low, medium, high].
5. CRITICAL: If the symptoms suggest a life-threatening emergency, set severity to "high" and advise immediate medical attention.
6. Always include a disclaimer: "Not a replacement for professional medical advice."
7. Format the response as a JSON object:
   {
     "diagnosis": "Short label",
     "recommendations": ["Point 1", "Point 2", ...],
     "severity": "low|medium|high"
   }
8. Return ONLY the JSON object."#;

/// Stand-in user content when no symptom text was given. Used whether or not an
/// image is attached.
pub const IMAGE_ONLY_PROMPT: &str = "Please analyze this health-related image.";

/// Every attachment is declared as JPEG regardless of its real encoding.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

static DATA_URI_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/\w+;base64,").expect("valid data URI regex"));

/// Drop a leading `data:image/<subtype>;base64,` so only the payload remains.
/// Idempotent: raw base64 passes through unchanged.
pub fn strip_data_uri_prefix(image: &str) -> &str {
    match DATA_URI_PREFIX.find(image) {
        Some(m) => &image[m.end()..],
        None => image,
    }
}

pub fn diagnosis_request(symptoms: &str, image_base64: Option<&str>) -> GenerateContentRequest {
    let symptoms = symptoms.trim();
    let prompt_text = if symptoms.is_empty() {
        if image_base64.is_none() {
            tracing::warn!("Diagnosis requested with neither symptoms nor image");
        }
        IMAGE_ONLY_PROMPT.to_string()
    } else {
        format!("User Symptoms: {symptoms}")
    };

    let mut parts = vec![Part::Text {
        text: format!("{DIAGNOSIS_SYSTEM_PROMPT}\n\n{prompt_text}"),
    }];

    if let Some(image) = image_base64 {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: IMAGE_MIME_TYPE.to_string(),
                data: strip_data_uri_prefix(image).to_string(),
            },
        });
    }

    GenerateContentRequest::single(parts)
}

pub fn chat_request(question: &str, context: Option<&UserContext>) -> GenerateContentRequest {
    let system = chat_system_prompt(context);
    GenerateContentRequest::single(vec![Part::Text {
        text: format!("{system}\n\nUser Question: {question}"),
    }])
}

pub fn chat_system_prompt(context: Option<&UserContext>) -> String {
    let user_name = context
        .and_then(|c| c.user_name.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or("User");
    let role = context
        .and_then(|c| c.role.as_deref())
        .filter(|r| !r.is_empty())
        .unwrap_or("Patient");
    let vitals = vitals_summary(context.and_then(|c| c.latest_vitals.as_ref()));

    format!(
        r#"You are an Advanced AI Health Companion for the HealthMonitor app.
Context:
- User Name: {user_name}
- User Role: {role}
- {vitals}

Instructions:
1. Be highly professional, empathetic, and health-focused.
2. Analyze the user's vitals if provided.
3. Use markdown for formatting (bolding important terms).
4. Provide actionable health tips.
5. CRITICAL: If you detect a life-threatening symptom (like severe chest pain or very high BP), advise the user to seek immediate medical help or use the SOS button.
6. Always include a disclaimer that you are an AI assistant and not a replacement for professional medical advice.
7. Answer in the language the user speaks to you (Supports English, Spanish, French, Tamil).
8. You can suggest actions like "Log Vitals", "Emergency SOS", or "View History" if relevant.

Return the response as a direct message string."#
    )
}

pub fn vitals_summary(vitals: Option<&Vitals>) -> String {
    match vitals {
        Some(v) => format!(
            "User Vitals: Heart Rate {} bpm, BP {}/{} mmHg, Weight {} kg.",
            reading(v.heart_rate),
            reading(v.systolic_bp),
            reading(v.diastolic_bp),
            reading(v.weight)
        ),
        None => "No recent vitals available.".to_string(),
    }
}

// Zero is treated as "not recorded", same as a missing value.
fn reading(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => format!("{v}"),
        _ => "N/A".to_string(),
    }
}
