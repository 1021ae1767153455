//! Shared fixtures for integration tests against a fake Gemini endpoint.
#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{json, Value};
use speak_confident::config::{DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL};
use speak_confident::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-key";

pub fn primary_path() -> String {
    format!("/v1beta/models/{DEFAULT_PRIMARY_MODEL}:generateContent")
}

pub fn fallback_path() -> String {
    format!("/v1beta/models/{DEFAULT_FALLBACK_MODEL}:generateContent")
}

/// Local path behind a preview's `file://` URL.
pub fn preview_path(url: &str) -> PathBuf {
    PathBuf::from(url.trim_start_matches("file://"))
}

/// Config pointed at the mock server.
pub fn config_for(server: &MockServer, api_key: &str) -> Config {
    Config {
        gemini_api_key: api_key.into(),
        api_base: format!("{}/v1beta", server.uri()),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

pub fn audio_result() -> Value {
    json!({
        "overallScore": 74,
        "summary": "Clear and steady, with a few fillers.",
        "transcriptionSnippet": "Good afternoon, today I'll cover...",
        "metrics": [
            {"category": "Confidence", "score": 78, "feedback": "Steady tone."},
            {"category": "Clarity", "score": 82, "feedback": "Good enunciation."},
            {"category": "Engagement", "score": 65, "feedback": "Some monotone stretches."},
            {"category": "Content Structure", "score": 80, "feedback": "Logical flow."},
            {"category": "Filler Words", "score": 55, "feedback": "Several 'um's."}
        ],
        "strengths": ["Steady pace"],
        "improvements": ["Replace fillers with pauses"]
    })
}

pub fn video_result() -> Value {
    let mut result = audio_result();
    result["visualAnalysis"] = json!({
        "generalFeedback": "Open, stable posture.",
        "metrics": [
            {"label": "Eye Contact", "score": 70, "feedback": "Mostly on camera."},
            {"label": "Body Language", "score": 76, "feedback": "Relaxed."},
            {"label": "Gestures", "score": 60, "feedback": "A bit stiff."},
            {"label": "Facial Expressions", "score": 81, "feedback": "Warm."}
        ]
    });
    result
}

/// A successful `generateContent` reply whose text is `result` as JSON.
pub fn gemini_reply(result: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": result.to_string()}], "role": "model"},
            "finishReason": "STOP"
        }]
    }))
}

pub fn gemini_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"code": status, "message": message, "status": "INVALID_ARGUMENT"}
    }))
}

pub fn capability_error() -> ResponseTemplate {
    gemini_error(400, "The model does not support the provided input.")
}

pub async fn mount(server: &MockServer, route: String, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}
