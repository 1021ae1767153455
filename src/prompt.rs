use serde_json::{json, Map, Value};

use crate::analysis::Modality;

const BASE_CRITERIA: [&str; 5] = [
    "Confidence (Tone, volume, steadiness)",
    "Clarity (Enunciation, speed/pacing)",
    "Engagement (Intonation, emotion, avoiding monotone)",
    "Content Structure (Logic, flow - if enough context exists)",
    "Filler Words (Usage of 'um', 'uh', 'like')",
];

const VISUAL_CRITERIA: [&str; 4] = [
    "Eye Contact (Consistent connection with camera/audience)",
    "Body Language (Posture, openness, stability)",
    "Gestures (Natural, emphatic vs distracting/absent)",
    "Facial Expressions (Smiling, matching content)",
];

/// Build the coaching prompt. Video recordings get the visual criteria
/// appended after the five speech criteria.
pub fn build_prompt(modality: Modality) -> String {
    let mut prompt = format!(
        "You are a world-class public speaking coach designed to help students sound confident.\n\
         Analyze the provided {} clip of a presentation.\n\n\
         Evaluate the speaker on the following criteria:\n",
        modality.as_str()
    );

    for (i, criterion) in BASE_CRITERIA.iter().enumerate() {
        prompt.push_str(&format!("{}. {criterion}\n", i + 1));
    }

    if modality == Modality::Video {
        prompt.push_str("\nSince this is a video, strictly evaluate the visual presence as well:\n");
        for (i, criterion) in VISUAL_CRITERIA.iter().enumerate() {
            prompt.push_str(&format!("{}. {criterion}\n", BASE_CRITERIA.len() + i + 1));
        }
    }

    prompt.push_str(
        "\nProvide a constructive, encouraging, but honest assessment.\n\
         Return the response in strict JSON format.",
    );
    prompt
}

/// Build the Gemini response schema for a modality.
///
/// Properties and the `required` list are filled from the same table, so a
/// field can't be declared without being required or the other way round.
pub fn response_schema(modality: Modality) -> Value {
    let mut fields = vec![
        (
            "overallScore",
            json!({ "type": "NUMBER", "description": "Overall score from 0-100" }),
        ),
        (
            "summary",
            json!({ "type": "STRING", "description": "A 2-3 sentence summary of the performance." }),
        ),
        ("metrics", scored_items("category", None)),
        ("strengths", string_list()),
        ("improvements", string_list()),
        (
            "transcriptionSnippet",
            json!({
                "type": "STRING",
                "description": "A short snippet of what was said (first few sentences)."
            }),
        ),
    ];

    if modality == Modality::Video {
        fields.push((
            "visualAnalysis",
            json!({
                "type": "OBJECT",
                "properties": {
                    "generalFeedback": {
                        "type": "STRING",
                        "description": "Overall feedback on visual presence."
                    },
                    "metrics": scored_items("label", Some("e.g., Eye Contact, Body Language")),
                },
                "required": ["generalFeedback", "metrics"],
            }),
        ));
    }

    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let properties: Map<String, Value> = fields
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn scored_items(name_field: &str, name_description: Option<&str>) -> Value {
    let mut name_schema = json!({ "type": "STRING" });
    if let Some(description) = name_description {
        name_schema["description"] = json!(description);
    }

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                name_field: name_schema,
                "score": { "type": "NUMBER" },
                "feedback": { "type": "STRING" },
            },
            "required": [name_field, "score", "feedback"],
        },
    })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}
