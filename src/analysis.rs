use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Whether a recording carries a visual track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Audio,
    Video,
}

impl Modality {
    /// Classify a declared MIME type. Returns `None` for anything that is
    /// neither `video/*` nor `audio/*`.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if mime_type.starts_with("video/") {
            Some(Self::Video)
        } else if mime_type.starts_with("audio/") {
            Some(Self::Audio)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

/// One scored speaking dimension (confidence, clarity, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub category: String,
    /// 0-100
    pub score: f64,
    pub feedback: String,
}

/// One scored visual-presence dimension (eye contact, gestures, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMetric {
    pub label: String,
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualAnalysis {
    pub general_feedback: String,
    pub metrics: Vec<VisualMetric>,
}

/// Structured feedback returned by the model for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub summary: String,
    pub transcription_snippet: String,
    pub metrics: Vec<Metric>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_analysis: Option<VisualAnalysis>,
}

impl AnalysisResult {
    /// Enforce the score range and the video <=> `visualAnalysis` pairing.
    ///
    /// A visual section on an audio result is dropped rather than rejected:
    /// the model occasionally volunteers one and the rest of the report is
    /// still usable.
    pub fn checked(mut self, modality: Modality) -> Result<Self, AnalysisError> {
        check_score("overallScore", self.overall_score)?;
        for metric in &self.metrics {
            check_score(&metric.category, metric.score)?;
        }

        match (modality, &self.visual_analysis) {
            (Modality::Video, None) => {
                return Err(AnalysisError::InvalidResult(
                    "video analysis is missing visualAnalysis".into(),
                ));
            }
            (Modality::Video, Some(visual)) => {
                for metric in &visual.metrics {
                    check_score(&metric.label, metric.score)?;
                }
            }
            (Modality::Audio, Some(_)) => {
                log::warn!("Dropping visualAnalysis returned for an audio recording");
                self.visual_analysis = None;
            }
            (Modality::Audio, None) => {}
        }

        Ok(self)
    }
}

fn check_score(field: &str, score: f64) -> Result<(), AnalysisError> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidResult(format!(
            "score for {field} out of range: {score}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(visual: bool) -> AnalysisResult {
        AnalysisResult {
            overall_score: 72.0,
            summary: "Solid delivery.".into(),
            transcription_snippet: "Good morning everyone".into(),
            metrics: vec![Metric {
                category: "Clarity".into(),
                score: 80.0,
                feedback: "Clear enunciation.".into(),
            }],
            strengths: vec!["Pacing".into()],
            improvements: vec!["Fewer fillers".into()],
            visual_analysis: visual.then(|| VisualAnalysis {
                general_feedback: "Good posture.".into(),
                metrics: vec![VisualMetric {
                    label: "Eye Contact".into(),
                    score: 65.0,
                    feedback: "Look up more.".into(),
                }],
            }),
        }
    }

    #[test]
    fn modality_from_mime() {
        assert_eq!(Modality::from_mime("video/mp4"), Some(Modality::Video));
        assert_eq!(Modality::from_mime("Audio/MPEG"), Some(Modality::Audio));
        assert_eq!(Modality::from_mime("image/png"), None);
        assert_eq!(Modality::from_mime("application/octet-stream"), None);
        assert_eq!(Modality::from_mime(""), None);
    }

    #[test]
    fn parses_camel_case_wire_format() {
        let json = r#"{
            "overallScore": 81,
            "summary": "Confident and clear.",
            "transcriptionSnippet": "Today I want to talk about...",
            "metrics": [{"category": "Confidence", "score": 85, "feedback": "Steady voice."}],
            "strengths": ["Steady voice"],
            "improvements": ["Vary intonation"],
            "visualAnalysis": {
                "generalFeedback": "Open posture.",
                "metrics": [{"label": "Gestures", "score": 70.5, "feedback": "Natural."}]
            }
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.overall_score, 81.0);
        assert_eq!(result.metrics[0].category, "Confidence");
        let visual = result.visual_analysis.as_ref().unwrap();
        assert_eq!(visual.metrics[0].score, 70.5);
    }

    #[test]
    fn video_requires_visual_section() {
        let err = sample(false).checked(Modality::Video).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResult(_)));
        assert!(sample(true).checked(Modality::Video).is_ok());
    }

    #[test]
    fn audio_drops_visual_section() {
        let checked = sample(true).checked(Modality::Audio).unwrap();
        assert!(checked.visual_analysis.is_none());
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let mut result = sample(false);
        result.overall_score = 101.0;
        assert!(result.checked(Modality::Audio).is_err());

        let mut result = sample(true);
        result.visual_analysis.as_mut().unwrap().metrics[0].score = -1.0;
        assert!(result.checked(Modality::Video).is_err());

        let mut result = sample(false);
        result.metrics[0].score = f64::NAN;
        assert!(result.checked(Modality::Audio).is_err());
    }

    #[test]
    fn boundary_scores_are_accepted() {
        let mut result = sample(false);
        result.overall_score = 0.0;
        result.metrics[0].score = 100.0;
        assert!(result.checked(Modality::Audio).is_ok());
    }
}
