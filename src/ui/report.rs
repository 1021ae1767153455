use std::fmt::{self, Write};

use chrono::{DateTime, Local};

use crate::analysis::AnalysisResult;

const BAR_WIDTH: usize = 20;

/// Rating band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Strong
        } else if score >= 60.0 {
            Self::Fair
        } else {
            Self::NeedsWork
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Fair => "fair",
            Self::NeedsWork => "needs work",
        }
    }
}

/// Render the full feedback report as plain terminal text.
pub fn render_report(result: &AnalysisResult, generated_at: DateTime<Local>) -> String {
    Report {
        result,
        generated_at,
    }
    .to_string()
}

struct Report<'a> {
    result: &'a AnalysisResult,
    generated_at: DateTime<Local>,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.result, self.generated_at)
    }
}

fn write_report(
    out: &mut impl Write,
    result: &AnalysisResult,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    writeln!(out, "Analysis Report ({})", generated_at.format("%Y-%m-%d %H:%M"))?;
    writeln!(out, "Here is how you sounded in your presentation.\n")?;

    writeln!(
        out,
        "OVERALL SCORE  {}/100  [{}]",
        format_score(result.overall_score),
        ScoreBand::for_score(result.overall_score).label()
    )?;
    writeln!(out, "\"{}\"\n", result.summary.trim())?;

    writeln!(out, "PERFORMANCE DIMENSIONS")?;
    let name_width = result
        .metrics
        .iter()
        .map(|m| m.category.chars().count())
        .max()
        .unwrap_or(0);
    for metric in &result.metrics {
        writeln!(
            out,
            "  {:<name_width$}  {}  {:>3}",
            metric.category,
            score_bar(metric.score),
            format_score(metric.score),
        )?;
        writeln!(out, "  {:<name_width$}  {}", "", metric.feedback.trim())?;
    }

    if let Some(visual) = &result.visual_analysis {
        writeln!(out, "\nVISUAL PRESENCE")?;
        writeln!(out, "  {}", visual.general_feedback.trim())?;
        for metric in &visual.metrics {
            writeln!(
                out,
                "  - {}: {}/100 [{}] {}",
                metric.label,
                format_score(metric.score),
                ScoreBand::for_score(metric.score).label(),
                metric.feedback.trim()
            )?;
        }
    }

    write_list(out, "KEY STRENGTHS", "+", &result.strengths)?;
    write_list(out, "AREAS FOR IMPROVEMENT", "->", &result.improvements)?;

    if !result.transcription_snippet.trim().is_empty() {
        writeln!(out, "\nTRANSCRIPT SNIPPET")?;
        writeln!(out, "  \"{}\"", result.transcription_snippet.trim())?;
    }

    Ok(())
}

fn write_list(out: &mut impl Write, title: &str, bullet: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{title}")?;
    for item in items {
        writeln!(out, "  {bullet} {}", item.trim())?;
    }
    Ok(())
}

/// Horizontal bar for a score, `BAR_WIDTH` cells wide.
pub fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Whole scores print without a decimal point.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
