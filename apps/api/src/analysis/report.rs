//! View models and JSON export for analysis results.
//!
//! Views carry everything a UI needs to draw the score badge, the match
//! overview chart, the keyword bars and the summary. Exports are the
//! downloadable reports, pretty-printed with 4-space indentation.

use serde::Serialize;

use crate::analysis::aggregator::{BatchEntry, EntryOutcome};
use crate::analysis::interpreter::{AnalysisResult, MatchReport};

pub const SINGLE_EXPORT_FILENAME: &str = "resume_analysis_report.json";
pub const BATCH_EXPORT_FILENAME: &str = "batch_resume_analysis.json";

const EXCELLENT_THRESHOLD: f64 = 85.0;
const GOOD_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBadge {
    Excellent,
    Good,
    NeedsImprovement,
}

impl MatchBadge {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= EXCELLENT_THRESHOLD {
            MatchBadge::Excellent
        } else if percentage >= GOOD_THRESHOLD {
            MatchBadge::Good
        } else {
            MatchBadge::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBadge::Excellent => "Excellent",
            MatchBadge::Good => "Good",
            MatchBadge::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Two-slice "Match Overview" series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOverview {
    #[serde(rename = "match")]
    pub matched: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordBar {
    pub keyword: String,
    pub importance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultView {
    Structured {
        match_percentage: f64,
        badge: MatchBadge,
        badge_label: &'static str,
        overview: MatchOverview,
        missing_keywords: Vec<String>,
        keyword_bars: Vec<KeywordBar>,
        profile_summary: String,
    },
    Raw {
        raw_response: String,
    },
    Failed {
        error: String,
    },
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Structured(report) => Self::from_report(report),
            AnalysisResult::RawFallback { raw_response } => ResultView::Raw {
                raw_response: raw_response.clone(),
            },
        }
    }

    fn from_report(report: &MatchReport) -> Self {
        let percentage = report.normalized_percentage();
        let badge = MatchBadge::for_percentage(percentage);
        let keywords = report.missing_keywords().to_vec();
        let keyword_bars = keywords
            .iter()
            .map(|k| KeywordBar {
                keyword: k.clone(),
                importance: 1,
            })
            .collect();

        ResultView::Structured {
            match_percentage: percentage,
            badge,
            badge_label: badge.label(),
            overview: MatchOverview {
                matched: percentage,
                gap: (100.0 - percentage).max(0.0),
            },
            missing_keywords: keywords,
            keyword_bars,
            profile_summary: report.profile_summary().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntryView {
    pub filename: String,
    #[serde(flatten)]
    pub view: ResultView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchView {
    pub entries: Vec<BatchEntryView>,
    pub analyzed: usize,
    pub failed: usize,
}

impl BatchView {
    pub fn from_batch(batch: &[BatchEntry]) -> Self {
        let entries: Vec<BatchEntryView> = batch
            .iter()
            .map(|entry| BatchEntryView {
                filename: entry.filename.clone(),
                view: match &entry.outcome {
                    EntryOutcome::Analyzed(result) => ResultView::from_result(result),
                    EntryOutcome::Failed { error } => ResultView::Failed {
                        error: error.clone(),
                    },
                },
            })
            .collect();
        let failed = entries
            .iter()
            .filter(|e| matches!(e.view, ResultView::Failed { .. }))
            .count();

        Self {
            analyzed: entries.len() - failed,
            failed,
            entries,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

/// Serializes `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_result(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    to_pretty_json(result)
}

pub fn export_batch(batch: &[BatchEntry]) -> Result<String, serde_json::Error> {
    to_pretty_json(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::interpreter::interpret;

    const REPLY: &str = r#"{"JD Match":"72%","MissingKeywords":["SQL","Docker","Kafka"],"Profile Summary":"Solid backend profile"}"#;

    #[test]
    fn test_badge_thresholds() {
        assert_eq!(MatchBadge::for_percentage(85.0), MatchBadge::Excellent);
        assert_eq!(MatchBadge::for_percentage(99.5), MatchBadge::Excellent);
        assert_eq!(MatchBadge::for_percentage(84.9), MatchBadge::Good);
        assert_eq!(MatchBadge::for_percentage(60.0), MatchBadge::Good);
        assert_eq!(MatchBadge::for_percentage(59.9), MatchBadge::NeedsImprovement);
        assert_eq!(MatchBadge::for_percentage(0.0), MatchBadge::NeedsImprovement);
    }

    #[test]
    fn test_structured_view_carries_chart_series() {
        let view = ResultView::from_result(&interpret(REPLY));
        let ResultView::Structured {
            match_percentage,
            badge,
            overview,
            keyword_bars,
            ..
        } = view
        else {
            panic!("expected structured view");
        };
        assert_eq!(match_percentage, 72.0);
        assert_eq!(badge, MatchBadge::Good);
        assert_eq!(overview, MatchOverview { matched: 72.0, gap: 28.0 });
        assert_eq!(keyword_bars.len(), 3);
        assert!(keyword_bars.iter().all(|b| b.importance == 1));
        assert_eq!(keyword_bars[2].keyword, "Kafka");
    }

    #[test]
    fn test_overview_gap_never_negative() {
        let view = ResultView::from_result(&interpret(r#"{"JD Match":"120%"}"#));
        let ResultView::Structured { overview, .. } = view else {
            panic!("expected structured view");
        };
        assert_eq!(overview.gap, 0.0);
    }

    #[test]
    fn test_view_uses_defaults_for_missing_fields() {
        let view = ResultView::from_result(&interpret("{}"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "structured");
        assert_eq!(json["match_percentage"], 0.0);
        assert_eq!(json["badge"], "needs_improvement");
        assert_eq!(json["profile_summary"], "No summary provided.");
        assert_eq!(json["missing_keywords"], serde_json::json!([]));
    }

    #[test]
    fn test_raw_view() {
        let view = ResultView::from_result(&interpret("plain prose"));
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"status": "raw", "raw_response": "plain prose"})
        );
    }

    #[test]
    fn test_export_round_trip_preserves_fields() {
        let original = interpret(REPLY);
        let exported = export_result(&original).unwrap();
        let reparsed = interpret(&exported);

        let (a, b) = (original.report().unwrap(), reparsed.report().unwrap());
        assert_eq!(a.match_percentage(), b.match_percentage());
        assert_eq!(a.missing_keywords(), b.missing_keywords());
        assert_eq!(a.profile_summary(), b.profile_summary());
    }

    #[test]
    fn test_export_uses_four_space_indent_and_stable_keys() {
        let exported = export_result(&interpret(REPLY)).unwrap();
        assert!(exported.starts_with("{\n    \"JD Match\": \"72%\",\n"));
        assert!(exported.contains("\n    \"MissingKeywords\": [\n        \"SQL\",\n"));
        assert!(exported.contains("\"Profile Summary\": \"Solid backend profile\""));
    }

    #[test]
    fn test_batch_export_and_view() {
        let batch = vec![
            BatchEntry {
                filename: "A.pdf".to_string(),
                outcome: EntryOutcome::Analyzed(interpret(REPLY)),
            },
            BatchEntry {
                filename: "B.docx".to_string(),
                outcome: EntryOutcome::Failed {
                    error: "Could not extract text".to_string(),
                },
            },
            BatchEntry {
                filename: "C.pdf".to_string(),
                outcome: EntryOutcome::Analyzed(interpret("oops")),
            },
        ];

        let exported: serde_json::Value =
            serde_json::from_str(&export_batch(&batch).unwrap()).unwrap();
        assert_eq!(exported[0]["filename"], "A.pdf");
        assert_eq!(exported[0]["JD Match"], "72%");
        assert_eq!(exported[1]["error"], "Could not extract text");
        assert_eq!(exported[2]["raw_response"], "oops");

        let view = BatchView::from_batch(&batch);
        assert_eq!(view.analyzed, 2);
        assert_eq!(view.failed, 1);
        let names: Vec<_> = view.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["A.pdf", "B.docx", "C.pdf"]);
    }
}
