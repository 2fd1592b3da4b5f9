//! Strict parse-then-validate for the terminal report.

use super::entities::ReviewReport;
use thiserror::Error;

/// A report payload that failed validation.
///
/// The offending payload travels with the error so callers can surface
/// it verbatim for diagnosis.
#[derive(Error, Debug)]
pub enum ReportValidationError {
    #[error("report payload is not valid JSON for the report schema: {reason}")]
    Malformed { reason: String, payload: String },

    #[error("overall_score {score} is outside the range 0-100")]
    ScoreOutOfRange { score: u8, payload: String },

    #[error("total_issues is {total_issues} but the report carries {comment_count} comments")]
    IssueCountMismatch {
        total_issues: u32,
        comment_count: usize,
        payload: String,
    },
}

impl ReportValidationError {
    /// The raw payload that failed, verbatim.
    pub fn payload(&self) -> &str {
        match self {
            ReportValidationError::Malformed { payload, .. }
            | ReportValidationError::ScoreOutOfRange { payload, .. }
            | ReportValidationError::IssueCountMismatch { payload, .. } => payload,
        }
    }
}

impl ReviewReport {
    /// Parse raw terminal output into a validated report.
    ///
    /// All-or-nothing: structural parse first (missing fields and
    /// out-of-set enums fail here), then the numeric invariants. No
    /// coercion is attempted on failure.
    pub fn parse(raw: &str) -> Result<ReviewReport, ReportValidationError> {
        let report: ReviewReport =
            serde_json::from_str(raw).map_err(|e| ReportValidationError::Malformed {
                reason: e.to_string(),
                payload: raw.to_string(),
            })?;
        report.validate(raw)?;
        Ok(report)
    }

    /// Check the cross-field invariants on an already-parsed report.
    fn validate(&self, raw: &str) -> Result<(), ReportValidationError> {
        if self.overall_score > 100 {
            return Err(ReportValidationError::ScoreOutOfRange {
                score: self.overall_score,
                payload: raw.to_string(),
            });
        }
        if self.total_issues as usize != self.comments.len() {
            return Err(ReportValidationError::IssueCountMismatch {
                total_issues: self.total_issues,
                comment_count: self.comments.len(),
                payload: raw.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::entities::{Category, Recommendation, ReviewComment, Severity};

    fn clean_payload() -> &'static str {
        r#"{
            "summary": "Small, well-scoped change.",
            "comments": [],
            "overall_score": 95,
            "recommendation": "approve",
            "files_reviewed": 3,
            "total_issues": 0
        }"#
    }

    #[test]
    fn test_accepts_clean_report() {
        let report = ReviewReport::parse(clean_payload()).unwrap();
        assert_eq!(report.overall_score, 95);
        assert_eq!(report.recommendation, Recommendation::Approve);
        assert_eq!(report.files_reviewed, 3);
        assert!(report.comments.is_empty());
    }

    #[test]
    fn test_rejects_issue_count_mismatch() {
        let payload = clean_payload().replace("\"total_issues\": 0", "\"total_issues\": 1");
        let err = ReviewReport::parse(&payload).unwrap_err();
        assert!(matches!(
            err,
            ReportValidationError::IssueCountMismatch {
                total_issues: 1,
                comment_count: 0,
                ..
            }
        ));
        assert!(err.payload().contains("\"total_issues\": 1"));
    }

    #[test]
    fn test_rejects_score_out_of_range() {
        let payload = clean_payload().replace("95", "101");
        let err = ReviewReport::parse(&payload).unwrap_err();
        assert!(matches!(
            err,
            ReportValidationError::ScoreOutOfRange { score: 101, .. }
        ));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let payload = r#"{"summary": "no score", "comments": [],
            "recommendation": "approve", "files_reviewed": 1, "total_issues": 0}"#;
        let err = ReviewReport::parse(payload).unwrap_err();
        assert!(matches!(err, ReportValidationError::Malformed { .. }));
        assert_eq!(err.payload(), payload);
    }

    #[test]
    fn test_rejects_unknown_enum_value() {
        let payload = clean_payload().replace("approve", "merge_now");
        assert!(matches!(
            ReviewReport::parse(&payload),
            Err(ReportValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            ReviewReport::parse("not json at all"),
            Err(ReportValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_round_trip_preserves_report() {
        let report = ReviewReport {
            summary: "One real issue, one nit.".into(),
            comments: vec![
                ReviewComment {
                    file: "src/auth.py".into(),
                    line: Some(88),
                    severity: Severity::Critical,
                    category: Category::Security,
                    message: "token compared with ==".into(),
                    suggestion: Some("use hmac.compare_digest".into()),
                    verified: true,
                },
                ReviewComment {
                    file: "src/auth.py".into(),
                    line: None,
                    severity: Severity::Nitpick,
                    category: Category::Style,
                    message: "module docstring missing".into(),
                    suggestion: None,
                    verified: false,
                },
            ],
            overall_score: 40,
            recommendation: Recommendation::RequestChanges,
            files_reviewed: 1,
            total_issues: 2,
        };

        let serialized = serde_json::to_string(&report).unwrap();
        let reparsed = ReviewReport::parse(&serialized).unwrap();
        assert_eq!(reparsed, report);
    }
}
