//! Structured review report entities.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Review comment severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
    Nitpick,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
            Severity::Nitpick => "nitpick",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review comment categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Correctness,
    Security,
    Performance,
    Maintainability,
    Style,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Correctness => "correctness",
            Category::Security => "security",
            Category::Performance => "performance",
            Category::Maintainability => "maintainability",
            Category::Style => "style",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final review recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    RequestChanges,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approve => "approve",
            Recommendation::RequestChanges => "request_changes",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single review comment on a specific file/line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// File path relative to repo root
    pub file: String,
    /// Line number in the file (None for file-level comments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Issue severity level
    pub severity: Severity,
    /// Issue category
    pub category: Category,
    /// Description of the issue found
    pub message: String,
    /// Concrete fix or improvement suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether the Verifier stage confirmed this issue against the code
    #[serde(default)]
    pub verified: bool,
}

/// Final structured review report produced by the Reporter stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Human-readable 2-4 sentence summary of the review
    pub summary: String,
    /// All review comments, ordered by severity
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
    /// Overall quality score from 0 (worst) to 100 (best)
    pub overall_score: u8,
    /// Final recommendation
    pub recommendation: Recommendation,
    /// Total number of files reviewed
    pub files_reviewed: u32,
    /// Total number of issues found across all files
    pub total_issues: u32,
}

impl ReviewReport {
    /// The strict JSON Schema the Reporter agent is constrained to.
    ///
    /// Hand-maintained rather than derived: the platform's structured
    /// output feature rejects schemas with non-standard keywords, so the
    /// shape stays minimal and explicit.
    pub fn json_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Human-readable 2-4 sentence summary of the review"
                },
                "comments": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "file": { "type": "string" },
                            "line": { "type": ["integer", "null"] },
                            "severity": {
                                "type": "string",
                                "enum": ["critical", "warning", "suggestion", "nitpick"]
                            },
                            "category": {
                                "type": "string",
                                "enum": ["correctness", "security", "performance",
                                         "maintainability", "style"]
                            },
                            "message": { "type": "string" },
                            "suggestion": { "type": ["string", "null"] },
                            "verified": { "type": "boolean" }
                        },
                        "required": ["file", "severity", "category", "message"]
                    }
                },
                "overall_score": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 100
                },
                "recommendation": {
                    "type": "string",
                    "enum": ["approve", "request_changes"]
                },
                "files_reviewed": { "type": "integer", "minimum": 0 },
                "total_issues": { "type": "integer", "minimum": 0 }
            },
            "required": ["summary", "comments", "overall_score", "recommendation",
                         "files_reviewed", "total_issues"]
        })
    }

    /// Count comments at a given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.comments
            .iter()
            .filter(|c| c.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&Recommendation::RequestChanges).unwrap(),
            "\"request_changes\""
        );
        assert_eq!(
            serde_json::to_string(&Category::Maintainability).unwrap(),
            "\"maintainability\""
        );
    }

    #[test]
    fn test_comment_optional_fields_default() {
        let comment: ReviewComment = serde_json::from_str(
            r#"{"file": "src/lib.rs", "severity": "warning",
                "category": "style", "message": "long line"}"#,
        )
        .unwrap();
        assert_eq!(comment.line, None);
        assert_eq!(comment.suggestion, None);
        assert!(!comment.verified);
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = ReviewReport::json_schema();
        let required = schema["required"].as_array().unwrap();
        for field in [
            "summary",
            "comments",
            "overall_score",
            "recommendation",
            "files_reviewed",
            "total_issues",
        ] {
            assert!(required.contains(&json!(field)), "missing {field}");
        }
    }

    #[test]
    fn test_count_by_severity() {
        let report = ReviewReport {
            summary: "ok".into(),
            comments: vec![
                ReviewComment {
                    file: "a.py".into(),
                    line: Some(3),
                    severity: Severity::Critical,
                    category: Category::Correctness,
                    message: "off by one".into(),
                    suggestion: None,
                    verified: true,
                },
                ReviewComment {
                    file: "b.py".into(),
                    line: None,
                    severity: Severity::Nitpick,
                    category: Category::Style,
                    message: "naming".into(),
                    suggestion: None,
                    verified: false,
                },
            ],
            overall_score: 55,
            recommendation: Recommendation::RequestChanges,
            files_reviewed: 2,
            total_issues: 2,
        };
        assert_eq!(report.count_by_severity(Severity::Critical), 1);
        assert_eq!(report.count_by_severity(Severity::Warning), 0);
    }
}
