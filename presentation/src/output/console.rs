//! Console formatter for review reports

use colored::{ColoredString, Colorize};
use warden_domain::{Recommendation, ReviewReport, Severity};

/// Formats review reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &ReviewReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Review Report"));
        output.push('\n');

        output.push_str(&format!("{}\n\n", report.summary));

        output.push_str(&format!(
            "  Score: {}   Recommendation: {}   Files reviewed: {}\n",
            Self::score_colored(report.overall_score),
            Self::recommendation_colored(report.recommendation),
            report.files_reviewed
        ));

        if report.comments.is_empty() {
            output.push_str(&format!("\n{}\n", "No issues found - clean change.".green()));
            return output;
        }

        output.push_str(&format!(
            "\n{} ({}):\n",
            "Comments".cyan().bold(),
            report.comments.len()
        ));
        for comment in &report.comments {
            let location = match comment.line {
                Some(line) => format!("{}:{}", comment.file, line),
                None => comment.file.clone(),
            };
            let verified = if comment.verified { " [verified]" } else { "" };
            output.push_str(&format!(
                "\n  {} {} ({}){}\n    {}\n",
                Self::severity_colored(comment.severity),
                location.bold(),
                comment.category,
                verified.dimmed(),
                comment.message
            ));
            if let Some(suggestion) = &comment.suggestion {
                output.push_str(&format!("    {} {}\n", "fix:".dimmed(), suggestion.dimmed()));
            }
        }

        output
    }

    /// Format as raw JSON
    pub fn format_json(report: &ReviewReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        format!(
            "{}\n{}\n",
            format!("=== {title} ===").blue().bold(),
            "=".repeat(title.len() + 8).blue()
        )
    }

    fn score_colored(score: u8) -> ColoredString {
        let text = format!("{score}/100");
        if score >= 80 {
            text.green().bold()
        } else if score >= 50 {
            text.yellow().bold()
        } else {
            text.red().bold()
        }
    }

    fn recommendation_colored(recommendation: Recommendation) -> ColoredString {
        match recommendation {
            Recommendation::Approve => recommendation.to_string().green().bold(),
            Recommendation::RequestChanges => recommendation.to_string().red().bold(),
        }
    }

    fn severity_colored(severity: Severity) -> ColoredString {
        let tag = format!("[{}]", severity.as_str().to_uppercase());
        match severity {
            Severity::Critical => tag.red().bold(),
            Severity::Warning => tag.yellow(),
            Severity::Suggestion => tag.cyan(),
            Severity::Nitpick => tag.dimmed(),
        }
    }
}
