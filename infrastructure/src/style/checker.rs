//! Static style checks on code snippets.
//!
//! Never fails on malformed input: syntax problems become issue entries
//! in the result, not errors. Python gets a real parse (tree-sitter)
//! plus line-level heuristics; every other language gets the generic
//! whitespace and line-length checks only.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

const MAX_LINE_LENGTH: usize = 120;

/// One style finding, with the 1-based line it was found on.
#[derive(Debug, Clone, Serialize)]
pub struct StyleIssue {
    pub line: usize,
    pub rule: &'static str,
    pub message: String,
}

/// Run style checks on a snippet. Returns a JSON payload:
/// `{"status": "clean", "issues": []}` or
/// `{"status": "issues_found", "count": N, "issues": [...]}`.
pub fn check_style(code: &str, language: &str) -> String {
    let issues = match language.to_lowercase().as_str() {
        "python" | "py" => python_issues(code),
        _ => generic_issues(code),
    };
    debug!(language, count = issues.len(), "style check finished");

    if issues.is_empty() {
        json!({ "status": "clean", "issues": [] }).to_string()
    } else {
        json!({
            "status": "issues_found",
            "count": issues.len(),
            "issues": issues,
        })
        .to_string()
    }
}

fn python_issues(code: &str) -> Vec<StyleIssue> {
    let mut issues = syntax_issues(code);

    for (i, line) in code.lines().enumerate() {
        let line_number = i + 1;
        if line.len() > MAX_LINE_LENGTH {
            issues.push(StyleIssue {
                line: line_number,
                rule: "line-too-long",
                message: format!("Line is {} chars (max {MAX_LINE_LENGTH})", line.len()),
            });
        }
        if line != line.trim_end() {
            issues.push(StyleIssue {
                line: line_number,
                rule: "trailing-whitespace",
                message: "Trailing whitespace".to_string(),
            });
        }
        if line.contains('\t') {
            issues.push(StyleIssue {
                line: line_number,
                rule: "tabs",
                message: "Use spaces instead of tabs".to_string(),
            });
        }
        let stripped = line.trim();
        if stripped == "except:" || stripped.starts_with("except :") {
            issues.push(StyleIssue {
                line: line_number,
                rule: "bare-except",
                message: "Bare except clause, catch specific exceptions".to_string(),
            });
        }
        let upper = line.to_uppercase();
        if ["TODO", "FIXME", "HACK", "XXX"].iter().any(|tag| upper.contains(tag)) {
            issues.push(StyleIssue {
                line: line_number,
                rule: "todo-comment",
                message: "Contains TODO/FIXME/HACK marker".to_string(),
            });
        }
    }

    issues
}

fn generic_issues(code: &str) -> Vec<StyleIssue> {
    let mut issues = Vec::new();
    for (i, line) in code.lines().enumerate() {
        let line_number = i + 1;
        if line.len() > MAX_LINE_LENGTH {
            issues.push(StyleIssue {
                line: line_number,
                rule: "line-too-long",
                message: format!("Line is {} chars (max {MAX_LINE_LENGTH})", line.len()),
            });
        }
        if line != line.trim_end() {
            issues.push(StyleIssue {
                line: line_number,
                rule: "trailing-whitespace",
                message: "Trailing whitespace".to_string(),
            });
        }
    }
    issues
}

/// Parse the snippet as Python and turn ERROR/MISSING nodes into issues.
fn syntax_issues(code: &str) -> Vec<StyleIssue> {
    let mut parser = tree_sitter::Parser::new();
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    if parser.set_language(&language).is_err() {
        return Vec::new();
    }
    let Some(tree) = parser.parse(code, None) else {
        return Vec::new();
    };
    let root = tree.root_node();
    if !root.has_error() {
        return Vec::new();
    }

    let mut issues = Vec::new();
    collect_error_nodes(root, &mut issues);
    if issues.is_empty() {
        // The tree reports an error but no node pinpoints it.
        issues.push(StyleIssue {
            line: 1,
            rule: "syntax-error",
            message: "Code does not parse as Python".to_string(),
        });
    }
    issues
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, issues: &mut Vec<StyleIssue>) {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("Syntax error: missing {}", node.kind())
        } else {
            "Syntax error: unparseable code".to_string()
        };
        issues.push(StyleIssue {
            line: node.start_position().row + 1,
            rule: "syntax-error",
            message,
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn issues_of(payload: &str) -> Vec<Value> {
        let parsed: Value = serde_json::from_str(payload).unwrap();
        parsed["issues"].as_array().unwrap().clone()
    }

    fn rules_of(payload: &str) -> Vec<String> {
        issues_of(payload)
            .iter()
            .map(|i| i["rule"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_clean_python_snippet_reports_clean() {
        let payload = check_style("def add(a, b):\n    return a + b\n", "python");
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["status"], "clean");
        assert!(issues_of(&payload).is_empty());
    }

    #[test]
    fn test_tab_snippet_reports_whitespace_issues() {
        let payload = check_style("x=1\t", "python");
        let rules = rules_of(&payload);
        assert!(rules.contains(&"tabs".to_string()));
        assert!(rules.contains(&"trailing-whitespace".to_string()));
    }

    #[test]
    fn test_syntax_error_becomes_issue_not_failure() {
        let payload = check_style("def broken(:\n    pass\n", "python");
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["status"], "issues_found");
        assert!(rules_of(&payload).contains(&"syntax-error".to_string()));
    }

    #[test]
    fn test_bare_except_and_todo_markers() {
        let code = "try:\n    pass\nexcept:\n    pass  # TODO fix this\n";
        let rules = rules_of(&check_style(code, "python"));
        assert!(rules.contains(&"bare-except".to_string()));
        assert!(rules.contains(&"todo-comment".to_string()));
    }

    #[test]
    fn test_long_line_reports_length() {
        let code = format!("x = \"{}\"\n", "a".repeat(130));
        let issues = issues_of(&check_style(&code, "python"));
        let long = issues
            .iter()
            .find(|i| i["rule"] == "line-too-long")
            .unwrap();
        assert_eq!(long["line"], 1);
    }

    #[test]
    fn test_other_languages_get_generic_checks_only() {
        // Unbalanced braces would be a syntax error in Rust, but only
        // generic checks run for non-Python languages.
        let payload = check_style("fn main() {   \n", "rust");
        let rules = rules_of(&payload);
        assert_eq!(rules, vec!["trailing-whitespace".to_string()]);
    }

    #[test]
    fn test_never_panics_on_garbage() {
        let payload = check_style("\u{0}\u{1}\u{2} not code", "python");
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert!(parsed["status"].is_string());
    }
}
