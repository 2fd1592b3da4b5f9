//! Pull request locators and review targets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors identifying a review target
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid pull request URL: {0} (expected https://host/owner/repo/pull/<number>)")]
    InvalidUrl(String),

    #[error("Pull request number is not a valid integer: {0}")]
    InvalidNumber(String),
}

/// Identifies one pull request on a code host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrLocator {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrLocator {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse a PR URL of the form `https?://host/owner/repo/pull/<number>`.
    ///
    /// Validation happens here, before any network call; a malformed URL
    /// never reaches the code host.
    pub fn parse(url: &str) -> Result<Self, TargetError> {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| TargetError::InvalidUrl(url.to_string()))?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let _host = segments
            .next()
            .ok_or_else(|| TargetError::InvalidUrl(url.to_string()))?;
        let owner = segments
            .next()
            .ok_or_else(|| TargetError::InvalidUrl(url.to_string()))?;
        let repo = segments
            .next()
            .ok_or_else(|| TargetError::InvalidUrl(url.to_string()))?;

        if segments.next() != Some("pull") {
            return Err(TargetError::InvalidUrl(url.to_string()));
        }
        let number = segments
            .next()
            .ok_or_else(|| TargetError::InvalidUrl(url.to_string()))?;
        let number: u64 = number
            .parse()
            .map_err(|_| TargetError::InvalidNumber(number.to_string()))?;

        Ok(Self::new(owner, repo, number))
    }
}

impl std::fmt::Display for PrLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// What the pipeline is asked to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewTarget {
    /// A pull request on the code host.
    PullRequest(PrLocator),
    /// A unified diff file on local disk.
    LocalDiff(PathBuf),
}

impl ReviewTarget {
    /// Classify a CLI input: URLs become PR locators, anything else is
    /// treated as a local diff path.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        if input.starts_with("http://") || input.starts_with("https://") {
            Ok(ReviewTarget::PullRequest(PrLocator::parse(input)?))
        } else {
            Ok(ReviewTarget::LocalDiff(PathBuf::from(input)))
        }
    }

    /// Short description used in the opening review request.
    pub fn describe(&self) -> String {
        match self {
            ReviewTarget::PullRequest(pr) => format!("pull request {pr}"),
            ReviewTarget::LocalDiff(path) => format!("local diff {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pr_url() {
        let pr = PrLocator::parse("https://host/acme/widgets/pull/42").unwrap();
        assert_eq!(pr.owner, "acme");
        assert_eq!(pr.repo, "widgets");
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn test_parse_github_url_with_http() {
        let pr = PrLocator::parse("http://github.com/rust-lang/cargo/pull/12345").unwrap();
        assert_eq!(pr.owner, "rust-lang");
        assert_eq!(pr.repo, "cargo");
        assert_eq!(pr.number, 12345);
    }

    #[test]
    fn test_parse_rejects_missing_pull_segment() {
        let err = PrLocator::parse("https://host/acme/widgets/issues/42").unwrap_err();
        assert!(matches!(err, TargetError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_rejects_missing_number() {
        assert!(PrLocator::parse("https://host/acme/widgets/pull").is_err());
        assert!(PrLocator::parse("https://host/acme/widgets").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_number() {
        let err = PrLocator::parse("https://host/acme/widgets/pull/latest").unwrap_err();
        assert_eq!(err, TargetError::InvalidNumber("latest".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_http_scheme() {
        assert!(PrLocator::parse("ssh://host/acme/widgets/pull/1").is_err());
        assert!(PrLocator::parse("acme/widgets/pull/1").is_err());
    }

    #[test]
    fn test_review_target_classification() {
        let target = ReviewTarget::parse("https://github.com/acme/widgets/pull/7").unwrap();
        assert!(matches!(target, ReviewTarget::PullRequest(_)));

        let target = ReviewTarget::parse("changes.diff").unwrap();
        assert_eq!(target, ReviewTarget::LocalDiff(PathBuf::from("changes.diff")));
    }

    #[test]
    fn test_display() {
        let pr = PrLocator::new("acme", "widgets", 42);
        assert_eq!(pr.to_string(), "acme/widgets#42");
    }
}
