//! Linked issue extraction from pull request bodies

use lazy_static::lazy_static;
use regex::Regex;

use super::repository::RepositoryId;

lazy_static! {
    /// Patterns naming the issue a pull request fixes, in priority order
    static ref LINKED_ISSUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"Fixes\s#(?P<number>[0-9]{1,5})").unwrap(),
        Regex::new(r"Fixes\sissue\s#(?P<number>[0-9]{1,5})").unwrap(),
        Regex::new(
            r"Fixes\shttps://github\.com/(?P<owner>[^/\s]+)/(?P<repo>[^/\s]+)/issues/(?P<number>[0-9]{1,5})"
        )
        .unwrap(),
    ];
}

/// An issue reference found in a pull request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIssue {
    /// Repository named by a full issue URL; `None` for `#N` references
    pub repository: Option<RepositoryId>,
    pub number: u32,
}

/// Issue reference in a pull request body, with the repository when the
/// body links a full issue URL.
///
/// Same pattern order as [`linked_issue`].
pub fn find_linked_issue(body: &str) -> Option<LinkedIssue> {
    LINKED_ISSUE_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(body)?;
        let number = captures.name("number")?.as_str().parse().ok()?;
        let repository = match (captures.name("owner"), captures.name("repo")) {
            (Some(owner), Some(repo)) => Some(RepositoryId::new(owner.as_str(), repo.as_str())),
            _ => None,
        };
        Some(LinkedIssue { repository, number })
    })
}

/// Issue number referenced by a pull request body.
///
/// Tries `Fixes #N`, then `Fixes issue #N`, then
/// `Fixes https://github.com/OWNER/REPO/issues/N`; the first pattern that
/// matches wins, even when a later one appears earlier in the text.
///
/// ```rust
/// use modcheck::compliance::linking::linked_issue;
///
/// assert_eq!(linked_issue("Fixes #123"), Some(123));
/// assert_eq!(linked_issue("Nothing to see"), None);
/// ```
pub fn linked_issue(body: &str) -> Option<u32> {
    find_linked_issue(body).map(|link| link.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixes_hash() {
        assert_eq!(linked_issue("Fixes #123"), Some(123));
    }

    #[test]
    fn test_fixes_issue_hash() {
        assert_eq!(linked_issue("Fixes issue #45"), Some(45));
    }

    #[test]
    fn test_fixes_url() {
        assert_eq!(
            linked_issue("Fixes https://github.com/PrestaShop/PrestaShop/issues/9999"),
            Some(9999)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(linked_issue(""), None);
        assert_eq!(linked_issue("Closes #12"), None);
        assert_eq!(linked_issue("fixes #12"), None);
        assert_eq!(linked_issue("Fixes https://example.com/issues/12"), None);
    }

    #[test]
    fn test_first_pattern_wins() {
        assert_eq!(linked_issue("Fixes issue #2\nFixes #1"), Some(1));
        assert_eq!(
            linked_issue("Fixes https://github.com/a/b/issues/3 and Fixes issue #2"),
            Some(2)
        );
    }

    #[test]
    fn test_number_is_at_most_five_digits() {
        assert_eq!(linked_issue("Fixes #1234567"), Some(12345));
        assert_eq!(linked_issue("Fixes #"), None);
    }

    #[test]
    fn test_match_inside_pull_request_template() {
        let body = "| Questions | Answers\n|---|---\n| Fixed ticket? | Fixes #31415\n";
        assert_eq!(linked_issue(body), Some(31415));
    }

    #[test]
    fn test_url_reference_keeps_its_repository() {
        assert_eq!(
            find_linked_issue("Fixes https://github.com/acme/widgets/issues/31415"),
            Some(LinkedIssue {
                repository: Some(RepositoryId::new("acme", "widgets")),
                number: 31415,
            })
        );
    }

    #[test]
    fn test_hash_reference_has_no_repository() {
        assert_eq!(
            find_linked_issue("Fixes #7"),
            Some(LinkedIssue {
                repository: None,
                number: 7,
            })
        );
    }
}
