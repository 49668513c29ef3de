//! Changelog delta computation and notable change extraction.
//!
//! The delta is the set of added/removed lines in `CHANGELOG.md` between the
//! previously announced version tag and the working tree. Line
//! classification is driven by declarative pattern tables rather than inline
//! literals so the rules stay testable in isolation.
use log::*;
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    error::HeraldError, result::Result, vcs::VersionControlClient,
};

/// Changelog file diffed between releases.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Added/removed content lines of a unified diff.
static DELTA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]").unwrap());

/// File header lines emitted by `git diff` that also start with `+`/`-`.
static DIFF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- a/|^\+\+\+ b/").unwrap());

/// Markdown heading announcing a release version.
static CHANGELOG_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\W+(\d+\.\d+\.\d+)").unwrap());

/// Trailing bracket annotation on a bullet, e.g. ` [#1234]`.
static BRACKET_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \[.+\]$").unwrap());

/// Bullet descriptions starting with this marker are dependency-bump noise.
const DEPENDENCY_NOISE_MARKER: &str = "Update dependencies [";

/// One rule of the notable-change classification table.
struct NotablePattern {
    /// Matcher with a `desc` capture group for the change description.
    matcher: Regex,
    /// Bullet nesting level the description is re-emitted at.
    level: usize,
}

/// Notable bullets: top-level, quoted one level deep, or a collapsible
/// summary heading.
static NOTABLE_PATTERNS: LazyLock<Vec<NotablePattern>> = LazyLock::new(|| {
    [
        (r"^\* (?<desc>.+)$", 0),
        (r"^>{1,2} ?\* (?<desc>.+)$", 1),
        (r"^>? ?<details><summary>(?<desc>.+?)</summary>", 1),
    ]
    .into_iter()
    .map(|(pattern, level)| NotablePattern {
        matcher: Regex::new(pattern).unwrap(),
        level,
    })
    .collect()
});

/// Compute the raw changelog delta since `prev_version_tag`.
///
/// Zero-context diff between the tag and the working tree, keeping only
/// added/removed content lines and discarding diff metadata.
pub fn diff_changelog(
    client: &dyn VersionControlClient,
    prev_version_tag: &str,
) -> Result<Vec<String>> {
    let lines = client.diff_file(prev_version_tag, CHANGELOG_FILE)?;

    Ok(lines
        .into_iter()
        .filter(|line| {
            DELTA_LINE.is_match(line) && !DIFF_HEADER.is_match(line)
        })
        .collect())
}

/// Strip the leading `+` so added lines read as plain changelog content.
///
/// Removed lines keep their `-` prefix, which also keeps them out of the
/// notable-change patterns.
pub fn normalize_delta(delta: &[String]) -> Vec<String> {
    delta
        .iter()
        .map(|line| line.strip_prefix('+').unwrap_or(line).to_string())
        .collect()
}

/// Extract the new version from the delta's leading heading line.
///
/// The version heading must appear in the first or second delta line. A
/// malformed changelog would otherwise silently produce a wrong
/// announcement, so the delta is dumped to the error log before failing.
pub fn extract_new_version(delta: &[String]) -> Result<String> {
    for line in delta.iter().take(2) {
        if let Some(caps) = CHANGELOG_VERSION.captures(line) {
            let version = semver::Version::parse(&caps[1])
                .map_err(HeraldError::from)?;
            return Ok(format!("v{version}"));
        }
    }

    error!("couldn't find latest non-prod version in changelog delta");
    for line in delta {
        error!("delta: {line}");
    }

    Err(HeraldError::VersionNotInDelta.into())
}

/// Classify normalized delta lines as notable changes, in source order.
pub fn extract_notable_changes(changelog: &[String]) -> Vec<String> {
    let mut notable = vec![];

    for line in changelog {
        for pattern in NOTABLE_PATTERNS.iter() {
            let Some(caps) = pattern.matcher.captures(line) else {
                continue;
            };

            let desc = &caps["desc"];
            if !desc.starts_with(DEPENDENCY_NOISE_MARKER) {
                let desc = BRACKET_ANNOTATION.replace(desc, "");
                let indent = "  ".repeat(pattern.level);
                notable.push(format!("{indent}* {desc}"));
            }
            break;
        }
    }

    notable
}
