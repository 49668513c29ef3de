//! Codeowner collection from CODEOWNERS files.
use log::*;
use std::{collections::BTreeSet, fs, path::Path};

use crate::{result::Result, vcs::VersionControlClient};

/// Glob matching CODEOWNERS files anywhere in the repository.
pub const CODEOWNERS_PATTERN: &str = "*CODEOWNERS";

/// Collect the deduplicated set of codeowner usernames.
///
/// Usernames are lowercased and stored without their leading `@`. Files
/// that cannot be read are tolerated silently, yielding a smaller (possibly
/// empty) set.
pub fn collect(
    client: &dyn VersionControlClient,
    root: &Path,
) -> Result<BTreeSet<String>> {
    let mut owners = BTreeSet::new();

    for file in client.list_files(CODEOWNERS_PATTERN)? {
        let path = root.join(&file);
        match fs::read_to_string(&path) {
            Ok(content) => parse_into(&content, &mut owners),
            Err(err) => {
                debug!(
                    "skipping unreadable codeowners file {}: {err}",
                    path.display()
                );
            }
        }
    }

    Ok(owners)
}

/// Parse one CODEOWNERS file into the accumulating owner set.
///
/// Each non-comment line is a path pattern followed by owner tokens; the
/// pattern token is discarded.
fn parse_into(content: &str, owners: &mut BTreeSet<String>) {
    for line in content.to_lowercase().lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for token in line.split_whitespace().skip(1) {
            let owner = token.strip_prefix('@').unwrap_or(token);
            if !owner.is_empty() {
                owners.insert(owner.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::MockVersionControlClient;
    use std::fs;

    #[test]
    fn deduplicates_owners_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CODEOWNERS"), "* @alice @bob\n").unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/CODEOWNERS"), "* @bob\n").unwrap();

        let mut client = MockVersionControlClient::new();
        client.expect_list_files().returning(|_| {
            Ok(vec!["CODEOWNERS".to_string(), "docs/CODEOWNERS".to_string()])
        });

        let owners = collect(&client, dir.path()).unwrap();
        let expected: BTreeSet<String> =
            ["alice".to_string(), "bob".to_string()].into_iter().collect();
        assert_eq!(owners, expected);
    }

    #[test]
    fn owners_are_case_insensitive() {
        let mut owners = BTreeSet::new();
        parse_into("* @Alice @BOB\nsrc/ @alice\n", &mut owners);
        assert_eq!(owners.len(), 2);
        assert!(owners.contains("alice"));
        assert!(owners.contains("bob"));
    }

    #[test]
    fn skips_comments_blank_lines_and_path_patterns() {
        let mut owners = BTreeSet::new();
        parse_into(
            "# maintainers\n\n*.rs @carol\n/infra @dave ops@example.com\n",
            &mut owners,
        );
        let expected: BTreeSet<String> = [
            "carol".to_string(),
            "dave".to_string(),
            "ops@example.com".to_string(),
        ]
        .into_iter()
        .collect();
        assert_eq!(owners, expected);
    }

    #[test]
    fn missing_files_yield_empty_set() {
        let dir = tempfile::tempdir().unwrap();

        let mut client = MockVersionControlClient::new();
        client
            .expect_list_files()
            .returning(|_| Ok(vec!["CODEOWNERS".to_string()]));

        let owners = collect(&client, dir.path()).unwrap();
        assert!(owners.is_empty());
    }
}
