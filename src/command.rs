//! Announcement command: the single end-to-end workflow of this tool.
use chrono::Utc;
use log::*;
use std::{collections::BTreeSet, path::Path};

use crate::{
    changelog, cli, codeowners, config,
    render::{self, COLLAPSE_THRESHOLD, ReleaseContext},
    result::Result,
    tags,
    vcs::{GitCli, VersionControlClient},
};

/// Resolve repository state, render the announcement, print it to stdout.
pub fn execute(args: &cli::Args) -> Result<()> {
    let client = GitCli::new(".");
    let context = build_context(args, &client, Path::new("."))?;
    let announcement = render::render(&context)?;
    println!("{announcement}");
    Ok(())
}

/// Thread repository state through the resolvers into one render context.
pub fn build_context(
    args: &cli::Args,
    client: &dyn VersionControlClient,
    root: &Path,
) -> Result<ReleaseContext> {
    let package_name = config::resolve_package_name(
        args.package.as_deref(),
        &root.join(config::DEFAULT_MANIFEST_FILE),
    )?;
    let module_name = config::module_name(&package_name);
    debug!("announcing package {package_name} (module {module_name})");

    let previous = tags::resolve_previous_release(client)?;
    info!(
        "previous production tag: {} ({})",
        previous.prod_tag, previous.version_tag
    );

    let delta = changelog::diff_changelog(client, &previous.version_tag)?;
    let new_version = changelog::extract_new_version(&delta)?;
    let changelog_lines = changelog::normalize_delta(&delta);
    let notable_changes =
        changelog::extract_notable_changes(&changelog_lines);
    let owners = codeowners::collect(client, root)?;

    Ok(ReleaseContext {
        package_title: render::to_title_case(&package_name),
        module_name,
        old_version: previous.old_version(),
        new_version,
        date: Utc::now().format("%Y-%m-%d").to_string(),
        codeowner_mentions: mentions(&owners),
        collapse_changelog: changelog_lines.len() > COLLAPSE_THRESHOLD,
        notable_changes,
        changelog: changelog_lines,
        package_name,
    })
}

/// Render the owner set as a sorted `@`-mention list.
fn mentions(owners: &BTreeSet<String>) -> Option<String> {
    if owners.is_empty() {
        return None;
    }

    Some(
        owners
            .iter()
            .map(|owner| format!("@{owner}"))
            .collect::<Vec<String>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::MockVersionControlClient;
    use std::fs;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    fn mock_repository() -> MockVersionControlClient {
        let mut client = MockVersionControlClient::new();
        client
            .expect_list_tags()
            .returning(|_| Ok(lines(&["production-001", "production-002"])));
        client
            .expect_rev_list_single()
            .withf(|rev| rev == "HEAD")
            .returning(|_| Ok("head-commit".into()));
        client
            .expect_rev_list_single()
            .withf(|rev| rev == "production-002")
            .returning(|_| Ok("tagged-commit".into()));
        client
            .expect_log_subject()
            .returning(|_, _| Ok(lines(&["v1.1.0"])));
        client.expect_diff_file().returning(|_, _| {
            Ok(lines(&[
                "--- a/CHANGELOG.md",
                "+++ b/CHANGELOG.md",
                "@@ -2,0 +3,3 @@",
                "+## 1.2.0",
                "+* Fixed bug [PR#1]",
                "+* Update dependencies [bump]",
            ]))
        });
        client.expect_list_files().returning(|_| Ok(vec![]));
        client
    }

    #[test]
    fn builds_context_from_repository_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"balena-fleet"}"#,
        )
        .unwrap();

        let args = cli::Args {
            package: None,
            debug: false,
        };
        let client = mock_repository();

        let context = build_context(&args, &client, dir.path()).unwrap();

        assert_eq!(context.package_name, "balena-fleet");
        assert_eq!(context.package_title, "Balena-fleet");
        assert_eq!(context.module_name, "fleet");
        assert_eq!(context.old_version, "v1.1.0");
        assert_eq!(context.new_version, "v1.2.0");
        assert_eq!(context.notable_changes, lines(&["* Fixed bug"]));
        assert_eq!(
            context.changelog,
            lines(&[
                "## 1.2.0",
                "* Fixed bug [PR#1]",
                "* Update dependencies [bump]",
            ])
        );
        assert!(context.codeowner_mentions.is_none());
        assert!(!context.collapse_changelog);
    }

    #[test]
    fn package_override_skips_manifest() {
        let dir = tempfile::tempdir().unwrap();

        let args = cli::Args {
            package: Some("resin-ui".into()),
            debug: false,
        };
        let client = mock_repository();

        let context = build_context(&args, &client, dir.path()).unwrap();
        assert_eq!(context.package_name, "resin-ui");
        assert_eq!(context.module_name, "dashboard");
    }

    #[test]
    fn long_delta_collapses_full_changelog() {
        let dir = tempfile::tempdir().unwrap();

        let mut client = MockVersionControlClient::new();
        client
            .expect_list_tags()
            .returning(|_| Ok(lines(&["production-001", "production-002"])));
        client
            .expect_rev_list_single()
            .withf(|rev| rev == "HEAD")
            .returning(|_| Ok("head-commit".into()));
        client
            .expect_rev_list_single()
            .withf(|rev| rev == "production-002")
            .returning(|_| Ok("tagged-commit".into()));
        client
            .expect_log_subject()
            .returning(|_, _| Ok(lines(&["v1.1.0"])));
        client.expect_diff_file().returning(|_, _| {
            let mut diff = lines(&["+## 1.2.0"]);
            for n in 0..COLLAPSE_THRESHOLD {
                diff.push(format!("+* Change number {n}"));
            }
            Ok(diff)
        });
        client.expect_list_files().returning(|_| Ok(vec![]));

        let args = cli::Args {
            package: Some("balena-fleet".into()),
            debug: false,
        };

        let context = build_context(&args, &client, dir.path()).unwrap();
        assert!(context.collapse_changelog);
    }

    #[test]
    fn formats_codeowner_mentions_sorted() {
        let owners: BTreeSet<String> =
            ["bob".to_string(), "alice".to_string()].into_iter().collect();
        assert_eq!(mentions(&owners).unwrap(), "@alice @bob");
        assert!(mentions(&BTreeSet::new()).is_none());
    }
}
