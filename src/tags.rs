//! Resolution of the previous production release tag and its version.
use log::*;
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    error::HeraldError, result::Result, vcs::VersionControlClient,
};

/// Naming convention for tags marking releases already deployed.
pub const PROD_TAG_PATTERN: &str = "production-*";

/// Commit subjects announcing a version start with a leading `v`.
static VERSION_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v").unwrap());

/// The production tag to announce against and the version it shipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousRelease {
    /// Latest relevant `production-*` tag.
    pub prod_tag: String,
    /// Version tag announced in the commit subject at that tag.
    pub version_tag: String,
}

impl PreviousRelease {
    /// Version tag normalized to a leading `v`.
    pub fn old_version(&self) -> String {
        if self.version_tag.starts_with('v') {
            self.version_tag.clone()
        } else {
            format!("v{}", self.version_tag)
        }
    }
}

/// Find the production tag the next announcement should diff against.
///
/// Picks the last `production-*` tag in refname order. If that tag sits on
/// the current commit the release has already been tagged at HEAD, so the
/// second-to-last tag is used instead. Fails when no production tags exist
/// or when the only one sits on HEAD.
pub fn resolve_previous_release(
    client: &dyn VersionControlClient,
) -> Result<PreviousRelease> {
    let tags = client.list_tags(PROD_TAG_PATTERN)?;

    let Some(mut prod_tag) = tags.last().cloned() else {
        return Err(HeraldError::NoProductionTags {
            pattern: PROD_TAG_PATTERN.into(),
        }
        .into());
    };

    let head_commit = client.rev_list_single("HEAD")?;
    let tagged_commit = client.rev_list_single(&prod_tag)?;

    if head_commit == tagged_commit {
        debug!(
            "tag {prod_tag} points at HEAD, using the previous production tag"
        );
        let previous = tags
            .len()
            .checked_sub(2)
            .and_then(|index| tags.get(index));

        match previous {
            Some(tag) => prod_tag = tag.clone(),
            None => {
                return Err(HeraldError::NoPreviousRelease {
                    tag: prod_tag,
                }
                .into());
            }
        }
    }

    let version_tag = find_version_subject(client, &prod_tag)?;

    Ok(PreviousRelease {
        prod_tag,
        version_tag,
    })
}

/// First commit subject at `tag` that looks like a version announcement.
///
/// Some repositories tag the commit after the version bump, so when the
/// subject at the tag itself doesn't match, the commit one step earlier is
/// checked as well.
fn find_version_subject(
    client: &dyn VersionControlClient,
    tag: &str,
) -> Result<String> {
    for skip in 0..=1 {
        let subject = client
            .log_subject(tag, skip)?
            .into_iter()
            .find(|line| VERSION_SUBJECT.is_match(line));

        if let Some(subject) = subject {
            return Ok(subject);
        }
    }

    Err(HeraldError::VersionTagNotFound { tag: tag.into() }.into())
}
