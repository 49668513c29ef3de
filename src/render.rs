//! Rendering of the fixed deploy request and release notes block.
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::result::Result;

/// Delta line count above which the full changelog is wrapped in
/// collapsible markup.
pub const COLLAPSE_THRESHOLD: usize = 30;

/// Tera template for the whole announcement.
pub const ANNOUNCEMENT_TEMPLATE: &str = r#"================================ Deploy request ================================

#devops please deploy #{{ package_name }} {{ new_version }} to production
cc: <everyone that's in the changelog and/or should know about this>
{% if codeowner_mentions %}cc: {{ codeowner_mentions }}
{% endif %}
================================ Release notes =================================

#release-notes #{{ package_name }}
# {{ package_title }} release notes {{ date }}

The {{ module_name }} has been updated from {{ old_version }} to {{ new_version }}

Notable changes
* <only keep the important and rephrase>
{% for line in notable_changes %}{{ line }}
{% endfor %}
{% if collapse_changelog %}<details><summary>Full changelog</summary>

{% endif %}{% for line in changelog %}{{ line }}
{% endfor %}{% if collapse_changelog %}</details>
{% endif %}
================================================================================"#;

/// First character of each whitespace-delimited token.
static TITLE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w\S*").unwrap());

/// Everything the announcement template needs, computed once per run.
#[derive(Debug, Serialize)]
pub struct ReleaseContext {
    /// Resolved package name, after alias substitution.
    pub package_name: String,
    /// Title-cased package name for the release notes heading.
    pub package_title: String,
    /// Module name the update sentence refers to.
    pub module_name: String,
    /// Previously deployed version tag, `v` prefixed.
    pub old_version: String,
    /// Version tag being announced, `v` prefixed.
    pub new_version: String,
    /// Current UTC date, `YYYY-MM-DD`.
    pub date: String,
    /// `@`-mention list of codeowners, absent when none were found.
    pub codeowner_mentions: Option<String>,
    /// Notable changes, already formatted as bullets.
    pub notable_changes: Vec<String>,
    /// Full normalized changelog delta.
    pub changelog: Vec<String>,
    /// Whether the full delta is wrapped in collapsible markup.
    pub collapse_changelog: bool,
}

/// Render the announcement for the given context.
pub fn render(context: &ReleaseContext) -> Result<String> {
    let tera_context = tera::Context::from_serialize(context)?;
    let rendered =
        tera::Tera::one_off(ANNOUNCEMENT_TEMPLATE, &tera_context, false)?;
    Ok(rendered.trim().to_string())
}

/// Capitalize the first letter of each whitespace-delimited token and
/// lowercase the rest.
///
/// This is deliberately the simple word-boundary algorithm, so
/// `my-package` becomes `My-package`, not `My-Package`.
pub fn to_title_case(input: &str) -> String {
    TITLE_WORD
        .replace_all(input, |caps: &regex::Captures| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>()
                        + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .into_owned()
}
