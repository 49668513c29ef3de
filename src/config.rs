//! Package and module name resolution from the manifest and alias tables.
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{error::HeraldError, result::Result};

/// Default manifest read for the package name.
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Packages announced under a different name than their manifest says.
const PACKAGE_ALIASES: &[(&str, &str)] = &[("balena.io", "resin-api")];

/// Modules announced under a name unrelated to their package name.
const MODULE_ALIASES: &[(&str, &str)] = &[("resin-ui", "dashboard")];

/// Organizational prefixes stripped when deriving the module name.
const ORG_PREFIXES: &[&str] = &["resin-", "balena-"];

/// The slice of `package.json` this tool cares about.
#[derive(Debug, Deserialize)]
struct Manifest {
    name: String,
}

/// Resolve the package name from the CLI override or the manifest.
///
/// The manifest is only required when no override was given. Alias
/// substitution is applied to whichever source won.
pub fn resolve_package_name(
    cli_override: Option<&str>,
    manifest_path: &Path,
) -> Result<String> {
    let name = match cli_override {
        Some(name) => name.to_string(),
        None => read_manifest_name(manifest_path)?,
    };

    Ok(lookup(&name, PACKAGE_ALIASES).unwrap_or(name))
}

/// Derive the module name the announcement refers to.
pub fn module_name(package_name: &str) -> String {
    if let Some(alias) = lookup(package_name, MODULE_ALIASES) {
        return alias;
    }

    let mut module = package_name.to_string();
    for prefix in ORG_PREFIXES {
        module = module.replacen(prefix, "", 1);
    }
    module
}

fn read_manifest_name(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|err| {
        HeraldError::missing_manifest(path.display().to_string(), err.to_string())
    })?;

    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|err| {
            HeraldError::missing_manifest(
                path.display().to_string(),
                err.to_string(),
            )
        })?;

    Ok(manifest.name)
}

fn lookup(name: &str, table: &[(&str, &str)]) -> Option<String> {
    table
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
}
