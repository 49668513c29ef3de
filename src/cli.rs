//! CLI argument parsing.
use clap::Parser;

/// Arguments for a single announcement run.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Package name override. Falls back to the name field in package.json.
    pub package: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_override() {
        let args = Args::parse_from(["release-herald", "my-service"]);
        assert_eq!(args.package.as_deref(), Some("my-service"));
        assert!(!args.debug);
    }

    #[test]
    fn package_override_is_optional() {
        let args = Args::parse_from(["release-herald", "--debug"]);
        assert!(args.package.is_none());
        assert!(args.debug);
    }
}
