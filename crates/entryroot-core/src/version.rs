use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version of the CLI's JSON output.
/// Bump this when changing fields in a way that would break consumers.
pub const OUTPUT_SCHEMA_VERSION: u32 = 1;

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    format_version(option_env!("ENTRYROOT_BUILD_GIT_HASH"))
}

fn format_version(git_hash: Option<&str>) -> String {
    let mut s = format!("entryroot {VERSION}");

    if let Some(hash) = git_hash.filter(|h| !h.is_empty()) {
        let _ = write!(s, " ({hash})");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_string_contains_version() {
        let vs = version_string();
        assert!(vs.contains(VERSION));
        assert!(vs.starts_with("entryroot "));
    }

    #[test]
    fn test_format_version_with_git_hash() {
        assert_eq!(
            format_version(Some("1a2b3c4")),
            format!("entryroot {VERSION} (1a2b3c4)")
        );
        assert_eq!(format_version(None), format!("entryroot {VERSION}"));
        assert_eq!(format_version(Some("")), format!("entryroot {VERSION}"));
    }

    #[test]
    fn test_schema_version_positive() {
        const { assert!(OUTPUT_SCHEMA_VERSION > 0) };
    }
}
