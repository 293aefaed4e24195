//! Build identification for the daemon's startup log and `/health`.
//!
//! Git metadata is embedded by `build.rs`; when it is missing entirely the
//! branch and commit read `unknown`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const SHORT_SHA_LEN: usize = 7;

fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Version reported by `imgcached`, e.g. `0.1.0+main.abc1234` or
/// `0.1.0+main.abc1234.dirty`.
pub fn version_string() -> String {
    format_version(PKG_VERSION, GIT_BRANCH, GIT_SHA, git_dirty())
}

fn format_version(version: &str, branch: &str, sha: &str, dirty: bool) -> String {
    let short_sha: String = sha.chars().take(SHORT_SHA_LEN).collect();
    let suffix = if dirty { ".dirty" } else { "" };
    format!("{version}+{branch}.{short_sha}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_is_shortened() {
        assert_eq!(
            format_version("0.1.0", "main", "0123456789abcdef", false),
            "0.1.0+main.0123456"
        );
    }

    #[test]
    fn dirty_tree_is_marked() {
        assert_eq!(
            format_version("0.2.0", "feature/redis", "abcdef0123", true),
            "0.2.0+feature/redis.abcdef0.dirty"
        );
    }

    #[test]
    fn builds_outside_git_still_format() {
        assert_eq!(
            format_version("0.1.0", "unknown", "unknown", false),
            "0.1.0+unknown.unknown"
        );
    }

    #[test]
    fn embedded_version_is_cargo_version() {
        assert!(version_string().starts_with(&format!("{PKG_VERSION}+")));
    }
}
