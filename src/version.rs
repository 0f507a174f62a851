//! Build identity reported by `GET /health` and logged when cookd starts.
//!
//! The git fields come from vergen at build time. Source tarballs without a
//! `.git` directory report `unknown` for both.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branch cookd was built from.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Full commit SHA cookd was built from.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const SHORT_SHA_LEN: usize = 7;

/// True when the build had uncommitted changes.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Version shown to operators, e.g. `0.1.0+main.3f2a9c1`.
///
/// A build from a modified checkout ends in `.dirty`, so a model server
/// running local patches is visible from `/health`.
pub fn version_string() -> String {
    build_tag(PKG_VERSION, GIT_BRANCH, GIT_SHA, git_dirty())
}

fn build_tag(version: &str, branch: &str, sha: &str, dirty: bool) -> String {
    let short = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
    let mut tag = format!("{version}+{branch}.{short}");
    if dirty {
        tag.push_str(".dirty");
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_shortens_commit() {
        assert_eq!(
            build_tag("0.1.0", "main", "3f2a9c1d8e7b", false),
            "0.1.0+main.3f2a9c1"
        );
    }

    #[test]
    fn dirty_checkout_is_marked() {
        assert_eq!(
            build_tag("0.2.0", "recipes-v2", "3f2a9c1d8e7b", true),
            "0.2.0+recipes-v2.3f2a9c1.dirty"
        );
    }

    #[test]
    fn missing_git_metadata_reports_unknown() {
        assert_eq!(
            build_tag("0.1.0", "unknown", "unknown", false),
            "0.1.0+unknown.unknown"
        );
    }

    #[test]
    fn reported_version_starts_with_package_version() {
        let version = version_string();
        assert!(version.starts_with(&format!("{PKG_VERSION}+{GIT_BRANCH}.")));
    }
}
