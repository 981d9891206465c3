//! Version and build information for Portolan

/// Get the full version string including build metadata
///
/// Returns format: "portolan {version} ({commit} {date})"
pub fn version() -> String {
    format!(
        "portolan {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        build_commit(),
        build_date()
    )
}

/// Get the build commit SHA, or "unknown" if not stamped at build time
pub fn build_commit() -> &'static str {
    option_env!("PORTOLAN_COMMIT_SHA").unwrap_or("unknown")
}

/// Get the build date, or "unknown" if not stamped at build time
pub fn build_date() -> &'static str {
    option_env!("PORTOLAN_BUILD_DATE").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_shape() {
        let v = version();
        assert!(v.starts_with("portolan "));
        assert!(v.contains(env!("CARGO_PKG_VERSION")));
    }
}
