use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Primary configuration filename, searched upward from the analyzed path.
pub const CONFIG_FILENAME: &str = ".exprlint.toml";

/// Fallback configuration filename.
pub const CONFIG_FILENAME_ALT: &str = "exprlint.toml";

/// File extension of expression files.
pub const EXPR_EXTENSION: &str = "expr";

/// Regex for suppression comments: `# noqa` or `# noqa: EXL-W001, ...`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_suppression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"#\s*noqa(?::\s*([A-Za-z0-9\-]+(?:\s*,\s*[A-Za-z0-9\-]+)*))?")
            .expect("Invalid suppression regex pattern")
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert("target");
        s.insert("build");
        s.insert("dist");
        s.insert("node_modules");
        s
    })
}

// Legacy aliases for callers using the constant-style names
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_suppression_re as SUPPRESSION_RE;
