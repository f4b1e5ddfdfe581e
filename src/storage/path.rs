//! Collection name to file path mapping
//!
//! Filenames are a lossy derivative of the collection name: distinct names
//! may sanitize to the same file. The real name lives in the frontmatter.

use std::path::{Path, PathBuf};

/// Characters that are unsafe in filenames on common platforms
const UNSAFE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Used when sanitizing leaves nothing
pub const UNNAMED: &str = "unnamed_collection";

/// File extension for collection files
pub const EXTENSION: &str = "md";

/// Converts a collection name to a safe file stem
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');

    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns the file path for a collection inside `data_dir`
pub fn resolve(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.{}", sanitize(name), EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_unchanged() {
        assert_eq!(sanitize("Guitar Practice"), "Guitar Practice");
        assert_eq!(sanitize("Collection 1"), "Collection 1");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(sanitize("Test/Collection<>:|?*"), "Test_Collection______");
        assert_eq!(sanitize(r#"a"b\c"#), "a_b_c");
    }

    #[test]
    fn dots_and_spaces_are_trimmed() {
        assert_eq!(sanitize("  .hidden. "), "hidden");
        assert_eq!(sanitize("v1.2"), "v1.2");
    }

    #[test]
    fn empty_results_fall_back() {
        assert_eq!(sanitize(""), UNNAMED);
        assert_eq!(sanitize(" . . "), UNNAMED);
    }

    #[test]
    fn only_unsafe_characters_become_underscores() {
        assert_eq!(sanitize("???"), "___");
    }

    #[test]
    fn resolve_appends_extension() {
        let path = resolve(Path::new("/data"), "My/List");
        assert_eq!(path, Path::new("/data/My_List.md"));
    }

    #[test]
    fn distinct_names_can_collide() {
        assert_eq!(sanitize("a/b"), sanitize("a:b"));
    }
}
