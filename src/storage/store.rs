//! Markdown storage for collections
//!
//! Each collection is one markdown file in a flat data directory:
//! YAML frontmatter for the name, type, timestamps and schema, then a
//! heading and a pipe table holding the items.
//!
//! ```text
//! ---
//! collection:
//!   name: Guitar Practice
//!   ...
//! fields:
//! - name: song_name
//!   ...
//! ---
//!
//! # Guitar Practice
//!
//! | song_name | difficulty |
//! | --- | --- |
//! | Wonderwall | beginner |
//! ```
//!
//! There is no index file: [`CollectionStore::list`] scans the directory.
//! Writes go through a temp file and a rename, but nothing guards against
//! two writers saving the same collection at once.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{FormatError, Operation, PersistenceError, StoreCause};
use super::frontmatter::{self, DELIMITER};
use super::path::{self, EXTENSION};
use super::table;
use crate::domain::Collection;

type Result<T> = std::result::Result<T, PersistenceError>;

/// Store for collections as markdown files
#[derive(Debug, Clone)]
pub struct CollectionStore {
    /// Directory containing collection files
    dir: PathBuf,
}

impl CollectionStore {
    /// Creates a store over `dir` without touching the filesystem
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store over `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir).map_err(|e| {
            PersistenceError::failed(Operation::Open, &store.dir.display().to_string(), e)
        })?;
        tracing::debug!(dir = %store.dir.display(), "opened collection store");
        Ok(store)
    }

    /// Returns the directory containing collection files
    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path a collection is stored at
    pub fn path_for(&self, name: &str) -> PathBuf {
        path::resolve(&self.dir, name)
    }

    /// Renders a collection to the full file content
    pub fn render(collection: &Collection) -> std::result::Result<String, FormatError> {
        let mut content = frontmatter::encode(collection)?;
        content.push_str(DELIMITER);
        content.push_str("\n\n# ");
        // A line break here would start new body lines the table scan could pick up
        content.push_str(&collection.name.replace(['\r', '\n'], " "));
        content.push_str("\n\n");

        let table = table::encode(&collection.fields, &collection.items);
        if !table.is_empty() {
            content.push_str(&table);
            content.push('\n');
        }

        Ok(content)
    }

    /// Parses full file content back into a collection
    pub fn parse(content: &str) -> std::result::Result<Collection, FormatError> {
        let content = content.replace("\r\n", "\n");

        let rest = content
            .strip_prefix("---\n")
            .ok_or(FormatError::MissingFrontmatter)?;

        let (yaml, body) = rest
            .split_once("\n---\n")
            .ok_or(FormatError::MalformedFrontmatter)?;

        let meta = frontmatter::decode(yaml)?;
        let items = table::decode(&extract_table(body), &meta.fields);

        Ok(meta.into_collection(items))
    }

    /// Writes a collection, replacing any existing file for the same name
    pub fn save(&self, collection: &Collection) -> Result<()> {
        let name = collection.name.as_str();
        let fail = |cause: StoreCause| PersistenceError::failed(Operation::Save, name, cause);

        let content = Self::render(collection).map_err(|e| fail(e.into()))?;
        let path = self.path_for(name);

        fs::create_dir_all(&self.dir).map_err(|e| fail(e.into()))?;
        write_atomic(&path, &content).map_err(|e| fail(e.into()))?;

        tracing::debug!(
            collection = name,
            path = %path.display(),
            items = collection.items.len(),
            "saved collection"
        );
        Ok(())
    }

    /// Reads a collection by name
    pub fn load(&self, name: &str) -> Result<Collection> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(PersistenceError::not_found(name));
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PersistenceError::not_found(name))
            }
            Err(e) => return Err(PersistenceError::failed(Operation::Load, name, e)),
        };

        let collection =
            Self::parse(&content).map_err(|e| PersistenceError::failed(Operation::Load, name, e))?;

        tracing::debug!(
            collection = name,
            path = %path.display(),
            items = collection.items.len(),
            "loaded collection"
        );
        Ok(collection)
    }

    /// Lists stored collections by file stem, sorted
    ///
    /// Stems are sanitized names and may differ from the names inside the
    /// files.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let fail = |e: io::Error| {
            PersistenceError::failed(Operation::List, &self.dir.display().to_string(), e)
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(fail)? {
            let path = entry.map_err(fail)?.path();

            if !path.is_file() || path.extension().map_or(true, |e| e != EXTENSION) {
                continue;
            }

            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Removes a collection file
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(PersistenceError::not_found(name));
        }

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PersistenceError::not_found(name))
            }
            Err(e) => return Err(PersistenceError::failed(Operation::Delete, name, e)),
        }

        tracing::debug!(collection = name, path = %path.display(), "deleted collection");
        Ok(())
    }

    /// Checks if a collection file exists
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }
}

/// Collects the first pipe table in the markdown body
///
/// The table starts at the first line beginning with `|` that has another
/// `|` after it. Blank lines inside the table are skipped; any other line
/// ends it.
fn extract_table(body: &str) -> String {
    let lines: Vec<&str> = body.trim().lines().collect();

    let start = lines.iter().position(|line| {
        let line = line.trim();
        line.starts_with('|') && line[1..].contains('|')
    });

    let Some(start) = start else {
        return String::new();
    };

    let mut table_lines = Vec::new();
    for line in &lines[start..] {
        let trimmed = line.trim();
        if trimmed.starts_with('|') {
            table_lines.push(*line);
        } else if trimmed.is_empty() {
            continue;
        } else {
            break;
        }
    }

    table_lines.join("\n")
}

/// Writes to a temp file next to `path`, then renames it into place
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension(format!("{}.tmp", EXTENSION));

    if let Err(e) = fs::write(&temp_path, content) {
        remove_temp(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        remove_temp(&temp_path);
        return Err(e);
    }

    Ok(())
}

fn remove_temp(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %temp_path.display(),
            error = %e,
            "failed to remove temp file"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{item_data, Field, FieldType, Value};
    use crate::storage::ErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().join("collections"));
        (dir, store)
    }

    fn guitar_practice() -> Collection {
        let mut collection = Collection::new("Guitar Practice", "music").with_fields(vec![
            Field::new("song_name", FieldType::Text).required(),
            Field::new("difficulty", FieldType::Select)
                .with_options(["beginner", "intermediate", "advanced"]),
        ]);
        collection.add_item(item_data([
            ("song_name", "Wonderwall"),
            ("difficulty", "beginner"),
        ]));
        collection
    }

    #[test]
    fn list_empty_store() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("data");
        assert!(!nested.exists());

        CollectionStore::open(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn save_writes_expected_body() {
        let (_dir, store) = store();
        let collection = guitar_practice();
        store.save(&collection).unwrap();

        let content = fs::read_to_string(store.path_for("Guitar Practice")).unwrap();
        let (_, body) = content.split_once("\n---\n").unwrap();

        assert_eq!(
            body,
            "\n# Guitar Practice\n\n| song_name | difficulty |\n| --- | --- |\n| Wonderwall | beginner |\n"
        );
    }

    #[test]
    fn empty_collection_has_no_table() {
        let (_dir, store) = store();
        let collection = Collection::new("Empty", "test")
            .with_fields(vec![Field::new("title", FieldType::Text)]);
        store.save(&collection).unwrap();

        let content = fs::read_to_string(store.path_for("Empty")).unwrap();
        assert!(content.ends_with("---\n\n# Empty\n\n"));

        let loaded = store.load("Empty").unwrap();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.fields, collection.fields);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (_dir, store) = store();
        let collection = guitar_practice();
        store.save(&collection).unwrap();

        let loaded = store.load("Guitar Practice").unwrap();
        assert_eq!(loaded.name, collection.name);
        assert_eq!(loaded.collection_type, collection.collection_type);
        assert_eq!(loaded.fields, collection.fields);
        assert_eq!(loaded.created_at, collection.created_at);
        assert_eq!(loaded.updated_at, collection.updated_at);
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].data, collection.items[0].data);
    }

    #[test]
    fn save_overwrites() {
        let (_dir, store) = store();
        let mut collection = guitar_practice();
        store.save(&collection).unwrap();

        collection.add_item(item_data([("song_name", "Blackbird")]));
        store.save(&collection).unwrap();

        let loaded = store.load("Guitar Practice").unwrap();
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(store.list().unwrap(), vec!["Guitar Practice"]);
    }

    #[test]
    fn atomic_write_no_temp_file_left() {
        let (_dir, store) = store();
        store.save(&guitar_practice()).unwrap();

        let path = store.path_for("Guitar Practice");
        assert!(path.exists());
        assert!(!path.with_extension("md.tmp").exists());
    }

    #[test]
    fn load_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("Nonexistent").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn load_without_frontmatter_is_format_error() {
        let (_dir, store) = store();
        fs::create_dir_all(store.data_dir()).unwrap();
        fs::write(store.path_for("Plain"), "# Plain\n\nNo header here.\n").unwrap();

        let err = store.load("Plain").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.operation(), Some(Operation::Load));
        assert!(matches!(
            err,
            PersistenceError::Failed {
                cause: StoreCause::Format(FormatError::MissingFrontmatter),
                ..
            }
        ));
    }

    #[test]
    fn load_unclosed_frontmatter_is_format_error() {
        let (_dir, store) = store();
        fs::create_dir_all(store.data_dir()).unwrap();
        fs::write(store.path_for("Open"), "---\ncollection:\n  name: Open\n").unwrap();

        let err = store.load("Open").unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Failed {
                cause: StoreCause::Format(FormatError::MalformedFrontmatter),
                ..
            }
        ));
    }

    #[test]
    fn load_hand_edited_file() {
        let (_dir, store) = store();
        fs::create_dir_all(store.data_dir()).unwrap();
        let content = r#"---
collection:
  name: Books
  type: reading
  created_at: '2024-01-02T03:04:05'
  updated_at: '2024-01-02T03:04:05'
fields:
- name: title
  type: text
- name: pages
  type: number
---

# Books

Some notes before the table.

| title | pages |
| --- | --- |
| Dune | 412 |

| Emma | 1.5 |
Trailing prose.
| Ignored | 1 |
"#
        .replace('\n', "\r\n");
        fs::write(store.path_for("Books"), content).unwrap();

        let loaded = store.load("Books").unwrap();
        assert_eq!(loaded.name, "Books");
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.items[0].get("pages"), Some(&Value::Integer(412)));
        assert_eq!(loaded.items[1].get("pages"), Some(&Value::Real(1.5)));
    }

    #[test]
    fn delete_collection() {
        let (_dir, store) = store();
        let collection = Collection::new("To Delete", "test");
        store.save(&collection).unwrap();
        assert!(store.exists("To Delete"));

        store.delete("To Delete").unwrap();

        assert!(!store.exists("To Delete"));
        assert!(!store.list().unwrap().contains(&"To Delete".to_string()));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.delete("Nonexistent").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn list_only_markdown_files() {
        let (_dir, store) = store();
        store.save(&Collection::new("Collection 2", "test")).unwrap();
        store.save(&Collection::new("Collection 1", "test")).unwrap();
        fs::write(store.data_dir().join("notes.txt"), "x").unwrap();
        fs::write(store.data_dir().join("stale.md.tmp"), "x").unwrap();
        fs::create_dir(store.data_dir().join("folder.md")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["Collection 1", "Collection 2"]);
    }

    #[test]
    fn unsafe_name_keeps_original_in_frontmatter() {
        let (_dir, store) = store();
        let name = "Test/Collection<>:|?*";
        store.save(&Collection::new(name, "test")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["Test_Collection______"]);
        assert_eq!(store.load(name).unwrap().name, name);
    }

    #[test]
    fn extract_table_skips_blank_lines_and_stops_at_prose() {
        let body = "\n# Title\n\n| a | b |\n| --- | --- |\n\n| 1 | 2 |\nprose\n| 3 | 4 |\n";
        assert_eq!(extract_table(body), "| a | b |\n| --- | --- |\n| 1 | 2 |");
    }

    #[test]
    fn extract_table_needs_two_pipes() {
        assert_eq!(extract_table("# Title\n\n|\n"), "");
        assert_eq!(extract_table("# Title\n"), "");
    }
}
