use crate::models::{Snippet, SnippetId, SnippetUpdate};
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Snippet store backed by a single JSON file.
///
/// The whole collection lives in memory and is rewritten to disk after every
/// mutation. Reads (`list`, `find`, `search`) never touch the file.
#[derive(Debug)]
pub struct SnippetStore {
    path: PathBuf,
    snippets: Vec<Snippet>,
}

impl SnippetStore {
    /// Opens the store at `path`, loading whatever the file holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            snippets: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory collection with the file contents.
    ///
    /// A missing, unreadable or malformed file leaves the store empty; the
    /// failure is logged and never returned.
    pub fn load(&mut self) {
        self.snippets = match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snippets) => snippets,
                Err(e) => {
                    warn!("Ignoring malformed snippet file {}: {}", self.path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snippet file at {}, starting empty", self.path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("Could not read snippet file {}: {}", self.path.display(), e);
                Vec::new()
            }
        };
        debug!("Loaded {} snippets", self.snippets.len());
    }

    /// Writes the full collection to the backing file.
    ///
    /// The file is replaced atomically: a failed save leaves the previous
    /// contents in place.
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.snippets).context("Failed to serialize snippets")?;

        write_atomically(&self.path, |file| file.write_all(content.as_bytes()))?;
        debug!("Saved {} snippets to {}", self.snippets.len(), self.path.display());
        Ok(())
    }

    pub fn list(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn find(&self, id: SnippetId) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    fn position(&self, id: SnippetId) -> Option<usize> {
        self.snippets.iter().position(|s| s.id == id)
    }

    /// Appends a new snippet and persists the collection.
    pub fn add(&mut self, title: String, language: String, code: String) -> Result<&Snippet> {
        let id = self.next_id()?;
        self.snippets.push(Snippet::new(id, title, language, code));
        self.persist_or_rollback(|store| {
            store.snippets.pop();
        })?;
        debug!("Added snippet {}", id);
        Ok(&self.snippets[self.snippets.len() - 1])
    }

    /// Applies `update` to the snippet with `id`. Returns `None` without
    /// writing anything when no such snippet exists.
    pub fn update(&mut self, id: SnippetId, update: SnippetUpdate) -> Result<Option<&Snippet>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let previous = self.snippets[index].clone();
        let changed = self.snippets[index].apply(update);
        self.persist_or_rollback(|store| store.snippets[index] = previous)?;
        debug!("Updated snippet {} (changed: {})", id, changed);
        Ok(Some(&self.snippets[index]))
    }

    /// Removes the snippet with `id`, keeping the order of the rest.
    pub fn delete(&mut self, id: SnippetId) -> Result<Option<Snippet>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let removed = self.snippets.remove(index);
        let restore = removed.clone();
        self.persist_or_rollback(|store| store.snippets.insert(index, restore))?;
        debug!("Deleted snippet {}", id);
        Ok(Some(removed))
    }

    /// Clears the collection and persists it. Callers must confirm with the
    /// user first; the store does not ask.
    pub fn delete_all(&mut self) -> Result<usize> {
        let removed = std::mem::take(&mut self.snippets);
        let count = removed.len();
        self.persist_or_rollback(|store| store.snippets = removed)?;
        debug!("Deleted all {} snippets", count);
        Ok(count)
    }

    /// Snippets whose title or language contains `term`, ignoring case,
    /// in stored order.
    pub fn search(&self, term: &str) -> Vec<&Snippet> {
        let needle = term.to_lowercase();
        self.snippets.iter().filter(|s| s.matches(&needle)).collect()
    }

    /// Timestamp-derived id, bumped past the newest stored id so two adds in
    /// the same millisecond never collide.
    fn next_id(&self) -> Result<SnippetId> {
        let now = Utc::now().timestamp_millis();
        match self.snippets.iter().map(|s| s.id).max() {
            Some(newest) if newest >= now => newest
                .checked_add(1)
                .ok_or_else(|| anyhow!("No snippet id left after {}", newest)),
            _ => Ok(now),
        }
    }

    /// Saves, undoing the in-memory mutation if the write fails so memory and
    /// disk never disagree.
    fn persist_or_rollback(&mut self, rollback: impl FnOnce(&mut Self)) -> Result<()> {
        if let Err(e) = self.save() {
            rollback(self);
            return Err(e);
        }
        Ok(())
    }
}

/// Writes `path` through a temporary file in the same directory, synced and
/// then renamed over the target.
fn write_atomically(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create snippet directory {}", parent.display()))?;

    let context = || format!("Failed to write snippet file {}", path.display());
    let mut temp = NamedTempFile::new_in(parent).with_context(context)?;
    write(temp.as_file_mut()).with_context(context)?;
    temp.as_file().sync_all().with_context(context)?;
    temp.persist(path).map_err(|e| e.error).with_context(context)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, SnippetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnippetStore::open(dir.path().join("snippets.json"));
        (dir, store)
    }

    fn add(store: &mut SnippetStore, title: &str, language: &str, code: &str) -> SnippetId {
        store
            .add(title.to_string(), language.to_string(), code.to_string())
            .unwrap()
            .id
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippets.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SnippetStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippets.json");
        fs::write(&path, "\n").unwrap();

        assert!(SnippetStore::open(&path).is_empty());
    }

    #[test]
    fn unreadable_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        // Reading a directory fails with something other than NotFound.
        let path = dir.path().join("snippets.json");
        fs::create_dir(&path).unwrap();

        let store = SnippetStore::open(&path);
        assert!(store.is_empty());
        assert!(path.is_dir());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "Hello", "js", "console.log('hi')");
        add(&mut store, "Fib", "python", "def fib(n):\n    return n");
        add(&mut store, "Empty", "", "");

        let reopened = SnippetStore::open(store.path());
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn file_uses_pretty_json_array() {
        let (_dir, mut store) = temp_store();
        let id = add(&mut store, "Hello", "js", "x");

        let content = fs::read_to_string(store.path()).unwrap();
        let expected = format!(
            "[\n  {{\n    \"id\": {id},\n    \"title\": \"Hello\",\n    \
             \"language\": \"js\",\n    \"code\": \"x\"\n  }}\n]"
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("snippets.json");
        let mut store = SnippetStore::open(&path);
        add(&mut store, "a", "b", "c");
        assert!(path.exists());
    }

    #[test]
    fn sequential_adds_get_distinct_increasing_ids() {
        let (_dir, mut store) = temp_store();
        let ids: Vec<_> = (0..50).map(|i| add(&mut store, &i.to_string(), "rs", "")).collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn update_changes_only_non_blank_fields() {
        let (_dir, mut store) = temp_store();
        let id = add(&mut store, "Hello", "js", "old");

        let updated = store
            .update(
                id,
                SnippetUpdate {
                    code: "NEW_CODE".to_string(),
                    ..Default::default()
                },
            )
            .unwrap()
            .cloned()
            .unwrap();

        assert_eq!(updated, Snippet::new(id, "Hello".into(), "js".into(), "NEW_CODE".into()));
        assert_eq!(SnippetStore::open(store.path()).find(id), Some(&updated));
    }

    #[test]
    fn missing_id_leaves_file_untouched() {
        let (_dir, mut store) = temp_store();
        let id = add(&mut store, "Hello", "js", "x");
        let before = fs::read(store.path()).unwrap();

        let update = SnippetUpdate {
            title: "changed".to_string(),
            ..Default::default()
        };
        assert!(store.update(id + 1000, update).unwrap().is_none());
        assert!(store.delete(id + 1000).unwrap().is_none());
        assert!(store.find(id + 1000).is_none());

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_preserves_order_of_remaining() {
        let (_dir, mut store) = temp_store();
        let first = add(&mut store, "one", "a", "");
        let second = add(&mut store, "two", "a", "");
        let third = add(&mut store, "three", "a", "");

        let removed = store.delete(second).unwrap().unwrap();
        assert_eq!(removed.title, "two");

        let ids: Vec<_> = store.list().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn add_then_delete_leaves_empty_file() {
        let (_dir, mut store) = temp_store();
        let id = add(&mut store, "Hello", "js", "console.log('hi')");
        assert_eq!(store.len(), 1);

        store.delete(id).unwrap();
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(SnippetStore::open(store.path()).is_empty());
    }

    #[test]
    fn delete_all_clears_and_persists() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "one", "a", "");
        add(&mut store, "two", "b", "");

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.is_empty());
        assert!(SnippetStore::open(store.path()).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_language() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "Fib", "python", "");
        add(&mut store, "Hello", "js", "");
        add(&mut store, "Parser", "rust", "");

        let titles: Vec<_> = store.search("PY").iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Fib"]);

        let titles: Vec<_> = store.search("r").iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Parser"]);

        assert!(store.search("haskell").is_empty());
    }

    #[test]
    fn reads_do_not_write() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "Hello", "js", "");
        fs::remove_file(store.path()).unwrap();

        store.list();
        store.search("hello");
        store.find(0);

        assert!(!store.path().exists());
    }

    #[test]
    fn failed_write_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the file path makes every write fail.
        let path = dir.path().join("snippets.json");
        fs::create_dir(&path).unwrap();

        let mut store = SnippetStore::open(&path);
        let err = store
            .add("a".to_string(), "b".to_string(), "c".to_string())
            .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to write snippet file"));
        assert!(store.is_empty());
    }

    #[test]
    fn interrupted_write_keeps_previous_contents() {
        let (_dir, mut store) = temp_store();
        add(&mut store, "Hello", "js", "x");
        let before = fs::read(store.path()).unwrap();

        let err = write_atomically(store.path(), |file| {
            file.write_all(b"[\n  {\n    \"id\"")?;
            Err(io::Error::new(ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(format!("{err:#}").contains("disk full"));
        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(SnippetStore::open(store.path()).len(), 1);

        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("snippets.json")]);
    }

    #[test]
    fn add_fails_when_ids_are_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippets.json");
        let stored = vec![Snippet::new(SnippetId::MAX, "last".into(), "rs".into(), "".into())];
        fs::write(&path, serde_json::to_string_pretty(&stored).unwrap()).unwrap();
        let before = fs::read(&path).unwrap();

        let mut store = SnippetStore::open(&path);
        let err = store
            .add("a".to_string(), "b".to_string(), "c".to_string())
            .unwrap_err();

        assert!(err.to_string().contains("No snippet id left"));
        assert_eq!(store.list(), stored.as_slice());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn blank_update_still_saves_same_record() {
        let (_dir, mut store) = temp_store();
        let id = add(&mut store, "Hello", "js", "x");
        let before = fs::read(store.path()).unwrap();

        let update = SnippetUpdate {
            title: "  ".to_string(),
            ..Default::default()
        };
        let kept = store.update(id, update).unwrap().cloned().unwrap();

        assert_eq!(kept, Snippet::new(id, "Hello".into(), "js".into(), "x".into()));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }
}
