//! The ordered list of local media files and its JSON file format.
//!
//! A playlist file is a JSON array of `{"path": "...", "type": "audio"|"video"}`
//! objects. Loading is all-or-nothing: one bad element rejects the file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::{PlaylistError, Result};
use crate::media::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

impl PlaylistEntry {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Base file name shown in the list and in status messages.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(usize),
    Duplicate(usize),
}

/// Result of adding many paths at once. Unsupported files are skipped
/// without stopping the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: Vec<usize>,
    pub duplicates: Vec<PathBuf>,
    pub unsupported: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.duplicates.is_empty() && self.unsupported.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        let path = absolutize(path.to_path_buf());
        self.entries.iter().position(|e| e.path == path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a file. Relative paths are resolved against the working
    /// directory, so `a.mp3`, `./a.mp3` and `/cwd/a.mp3` are one entry.
    /// Adding a path that is already present is a no-op.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<AddOutcome> {
        let path = absolutize(path.into());
        let kind = MediaKind::from_path(&path)
            .ok_or_else(|| PlaylistError::UnsupportedExtension(path.clone()))?;
        if let Some(existing) = self.position_of(&path) {
            return Ok(AddOutcome::Duplicate(existing));
        }
        self.entries.push(PlaylistEntry { path, kind });
        Ok(AddOutcome::Added(self.entries.len() - 1))
    }

    /// Add several paths. Directories contribute their direct children in
    /// name order.
    pub fn add_batch<I, P>(&mut self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut report = BatchReport::default();
        for path in paths {
            let path = path.into();
            if path.is_dir() {
                for child in list_dir_sorted(&path) {
                    self.add_into_report(child, &mut report);
                }
            } else {
                self.add_into_report(path, &mut report);
            }
        }
        debug!(
            added = report.added.len(),
            duplicates = report.duplicates.len(),
            unsupported = report.unsupported.len(),
            "playlist batch add"
        );
        report
    }

    fn add_into_report(&mut self, path: PathBuf, report: &mut BatchReport) {
        match self.add(path.clone()) {
            Ok(AddOutcome::Added(idx)) => report.added.push(idx),
            Ok(AddOutcome::Duplicate(_)) => report.duplicates.push(path),
            Err(_) => report.unsupported.push(path),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<PlaylistEntry> {
        if index >= self.entries.len() {
            return Err(PlaylistError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Remove several indices, highest first so earlier removals do not
    /// shift later ones. Out-of-range and repeated indices are ignored.
    /// Returns the indices actually removed, in descending order.
    pub fn remove_many(&mut self, indices: &[usize]) -> Vec<usize> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.entries.len())
            .collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for &i in &sorted {
            self.entries.remove(i);
        }
        sorted
    }

    /// Move the entry at `from` so that it ends up at index `to`.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        if from >= len {
            return Err(PlaylistError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(PlaylistError::IndexOutOfRange { index: to, len });
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Parse a playlist document. Later repeats of a path are dropped so the
    /// list stays unique by path.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<PlaylistEntry> = serde_json::from_str(content)?;
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.path.clone()))
            .collect();
        Ok(Self { entries })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Lexically absolute form of `path`. Symlinks are left alone.
fn absolutize(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn list_dir_sorted(dir: &Path) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    };
    children.sort();
    children
}

// ── Drop payload parsing ─────────────────────────────────────────────────────

/// Turn the text a terminal delivers for a file drop (a bracketed paste)
/// into paths.
///
/// Accepts one path per line, `file://` URIs, single or double quoted paths
/// and backslash-escaped spaces. An unquoted line holding several absolute
/// paths separated by spaces is split on whitespace; any other unquoted line
/// is taken whole so names with spaces survive.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens = if line.contains(['\'', '"', '\\']) {
            shell_split(line)
        } else if line
            .split_whitespace()
            .all(|t| t.starts_with('/') || t.starts_with("file://") || t.starts_with('~'))
        {
            line.split_whitespace().map(str::to_string).collect()
        } else {
            vec![line.to_string()]
        };
        out.extend(tokens.into_iter().filter_map(|t| token_to_path(&t)));
    }
    out
}

fn shell_split(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

fn token_to_path(token: &str) -> Option<PathBuf> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if token.starts_with("file:") {
        // Remote hosts have no local path and are skipped.
        return match Url::parse(token).map(|u| u.to_file_path()) {
            Ok(Ok(path)) => Some(path),
            _ => {
                debug!("dropped uri {token} has no local path");
                None
            }
        };
    }
    if let Some(rest) = token.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Playlist {
        let mut p = Playlist::new();
        p.add("/music/a.mp3").unwrap();
        p.add("/music/b.mp4").unwrap();
        p.add("/music/c.ogg").unwrap();
        p
    }

    #[test]
    fn add_is_idempotent_by_path() {
        let mut p = sample();
        assert_eq!(p.add("/music/b.mp4").unwrap(), AddOutcome::Duplicate(1));
        assert_eq!(p.len(), 3);
        assert_eq!(p.get(1).unwrap().kind, MediaKind::Video);
    }

    #[test]
    fn add_rejects_unsupported() {
        let mut p = Playlist::new();
        let err = p.add("/music/cover.jpg").unwrap_err();
        assert!(matches!(err, PlaylistError::UnsupportedExtension(_)));
        assert!(p.is_empty());
    }

    #[test]
    fn batch_skips_unsupported_and_continues() {
        let mut p = Playlist::new();
        let report = p.add_batch(["/m/a.mp3", "/m/notes.txt", "/m/b.flac", "/m/a.mp3"]);
        assert_eq!(report.added, vec![0, 1]);
        assert_eq!(report.unsupported, vec![PathBuf::from("/m/notes.txt")]);
        assert_eq!(report.duplicates, vec![PathBuf::from("/m/a.mp3")]);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn batch_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.ogg"), b"").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("c.txt"), b"").unwrap();

        let mut p = Playlist::new();
        let report = p.add_batch([dir.path()]);
        assert_eq!(report.added.len(), 2);
        assert_eq!(report.unsupported.len(), 1);
        assert_eq!(p.get(0).unwrap().display_name(), "a.mp3");
        assert_eq!(p.get(1).unwrap().display_name(), "b.ogg");
    }

    #[test]
    fn move_and_remove() {
        let mut p = sample();
        p.move_entry(0, 2).unwrap();
        let names: Vec<_> = p.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, ["b.mp4", "c.ogg", "a.mp3"]);

        assert!(p.move_entry(5, 0).is_err());
        let removed = p.remove(1).unwrap();
        assert_eq!(removed.display_name(), "c.ogg");
        assert!(matches!(
            p.remove(9),
            Err(PlaylistError::IndexOutOfRange { index: 9, len: 2 })
        ));
    }

    #[test]
    fn remove_many_goes_high_to_low() {
        let mut p = sample();
        let removed = p.remove_many(&[0, 2, 2, 7]);
        assert_eq!(removed, vec![2, 0]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(0).unwrap().display_name(), "b.mp4");
    }

    #[test]
    fn json_uses_path_and_type_keys() {
        let mut p = Playlist::new();
        p.add("/m/a.mp3").unwrap();
        let json = p.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([{"path": "/m/a.mp3", "type": "audio"}]));
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lists").join("mix.json");
        let p = sample();
        p.save(&file).unwrap();
        let loaded = Playlist::load(&file).unwrap();
        assert_eq!(loaded, p);
    }

    #[test]
    fn malformed_documents_are_rejected_whole() {
        for doc in [
            "{}",
            "not json",
            r#"[{"path": "/a.mp3"}]"#,
            r#"[{"path": "/a.mp3", "type": "audio"}, {"path": "/b.png", "type": "image"}]"#,
            r#"[{"path": 3, "type": "audio"}]"#,
        ] {
            let err = Playlist::from_json(doc).unwrap_err();
            assert!(matches!(err, PlaylistError::Malformed(_)), "{doc}");
        }
    }

    #[test]
    fn relative_and_absolute_spellings_are_one_entry() {
        let cwd = std::env::current_dir().unwrap();
        let mut p = Playlist::new();
        assert_eq!(p.add("a.mp3").unwrap(), AddOutcome::Added(0));
        assert_eq!(p.add(cwd.join("a.mp3")).unwrap(), AddOutcome::Duplicate(0));
        assert_eq!(p.add("./a.mp3").unwrap(), AddOutcome::Duplicate(0));
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(0).unwrap().path, cwd.join("a.mp3"));
        assert_eq!(p.position_of(Path::new("./a.mp3")), Some(0));

        let value: serde_json::Value = serde_json::from_str(&p.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["path"], cwd.join("a.mp3").display().to_string());
    }

    #[test]
    fn parses_dropped_paths() {
        let text = "file:///home/me/My%20Song.mp3\n'/tmp/with space.ogg' /tmp/x\\ y.flac\n/plain/one.mp3 /plain/two.mp4\n/home/me/Loose Name.wav\n";
        let paths = parse_dropped_paths(text);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/me/My Song.mp3"),
                PathBuf::from("/tmp/with space.ogg"),
                PathBuf::from("/tmp/x y.flac"),
                PathBuf::from("/plain/one.mp3"),
                PathBuf::from("/plain/two.mp4"),
                PathBuf::from("/home/me/Loose Name.wav"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn file_uris_keep_raw_bytes_and_skip_remote_hosts() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let text = "file:///m/%E9t%E9.mp3\nfile://server/share/a.mp3\nfile://localhost/m/b.ogg\n";
        assert_eq!(
            parse_dropped_paths(text),
            vec![
                PathBuf::from(OsStr::from_bytes(b"/m/\xE9t\xE9.mp3")),
                PathBuf::from("/m/b.ogg"),
            ]
        );
    }
}
