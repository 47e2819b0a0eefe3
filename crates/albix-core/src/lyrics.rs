//! Sidecar lyrics: `song.lrc` (timed) or `song.txt` (plain) next to the track.

use std::path::{Path, PathBuf};

use crate::error::LyricsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    /// `None` for untimed lyrics.
    pub at_ms: Option<u64>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lyrics {
    pub source: PathBuf,
    pub lines: Vec<LyricLine>,
}

impl Lyrics {
    pub fn is_timed(&self) -> bool {
        self.lines.first().is_some_and(|l| l.at_ms.is_some())
    }

    /// Index of the line being sung at `position_ms`.
    pub fn current_line(&self, position_ms: u64) -> Option<usize> {
        if !self.is_timed() {
            return None;
        }
        let upto = self
            .lines
            .partition_point(|l| l.at_ms.is_some_and(|t| t <= position_ms));
        upto.checked_sub(1)
    }

    pub fn parse(source: PathBuf, content: &str) -> Self {
        let timed = parse_lrc(content);
        let lines = if timed.is_empty() {
            content
                .lines()
                .map(|l| LyricLine {
                    at_ms: None,
                    text: l.trim_end().to_string(),
                })
                .collect()
        } else {
            timed
        };
        Self { source, lines }
    }
}

/// Candidate sidecar files for a track, in lookup order.
pub fn sidecar_paths(track: &Path) -> [PathBuf; 2] {
    [track.with_extension("lrc"), track.with_extension("txt")]
}

pub fn load_for_track(track: &Path) -> Result<Lyrics, LyricsError> {
    for candidate in sidecar_paths(track) {
        if candidate.is_file() {
            let content = std::fs::read_to_string(&candidate)?;
            return Ok(Lyrics::parse(candidate, &content));
        }
    }
    Err(LyricsError::NotFound(track.to_path_buf()))
}

fn parse_lrc(content: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();
    for raw in content.lines() {
        let mut rest = raw.trim();
        let mut stamps = Vec::new();
        while let Some(body) = rest.strip_prefix('[') {
            let Some(close) = body.find(']') else { break };
            match parse_timestamp(&body[..close]) {
                Some(ms) => stamps.push(ms),
                // metadata tag such as [ar:...]
                None => break,
            }
            rest = &body[close + 1..];
        }
        let text = rest.trim().to_string();
        for ms in stamps {
            lines.push(LyricLine {
                at_ms: Some(ms),
                text: text.clone(),
            });
        }
    }
    lines.sort_by_key(|l| l.at_ms);
    lines
}

/// `mm:ss`, `mm:ss.xx` or `mm:ss.xxx`.
fn parse_timestamp(tag: &str) -> Option<u64> {
    let (min, sec) = tag.split_once(':')?;
    let min: u64 = min.trim().parse().ok()?;
    let (whole, frac) = match sec.split_once('.') {
        Some((w, f)) => (w, f),
        None => (sec, ""),
    };
    let whole: u64 = whole.trim().parse().ok()?;
    if whole >= 60 {
        return None;
    }
    let frac_ms = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().ok()? * 100,
        2 => frac.parse::<u64>().ok()? * 10,
        _ => frac.get(..3)?.parse::<u64>().ok()?,
    };
    // absurd minute counts are treated like a metadata tag
    min.checked_mul(60_000)?.checked_add(whole * 1000 + frac_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lrc_with_metadata_and_multiple_tags() {
        let lrc = "[ar:Someone]\n[ti:Song]\n[00:12.50]first\n[00:05.00][01:00.00]chorus\n";
        let lyrics = Lyrics::parse(PathBuf::from("x.lrc"), lrc);
        assert!(lyrics.is_timed());
        let texts: Vec<_> = lyrics.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["chorus", "first", "chorus"]);
        assert_eq!(lyrics.lines[1].at_ms, Some(12_500));
    }

    #[test]
    fn current_line_tracks_position() {
        let lyrics = Lyrics::parse(PathBuf::new(), "[00:01.00]a\n[00:03.00]b\n");
        assert_eq!(lyrics.current_line(0), None);
        assert_eq!(lyrics.current_line(1_000), Some(0));
        assert_eq!(lyrics.current_line(2_999), Some(0));
        assert_eq!(lyrics.current_line(10_000), Some(1));
    }

    #[test]
    fn oversized_minute_tags_are_not_timestamps() {
        assert_eq!(parse_timestamp("307445734561825861:00"), None);
        assert_eq!(parse_timestamp("18446744073709551615:59.999"), None);

        let lone = Lyrics::parse(PathBuf::new(), "[307445734561825861:00]boom\n");
        assert!(!lone.is_timed());
        assert_eq!(lone.lines[0].text, "[307445734561825861:00]boom");

        let mixed = Lyrics::parse(
            PathBuf::new(),
            "[307445734561825861:00]boom\n[00:02.00]fine\n",
        );
        assert_eq!(mixed.lines.len(), 1);
        assert_eq!(mixed.lines[0].at_ms, Some(2_000));
    }

    #[test]
    fn plain_text_is_untimed() {
        let lyrics = Lyrics::parse(PathBuf::new(), "line one\nline two\n");
        assert!(!lyrics.is_timed());
        assert_eq!(lyrics.lines.len(), 2);
        assert_eq!(lyrics.current_line(5_000), None);
    }

    #[test]
    fn finds_sidecar_file() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mp3");
        std::fs::write(&track, b"").unwrap();
        assert!(matches!(load_for_track(&track), Err(LyricsError::NotFound(_))));

        std::fs::write(dir.path().join("song.txt"), "hello\n").unwrap();
        let lyrics = load_for_track(&track).unwrap();
        assert_eq!(lyrics.source, dir.path().join("song.txt"));
        assert_eq!(lyrics.lines[0].text, "hello");
    }
}
