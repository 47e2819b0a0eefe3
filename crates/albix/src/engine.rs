//! [`PlaybackEngine`] backed by an mpv process.
//!
//! Commands are queued on the IPC writer and return at once; mpv's replies
//! and events come back through [`MpvEngine::translate`].

use std::path::Path;

use albix_core::{EngineEvent, MediaKind, MediaStatus, PlaybackEngine};
use serde_json::{json, Value};
use tracing::debug;

use crate::mpv::{MpvEvent, MpvHandle, OBS_DURATION, OBS_PAUSED_FOR_CACHE, OBS_TIME_POS};

#[derive(Default)]
pub struct MpvEngine {
    handle: Option<MpvHandle>,
    volume: u8,
    muted: bool,
    duration_ms: u64,
}

impl MpvEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a fresh connection and push the cached levels to it.
    pub fn attach(&mut self, handle: MpvHandle) {
        self.handle = Some(handle);
        let volume = self.volume;
        let muted = self.muted;
        if let Err(e) = self.set_volume(volume).and_then(|_| self.set_muted(muted)) {
            debug!("engine: levels not restored: {e:#}");
        }
    }

    pub fn detach(&mut self) {
        self.handle = None;
        self.duration_ms = 0;
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&MpvHandle> {
        self.handle.as_ref()
    }

    fn fire(&self, command: Value) -> anyhow::Result<()> {
        match &self.handle {
            Some(h) => h.fire(command),
            None => anyhow::bail!("media engine is not running"),
        }
    }

    /// Map an mpv event onto the engine vocabulary. Unknown events map to
    /// `None`.
    pub fn translate(&mut self, evt: &MpvEvent) -> Option<EngineEvent> {
        if let Some((id, data)) = evt.as_property_change() {
            return match id {
                OBS_TIME_POS => secs_to_ms(data).map(EngineEvent::PositionChanged),
                OBS_DURATION => {
                    let ms = secs_to_ms(data)?;
                    self.duration_ms = ms;
                    Some(EngineEvent::DurationChanged(ms))
                }
                OBS_PAUSED_FOR_CACHE => match data.as_bool()? {
                    true => Some(EngineEvent::StatusChanged(MediaStatus::Buffering)),
                    false => Some(EngineEvent::StatusChanged(MediaStatus::Loaded)),
                },
                _ => None,
            };
        }

        match evt.event_name()? {
            "file-loaded" => Some(EngineEvent::StatusChanged(MediaStatus::Loaded)),
            "end-file" => match evt.end_reason()? {
                "eof" => Some(EngineEvent::StatusChanged(MediaStatus::EndOfMedia)),
                "error" => {
                    let detail = evt
                        .raw
                        .get("file_error")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown error");
                    Some(EngineEvent::Error(detail.to_string()))
                }
                // stop, quit, redirect
                _ => None,
            },
            _ => None,
        }
    }
}

fn secs_to_ms(data: &Value) -> Option<u64> {
    let secs = data.as_f64()?;
    (secs.is_finite() && secs >= 0.0).then(|| (secs * 1000.0).round() as u64)
}

impl PlaybackEngine for MpvEngine {
    fn load_file(&mut self, path: &Path, kind: MediaKind) -> anyhow::Result<()> {
        debug!("engine: load {} {}", kind.label(), path.display());
        self.fire(json!(["loadfile", path.to_string_lossy()]))?;
        self.duration_ms = 0;
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> anyhow::Result<()> {
        debug!("engine: load stream {}", url);
        self.fire(json!(["loadfile", url]))?;
        self.duration_ms = 0;
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.fire(json!(["set_property", "pause", false]))
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.fire(json!(["set_property", "pause", true]))
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.duration_ms = 0;
        match self.handle {
            Some(_) => self.fire(json!(["stop"])),
            None => Ok(()),
        }
    }

    fn seek(&mut self, position_ms: u64) -> anyhow::Result<()> {
        let secs = position_ms as f64 / 1000.0;
        self.fire(json!(["seek", secs, "absolute"]))
    }

    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
        self.volume = volume.min(100);
        match self.handle {
            Some(_) => self.fire(json!(["set_property", "volume", self.volume])),
            None => Ok(()),
        }
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) -> anyhow::Result<()> {
        self.muted = muted;
        match self.handle {
            Some(_) => self.fire(json!(["set_property", "mute", muted])),
            None => Ok(()),
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn duration(&self) -> u64 {
        self.duration_ms
    }

    fn set_fullscreen(&mut self, on: bool) -> anyhow::Result<()> {
        self.fire(json!(["set_property", "fullscreen", on]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evt(raw: Value) -> MpvEvent {
        MpvEvent { raw }
    }

    #[test]
    fn time_properties_become_milliseconds() {
        let mut engine = MpvEngine::new();
        let pos = evt(json!({"event": "property-change", "id": OBS_TIME_POS, "data": 1.5}));
        assert_eq!(engine.translate(&pos), Some(EngineEvent::PositionChanged(1500)));

        let dur = evt(json!({"event": "property-change", "id": OBS_DURATION, "data": 200.0}));
        assert_eq!(engine.translate(&dur), Some(EngineEvent::DurationChanged(200_000)));
        assert_eq!(engine.duration(), 200_000);

        let unknown = evt(json!({"event": "property-change", "id": OBS_TIME_POS, "data": null}));
        assert_eq!(engine.translate(&unknown), None);
    }

    #[test]
    fn end_file_reasons() {
        let mut engine = MpvEngine::new();
        let eof = evt(json!({"event": "end-file", "reason": "eof"}));
        assert_eq!(
            engine.translate(&eof),
            Some(EngineEvent::StatusChanged(MediaStatus::EndOfMedia))
        );

        let stop = evt(json!({"event": "end-file", "reason": "stop"}));
        assert_eq!(engine.translate(&stop), None);

        let err = evt(json!({"event": "end-file", "reason": "error", "file_error": "unrecognized file format"}));
        assert_eq!(
            engine.translate(&err),
            Some(EngineEvent::Error("unrecognized file format".into()))
        );
    }

    #[test]
    fn buffering_flag_maps_to_status() {
        let mut engine = MpvEngine::new();
        let on = evt(json!({"event": "property-change", "id": OBS_PAUSED_FOR_CACHE, "data": true}));
        assert_eq!(
            engine.translate(&on),
            Some(EngineEvent::StatusChanged(MediaStatus::Buffering))
        );
        let loaded = evt(json!({"event": "file-loaded"}));
        assert_eq!(
            engine.translate(&loaded),
            Some(EngineEvent::StatusChanged(MediaStatus::Loaded))
        );
    }

    #[test]
    fn detached_engine_rejects_playback_but_keeps_levels() {
        let mut engine = MpvEngine::new();
        assert!(engine.load_file(Path::new("/m/a.mp3"), MediaKind::Audio).is_err());
        assert!(engine.play().is_err());
        engine.set_volume(140).unwrap();
        engine.set_muted(true).unwrap();
        engine.stop().unwrap();
        assert_eq!(engine.volume(), 100);
        assert!(engine.is_muted());
    }
}
