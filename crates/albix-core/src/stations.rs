use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

use crate::error::StationError;

/// Stations shipped with the player, in display order.
pub const BUILTIN_STATIONS: &[(&str, &str)] = &[
    (
        "Triple J (Australia)",
        "http://live-radio01.mediahubaustralia.com/2TJW/mp3/",
    ),
    (
        "Radio Paradise (USA)",
        "http://stream.radioparadise.com/mp3-192",
    ),
    ("FIP (France)", "http://icecast.radiofrance.fr/fip-midfi.mp3"),
    (
        "SomaFM: Indie Pop Rocks (USA)",
        "https://ice2.somafm.com/indiepop-128-mp3",
    ),
    (
        "Radio Nova (France)",
        "http://novazz.ice.infomaniak.ch/novazz-128.mp3",
    ),
    (
        "181.fm The Rock! (USA)",
        "http://listen.181fm.com/181-rock_128k.mp3",
    ),
    (
        "Big R Radio: Top 40 Hits (USA)",
        "http://bigrradio.cdnstream1.com/5104_128",
    ),
    (
        "NRJ Hits (France)",
        "http://cdn.nrjaudio.fm/audio1/fr/30001/mp3_128.mp3",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub url: String,
    /// Added by the user rather than shipped with the player.
    #[serde(default)]
    pub custom: bool,
}

/// Name-keyed station map that keeps insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let stations = BUILTIN_STATIONS
            .iter()
            .map(|(name, url)| Station {
                name: name.to_string(),
                url: url.to_string(),
                custom: false,
            })
            .collect();
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }

    pub fn names(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }

    pub fn url_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.url.as_str())
    }

    /// Add a user station. A name that already exists is overwritten in
    /// place and keeps its position.
    pub fn insert(&mut self, name: &str, url: &str) -> Result<(), StationError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(StationError::EmptyName);
        }
        if !is_stream_url(url) {
            return Err(StationError::InvalidUrl(url.to_string()));
        }
        match self.stations.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                debug!("overwriting station {name}");
                existing.url = url.to_string();
                existing.custom = true;
            }
            None => self.stations.push(Station {
                name: name.to_string(),
                url: url.to_string(),
                custom: true,
            }),
        }
        Ok(())
    }

    /// Remove a user-added station. Built-ins stay; removing a user
    /// override of a built-in puts the shipped URL back.
    pub fn remove(&mut self, name: &str) -> Result<Station, StationError> {
        let idx = self
            .stations
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StationError::NotFound(name.to_string()))?;
        let station = &mut self.stations[idx];
        if !station.custom {
            return Err(StationError::BuiltIn(name.to_string()));
        }
        if let Some(&(_, shipped)) = BUILTIN_STATIONS.iter().find(|(n, _)| *n == name) {
            debug!("restoring built-in station {name}");
            let removed = station.clone();
            station.url = shipped.to_string();
            station.custom = false;
            return Ok(removed);
        }
        Ok(self.stations.remove(idx))
    }

    pub fn custom(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter().filter(|s| s.custom)
    }

    /// Merge stations loaded from disk, overwriting by name.
    /// Entries that fail validation are skipped.
    pub fn extend(&mut self, stations: impl IntoIterator<Item = Station>) -> usize {
        let mut merged = 0;
        for s in stations {
            if self.insert(&s.name, &s.url).is_ok() {
                merged += 1;
            }
        }
        merged
    }

    /// Write user-added stations as `[[station]]` tables.
    pub fn save_custom(&self, path: &Path) -> Result<(), StationError> {
        let file = TomlStationFile {
            station: self
                .custom()
                .map(|s| TomlStation {
                    name: s.name.clone(),
                    url: s.url.clone(),
                })
                .collect(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(&file)?)?;
        info!("saved {} custom stations to {}", file.station.len(), path.display());
        Ok(())
    }
}

/// An absolute http(s) URL with a host.
pub fn is_stream_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

// ── m3u import ───────────────────────────────────────────────────────────────

pub fn parse_m3u_from_str(content: &str) -> Vec<Station> {
    let mut stations = Vec::new();
    let mut pending_name: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("#EXTINF:") {
            if let Some(comma_idx) = rest.find(',') {
                pending_name = Some(rest[comma_idx + 1..].trim().to_string());
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let url = line.to_string();
        let name = pending_name.take().unwrap_or_else(|| url.clone());
        stations.push(Station {
            name,
            url,
            custom: true,
        });
    }

    stations
}

pub fn load_stations_from_m3u(path: &Path) -> Result<Vec<Station>, StationError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_m3u_from_str(&content))
}

// ── TOML station file ────────────────────────────────────────────────────────

/// On-disk shape of `stations.toml`, kept apart from `Station` so the file
/// format does not carry the `custom` flag.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlStationFile {
    #[serde(default)]
    station: Vec<TomlStation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlStation {
    name: String,
    url: String,
}

pub fn parse_stations_from_toml_str(content: &str) -> Result<Vec<Station>, StationError> {
    let file: TomlStationFile = toml::from_str(content)?;
    Ok(file
        .station
        .into_iter()
        .map(|s| Station {
            name: s.name,
            url: s.url,
            custom: true,
        })
        .collect())
}

/// Load custom stations. A missing file is an empty list.
pub fn load_stations_from_toml(path: &Path) -> Result<Vec<Station>, StationError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    parse_stations_from_toml_str(&content)
}
