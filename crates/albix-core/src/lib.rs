pub mod config;
pub mod engine;
pub mod error;
pub mod lyrics;
pub mod media;
pub mod platform;
pub mod playlist;
pub mod protocol;
pub mod session;
pub mod stations;
pub mod transport;

pub use engine::{EngineEvent, MediaStatus, PlaybackEngine};
pub use error::{LyricsError, PlaylistError, StationError};
pub use media::MediaKind;
pub use playlist::{Playlist, PlaylistEntry};
pub use session::{Phase, SessionState};
pub use stations::{Station, StationTable};
pub use transport::{Notice, Player, Severity};
