pub mod help_overlay;
pub mod lyrics_panel;
pub mod now_playing;
pub mod playlist_view;
pub mod station_list;
