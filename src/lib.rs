pub mod clock;
pub mod corsi;
pub mod corsi_export;
pub mod enrich;
pub mod http;
pub mod pbp_fetch;
pub mod player_directory;
pub mod shift_fetch;
pub mod shift_index;
