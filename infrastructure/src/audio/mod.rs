//! Audio output adapters.

mod file_player;

pub use file_player::FileAudioPlayer;
