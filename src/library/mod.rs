//! Music library module.
//!
//! The library is a plain folder tree: `root/<artist>/<album>/<track>`.

mod error;
mod path;
mod playlist;
mod resolver;

pub use error::LibraryError;
pub use path::{is_audio_name, LibraryPath, AUDIO_EXTENSIONS};
pub use playlist::{build_playlist, Playlist};
pub use resolver::LibraryResolver;
