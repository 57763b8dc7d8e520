//! Command-line surface.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
  name = "bard",
  version,
  about = "The musical bard in your terminal",
  long_about = "Plays library folders with mpv and controls the running player over its IPC socket."
)]
pub struct Cli {
  /// Log what bard is doing
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Play every song in a folder
  Play {
    /// Artist folder under the library root
    artist: String,
    /// Album name
    #[arg(short, long)]
    album: String,
    /// File name (optional)
    #[arg(short = 'm', long = "music")]
    music: Option<String>,
  },
  /// Pause or resume playback
  Pause,
  /// Skip to the next song
  Next,
  /// Go back to the previous song
  Prev,
  /// Set the volume
  Vol {
    /// Volume level
    #[arg(value_name = "0-100", value_parser = clap::value_parser!(u8).range(0..=100))]
    level: u8,
  },
  /// Kill every running mpv instance
  Exit,
  /// Print a shell completion script
  Completions {
    #[arg(value_enum)]
    shell: Shell,
  },
  /// Print completion candidates for a partial command line
  #[command(name = "__complete", hide = true, disable_help_flag = true)]
  Complete {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    words: Vec<String>,
  },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
}
