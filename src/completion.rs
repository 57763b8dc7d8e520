//! Shell completion: context resolution for `bard __complete` and the
//! scripts that call it.

use crate::cli::Shell;
use crate::library::LibraryResolver;

const VERBS: [&str; 7] = ["play", "pause", "next", "prev", "vol", "exit", "completions"];

const ALBUM_FLAGS: [&str; 2] = ["--album", "-a"];
const MUSIC_FLAGS: [&str; 2] = ["--music", "-m"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
  Album,
  Music,
}

fn slot_of(flag: &str) -> Option<Slot> {
  if ALBUM_FLAGS.contains(&flag) {
    Some(Slot::Album)
  } else if MUSIC_FLAGS.contains(&flag) {
    Some(Slot::Music)
  } else {
    None
  }
}

/// What has already been typed for `play`.
#[derive(Debug, Default)]
struct PlayLine<'a> {
  artist: Option<&'a str>,
  album: Option<&'a str>,
}

impl<'a> PlayLine<'a> {
  fn set(&mut self, slot: Slot, value: &'a str) {
    if slot == Slot::Album {
      self.album = Some(value);
    }
  }
}

/// Strip shell quoting from a word as typed: backslash escapes, single and
/// double quotes. An unterminated quote runs to the end of the word.
fn unescape(word: &str) -> String {
  #[derive(Clone, Copy)]
  enum Quote {
    None,
    Single,
    Double,
  }

  let mut out = String::with_capacity(word.len());
  let mut quote = Quote::None;
  let mut chars = word.chars().peekable();
  while let Some(c) = chars.next() {
    match (quote, c) {
      (Quote::None, '\\') => out.extend(chars.next()),
      (Quote::None, '\'') => quote = Quote::Single,
      (Quote::None, '"') => quote = Quote::Double,
      (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
      (Quote::Double, '\\') => match chars.peek() {
        Some(&next) if matches!(next, '"' | '\\' | '$' | '`') => {
          out.push(next);
          chars.next();
        }
        _ => out.push(c),
      },
      _ => out.push(c),
    }
  }
  out
}

/// Candidates for the last element of `words`, the command line after the
/// program name, each word still quoted the way it was typed. Unknown
/// contexts yield nothing.
pub fn complete(resolver: &LibraryResolver, words: &[String]) -> Vec<String> {
  let words: Vec<String> = words.iter().map(|w| unescape(w)).collect();
  let Some((current, before)) = words.split_last() else {
    return VERBS.iter().map(|v| v.to_string()).collect();
  };
  let Some((verb, args)) = before.split_first() else {
    return VERBS
      .iter()
      .filter(|v| v.starts_with(current.as_str()))
      .map(|v| v.to_string())
      .collect();
  };
  if verb != "play" {
    return Vec::new();
  }

  let mut line = PlayLine::default();
  let mut pending: Option<Slot> = None;
  let mut iter = args.iter().map(String::as_str);
  while let Some(arg) = iter.next() {
    if let Some(slot) = pending.take() {
      // bash splits `--album=x` into `--album`, `=`, `x`.
      let value = if arg == "=" {
        match iter.next() {
          Some(v) => v,
          None => {
            pending = Some(slot);
            break;
          }
        }
      } else {
        arg
      };
      line.set(slot, value);
      continue;
    }
    if let Some(slot) = slot_of(arg) {
      pending = Some(slot);
    } else if let Some((flag, value)) = arg.split_once('=') {
      if let Some(slot) = slot_of(flag) {
        line.set(slot, value);
      }
    } else if !arg.starts_with('-') && line.artist.is_none() {
      line.artist = Some(arg);
    }
  }

  // `--album=Al` typed as one word: answer with the flag kept in front.
  if pending.is_none() {
    if let Some((flag, value)) = current.split_once('=') {
      if let Some(slot) = slot_of(flag) {
        return candidates(resolver, &line, slot, value)
          .into_iter()
          .map(|c| format!("{flag}={c}"))
          .collect();
      }
    }
  }

  let current = match (pending, current.as_str()) {
    (Some(_), "=") => "",
    (_, c) => c,
  };
  match pending {
    Some(slot) => candidates(resolver, &line, slot, current),
    None if line.artist.is_none() => resolver.artists(current),
    None => Vec::new(),
  }
}

fn candidates(resolver: &LibraryResolver, line: &PlayLine, slot: Slot, current: &str) -> Vec<String> {
  let Some(artist) = line.artist else {
    return Vec::new();
  };
  match slot {
    Slot::Album => resolver.albums(artist, current),
    Slot::Music => resolver.tracks(artist, line.album, current),
  }
}

/// Script that hooks `shell` up to `bard __complete`.
pub fn script(shell: Shell) -> &'static str {
  match shell {
    Shell::Bash => BASH,
    Shell::Zsh => ZSH,
    Shell::Fish => FISH,
  }
}

const BASH: &str = r#"_bard() {
  local IFS=$'\n'
  COMPREPLY=($(bard __complete "${COMP_WORDS[@]:1:COMP_CWORD}" 2>/dev/null))
}
complete -o filenames -F _bard bard
"#;

const ZSH: &str = r#"#compdef bard
_bard() {
  local -a candidates
  candidates=("${(@f)$(bard __complete "${(@)words[2,CURRENT]}" 2>/dev/null)}")
  compadd -a candidates
}
compdef _bard bard
"#;

const FISH: &str = r#"function __bard_complete
  set -l tokens (commandline -opc)
  bard __complete (string escape --no-quoted -- $tokens[2..-1]) (commandline -ct) 2>/dev/null
end
complete -c bard -f -a '(__bard_complete)'
"#;
