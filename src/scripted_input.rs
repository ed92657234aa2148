use bracket_terminal::prelude::VirtualKeyCode;
use std::{fs, path::Path};

use crate::error::{GameError, GameResult};

/// Keypresses read from a text file, one character per key. Blank lines and
/// lines starting with `#` are ignored.
pub struct ScriptedInput {
    script_commands: Vec<VirtualKeyCode>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GameError::ScriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut script_commands = Vec::new();
        for line in text.lines() {
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            for char_code in trimmed_line.chars() {
                match char_to_virtualkeycode(char_code) {
                    Some(key) => script_commands.push(key),
                    None => log::warn!("unknown key in script: {char_code:?}"),
                }
            }
        }

        Self {
            script_commands,
            current_command_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.script_commands.len()
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        let key = self.script_commands.get(self.current_command_index).copied();
        if key.is_some() {
            self.current_command_index += 1;
        }
        key
    }
}

fn char_to_virtualkeycode(c: char) -> Option<VirtualKeyCode> {
    match c {
        'w' | 'W' => Some(VirtualKeyCode::W),
        'a' | 'A' => Some(VirtualKeyCode::A),
        's' | 'S' => Some(VirtualKeyCode::S),
        'd' | 'D' => Some(VirtualKeyCode::D),
        'h' | 'H' => Some(VirtualKeyCode::H),
        'j' | 'J' => Some(VirtualKeyCode::J),
        'k' | 'K' => Some(VirtualKeyCode::K),
        'l' | 'L' => Some(VirtualKeyCode::L),
        'r' | 'R' => Some(VirtualKeyCode::R),
        '.' => Some(VirtualKeyCode::Period),
        'q' | 'Q' | '\x1B' => Some(VirtualKeyCode::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_unknown_keys() {
        let mut script = ScriptedInput::parse("# opening moves\n\nd d\n.q\n");
        assert_eq!(script.len(), 4);
        assert_eq!(script.next_key(), Some(VirtualKeyCode::D));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::D));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::Period));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::Escape));
        assert_eq!(script.next_key(), None);
        assert_eq!(script.next_key(), None);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ScriptedInput::from_file("/nonexistent/moves.txt");
        assert!(matches!(err, Err(GameError::ScriptIo { .. })));
    }
}
