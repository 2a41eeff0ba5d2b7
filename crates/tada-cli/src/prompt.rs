//! Terminal prompts

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    let input = ask(&format!("{} [y/N] ", prompt))?.unwrap_or_default();
    let input = input.to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Print `prompt` and read one trimmed line
///
/// Returns `None` at end of input.
pub fn ask(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Read a password without echoing it
///
/// Piped input is read as a plain line. Returns `None` if the user cancels
/// with Ctrl-C or Ctrl-D, or at end of input.
pub fn ask_password() -> Result<Option<String>> {
    if !atty::is(atty::Stream::Stdin) {
        return ask("Password: ");
    }

    print!("Password: ");
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let result = read_hidden();
    terminal::disable_raw_mode()?;
    println!();

    result
}

/// What a key press does to a hidden input buffer
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Submit,
    Cancel,
}

fn read_hidden() -> Result<Option<String>> {
    let mut buffer = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(&mut buffer, key.code, key.modifiers) {
                KeyAction::Continue => {}
                KeyAction::Submit => return Ok(Some(buffer)),
                KeyAction::Cancel => return Ok(None),
            }
        }
    }
}

fn handle_key(buffer: &mut String, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Cancel
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(keys: &[(KeyCode, KeyModifiers)]) -> (String, KeyAction) {
        let mut buffer = String::new();
        for (code, modifiers) in keys {
            let action = handle_key(&mut buffer, *code, *modifiers);
            if action != KeyAction::Continue {
                return (buffer, action);
            }
        }
        (buffer, KeyAction::Continue)
    }

    #[test]
    fn test_hidden_input_collects_characters() {
        let none = KeyModifiers::NONE;
        let (buffer, action) = type_keys(&[
            (KeyCode::Char('p'), none),
            (KeyCode::Char('W'), KeyModifiers::SHIFT),
            (KeyCode::Char('x'), none),
            (KeyCode::Backspace, none),
            (KeyCode::Char('!'), none),
            (KeyCode::Enter, none),
        ]);
        assert_eq!(action, KeyAction::Submit);
        assert_eq!(buffer, "pW!");
    }

    #[test]
    fn test_hidden_input_cancel() {
        let (_, action) = type_keys(&[
            (KeyCode::Char('a'), KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ]);
        assert_eq!(action, KeyAction::Cancel);

        let (_, action) = type_keys(&[(KeyCode::Esc, KeyModifiers::NONE)]);
        assert_eq!(action, KeyAction::Cancel);
    }

    #[test]
    fn test_backspace_on_empty_buffer() {
        let (buffer, action) = type_keys(&[
            (KeyCode::Backspace, KeyModifiers::NONE),
            (KeyCode::Enter, KeyModifiers::NONE),
        ]);
        assert_eq!(action, KeyAction::Submit);
        assert!(buffer.is_empty());
    }
}
