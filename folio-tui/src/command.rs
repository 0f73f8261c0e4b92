use crate::nav::Section;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlayback, // space | p
    Scroll(isize),  // j k ↑ ↓, mouse wheel
    PageUp,
    PageDown,
    Top,    // g | Home
    Bottom, // G | End
    Jump(Section),
    ToggleTheme,
    Email,
    LinkedIn,
    Resume,
    Help,
    Quit,
}

/// Lines scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let cmd = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Command::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Command::Quit,
        (KeyCode::Char(' '), _) | (KeyCode::Char('p'), _) => Command::TogglePlayback,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Command::Scroll(1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Command::Scroll(-1),
        (KeyCode::PageDown, _) => Command::PageDown,
        (KeyCode::PageUp, _) => Command::PageUp,
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Command::Top,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Command::Bottom,
        (KeyCode::Char('t'), _) => Command::ToggleTheme,
        (KeyCode::Char('e'), _) => Command::Email,
        (KeyCode::Char('l'), _) => Command::LinkedIn,
        (KeyCode::Char('r'), _) => Command::Resume,
        (KeyCode::Char('?'), _) => Command::Help,
        (KeyCode::Char(c), _) => return Section::from_digit(c).map(Command::Jump),
        _ => return None,
    };
    Some(cmd)
}

pub fn command_for_mouse(ev: MouseEvent) -> Option<Command> {
    match ev.kind {
        MouseEventKind::ScrollDown => Some(Command::Scroll(WHEEL_STEP)),
        MouseEventKind::ScrollUp => Some(Command::Scroll(-WHEEL_STEP)),
        _ => None,
    }
}

pub const HELP: &str =
    "space pause · j/k scroll · 1-5 jump · g/G top/bottom · t theme · e/l/r contact · q quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_playback_and_quit_keys() {
        assert_eq!(command_for_key(press(KeyCode::Char(' '))), Some(Command::TogglePlayback));
        assert_eq!(command_for_key(press(KeyCode::Char('p'))), Some(Command::TogglePlayback));
        assert_eq!(command_for_key(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for_key(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        // plain `c` does nothing
        assert_eq!(command_for_key(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(command_for_key(press(KeyCode::Down)), Some(Command::Scroll(1)));
        assert_eq!(command_for_key(press(KeyCode::Char('k'))), Some(Command::Scroll(-1)));
        assert_eq!(command_for_key(press(KeyCode::PageDown)), Some(Command::PageDown));
        assert_eq!(command_for_key(press(KeyCode::Char('G'))), Some(Command::Bottom));
        assert_eq!(
            command_for_key(press(KeyCode::Char('3'))),
            Some(Command::Jump(Section::Experience))
        );
        assert_eq!(command_for_key(press(KeyCode::Char('9'))), None);
    }

    #[test]
    fn ignores_key_releases() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(command_for_key(release), None);
    }

    #[test]
    fn wheel_scrolls() {
        let ev = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(command_for_mouse(ev(MouseEventKind::ScrollDown)), Some(Command::Scroll(3)));
        assert_eq!(command_for_mouse(ev(MouseEventKind::ScrollUp)), Some(Command::Scroll(-3)));
        assert_eq!(command_for_mouse(ev(MouseEventKind::Down(MouseButton::Left))), None);
    }
}
