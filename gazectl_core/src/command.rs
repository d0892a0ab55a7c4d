//! Discrete hotkey commands and their key bindings.

/// A discrete input applied at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    DecreaseGainY,
    IncreaseGainY,
    DecreaseGainX,
    IncreaseGainX,
    SetCenter,
    ResetAll,
    Quit,
}

impl Command {
    /// Map a keyboard byte (as reported by a window's key poll) to a command.
    ///
    /// | Key | Command |
    /// |---|---|
    /// | Escape (27) | Quit |
    /// | Space (32) | Toggle |
    /// | `[` / `]` | vertical gain down / up |
    /// | `-` / `=` | horizontal gain down / up |
    /// | `c` / `C` | SetCenter |
    /// | `r` / `R` | ResetAll |
    pub fn from_keycode(code: u8) -> Option<Self> {
        match code {
            27 => Some(Command::Quit),
            b' ' => Some(Command::Toggle),
            b'[' => Some(Command::DecreaseGainY),
            b']' => Some(Command::IncreaseGainY),
            b'-' => Some(Command::DecreaseGainX),
            b'=' => Some(Command::IncreaseGainX),
            b'c' | b'C' => Some(Command::SetCenter),
            b'r' | b'R' => Some(Command::ResetAll),
            _ => None,
        }
    }

    /// Map a key name from a trace file or the terminal.
    ///
    /// Accepts single characters (same table as [`Command::from_keycode`]) plus
    /// the names `esc`/`escape` and `space`.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let name = name.trim_matches(|c: char| c == '\r' || c == '\n');
        if name == " " {
            return Some(Command::Toggle);
        }
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "esc" | "escape" => return Some(Command::Quit),
            "space" => return Some(Command::Toggle),
            _ => {}
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Self::from_keycode(c as u8),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Toggle => "toggle",
            Command::DecreaseGainY => "gain_y_down",
            Command::IncreaseGainY => "gain_y_up",
            Command::DecreaseGainX => "gain_x_down",
            Command::IncreaseGainX => "gain_x_up",
            Command::SetCenter => "set_center",
            Command::ResetAll => "reset",
            Command::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Command;
    use rstest::rstest;

    #[rstest]
    #[case(27, Some(Command::Quit))]
    #[case(32, Some(Command::Toggle))]
    #[case(b'[', Some(Command::DecreaseGainY))]
    #[case(b']', Some(Command::IncreaseGainY))]
    #[case(b'-', Some(Command::DecreaseGainX))]
    #[case(b'=', Some(Command::IncreaseGainX))]
    #[case(b'c', Some(Command::SetCenter))]
    #[case(b'C', Some(Command::SetCenter))]
    #[case(b'r', Some(Command::ResetAll))]
    #[case(b'R', Some(Command::ResetAll))]
    #[case(b'q', None)]
    #[case(255, None)]
    fn keycodes(#[case] code: u8, #[case] want: Option<Command>) {
        assert_eq!(Command::from_keycode(code), want);
    }

    #[rstest]
    #[case("esc", Some(Command::Quit))]
    #[case("Escape", Some(Command::Quit))]
    #[case("space", Some(Command::Toggle))]
    #[case(" ", Some(Command::Toggle))]
    #[case("c\n", Some(Command::SetCenter))]
    #[case("=", Some(Command::IncreaseGainX))]
    #[case("", None)]
    #[case("cc", None)]
    #[case("é", None)]
    fn key_names(#[case] name: &str, #[case] want: Option<Command>) {
        assert_eq!(Command::from_key_name(name), want);
    }
}
