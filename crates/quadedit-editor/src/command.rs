use std::fmt;
use std::str::FromStr;

/// Named mode commands. Pointer input goes through the `pointer_*` methods
/// of [`Editor`](crate::Editor) instead.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Command {
    ToggleEdit,
    ToggleWireframe,
    ToggleAnimate,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::ToggleEdit,
        Command::ToggleWireframe,
        Command::ToggleAnimate,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Command::ToggleEdit => "toggle-edit",
            Command::ToggleWireframe => "toggle-wireframe",
            Command::ToggleAnimate => "toggle-animate",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command `{}`", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
