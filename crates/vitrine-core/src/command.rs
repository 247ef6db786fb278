//! Menu-bar and keyboard commands.
//!
//! Window-scoped commands act on the focused window.

/// A window manager command, as issued by the menu bar, a shortcut or the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Focus(String),
    Close,
    Minimize,
    Restore,
    Maximize,
    Move(i32, i32),
    Resize(i32, i32),
    CloseAll,
    MinimizeAll,
    RestoreAll,
    Tile,
    Cascade,
    Unknown(String),
}

impl Command {
    /// Parse a command string like `"open about"` or `"move 100 80"`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let mut parts = s.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase().replace('-', "_");
        let args: Vec<&str> = parts.collect();

        match (cmd.as_str(), args.as_slice()) {
            ("open", [app]) => Self::Open((*app).to_string()),
            ("focus", [app]) => Self::Focus((*app).to_string()),
            ("close", []) => Self::Close,
            ("minimize", []) => Self::Minimize,
            ("restore", []) => Self::Restore,
            ("maximize" | "toggle_maximize", []) => Self::Maximize,
            ("move", [x, y]) => match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => Self::Move(x, y),
                _ => Self::Unknown(s.to_string()),
            },
            ("resize", [w, h]) => match (w.parse(), h.parse()) {
                (Ok(w), Ok(h)) => Self::Resize(w, h),
                _ => Self::Unknown(s.to_string()),
            },
            ("close_all", []) => Self::CloseAll,
            ("minimize_all", []) => Self::MinimizeAll,
            ("restore_all", []) => Self::RestoreAll,
            ("tile", []) => Self::Tile,
            ("cascade", []) => Self::Cascade,
            _ => Self::Unknown(s.to_string()),
        }
    }
}
