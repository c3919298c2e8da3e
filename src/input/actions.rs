//! Logical player actions
//!
//! Keys map to these through a `ControlSet`; gameplay code never looks at
//! raw key codes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Flip this player's gravity (key-down edge only)
    ToggleGravity,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::ToggleGravity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::MoveLeft => "move left",
            Action::MoveRight => "move right",
            Action::Jump => "jump",
            Action::ToggleGravity => "toggle gravity",
        }
    }
}
