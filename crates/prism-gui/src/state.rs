use std::path::PathBuf;

use prism_core::decompose::DecomposeMode;

/// What the canvas currently shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewKind {
    /// Startup placeholder.
    #[default]
    Blank,
    Original,
    Split(DecomposeMode),
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "No image"),
            Self::Original => write!(f, "Original"),
            Self::Split(mode) => write!(f, "{mode}"),
        }
    }
}

/// UI bookkeeping that is not owned by the viewport.
#[derive(Default)]
pub struct UIState {
    pub file_path: Option<PathBuf>,
    pub view: ViewKind,
    pub log_messages: Vec<String>,
    /// Wheel rotation not yet turned into whole notches.
    pub wheel_accum: f32,
    pub pointer_inside: bool,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}

/// Which menu actions and shortcuts are live this frame.
///
/// Everything that touches the image is off while a background split holds
/// the interaction gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuGates {
    pub open: bool,
    pub save: bool,
    pub split: bool,
    pub clear_line: bool,
    pub view: bool,
}

impl MenuGates {
    pub fn new(busy: bool, has_image: bool, has_line: bool) -> Self {
        Self {
            open: !busy,
            save: has_image && !busy,
            split: has_image && !busy,
            clear_line: has_line && !busy,
            view: !busy,
        }
    }
}
