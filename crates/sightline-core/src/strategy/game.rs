//! Known game-engine window signatures.
//!
//! Coarse on purpose: nothing inside the process can be asked before the
//! bridge answers, so only the window class and process name are used.

/// Window-class markers and process-name substrings that identify a game.
#[derive(Debug, Clone)]
pub struct GameSignatures {
    class_markers: Vec<String>,
    process_markers: Vec<String>,
}

const CLASS_MARKERS: &[&str] = &[
    "UnityWndClass",
    "UnrealWindow",
    "Godot_Engine",
    "GodotEngine",
    "SDL_app",
    "GLFW30",
    "LWJGL",
];

const PROCESS_MARKERS: &[&str] = &["unity", "-win64-shipping", "godot", "unreal"];

impl Default for GameSignatures {
    fn default() -> Self {
        Self::new(
            CLASS_MARKERS.iter().map(|s| s.to_string()),
            PROCESS_MARKERS.iter().map(|s| s.to_string()),
        )
    }
}

impl GameSignatures {
    pub fn new(
        class_markers: impl IntoIterator<Item = String>,
        process_markers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            class_markers: class_markers.into_iter().map(|m| m.to_lowercase()).collect(),
            process_markers: process_markers.into_iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// True when either the class or the process looks like a game.
    pub fn matches(&self, window_class: &str, process_name: &str) -> bool {
        self.matches_class(window_class) || self.matches_process(process_name)
    }

    pub fn matches_class(&self, window_class: &str) -> bool {
        if window_class.is_empty() {
            return false;
        }
        let class = window_class.to_lowercase();
        self.class_markers.iter().any(|m| class.contains(m.as_str()))
    }

    pub fn matches_process(&self, process_name: &str) -> bool {
        if process_name.is_empty() {
            return false;
        }
        let process = process_name.to_lowercase();
        self.process_markers.iter().any(|m| process.contains(m.as_str()))
    }
}
