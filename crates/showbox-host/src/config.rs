use crate::example::ExampleOptions;
use crate::sidebar;

/// Host settings fixed for the lifetime of the window.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Prefix of the window caption.
    pub title: String,
    /// Size of the area examples draw into, in logical pixels.
    pub example_size: (f32, f32),
    /// Type name or file stem of the example to start with instead of `welcome.*`.
    pub start: Option<String>,
    pub options: ExampleOptions,
    /// Text size of the fault panel and source view.
    pub font_size: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "Showbox".to_string(),
            example_size: (600.0, 600.0),
            start: None,
            options: ExampleOptions::default(),
            font_size: 14.0,
        }
    }
}

impl HostConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn start(mut self, name: Option<String>) -> Self {
        self.start = name;
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.options.fullscreen = fullscreen;
        self
    }

    /// Sidebar plus example area.
    pub fn window_size(&self) -> (f32, f32) {
        (sidebar::WIDTH + self.example_size.0, self.example_size.1)
    }
}
