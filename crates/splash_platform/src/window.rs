//! Window abstraction

/// Window configuration
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in logical pixels
    pub width: f32,
    /// Initial height in logical pixels
    pub height: f32,
    /// Device pixel ratio
    pub scale_factor: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Splash".to_string(),
            width: 800.0,
            height: 600.0,
            scale_factor: 1.0,
        }
    }
}

impl WindowConfig {
    /// Create a new window configuration with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window size
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the device pixel ratio
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Window trait
pub trait Window {
    /// Get the window size in logical pixels
    fn logical_size(&self) -> (f32, f32);

    /// Get the window size in physical pixels
    fn size(&self) -> (u32, u32) {
        let (w, h) = self.logical_size();
        let scale = self.scale_factor() as f32;
        ((w * scale).round() as u32, (h * scale).round() as u32)
    }

    /// Get the display scale factor
    fn scale_factor(&self) -> f64;

    /// Get the window title
    fn title(&self) -> String;
}
