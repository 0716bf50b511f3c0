use crate::gl::GL;

/// Manages simple WebGL state to reduce redundant state changes
#[derive(Debug)]
pub(crate) struct GlState {
    // Viewport dimensions
    viewport: [i32; 4], // [x, y, width, height]

    // Clear color
    clear_color: [f32; 4],

    // Depth testing
    depth_test: bool,
}

impl GlState {
    /// Create a new GLState object with WebGL defaults
    pub fn new() -> Self {
        Self {
            viewport: [0, 0, 0, 0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            depth_test: false,
        }
    }

    /// Set viewport dimensions
    pub fn viewport(&mut self, gl: &GL, x: i32, y: i32, width: i32, height: i32) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            gl.viewport(x, y, width, height);
            self.viewport = new_viewport;
        }
        self
    }

    /// Set clear color
    pub fn clear_color(&mut self, gl: &GL, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        let new_color = [r, g, b, a];
        if self.clear_color != new_color {
            gl.clear_color(r, g, b, a);
            self.clear_color = new_color;
        }
        self
    }

    /// Enable or disable depth testing
    pub fn depth_test(&mut self, gl: &GL, enable: bool) -> &mut Self {
        if self.depth_test != enable {
            capability(gl, GL::DEPTH_TEST, enable);
            self.depth_test = enable;
        }
        self
    }

    pub fn viewport_size(&self) -> (i32, i32) {
        (self.viewport[2], self.viewport[3])
    }
}

fn capability(gl: &GL, capability: u32, enable: bool) {
    if enable {
        gl.enable(capability);
    } else {
        gl.disable(capability);
    }
}
