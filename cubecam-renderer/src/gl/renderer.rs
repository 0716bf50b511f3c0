use web_sys::HtmlCanvasElement;

use crate::{
    error::Error,
    gl::{GlState, GL},
    js,
};

/// Rendering context that provides access to WebGL state.
pub(crate) struct RenderContext<'a> {
    pub gl: &'a web_sys::WebGl2RenderingContext,
    pub state: &'a mut GlState,
}

/// WebGL2 renderer bound to a single canvas.
///
/// Owns the rendering context and the tracked GL state; depth testing is
/// enabled for every frame since the scene is a solid 3D mesh.
#[derive(Debug)]
pub struct Renderer {
    gl: web_sys::WebGl2RenderingContext,
    canvas: web_sys::HtmlCanvasElement,
    state: GlState,
    clear_color: (f32, f32, f32),
}

impl Renderer {
    /// Creates a new renderer by querying for a canvas element with the given ID.
    ///
    /// # Parameters
    /// * `canvas_id` - CSS selector for the canvas element (e.g., "canvas" or "#my-canvas")
    ///
    /// # Errors
    /// * `Error::Initialization` - Canvas not found, or WebGL2 unavailable
    pub fn create(canvas_id: &str) -> Result<Self, Error> {
        let canvas = js::get_canvas_by_id(canvas_id)?;
        Self::create_with_canvas(canvas)
    }

    /// Creates a new renderer from an existing HTML canvas element.
    pub fn create_with_canvas(canvas: HtmlCanvasElement) -> Result<Self, Error> {
        let (width, height) = (canvas.width(), canvas.height());

        let gl = js::get_webgl2_context(&canvas)?;
        let state = GlState::new();

        let mut renderer = Self {
            gl,
            canvas,
            state,
            clear_color: (0.0, 0.0, 0.0),
        };
        renderer.resize(width as _, height as _);
        log::debug!("created WebGL2 renderer with a {width}x{height} canvas");
        Ok(renderer)
    }

    /// Sets the color the framebuffer is cleared to at the start of each frame.
    pub fn clear_color(mut self, (r, g, b): (f32, f32, f32)) -> Self {
        self.clear_color = (r, g, b);
        self
    }

    /// Resizes the canvas and updates the viewport; negative sizes count as 0.
    pub fn resize(&mut self, width: i32, height: i32) {
        let (width, height) = canvas_dimensions(width, height);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.state.viewport(&self.gl, 0, 0, width as i32, height as i32);
    }

    /// Clears the color and depth buffers with the specified color.
    pub fn clear(&mut self, r: f32, g: f32, b: f32) {
        self.state.clear_color(&self.gl, r, g, b, 1.0);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    /// Begins a new rendering frame.
    pub fn begin_frame(&mut self) {
        self.state.depth_test(&self.gl, true);
        let (r, g, b) = self.clear_color;
        self.clear(r, g, b);
    }

    /// Renders a drawable object.
    ///
    /// Calls the drawable's prepare, draw, and cleanup methods in sequence.
    #[allow(private_bounds)]
    pub fn render(&mut self, drawable: &impl Drawable) {
        let mut context = RenderContext { gl: &self.gl, state: &mut self.state };

        drawable.prepare(&mut context);
        drawable.draw(&mut context);
        drawable.cleanup(&mut context);
    }

    /// Ends the current rendering frame; the browser presents the canvas.
    pub fn end_frame(&mut self) {}

    /// Returns a reference to the WebGL2 rendering context.
    pub fn gl(&self) -> &GL {
        &self.gl
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Returns the current canvas dimensions as a tuple.
    pub fn canvas_size(&self) -> (i32, i32) {
        (self.canvas.width() as i32, self.canvas.height() as i32)
    }

    /// Width over height of the viewport, `1.0` for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.state.viewport_size();
        aspect_ratio(width, height)
    }
}

pub(crate) fn canvas_dimensions(width: i32, height: i32) -> (u32, u32) {
    (width.max(0) as u32, height.max(0) as u32)
}

pub(crate) fn aspect_ratio(width: i32, height: i32) -> f32 {
    if width <= 0 || height <= 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Trait for objects that can be rendered by the renderer.
pub(crate) trait Drawable {
    /// Binds shaders and uploads per-draw uniforms.
    fn prepare(&self, context: &mut RenderContext);

    /// Issues the draw calls.
    fn draw(&self, context: &mut RenderContext);

    /// Restores state bound during `prepare()`.
    fn cleanup(&self, context: &mut RenderContext);
}
