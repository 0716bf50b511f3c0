use compact_str::CompactString;
use cubecam_math::Mat4;

use crate::{
    camera::Camera,
    clock::FrameClock,
    config::{ProjectionConfig, SceneConfig},
    gl::{
        CubeMesh, Drawable, EmbeddedSource, RenderContext, Renderer, ShaderPaths, ShaderProgram,
        ShaderSource, CUBE_FRAGMENT_PATH, CUBE_VERTEX_PATH, GL,
    },
    input::{InputHandler, InputState},
    Error,
};

/// Uniform receiving the combined model-view-projection matrix.
pub const MVP_UNIFORM: &str = "MVP";

/// A free-look camera orbiting nothing in particular: one cube, one shader
/// program, keyboard and mouse input.
///
/// # Examples
///
/// ```rust,no_run
/// use cubecam_renderer::Scene;
///
/// let mut scene = Scene::builder("#canvas").build()?;
///
/// // once per animation frame
/// scene.render_frame()?;
///
/// if scene.should_close() {
///     scene.shutdown();
/// }
/// # Ok::<(), cubecam_renderer::Error>(())
/// ```
#[derive(Debug)]
pub struct Scene {
    renderer: Renderer,
    cube: CubeMesh,
    shader: ShaderProgram<GL>,
    camera: Camera,
    projection: ProjectionConfig,
    clock: FrameClock,
    input: InputHandler,
}

impl Scene {
    /// Creates a new scene builder with the specified canvas source.
    ///
    /// # Parameters
    /// * `canvas` - Canvas identifier (CSS selector) or `HtmlCanvasElement`
    #[allow(private_bounds)]
    pub fn builder(canvas: impl Into<CanvasSource>) -> SceneBuilder {
        SceneBuilder::new(canvas.into())
    }

    /// Advances the camera by the input gathered since the last frame and
    /// draws the cube.
    pub fn render_frame(&mut self) -> Result<(), Error> {
        let elapsed_seconds = self.clock.tick();
        update_camera(&mut self.camera, &mut self.input.state().borrow_mut(), elapsed_seconds);

        let projection = self.projection.matrix(self.renderer.aspect_ratio());
        let mvp = model_view_projection(&projection, &self.camera.view_matrix(), &Mat4::IDENTITY);

        self.renderer.begin_frame();
        self.renderer.render(&CubeDraw { mesh: &self.cube, shader: &self.shader, mvp });
        self.renderer.end_frame();

        Ok(())
    }

    /// Resizes the canvas and viewport; the projection follows the new aspect ratio.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.renderer.resize(width, height);
        log::debug!("resized scene to {width}x{height}");
    }

    /// `true` once Escape has been pressed.
    pub fn should_close(&self) -> bool {
        self.input.state().borrow().close_requested()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn shader(&self) -> &ShaderProgram<GL> {
        &self.shader
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Removes the input listeners and releases all GPU resources.
    pub fn shutdown(self) {
        let Scene { renderer, cube, shader, input, .. } = self;

        input.cleanup();
        cube.delete(renderer.gl());
        shader.delete(renderer.gl());

        log::info!("scene shut down");
    }
}

/// Applies one frame of input to the camera: the accumulated look delta
/// first, then every held movement key.
pub(crate) fn update_camera(camera: &mut Camera, input: &mut InputState, elapsed_seconds: f32) {
    let (dx, dy) = input.take_look_delta();
    camera.apply_look(dx, dy);

    for movement in input.keyboard().held_movements() {
        camera.apply_move(movement, elapsed_seconds);
    }
}

/// `projection * view * model`.
pub fn model_view_projection(projection: &Mat4, view: &Mat4, model: &Mat4) -> Mat4 {
    *projection * (*view * *model)
}

struct CubeDraw<'a> {
    mesh: &'a CubeMesh,
    shader: &'a ShaderProgram<GL>,
    mvp: Mat4,
}

impl Drawable for CubeDraw<'_> {
    fn prepare(&self, context: &mut RenderContext) {
        self.shader.use_program(context.gl);
        self.shader.set_mat4(context.gl, MVP_UNIFORM, &self.mvp);
        self.mesh.bind(context.gl);
    }

    fn draw(&self, context: &mut RenderContext) {
        self.mesh.draw(context.gl);
    }

    fn cleanup(&self, context: &mut RenderContext) {
        self.mesh.unbind(context.gl);
        context.gl.use_program(None);
    }
}

/// Canvas source for scene initialization.
enum CanvasSource {
    /// CSS selector string for canvas lookup (e.g., "#canvas", "canvas").
    Id(CompactString),
    /// Direct reference to an existing canvas element.
    Element(web_sys::HtmlCanvasElement),
}

/// Builder for configuring and creating a [`Scene`].
///
/// Defaults to [`SceneConfig::default`] and the bundled cube shaders.
pub struct SceneBuilder {
    canvas: CanvasSource,
    config: SceneConfig,
    shader_paths: ShaderPaths,
    shader_source: Box<dyn ShaderSource>,
    require_linked_program: bool,
}

impl SceneBuilder {
    fn new(canvas: CanvasSource) -> Self {
        SceneBuilder {
            canvas,
            config: SceneConfig::default(),
            shader_paths: ShaderPaths::new(CUBE_VERTEX_PATH, CUBE_FRAGMENT_PATH),
            shader_source: Box::new(EmbeddedSource::bundled()),
            require_linked_program: false,
        }
    }

    /// Sets the camera, projection and canvas configuration.
    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the shader stages to build the cube program from.
    pub fn shader_paths(mut self, paths: ShaderPaths) -> Self {
        self.shader_paths = paths;
        self
    }

    /// Sets where shader sources are read from.
    pub fn shader_source(mut self, source: impl ShaderSource + 'static) -> Self {
        self.shader_source = Box::new(source);
        self
    }

    /// Fails the build when the shader program does not link.
    ///
    /// Off by default: an unlinked program is reported through its
    /// diagnostics and the scene renders nothing but the clear color.
    pub fn require_linked_program(mut self, required: bool) -> Self {
        self.require_linked_program = required;
        self
    }

    /// Builds the scene with the configured options.
    pub fn build(self) -> Result<Scene, Error> {
        self.config.validate()?;

        let renderer = match self.canvas {
            CanvasSource::Id(id) => Renderer::create(&id)?,
            CanvasSource::Element(element) => Renderer::create_with_canvas(element)?,
        };
        let mut renderer = renderer.clear_color(self.config.clear_color_rgb());
        if let Some((width, height)) = self.config.canvas_dimensions() {
            renderer.resize(width, height);
        }

        let gl = renderer.gl();
        let shader = ShaderProgram::build(gl, self.shader_source.as_ref(), self.shader_paths);
        if self.require_linked_program && !shader.is_linked() {
            let detail = shader
                .diagnostics()
                .first()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "program did not link".to_string());
            shader.delete(gl);
            return Err(Error::shader_program_unusable(&detail));
        }

        let cube = match CubeMesh::new(gl) {
            Ok(cube) => cube,
            Err(e) => {
                shader.delete(gl);
                return Err(e);
            },
        };

        let input = match InputHandler::new(renderer.canvas()) {
            Ok(input) => input,
            Err(e) => {
                cube.delete(gl);
                shader.delete(gl);
                return Err(e);
            },
        };

        let camera = self.config.camera.build();
        let (width, height) = renderer.canvas_size();
        log::info!("scene ready: {width}x{height} canvas, camera at {:?}", camera.position());

        Ok(Scene {
            renderer,
            cube,
            shader,
            camera,
            projection: self.config.projection,
            clock: FrameClock::new(),
            input,
        })
    }
}

impl From<&str> for CanvasSource {
    fn from(id: &str) -> Self {
        CanvasSource::Id(id.into())
    }
}

impl From<web_sys::HtmlCanvasElement> for CanvasSource {
    fn from(element: web_sys::HtmlCanvasElement) -> Self {
        CanvasSource::Element(element)
    }
}

impl<'a> From<&'a web_sys::HtmlCanvasElement> for CanvasSource {
    fn from(value: &'a web_sys::HtmlCanvasElement) -> Self {
        value.clone().into()
    }
}
