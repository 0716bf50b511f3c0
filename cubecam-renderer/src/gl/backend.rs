use std::fmt::{self, Display};

use crate::gl::GL;

/// Kind of a single shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
    Geometry,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
            StageKind::Geometry => "geometry",
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The slice of a GL-style API needed to build shader programs and upload
/// uniforms.
///
/// Creation functions return `None` when the API cannot provide the object,
/// e.g. after a lost context or for a stage kind it does not support.
pub trait ShaderBackend {
    type Shader;
    type Program;
    type UniformLocation;

    fn create_shader(&self, kind: StageKind) -> Option<Self::Shader>;
    fn compile_shader(&self, shader: &Self::Shader, source: &str);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;
    fn use_program(&self, program: Option<&Self::Program>);
    fn delete_program(&self, program: &Self::Program);

    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32);
    fn uniform_f32(&self, location: &Self::UniformLocation, value: f32);
    fn uniform_vec2(&self, location: &Self::UniformLocation, value: [f32; 2]);
    fn uniform_vec3(&self, location: &Self::UniformLocation, value: [f32; 3]);
    fn uniform_vec4(&self, location: &Self::UniformLocation, value: [f32; 4]);
    /// Uploads 16 column-major floats, not transposed.
    fn uniform_mat4(&self, location: &Self::UniformLocation, value: &[f32]);
}

impl ShaderBackend for GL {
    type Shader = web_sys::WebGlShader;
    type Program = web_sys::WebGlProgram;
    type UniformLocation = web_sys::WebGlUniformLocation;

    fn create_shader(&self, kind: StageKind) -> Option<Self::Shader> {
        let shader_type = match kind {
            StageKind::Vertex => GL::VERTEX_SHADER,
            StageKind::Fragment => GL::FRAGMENT_SHADER,
            // WebGL2 has no geometry stage
            StageKind::Geometry => return None,
        };

        GL::create_shader(self, shader_type)
    }

    fn compile_shader(&self, shader: &Self::Shader, source: &str) {
        self.shader_source(shader, source);
        GL::compile_shader(self, shader);
    }

    fn shader_compile_status(&self, shader: &Self::Shader) -> bool {
        self.get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &Self::Shader) -> String {
        self.get_shader_info_log(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: &Self::Shader) {
        GL::delete_shader(self, Some(shader));
    }

    fn create_program(&self) -> Option<Self::Program> {
        GL::create_program(self)
    }

    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader) {
        GL::attach_shader(self, program, shader);
    }

    fn link_program(&self, program: &Self::Program) {
        GL::link_program(self, program);
    }

    fn program_link_status(&self, program: &Self::Program) -> bool {
        self.get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &Self::Program) -> String {
        self.get_program_info_log(program).unwrap_or_default()
    }

    fn use_program(&self, program: Option<&Self::Program>) {
        GL::use_program(self, program);
    }

    fn delete_program(&self, program: &Self::Program) {
        GL::delete_program(self, Some(program));
    }

    fn uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32) {
        self.uniform1i(Some(location), value);
    }

    fn uniform_f32(&self, location: &Self::UniformLocation, value: f32) {
        self.uniform1f(Some(location), value);
    }

    fn uniform_vec2(&self, location: &Self::UniformLocation, [x, y]: [f32; 2]) {
        self.uniform2f(Some(location), x, y);
    }

    fn uniform_vec3(&self, location: &Self::UniformLocation, [x, y, z]: [f32; 3]) {
        self.uniform3f(Some(location), x, y, z);
    }

    fn uniform_vec4(&self, location: &Self::UniformLocation, [x, y, z, w]: [f32; 4]) {
        self.uniform4f(Some(location), x, y, z, w);
    }

    fn uniform_mat4(&self, location: &Self::UniformLocation, value: &[f32]) {
        self.uniform_matrix4fv_with_f32_array(Some(location), false, value);
    }
}
