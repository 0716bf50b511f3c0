use std::{
    fmt::{self, Debug, Display},
    io,
};

use compact_str::CompactString;
use cubecam_math::{Mat4, Vec2, Vec3, Vec4};

use crate::gl::{ShaderBackend, ShaderSource, StageKind};

/// Ordered `(stage, path)` pairs a shader program is built from.
///
/// Vertex and fragment stages are always present; a geometry stage is
/// optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    stages: Vec<(StageKind, CompactString)>,
}

impl ShaderPaths {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        Self {
            stages: vec![
                (StageKind::Vertex, vertex.into()),
                (StageKind::Fragment, fragment.into()),
            ],
        }
    }

    /// Adds (or replaces) the geometry stage.
    pub fn geometry(mut self, path: &str) -> Self {
        self.stages.retain(|(kind, _)| *kind != StageKind::Geometry);
        self.stages.push((StageKind::Geometry, path.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageKind, &str)> + '_ {
        self.stages.iter().map(|(kind, path)| (*kind, path.as_str()))
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Display for ShaderPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, path)) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}={path}")?;
        }
        Ok(())
    }
}

/// A non-fatal problem encountered while building a [`ShaderProgram`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderDiagnostic {
    /// Source text could not be read; the stage was compiled from empty source.
    #[error("failed to read {kind} shader source '{path}': {message}")]
    SourceRead {
        kind: StageKind,
        path: CompactString,
        message: String,
    },

    /// The backend cannot create shaders of this kind.
    #[error("{kind} shader stage '{path}' is not supported by the graphics backend")]
    StageUnavailable { kind: StageKind, path: CompactString },

    /// The stage failed to compile.
    #[error("failed to compile {kind} shader '{path}':\n{log}")]
    Compile {
        kind: StageKind,
        path: CompactString,
        log: String,
    },

    /// The backend could not allocate a program object.
    #[error("failed to create shader program")]
    ProgramUnavailable,

    /// The program failed to link.
    #[error("failed to link shader program from [{}]:\n{log}", stage_list(.stages))]
    Link { stages: Vec<StageKind>, log: String },
}

fn stage_list(stages: &[StageKind]) -> String {
    stages.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(", ")
}

/// Result of reading one stage's source text.
#[derive(Debug)]
pub struct LoadedStage {
    pub kind: StageKind,
    pub path: CompactString,
    pub source: io::Result<String>,
}

/// Reads the source of every stage in `paths`, in order.
///
/// Read failures are returned per stage; nothing is logged here.
pub fn load_stage_sources(
    sources: &(impl ShaderSource + ?Sized),
    paths: &ShaderPaths,
) -> Vec<LoadedStage> {
    paths
        .iter()
        .map(|(kind, path)| LoadedStage {
            kind,
            path: path.into(),
            source: sources.read(path),
        })
        .collect()
}

/// A linked GPU program together with the paths and diagnostics of its build.
///
/// Construction never fails: read, compile and link problems are logged and
/// kept in [`ShaderProgram::diagnostics`]. It is up to the caller to decide
/// whether an unlinked program is acceptable.
pub struct ShaderProgram<B: ShaderBackend> {
    program: Option<B::Program>,
    paths: ShaderPaths,
    diagnostics: Vec<ShaderDiagnostic>,
    linked: bool,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    /// Loads, compiles and links every stage in `paths`.
    ///
    /// Every created stage object is deleted after linking, whether or not
    /// linking succeeded.
    pub fn build(gl: &B, sources: &(impl ShaderSource + ?Sized), paths: ShaderPaths) -> Self {
        let mut diagnostics = Vec::new();

        let mut stages = Vec::with_capacity(paths.len());
        for stage in load_stage_sources(sources, &paths) {
            let text = match stage.source {
                Ok(text) => text,
                Err(e) => {
                    record(&mut diagnostics, ShaderDiagnostic::SourceRead {
                        kind: stage.kind,
                        path: stage.path.clone(),
                        message: e.to_string(),
                    });
                    String::new()
                },
            };

            if let Some(shader) = compile_stage(gl, stage.kind, &stage.path, &text, &mut diagnostics)
            {
                stages.push((stage.kind, shader));
            }
        }

        let (program, linked) = link_stages(gl, &stages, &mut diagnostics);

        stages.iter().for_each(|(_, shader)| gl.delete_shader(shader));

        if diagnostics.is_empty() {
            log::info!("built shader program ({paths})");
        } else {
            log::warn!(
                "shader program ({paths}) built with {} diagnostic(s)",
                diagnostics.len()
            );
        }

        Self { program, paths, diagnostics, linked }
    }

    /// Binds the program for subsequent draw calls.
    pub fn use_program(&self, gl: &B) {
        gl.use_program(self.program.as_ref());
    }

    /// Returns `true` if the program object exists and linked successfully.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    pub fn paths(&self) -> &ShaderPaths {
        &self.paths
    }

    pub fn handle(&self) -> Option<&B::Program> {
        self.program.as_ref()
    }

    pub fn set_bool(&self, gl: &B, name: &str, value: bool) {
        self.with_uniform(gl, name, |loc| gl.uniform_i32(loc, value as i32));
    }

    pub fn set_int(&self, gl: &B, name: &str, value: i32) {
        self.with_uniform(gl, name, |loc| gl.uniform_i32(loc, value));
    }

    pub fn set_float(&self, gl: &B, name: &str, value: f32) {
        self.with_uniform(gl, name, |loc| gl.uniform_f32(loc, value));
    }

    pub fn set_vec2(&self, gl: &B, name: &str, value: Vec2) {
        self.with_uniform(gl, name, |loc| gl.uniform_vec2(loc, value.to_array()));
    }

    pub fn set_vec3(&self, gl: &B, name: &str, value: Vec3) {
        self.with_uniform(gl, name, |loc| gl.uniform_vec3(loc, value.to_array()));
    }

    pub fn set_vec4(&self, gl: &B, name: &str, value: Vec4) {
        self.with_uniform(gl, name, |loc| gl.uniform_vec4(loc, value.to_array()));
    }

    pub fn set_mat4(&self, gl: &B, name: &str, value: &Mat4) {
        self.with_uniform(gl, name, |loc| gl.uniform_mat4(loc, value.as_slice()));
    }

    /// Releases the GPU program.
    pub fn delete(self, gl: &B) {
        if let Some(program) = &self.program {
            gl.delete_program(program);
            log::debug!("deleted shader program ({})", self.paths);
        }
    }

    // names without a location are silently ignored, like glUniform* with -1
    fn with_uniform(&self, gl: &B, name: &str, upload: impl FnOnce(&B::UniformLocation)) {
        if let Some(location) = self.program.as_ref().and_then(|p| gl.uniform_location(p, name)) {
            upload(&location);
        }
    }
}

impl<B: ShaderBackend> Debug for ShaderProgram<B>
where
    B::Program: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .field("paths", &self.paths)
            .field("diagnostics", &self.diagnostics)
            .field("linked", &self.linked)
            .finish()
    }
}

fn record(diagnostics: &mut Vec<ShaderDiagnostic>, diagnostic: ShaderDiagnostic) {
    log::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}

fn compile_stage<B: ShaderBackend>(
    gl: &B,
    kind: StageKind,
    path: &CompactString,
    source: &str,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> Option<B::Shader> {
    let Some(shader) = gl.create_shader(kind) else {
        record(diagnostics, ShaderDiagnostic::StageUnavailable { kind, path: path.clone() });
        return None;
    };

    gl.compile_shader(&shader, source);
    if !gl.shader_compile_status(&shader) {
        record(diagnostics, ShaderDiagnostic::Compile {
            kind,
            path: path.clone(),
            log: gl.shader_info_log(&shader),
        });
    }

    Some(shader)
}

fn link_stages<B: ShaderBackend>(
    gl: &B,
    stages: &[(StageKind, B::Shader)],
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> (Option<B::Program>, bool) {
    let Some(program) = gl.create_program() else {
        record(diagnostics, ShaderDiagnostic::ProgramUnavailable);
        return (None, false);
    };

    stages.iter().for_each(|(_, shader)| gl.attach_shader(&program, shader));
    gl.link_program(&program);

    let linked = gl.program_link_status(&program);
    if !linked {
        record(diagnostics, ShaderDiagnostic::Link {
            stages: stages.iter().map(|(kind, _)| *kind).collect(),
            log: gl.program_info_log(&program),
        });
    }

    (Some(program), linked)
}
