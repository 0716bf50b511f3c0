use std::{fs, io};

/// Provides shader source text by path.
pub trait ShaderSource {
    /// Reads the complete source text stored at `path`.
    fn read(&self, path: &str) -> io::Result<String>;
}

/// Reads shader sources from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemSource;

impl ShaderSource for FileSystemSource {
    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Shader sources compiled into the binary, looked up by path.
///
/// Used on the web, where there is no filesystem to read from.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    files: &'static [(&'static str, &'static str)],
}

impl EmbeddedSource {
    pub const fn new(files: &'static [(&'static str, &'static str)]) -> Self {
        Self { files }
    }

    /// The shaders bundled with the crate.
    pub const fn bundled() -> Self {
        Self::new(&[
            (CUBE_VERTEX_PATH, include_str!("../shaders/cube.vert")),
            (CUBE_FRAGMENT_PATH, include_str!("../shaders/cube.frag")),
        ])
    }
}

impl Default for EmbeddedSource {
    fn default() -> Self {
        Self::bundled()
    }
}

impl ShaderSource for EmbeddedSource {
    fn read(&self, path: &str) -> io::Result<String> {
        self.files
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no embedded shader at {path}"))
            })
    }
}

/// Path of the bundled cube vertex shader.
pub const CUBE_VERTEX_PATH: &str = "shaders/cube.vert";
/// Path of the bundled cube fragment shader.
pub const CUBE_FRAGMENT_PATH: &str = "shaders/cube.frag";
