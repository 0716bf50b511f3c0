mod backend;
mod context;
mod cube;
mod program;
mod renderer;
mod source;

pub use backend::*;
pub(crate) use context::GlState;
pub use cube::*;
pub use program::*;
pub use renderer::*;
pub use source::*;

pub(crate) type GL = web_sys::WebGl2RenderingContext;
