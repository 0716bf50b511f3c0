use crate::{error::Error, gl::GL};

/// Unit cube centered on the origin, as 12 non-indexed triangles.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 108] = [
    // back (-z)
    -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5,  0.5, -0.5,
     0.5,  0.5, -0.5,  -0.5,  0.5, -0.5,  -0.5, -0.5, -0.5,
    // front (+z)
    -0.5, -0.5,  0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,
     0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,  -0.5, -0.5,  0.5,
    // left (-x)
    -0.5,  0.5,  0.5,  -0.5,  0.5, -0.5,  -0.5, -0.5, -0.5,
    -0.5, -0.5, -0.5,  -0.5, -0.5,  0.5,  -0.5,  0.5,  0.5,
    // right (+x)
     0.5,  0.5,  0.5,   0.5,  0.5, -0.5,   0.5, -0.5, -0.5,
     0.5, -0.5, -0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,
    // bottom (-y)
    -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5, -0.5,  0.5,
     0.5, -0.5,  0.5,  -0.5, -0.5,  0.5,  -0.5, -0.5, -0.5,
    // top (+y)
    -0.5,  0.5, -0.5,   0.5,  0.5, -0.5,   0.5,  0.5,  0.5,
     0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,  -0.5,  0.5, -0.5,
];

/// Floats per vertex: position only.
const COMPONENTS: i32 = 3;

mod attrib {
    pub const POS: u32 = 0;
}

/// GPU buffers for [`CUBE_VERTICES`].
#[derive(Debug)]
pub struct CubeMesh {
    vao: web_sys::WebGlVertexArrayObject,
    vbo: web_sys::WebGlBuffer,
}

impl CubeMesh {
    pub const VERTEX_COUNT: i32 = CUBE_VERTICES.len() as i32 / COMPONENTS;

    /// Uploads the cube vertices and records the attribute layout in a VAO.
    pub fn new(gl: &GL) -> Result<Self, Error> {
        let vao = gl.create_vertex_array().ok_or(Error::vertex_array_creation_failed())?;
        gl.bind_vertex_array(Some(&vao));

        let vbo = gl.create_buffer().ok_or(Error::buffer_creation_failed("cube-vbo"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));

        unsafe {
            let view = js_sys::Float32Array::view(&CUBE_VERTICES);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }

        const STRIDE: i32 = COMPONENTS * 4;
        gl.enable_vertex_attrib_array(attrib::POS);
        gl.vertex_attrib_pointer_with_i32(attrib::POS, COMPONENTS, GL::FLOAT, false, STRIDE, 0);

        // unbind to prevent accidental modification
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        log::debug!("uploaded cube mesh, {} vertices", Self::VERTEX_COUNT);
        Ok(Self { vao, vbo })
    }

    pub fn bind(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
    }

    pub fn unbind(&self, gl: &GL) {
        gl.bind_vertex_array(None);
    }

    /// Draws the cube; the VAO must be bound.
    pub fn draw(&self, gl: &GL) {
        gl.draw_arrays(GL::TRIANGLES, 0, Self::VERTEX_COUNT);
    }

    /// Releases the vertex array and buffer.
    pub fn delete(self, gl: &GL) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vbo));
    }
}
