use std::ffi::c_void;

use cgmath::Vector3;

use crate::debug::{checked, GlError};

/// Position-only geometry that is re-uploaded whenever its points change.
///
/// Owns one vertex array with a single `vec3` attribute at location 0 and the
/// buffer behind it. Draw it with `GL_TRIANGLES` over `vertex_count()` vertices.
pub struct DynamicSurface {
    vao: u32,
    vbo: u32,
    vertices: Vec<f32>,
}

impl DynamicSurface {
    pub fn new() -> Result<Self, GlError> {
        let mut vao = 0;
        let mut vbo = 0;

        checked("glGenVertexArrays(1, &vao)", || unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32)
        })?;

        if let Err(e) = checked("glGenBuffers(1, &vbo)", || unsafe {
            gl::GenBuffers(1, (&mut vbo) as *mut u32)
        }) {
            let _ = checked("glDeleteVertexArrays(1, &vao)", || unsafe {
                gl::DeleteVertexArrays(1, (&vao) as *const u32)
            });
            return Err(e);
        }

        Ok(Self {
            vao,
            vbo,
            vertices: Vec::new(),
        })
    }

    /// Replaces the whole surface with `points`, three per triangle.
    ///
    /// Leaves the vertex array bound.
    pub fn build(&mut self, points: &[Vector3<f32>]) -> Result<(), GlError> {
        self.vertices = flatten(points);

        let size = std::mem::size_of_val(self.vertices.as_slice());
        let stride = (3 * std::mem::size_of::<f32>()) as i32;

        checked("glBindVertexArray(vao)", || unsafe {
            gl::BindVertexArray(self.vao)
        })?;
        checked("glBindBuffer(GL_ARRAY_BUFFER, vbo)", || unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo)
        })?;
        checked(
            "glBufferData(GL_ARRAY_BUFFER, size, data, GL_DYNAMIC_DRAW)",
            || unsafe {
                gl::BufferData(
                    gl::ARRAY_BUFFER,
                    size as isize,
                    self.vertices.as_ptr() as *const c_void,
                    gl::DYNAMIC_DRAW,
                )
            },
        )?;
        checked("glEnableVertexAttribArray(0)", || unsafe {
            gl::EnableVertexAttribArray(0)
        })?;
        checked(
            "glVertexAttribPointer(0, 3, GL_FLOAT, GL_FALSE, stride, NULL)",
            || unsafe {
                gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, std::ptr::null())
            },
        )
    }

    /// Flattened copy of the last uploaded points.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn bind(&self) -> Result<(), GlError> {
        checked("glBindVertexArray(vao)", || unsafe {
            gl::BindVertexArray(self.vao)
        })
    }

    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vbo(&self) -> u32 {
        self.vbo
    }

    /// Reads the device copy of the vertices. Leaves the buffer bound.
    pub fn read_back(&self) -> Result<Vec<f32>, GlError> {
        let mut data = vec![0.0_f32; self.vertices.len()];

        checked("glBindBuffer(GL_ARRAY_BUFFER, vbo)", || unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo)
        })?;
        checked("glGetBufferSubData(GL_ARRAY_BUFFER, 0, size, data)", || unsafe {
            gl::GetBufferSubData(
                gl::ARRAY_BUFFER,
                0,
                std::mem::size_of_val(data.as_slice()) as isize,
                data.as_mut_ptr() as *mut c_void,
            )
        })?;

        Ok(data)
    }
}

impl Drop for DynamicSurface {
    fn drop(&mut self) {
        let _ = checked("glDeleteBuffers(1, &vbo)", || unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32)
        });
        let _ = checked("glDeleteVertexArrays(1, &vao)", || unsafe {
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32)
        });
    }
}

fn flatten(points: &[Vector3<f32>]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}
