use crate::buffer::IndexBuffer;
use crate::debug::{checked, GlError};
use crate::program::Program;
use crate::surface::DynamicSurface;
use crate::vertex_array::VertexArray;

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    /// Binds `program` unless it is already the active one.
    pub fn use_program(&mut self, program: &Program) -> Result<(), GlError> {
        let p_id = program.get_id();
        if self.current_program != p_id {
            program.bind()?;
            self.current_program = p_id;
        }

        Ok(())
    }

    pub fn draw_indexed(
        &mut self,
        vertex_array: &VertexArray,
        indices: &IndexBuffer,
        program: &Program,
    ) -> Result<(), GlError> {
        self.use_program(program)?;
        vertex_array.bind()?;
        indices.bind()?;

        checked(
            "glDrawElements(GL_TRIANGLES, count, GL_UNSIGNED_INT, NULL)",
            || unsafe {
                gl::DrawElements(
                    gl::TRIANGLES,
                    indices.count() as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                )
            },
        )
    }

    /// Draws every triangle of `surface`, nothing if it is empty.
    pub fn draw_surface(
        &mut self,
        surface: &DynamicSurface,
        program: &Program,
    ) -> Result<(), GlError> {
        if surface.vertex_count() == 0 {
            return Ok(());
        }

        self.use_program(program)?;
        surface.bind()?;

        checked("glDrawArrays(GL_TRIANGLES, 0, count)", || unsafe {
            gl::DrawArrays(gl::TRIANGLES, 0, surface.vertex_count() as i32)
        })
    }

    pub fn enable_depth_test(&self) -> Result<(), GlError> {
        checked("glEnable(GL_DEPTH_TEST)", || unsafe {
            gl::Enable(gl::DEPTH_TEST)
        })
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), GlError> {
        checked("glViewport(0, 0, width, height)", || unsafe {
            gl::Viewport(0, 0, width as i32, height as i32)
        })
    }

    /// Clears the color and depth buffers.
    pub fn clear(&self, r: f32, g: f32, b: f32) -> Result<(), GlError> {
        checked("glClearColor(r, g, b, 1.0)", || unsafe {
            gl::ClearColor(r, g, b, 1.0)
        })?;
        checked("glClear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT)", || unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT)
        })
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
