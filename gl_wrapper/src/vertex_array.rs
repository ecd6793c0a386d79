use std::ffi::c_void;

use thiserror::Error;

use crate::buffer::VertexBuffer;
use crate::debug::{checked, GlError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl VertexAttribute {
    /// Component count.
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
            VertexAttribute::Vec4 => 4,
        }
    }

    pub fn byte_size(&self) -> usize {
        self.size() * std::mem::size_of::<f32>()
    }
}

/// Interleaved layout of `f32` attributes, in location order.
#[derive(Debug, Clone, Default)]
pub struct VertexBufferLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Byte distance between consecutive vertices.
    pub fn stride(&self) -> usize {
        self.attributes.iter().map(|a| a.byte_size()).sum()
    }

    /// Byte offset of every attribute within one vertex.
    pub fn offsets(&self) -> Vec<usize> {
        self.attributes
            .iter()
            .scan(0, |offset, attr| {
                let current = *offset;
                *offset += attr.byte_size();
                Some(current)
            })
            .collect()
    }

    /// Number of whole vertices in `byte_len` bytes of data.
    pub fn vertex_count(&self, byte_len: usize) -> Result<usize, LayoutError> {
        let stride = self.stride();

        if stride == 0 {
            return Err(LayoutError::Empty);
        }

        if byte_len % stride != 0 {
            return Err(LayoutError::InvalidDataLength);
        }

        Ok(byte_len / stride)
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Layout has no attributes")]
    Empty,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
}

#[derive(Debug, Error)]
pub enum VertexArrayError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Gl(#[from] GlError),
}

pub struct VertexArray {
    id: u32,
    next_location: u32,
}

impl VertexArray {
    pub fn new() -> Result<Self, GlError> {
        let mut id = 0;

        checked("glGenVertexArrays(1, &id)", || unsafe {
            gl::GenVertexArrays(1, (&mut id) as *mut u32)
        })?;

        Ok(Self {
            id,
            next_location: 0,
        })
    }

    /// Describes `buffer` with `layout`. Attribute locations continue where the
    /// previous buffer left off.
    pub fn add_buffer(
        &mut self,
        buffer: &VertexBuffer,
        layout: &VertexBufferLayout,
    ) -> Result<(), VertexArrayError> {
        layout.vertex_count(buffer.size())?;

        self.bind()?;
        buffer.bind()?;

        let stride = layout.stride() as i32;

        for (attr, offset) in layout.attributes().iter().zip(layout.offsets()) {
            let location = self.next_location;

            checked("glEnableVertexAttribArray(location)", || unsafe {
                gl::EnableVertexAttribArray(location)
            })?;
            checked(
                "glVertexAttribPointer(location, size, GL_FLOAT, GL_FALSE, stride, offset)",
                || unsafe {
                    gl::VertexAttribPointer(
                        location,
                        attr.size() as i32,
                        gl::FLOAT,
                        gl::FALSE,
                        stride,
                        offset as *const c_void,
                    )
                },
            )?;

            self.next_location += 1;
        }

        Ok(())
    }

    pub fn bind(&self) -> Result<(), GlError> {
        checked("glBindVertexArray(id)", || unsafe {
            gl::BindVertexArray(self.id)
        })
    }

    pub fn unbind(&self) -> Result<(), GlError> {
        checked("glBindVertexArray(0)", || unsafe { gl::BindVertexArray(0) })
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        let _ = checked("glDeleteVertexArrays(1, &id)", || unsafe {
            gl::DeleteVertexArrays(1, (&self.id) as *const u32)
        });
    }
}
