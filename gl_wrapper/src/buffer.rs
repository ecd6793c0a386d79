use std::ffi::c_void;

use bytemuck::Pod;
use gl::types::GLenum;

use crate::debug::{checked, GlError};

/// Device buffer bound to a single target, uploaded once.
struct RawBuffer {
    id: u32,
    target: GLenum,
    size: usize,
}

impl RawBuffer {
    fn new(target: GLenum, bytes: &[u8]) -> Result<Self, GlError> {
        let mut id = 0;

        checked("glGenBuffers(1, &id)", || unsafe {
            gl::GenBuffers(1, (&mut id) as *mut u32)
        })?;

        let buffer = Self {
            id,
            target,
            size: bytes.len(),
        };

        buffer.bind()?;
        checked("glBufferData(target, size, data, GL_STATIC_DRAW)", || unsafe {
            gl::BufferData(
                target,
                bytes.len() as isize,
                bytes.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            )
        })?;

        Ok(buffer)
    }

    fn bind(&self) -> Result<(), GlError> {
        checked("glBindBuffer(target, id)", || unsafe {
            gl::BindBuffer(self.target, self.id)
        })
    }

    fn unbind(&self) -> Result<(), GlError> {
        checked("glBindBuffer(target, 0)", || unsafe {
            gl::BindBuffer(self.target, 0)
        })
    }

    fn read_back(&self) -> Result<Vec<u8>, GlError> {
        let mut data = vec![0_u8; self.size];

        self.bind()?;
        checked("glGetBufferSubData(target, 0, size, data)", || unsafe {
            gl::GetBufferSubData(
                self.target,
                0,
                self.size as isize,
                data.as_mut_ptr() as *mut c_void,
            )
        })?;

        Ok(data)
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        let _ = checked("glDeleteBuffers(1, &id)", || unsafe {
            gl::DeleteBuffers(1, (&self.id) as *const u32)
        });
    }
}

/// Vertex attribute data, bound to `GL_ARRAY_BUFFER`.
pub struct VertexBuffer {
    raw: RawBuffer,
}

impl VertexBuffer {
    pub fn new<T: Pod>(data: &[T]) -> Result<Self, GlError> {
        let raw = RawBuffer::new(gl::ARRAY_BUFFER, bytemuck::cast_slice(data))?;

        Ok(Self { raw })
    }

    pub fn bind(&self) -> Result<(), GlError> {
        self.raw.bind()
    }

    pub fn unbind(&self) -> Result<(), GlError> {
        self.raw.unbind()
    }

    pub fn id(&self) -> u32 {
        self.raw.id
    }

    /// Size of the uploaded data in bytes.
    pub fn size(&self) -> usize {
        self.raw.size
    }

    /// Copies the buffer contents back from the device. Leaves the buffer bound.
    pub fn read_back(&self) -> Result<Vec<u8>, GlError> {
        self.raw.read_back()
    }
}

/// Element indices, bound to `GL_ELEMENT_ARRAY_BUFFER`.
///
/// The element array binding is part of the vertex array state, so bind the
/// vertex array first when the indices are meant for it.
pub struct IndexBuffer {
    raw: RawBuffer,
    count: usize,
}

impl IndexBuffer {
    pub fn new(indices: &[u32]) -> Result<Self, GlError> {
        let raw = RawBuffer::new(gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices))?;

        Ok(Self {
            raw,
            count: indices.len(),
        })
    }

    pub fn bind(&self) -> Result<(), GlError> {
        self.raw.bind()
    }

    pub fn unbind(&self) -> Result<(), GlError> {
        self.raw.unbind()
    }

    pub fn id(&self) -> u32 {
        self.raw.id
    }

    pub fn size(&self) -> usize {
        self.raw.size
    }

    /// Number of indices a draw call should consume.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn read_back(&self) -> Result<Vec<u8>, GlError> {
        self.raw.read_back()
    }
}
