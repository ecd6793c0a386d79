use std::ffi::c_void;
use thiserror::Error;

use crate::debug::{checked, GlError};

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormats,
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        if (width as usize * height as usize * format.channels() as usize) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let mut id = 0;

        checked("glGenTextures(1, &id)", || unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32)
        })?;

        let texture = Self { id };

        texture.bind(0)?;

        let min_filter = match filter {
            TextureFilter::Nearest => gl::NEAREST_MIPMAP_NEAREST,
            TextureFilter::Linear => gl::LINEAR_MIPMAP_LINEAR,
        };

        let params = [
            (gl::TEXTURE_WRAP_S, gl::REPEAT),
            (gl::TEXTURE_WRAP_T, gl::REPEAT),
            (gl::TEXTURE_MIN_FILTER, min_filter),
            (gl::TEXTURE_MAG_FILTER, filter.gl_filter()),
        ];

        for (name, value) in params {
            checked("glTexParameteri(GL_TEXTURE_2D, name, value)", || unsafe {
                gl::TexParameteri(gl::TEXTURE_2D, name, value as i32)
            })?;
        }

        // RGB rows are not 4-byte aligned in general.
        checked("glPixelStorei(GL_UNPACK_ALIGNMENT, 1)", || unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1)
        })?;

        checked(
            "glTexImage2D(GL_TEXTURE_2D, 0, internal, width, height, 0, format, GL_UNSIGNED_BYTE, data)",
            || unsafe {
                gl::TexImage2D(
                    gl::TEXTURE_2D,
                    0,
                    format.internal_format() as i32,
                    width as i32,
                    height as i32,
                    0,
                    format.pixel_format(),
                    gl::UNSIGNED_BYTE,
                    data.as_ptr() as *const c_void,
                )
            },
        )?;
        checked("glGenerateMipmap(GL_TEXTURE_2D)", || unsafe {
            gl::GenerateMipmap(gl::TEXTURE_2D)
        })?;

        Ok(texture)
    }

    pub fn bind(&self, unit: u8) -> Result<(), GlError> {
        checked("glActiveTexture(GL_TEXTURE0 + unit)", || unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32)
        })?;
        checked("glBindTexture(GL_TEXTURE_2D, id)", || unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        let _ = checked("glDeleteTextures(1, &id)", || unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32)
        });
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Unsupported channel count {0}")]
    UnsupportedChannels(u8),
    #[error(transparent)]
    Gl(#[from] GlError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormats {
    R8,
    Rgb8,
    Rgba8,
}

impl TextureFormats {
    pub fn from_channels(channels: u8) -> Result<Self, TextureError> {
        match channels {
            1 => Ok(TextureFormats::R8),
            3 => Ok(TextureFormats::Rgb8),
            4 => Ok(TextureFormats::Rgba8),
            other => Err(TextureError::UnsupportedChannels(other)),
        }
    }

    pub fn channels(&self) -> u8 {
        match self {
            TextureFormats::R8 => 1,
            TextureFormats::Rgb8 => 3,
            TextureFormats::Rgba8 => 4,
        }
    }

    fn internal_format(&self) -> u32 {
        match self {
            TextureFormats::R8 => gl::R8,
            TextureFormats::Rgb8 => gl::RGB8,
            TextureFormats::Rgba8 => gl::RGBA8,
        }
    }

    fn pixel_format(&self) -> u32 {
        match self {
            TextureFormats::R8 => gl::RED,
            TextureFormats::Rgb8 => gl::RGB,
            TextureFormats::Rgba8 => gl::RGBA,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    fn gl_filter(&self) -> u32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_channel_count() {
        assert_eq!(TextureFormats::from_channels(3).unwrap(), TextureFormats::Rgb8);
        assert_eq!(TextureFormats::from_channels(4).unwrap().channels(), 4);
        assert!(matches!(
            TextureFormats::from_channels(2),
            Err(TextureError::UnsupportedChannels(2))
        ));
    }
}
