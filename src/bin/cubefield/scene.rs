use std::path::Path;

use gl_wrapper::buffer::{IndexBuffer, VertexBuffer};
use gl_wrapper::program::Program;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureFilter, TextureFormats};
use gl_wrapper::vertex_array::{VertexArray, VertexAttribute, VertexBufferLayout};
use gl_wrapper::GlError;

use cubefield::camera::CameraController;
use cubefield::config::SceneConfig;
use cubefield::image::ImageData;
use cubefield::mesh::{cube_indices, cube_model, CUBE_POSITIONS, CUBE_VERTICES};

use crate::app::AppError;

const CUBE_SHADER: &str = include_str!("../../../res/shaders/cube.shader");

/// Every device resource of the cube field. Must be dropped while the context
/// is current.
pub struct CubeField {
    program: Program,
    texture: Texture2D,
    indices: IndexBuffer,
    vertex_array: VertexArray,
    _vertices: VertexBuffer,
    tint: [f32; 4],
}

impl CubeField {
    pub fn new(config: &SceneConfig, shader: Option<&Path>) -> Result<Self, AppError> {
        let program = match shader {
            Some(path) => Program::from_file(path)?,
            None => Program::from_source(CUBE_SHADER)?,
        };

        let vertices = VertexBuffer::new(&CUBE_VERTICES)?;
        let mut vertex_array = VertexArray::new()?;
        vertex_array.add_buffer(
            &vertices,
            &VertexBufferLayout::new()
                .with_attribute(VertexAttribute::Vec3)
                .with_attribute(VertexAttribute::Vec2),
        )?;

        // Recorded in the vertex array, which is still bound.
        let indices = IndexBuffer::new(&cube_indices())?;
        vertex_array.unbind()?;

        let (image, format) = load_image(config.texture_path.as_deref());
        let texture = Texture2D::new(
            image.width,
            image.height,
            &image.pixels,
            format,
            TextureFilter::Linear,
        )?;

        Ok(Self {
            program,
            texture,
            indices,
            vertex_array,
            _vertices: vertices,
            tint: config.tint,
        })
    }

    pub fn draw(
        &self,
        renderer: &mut GlRenderer,
        camera: &CameraController,
        aspect_ratio: f32,
    ) -> Result<(), GlError> {
        renderer.use_program(&self.program)?;
        self.texture.bind(0)?;

        self.program.set_uniform("u_Texture", 0_i32)?;
        self.program.set_uniform("u_Tint", self.tint)?;
        self.program.set_uniform("u_View", camera.view_matrix())?;
        self.program
            .set_uniform("u_Projection", camera.projection_matrix(aspect_ratio))?;

        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            self.program.set_uniform("u_Model", cube_model(i, *position))?;
            renderer.draw_indexed(&self.vertex_array, &self.indices, &self.program)?;
        }

        Ok(())
    }
}

fn load_image(path: Option<&Path>) -> (ImageData, TextureFormats) {
    let fallback = || (ImageData::checkerboard(256, 8), TextureFormats::Rgb8);

    let Some(path) = path else {
        return fallback();
    };

    let image = match ImageData::load_png(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("Could not load texture {:?}: {e}", path);
            return fallback();
        }
    };

    match TextureFormats::from_channels(image.channels) {
        Ok(format) => {
            log::info!(
                "Loaded texture {:?} ({}x{}, {} channels)",
                path,
                image.width,
                image.height,
                image.channels
            );
            (image, format)
        }
        Err(e) => {
            log::warn!("Texture {:?} not usable: {e}", path);
            fallback()
        }
    }
}
