use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::fmt;
use std::path::{Path, PathBuf};

use gl::types::{GLenum, GLuint};
use thiserror::Error;

use crate::debug::{checked, GlError};
use crate::source::{ShaderSource, SourceError};
use crate::uniform::{UniformCache, UniformValue, UNKNOWN_LOCATION};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn gl_kind(&self) -> GLenum {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "vertex"),
            Stage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Failed to compile {stage} shader: {log}")]
    Compilation { stage: Stage, log: String },
    #[error("Failed to link program: {0}")]
    Linking(String),
    #[error("Program validation failed: {0}")]
    Validation(String),
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(Stage),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Gl(#[from] GlError),
}

pub struct ProgramBuilder {
    vert: String,
    frag: String,
    path: Option<PathBuf>,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: vert_src.to_owned(),
            frag: frag_src.to_owned(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Compiles both stages and links them.
    ///
    /// Stage objects are deleted in every outcome; a failed build leaves
    /// nothing allocated on the device.
    pub fn build(self) -> Result<Program, ProgramError> {
        let vert = compile_stage(Stage::Vertex, &self.vert)?;
        let frag = match compile_stage(Stage::Fragment, &self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                delete_shader(vert);
                return Err(e);
            }
        };

        let linked = link(vert, frag);

        delete_shader(vert);
        delete_shader(frag);

        // Validation depends on the bound vertex array and textures, so it is
        // left to `Program::validate` once that state is set up.
        Ok(Program {
            id: linked?,
            path: self.path,
            uniforms: RefCell::new(UniformCache::new()),
        })
    }
}

/// Compiles a single stage and returns its shader object.
pub fn compile_stage(stage: Stage, src: &str) -> Result<GLuint, ProgramError> {
    let src = CString::new(src).map_err(|_| ProgramError::InvalidSource(stage))?;

    let shader = checked("glCreateShader(kind)", || unsafe {
        gl::CreateShader(stage.gl_kind())
    })?;

    let mut success: i32 = 0;

    let compiled = checked("glShaderSource(shader, 1, &src, NULL)", || unsafe {
        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        )
    })
    .and_then(|_| checked("glCompileShader(shader)", || unsafe { gl::CompileShader(shader) }))
    .and_then(|_| {
        checked("glGetShaderiv(shader, GL_COMPILE_STATUS)", || unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32)
        })
    });

    if let Err(e) = compiled {
        delete_shader(shader);
        return Err(e.into());
    }

    if success != gl::TRUE as i32 {
        let log = info_log(shader, LogSource::Shader);
        delete_shader(shader);

        let log = if log.is_empty() {
            String::from("driver returned no diagnostics")
        } else {
            log
        };

        log::error!("{stage} shader compilation failed:\n{log}");

        return Err(ProgramError::Compilation { stage, log });
    }

    Ok(shader)
}

fn link(vert: GLuint, frag: GLuint) -> Result<GLuint, ProgramError> {
    let program = checked("glCreateProgram()", || unsafe { gl::CreateProgram() })?;
    let mut success: i32 = 0;

    let linked = checked("glAttachShader(program, vert)", || unsafe {
        gl::AttachShader(program, vert)
    })
    .and_then(|_| {
        checked("glAttachShader(program, frag)", || unsafe {
            gl::AttachShader(program, frag)
        })
    })
    .and_then(|_| checked("glLinkProgram(program)", || unsafe { gl::LinkProgram(program) }))
    .and_then(|_| {
        checked("glGetProgramiv(program, GL_LINK_STATUS)", || unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32)
        })
    });

    if let Err(e) = linked {
        delete_program(program);
        return Err(e.into());
    }

    if success != gl::TRUE as i32 {
        let log = info_log(program, LogSource::Program);
        delete_program(program);

        log::error!("Program linking failed:\n{log}");

        return Err(ProgramError::Linking(log));
    }

    // The linked program keeps the compiled code.
    let _ = checked("glDetachShader(program, vert)", || unsafe {
        gl::DetachShader(program, vert)
    });
    let _ = checked("glDetachShader(program, frag)", || unsafe {
        gl::DetachShader(program, frag)
    });

    Ok(program)
}

fn delete_shader(shader: GLuint) {
    let _ = checked("glDeleteShader(shader)", || unsafe { gl::DeleteShader(shader) });
}

fn delete_program(program: GLuint) {
    let _ = checked("glDeleteProgram(program)", || unsafe {
        gl::DeleteProgram(program)
    });
}

#[derive(Copy, Clone)]
enum LogSource {
    Shader,
    Program,
}

/// Driver diagnostics of a shader or program object, empty if they cannot
/// be read.
fn info_log(id: GLuint, source: LogSource) -> String {
    let mut len: i32 = 0;

    let queried = checked("glGet*iv(id, GL_INFO_LOG_LENGTH)", || unsafe {
        match source {
            LogSource::Shader => gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32),
            LogSource::Program => {
                gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32)
            }
        }
    });

    if queried.is_err() || len <= 0 {
        return String::new();
    }

    let mut buf = vec![0_u8; len as usize];
    let mut written: i32 = 0;

    let read = checked("glGet*InfoLog(id, len, &written, buf)", || unsafe {
        match source {
            LogSource::Shader => gl::GetShaderInfoLog(
                id,
                len,
                (&mut written) as *mut i32,
                buf.as_mut_ptr() as *mut c_char,
            ),
            LogSource::Program => gl::GetProgramInfoLog(
                id,
                len,
                (&mut written) as *mut i32,
                buf.as_mut_ptr() as *mut c_char,
            ),
        }
    });

    if read.is_err() {
        return String::new();
    }

    buf.truncate(written.clamp(0, len) as usize);

    String::from_utf8_lossy(&buf).trim_end().to_string()
}

pub struct Program {
    id: GLuint,
    path: Option<PathBuf>,
    uniforms: RefCell<UniformCache>,
}

impl Program {
    /// Builds a program from a single file with `#shader` sections.
    pub fn from_source(text: &str) -> Result<Self, ProgramError> {
        let source = ShaderSource::parse(text)?;

        ProgramBuilder::new(&source.vertex, &source.fragment).build()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let source = ShaderSource::from_file(path)?;

        ProgramBuilder::new(&source.vertex, &source.fragment)
            .with_path(path)
            .build()
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Makes this the active program for draw calls and uniform writes.
    pub fn bind(&self) -> Result<(), GlError> {
        checked("glUseProgram(id)", || unsafe { gl::UseProgram(self.id) })
    }

    /// Checks whether the program can run in the current device state.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let mut status: i32 = 0;

        checked("glValidateProgram(id)", || unsafe {
            gl::ValidateProgram(self.id)
        })?;
        checked("glGetProgramiv(id, GL_VALIDATE_STATUS)", || unsafe {
            gl::GetProgramiv(self.id, gl::VALIDATE_STATUS, (&mut status) as *mut i32)
        })?;

        if status != gl::TRUE as i32 {
            return Err(ProgramError::Validation(info_log(
                self.id,
                LogSource::Program,
            )));
        }

        Ok(())
    }

    /// Location of `name`, `-1` if the program has no such active uniform.
    ///
    /// Device errors are returned and nothing is cached for `name`.
    pub fn uniform_location(&self, name: &str) -> Result<i32, GlError> {
        let id = self.id;

        self.uniforms.borrow_mut().resolve(name, |name| {
            let Ok(c_name) = CString::new(name) else {
                return Ok(UNKNOWN_LOCATION);
            };

            checked("glGetUniformLocation(id, name)", || unsafe {
                gl::GetUniformLocation(id, c_name.as_ptr())
            })
        })
    }

    /// Writes `value` to the uniform `name`.
    ///
    /// The program has to be bound first, this does not bind it. Unknown
    /// names are skipped.
    pub fn set_uniform<T: UniformValue>(&self, name: &str, value: T) -> Result<(), GlError> {
        let location = self.uniform_location(name)?;

        if location == UNKNOWN_LOCATION {
            return Ok(());
        }

        checked(T::CALL, || unsafe { value.write(location) })
    }

    pub fn cached_uniforms(&self) -> usize {
        self.uniforms.borrow().len()
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        delete_program(self.id)
    }
}
