pub mod buffer;
pub mod debug;
pub mod program;
pub mod renderer;
pub mod source;
pub mod surface;
pub mod texture;
pub mod uniform;
pub mod vertex_array;

pub use debug::{checked, set_error_policy, ErrorPolicy, GlError};
