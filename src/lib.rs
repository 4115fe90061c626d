//! A CPU-based software-rendered 3D graphics pipeline.
//!
//! This crate rasterizes triangle meshes into an RGBA raster entirely on
//! the CPU: camera and projection math, a programmable vertex/fragment
//! shader abstraction, and a scanline rasterizer with a z-buffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use rastly::prelude::*;
//!
//! let mut device = Device::new(256, 256);
//! device.set_camera(&Camera::new(Vec3::new(2.0, 0.0, 10.0), Vec3::ZERO, Vec3::UNIT_Y));
//! device.set_perspective(10.0, 1.0, 1.0, 10.0);
//! device.set_shader(FlatShader::new(Color::new(0.5, 1.0, 0.6, 1.0), Vec3::ONE));
//! device.clear_color_buffer(BLACK);
//! device.draw_mesh(&Mesh::plane());
//! device.to_image().save("out.png")?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod color;
pub mod device;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod shader;
pub mod texture;

// Internal modules - used within the crate only
pub(crate) mod render;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use color::{Color, BLACK, WHITE};
pub use device::Device;
pub use loader::LoadError;
pub use mesh::{Face, Mesh, Vertex};
pub use shader::Shader;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rastly::prelude::*;
/// ```
pub mod prelude {
    // Device & scene
    pub use crate::camera::Camera;
    pub use crate::device::Device;
    pub use crate::mesh::{Face, Mesh, Vertex};

    // Color
    pub use crate::color::{Color, BLACK, WHITE};

    // Shading
    pub use crate::shader::{
        FlatShader, NormalShader, PhongShader, Shader, SolidShader, TextureShader,
    };
    pub use crate::texture::Texture;

    // Loaders
    pub use crate::loader::{load_obj, load_ply, LoadError};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
}
