//! Programmable vertex/fragment shading.
//!
//! A [`Shader`] transforms each vertex into screen space and computes a
//! color per covered pixel. All variants share one vertex rule (provided as
//! the trait's default method) and differ only in their fragment rule.

use crate::color::{Color, WHITE};
use crate::math::mat4::Mat4;
use crate::math::{clamp, vec3::Vec3};
use crate::mesh::Vertex;
use crate::texture::Texture;

/// Per-vertex and per-fragment shading operations.
///
/// Shaders are immutable after construction; a device holds one and invokes
/// it for every vertex and covered pixel of a draw call.
pub trait Shader {
    /// Transforms a vertex by the combined model-view-projection matrix.
    ///
    /// Coordinates go through the perspective divide; the normal is
    /// transformed by the same matrix and renormalized. This deliberately
    /// skips the inverse-transpose correction, so normals skew under
    /// non-uniform scale.
    fn vertex(&self, vertex: Vertex, transform: Mat4) -> Vertex {
        let mut out = vertex;
        out.coordinates = transform.transform_coordinate(vertex.coordinates);
        out.normal = transform.transform_coordinate(vertex.normal).normalize();
        out
    }

    /// Computes the color of one pixel from the interpolated vertex and
    /// the barycentric weights that produced it.
    fn fragment(&self, vertex: &Vertex, weights: [f64; 3]) -> Color;
}

/// Fills every fragment with one constant color.
pub struct SolidShader {
    color: Color,
}

impl SolidShader {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Shader for SolidShader {
    #[inline]
    fn fragment(&self, _vertex: &Vertex, _weights: [f64; 3]) -> Color {
        self.color
    }
}

/// Lambertian shading against a single directional light.
pub struct FlatShader {
    color: Color,
    light: Vec3,
}

impl FlatShader {
    /// `light` is the direction toward the light; normalized here.
    pub fn new(color: Color, light: Vec3) -> Self {
        Self {
            color,
            light: light.normalize(),
        }
    }
}

impl Shader for FlatShader {
    #[inline]
    fn fragment(&self, vertex: &Vertex, _weights: [f64; 3]) -> Color {
        let f = clamp(vertex.normal.dot(self.light), 0.0, 1.0);
        self.color.mul_scalar(f)
    }
}

/// Nearest-neighbor texture mapping from interpolated UV coordinates.
pub struct TextureShader {
    texture: Texture,
}

impl TextureShader {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }
}

impl Shader for TextureShader {
    #[inline]
    fn fragment(&self, vertex: &Vertex, _weights: [f64; 3]) -> Color {
        self.texture.sample(vertex.uv.x, vertex.uv.y)
    }
}

/// Visualizes the interpolated normal as an RGB color.
pub struct NormalShader;

impl NormalShader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalShader {
    fn default() -> Self {
        Self::new()
    }
}

impl Shader for NormalShader {
    #[inline]
    fn fragment(&self, vertex: &Vertex, _weights: [f64; 3]) -> Color {
        Color::from_vec3(vertex.normal.clamp(0.0, 1.0))
    }
}

/// Blinn-Phong shading: ambient + diffuse + specular highlight.
pub struct PhongShader {
    light: Vec3,
    half: Vec3,
    color: Color,
    shininess: f64,
}

impl PhongShader {
    /// `light` and `eye` are directions toward the light and the viewer;
    /// both are normalized here. The half vector is fixed at construction
    /// since light and eye never change afterwards.
    pub fn new(light: Vec3, eye: Vec3, color: Color, shininess: f64) -> Self {
        let light = light.normalize();
        let eye = eye.normalize();
        Self {
            light,
            half: (light + eye).normalize(),
            color,
            shininess,
        }
    }
}

impl Shader for PhongShader {
    fn fragment(&self, vertex: &Vertex, _weights: [f64; 3]) -> Color {
        let ambient = Color::new(0.2, 0.2, 0.2, 1.0);
        let diffuse_color = Color::new(0.8, 0.8, 0.8, 1.0);
        let specular_color = WHITE;

        let mut c = ambient;
        let diffuse = clamp(vertex.normal.dot(self.light), 0.0, 1.0);
        c = c.add(diffuse_color.mul_scalar(diffuse));
        if diffuse > 0.0 {
            let specular = clamp(vertex.normal.dot(self.half), 0.0, 1.0).powf(self.shininess);
            c = c.add(specular_color.mul_scalar(specular));
        }

        self.color.mul(c).min(WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::math::vec2::Vec2;
    use approx::assert_relative_eq;

    fn vertex_with_normal(normal: Vec3) -> Vertex {
        Vertex::new(Vec3::ZERO, Vec2::ZERO, normal)
    }

    #[test]
    fn solid_ignores_vertex() {
        let shader = SolidShader::new(Color::new(0.5, 1.0, 0.6, 1.0));
        let v = vertex_with_normal(Vec3::UNIT_Y);
        assert_eq!(shader.fragment(&v, [1.0, 0.0, 0.0]), Color::new(0.5, 1.0, 0.6, 1.0));
    }

    #[test]
    fn flat_orthogonal_light_goes_black_keeping_alpha() {
        let shader = FlatShader::new(Color::new(0.8, 0.4, 0.2, 0.5), Vec3::UNIT_X);
        let v = vertex_with_normal(Vec3::UNIT_Y);
        assert_eq!(shader.fragment(&v, [1.0, 0.0, 0.0]), Color::new(0.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn flat_aligned_light_keeps_full_color() {
        let color = Color::new(0.8, 0.4, 0.2, 1.0);
        let shader = FlatShader::new(color, Vec3::new(0.0, 3.0, 0.0));
        let v = vertex_with_normal(Vec3::UNIT_Y);
        assert_eq!(shader.fragment(&v, [1.0, 0.0, 0.0]), color);
    }

    #[test]
    fn flat_facing_away_is_clamped_to_zero() {
        let shader = FlatShader::new(WHITE, Vec3::UNIT_Y);
        let v = vertex_with_normal(-Vec3::UNIT_Y);
        assert_eq!(shader.fragment(&v, [1.0, 0.0, 0.0]), BLACK);
    }

    #[test]
    fn normal_shader_clamps_negative_components() {
        let shader = NormalShader::new();
        let v = vertex_with_normal(Vec3::new(-1.0, 0.5, 1.0));
        assert_eq!(shader.fragment(&v, [1.0, 0.0, 0.0]), Color::new(0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn phong_is_clamped_per_channel() {
        let shader = PhongShader::new(Vec3::UNIT_Y, Vec3::UNIT_Y, WHITE, 4.0);
        // Normal straight at the light and viewer: ambient + diffuse +
        // specular far exceeds 1 before the clamp.
        let c = shader.fragment(&vertex_with_normal(Vec3::UNIT_Y), [1.0, 0.0, 0.0]);
        assert_eq!(c, WHITE);
    }

    #[test]
    fn phong_in_shadow_is_ambient_only() {
        let color = Color::new(1.0, 0.5, 0.25, 1.0);
        let shader = PhongShader::new(Vec3::UNIT_Y, Vec3::UNIT_Y, color, 4.0);
        let c = shader.fragment(&vertex_with_normal(-Vec3::UNIT_Y), [1.0, 0.0, 0.0]);
        assert_relative_eq!(c.r, 0.2, epsilon = 1e-12);
        assert_relative_eq!(c.g, 0.1, epsilon = 1e-12);
        assert_relative_eq!(c.b, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn default_vertex_transform_projects_and_renormalizes() {
        let shader = SolidShader::new(WHITE);
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec2::ZERO, Vec3::new(0.0, 2.0, 0.0));
        let out = shader.vertex(v, Mat4::translation(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(out.coordinates, Vec3::new(2.0, 2.0, 3.0));
        // Normal is renormalized after the transform.
        assert_relative_eq!(out.normal.length(), 1.0, epsilon = 1e-12);
    }
}
