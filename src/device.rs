//! The rasterization device: framebuffer ownership and the draw pipeline.

use image::RgbaImage;

use crate::camera::Camera;
use crate::color::{Color, WHITE};
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::{Mesh, Vertex};
use crate::render::{self, FrameBuffer};
use crate::shader::{Shader, SolidShader};

/// A CPU rasterizer bound to one target resolution.
///
/// The device owns a packed RGBA8 color buffer and an `f64` depth buffer
/// (smaller is closer, cleared to `+∞`), plus the cached view and
/// projection matrices and the active shader. It is created once per
/// resolution and reused across draws; the caller clears the buffers
/// explicitly between frames.
///
/// Configuration is order-insensitive: camera, projection and shader can
/// be set independently before any draw call. The matrix caches are only
/// refreshed by an explicit `set_camera` / `set_perspective` call, never
/// recomputed behind the caller's back.
pub struct Device {
    width: u32,
    height: u32,
    color_buffer: Vec<u8>,
    depth_buffer: Vec<f64>,
    view: Mat4,
    projection: Mat4,
    shader: Box<dyn Shader>,
}

impl Device {
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (width * height) as usize;
        Self {
            width,
            height,
            color_buffer: vec![0; pixels * 4],
            depth_buffer: vec![f64::INFINITY; pixels],
            view: Mat4::identity(),
            projection: Mat4::identity(),
            shader: Box::new(SolidShader::new(WHITE)),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills the whole color buffer with one color.
    pub fn clear_color_buffer(&mut self, color: Color) {
        let px = color.to_rgba8();
        for chunk in self.color_buffer.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fills the whole depth buffer with `value`, typically `f64::INFINITY`
    /// so that every first fragment wins.
    pub fn clear_depth_buffer(&mut self, value: f64) {
        self.depth_buffer.fill(value);
    }

    /// Derives and caches the view matrix for `camera`.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.view = Mat4::look_at(camera.position, camera.target, camera.up);
    }

    /// Derives and caches a symmetric perspective projection.
    /// `fovy` is the vertical field of view in degrees.
    pub fn set_perspective(&mut self, fovy: f64, aspect: f64, near: f64, far: f64) {
        self.projection = Mat4::perspective(fovy, aspect, near, far);
    }

    /// Replaces the active shader.
    pub fn set_shader<S: Shader + 'static>(&mut self, shader: S) {
        self.shader = Box::new(shader);
    }

    /// Transforms and rasterizes every face of `mesh`.
    ///
    /// The model matrix composes `translate * rotate_x * rotate_y *
    /// rotate_z * scale` from the mesh transform fields; each vertex runs
    /// through the shader with the combined projection-view-model matrix
    /// and is then mapped from NDC to pixel coordinates. The mesh itself
    /// is never mutated: transformed vertices are per-draw copies.
    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        let model = Mat4::translation(mesh.position)
            * Mat4::rotation_x(mesh.rotation.x)
            * Mat4::rotation_y(mesh.rotation.y)
            * Mat4::rotation_z(mesh.rotation.z)
            * Mat4::scaling(mesh.scale);
        let combined = self.projection * self.view * model;

        for face in &mesh.faces {
            let v1 = self.to_screen(self.shader.vertex(face.v1, combined));
            let v2 = self.to_screen(self.shader.vertex(face.v2, combined));
            let v3 = self.to_screen(self.shader.vertex(face.v3, combined));
            self.draw_triangle(v1, v2, v3);
        }
    }

    /// Maps normalized device coordinates to pixel coordinates.
    ///
    /// The horizontal half-extent is reused for the vertical axis, so the
    /// vertical scale is tied to the buffer width; this keeps the aspect
    /// behavior of the projection parameters rather than the buffer shape.
    fn to_screen(&self, mut vertex: Vertex) -> Vertex {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        vertex.coordinates.x = vertex.coordinates.x * half_w + half_w;
        vertex.coordinates.y = vertex.coordinates.y * half_w + half_h;
        vertex
    }

    /// Scan-converts one screen-space triangle with the active shader.
    pub fn draw_triangle(&mut self, v1: Vertex, v2: Vertex, v3: Vertex) {
        let mut fb = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        render::fill_triangle(&mut fb, self.shader.as_ref(), v1, v2, v3);
    }

    /// Writes one pixel with bounds checking and the depth test.
    pub fn put_pixel(&mut self, x: i32, y: i32, z: f64, color: Color) {
        let mut fb = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        fb.put_pixel(x, y, z, color);
    }

    /// Draws a depth-tested line between two screen-space points.
    pub fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        let mut fb = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        render::draw_line(&mut fb, from, to, color);
    }

    /// Draws the three edges of a screen-space triangle.
    pub fn draw_wired_triangle(&mut self, v1: Vertex, v2: Vertex, v3: Vertex, color: Color) {
        self.draw_line(v1.coordinates, v2.coordinates, color);
        self.draw_line(v2.coordinates, v3.coordinates, color);
        self.draw_line(v3.coordinates, v1.coordinates, color);
    }

    /// The packed RGBA8 raster, row 0 at the top.
    pub fn color_buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    /// Copies the color buffer into an [`image::RgbaImage`] for encoding.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.color_buffer.clone())
            .expect("color buffer length matches dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::math::vec2::Vec2;
    use crate::mesh::Face;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn screen_vertex(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec2::ZERO, Vec3::ZERO)
    }

    /// Records the barycentric weights of every shaded fragment.
    struct RecordingShader {
        log: Rc<RefCell<Vec<[f64; 3]>>>,
    }

    impl Shader for RecordingShader {
        fn fragment(&self, _vertex: &Vertex, weights: [f64; 3]) -> Color {
            self.log.borrow_mut().push(weights);
            WHITE
        }
    }

    /// One triangular face straddling the origin of the XY plane.
    fn origin_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.faces.push(Face::new(
            Vertex::from_coordinates(Vec3::new(-0.5, -0.5, 0.0)),
            Vertex::from_coordinates(Vec3::new(0.5, -0.5, 0.0)),
            Vertex::from_coordinates(Vec3::new(0.0, 0.5, 0.0)),
        ));
        mesh
    }

    fn looking_at_origin(device: &mut Device) {
        device.set_camera(&Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UNIT_Y));
        device.set_perspective(45.0, 1.0, 1.0, 10.0);
    }

    #[test]
    fn clear_color_buffer_fills_every_pixel() {
        let mut device = Device::new(4, 4);
        device.clear_color_buffer(BLACK);
        for chunk in device.color_buffer().chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn put_pixel_out_of_bounds_is_silent() {
        let mut device = Device::new(4, 4);
        device.put_pixel(-1, 2, 0.0, WHITE);
        device.put_pixel(2, 100, 0.0, WHITE);
        assert!(device.color_buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn origin_point_projects_to_viewport_center() {
        let mut device = Device::new(64, 64);
        looking_at_origin(&mut device);
        device.set_shader(SolidShader::new(WHITE));
        device.draw_mesh(&origin_mesh());

        // Device-space center pixel, flipped into the top-left raster.
        let (cx, cy) = (32u32, 32u32);
        let row = device.height() - 1 - cy;
        let idx = ((row * device.width() + cx) * 4) as usize;
        assert_eq!(&device.color_buffer()[idx..idx + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn fragment_weights_sum_to_one() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut device = Device::new(64, 64);
        looking_at_origin(&mut device);
        device.set_shader(RecordingShader { log: Rc::clone(&log) });
        device.draw_mesh(&origin_mesh());

        let log = log.borrow();
        assert!(!log.is_empty());
        for [w1, w2, w3] in log.iter() {
            assert!((w1 + w2 + w3 - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn repeated_draws_are_byte_identical() {
        let render_once = || {
            let mut device = Device::new(48, 48);
            looking_at_origin(&mut device);
            device.set_shader(SolidShader::new(Color::new(0.3, 0.6, 0.9, 1.0)));
            device.clear_color_buffer(BLACK);
            device.clear_depth_buffer(f64::INFINITY);

            // Two overlapping triangles, drawn in a fixed order.
            let near = origin_mesh();
            let mut far = origin_mesh();
            far.position = Vec3::new(0.1, 0.1, -1.0);
            device.draw_mesh(&near);
            device.draw_mesh(&far);
            device.color_buffer().to_vec()
        };

        assert_eq!(render_once(), render_once());
    }

    #[test]
    fn closer_triangle_occludes_farther_one() {
        let mut device = Device::new(32, 32);
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let blue = Color::new(0.0, 0.0, 1.0, 1.0);

        // Same footprint, different depths; the far (blue) triangle is
        // drawn last and must lose the depth test.
        device.set_shader(SolidShader::new(red));
        device.draw_triangle(
            screen_vertex(4.0, 4.0, 0.25),
            screen_vertex(28.0, 4.0, 0.25),
            screen_vertex(16.0, 28.0, 0.25),
        );
        device.set_shader(SolidShader::new(blue));
        device.draw_triangle(
            screen_vertex(4.0, 4.0, 0.75),
            screen_vertex(28.0, 4.0, 0.75),
            screen_vertex(16.0, 28.0, 0.75),
        );

        let row = device.height() - 1 - 16;
        let idx = ((row * device.width() + 16) * 4) as usize;
        assert_eq!(&device.color_buffer()[idx..idx + 3], &[255, 0, 0]);
    }

    #[test]
    fn wired_triangle_marks_its_corners() {
        let mut device = Device::new(32, 32);
        device.draw_wired_triangle(
            screen_vertex(4.0, 4.0, 0.0),
            screen_vertex(20.0, 6.0, 0.0),
            screen_vertex(10.0, 24.0, 0.0),
            WHITE,
        );

        for (x, y) in [(4u32, 4u32), (20, 6), (10, 24)] {
            let row = device.height() - 1 - y;
            let idx = ((row * device.width() + x) * 4) as usize;
            assert_eq!(&device.color_buffer()[idx..idx + 4], &[255, 255, 255, 255]);
        }
    }

    #[test]
    fn to_image_round_trips_the_buffer() {
        let mut device = Device::new(8, 8);
        device.clear_color_buffer(Color::new(0.5, 0.25, 0.75, 1.0));
        let img = device.to_image();
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(3, 3).0, [127, 63, 191, 255]);
    }
}
