use std::f64::consts::PI;

use rastly::prelude::*;

/// Renders a flat-shaded mesh to `out.png`.
///
/// With no argument a built-in plane is rendered; otherwise the argument
/// is loaded as an OBJ file.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = match std::env::args().nth(1) {
        Some(path) => load_obj(path)?,
        None => Mesh::plane(),
    };
    mesh.rotation = Vec3::ONE * (10.0 * PI / 180.0);
    mesh.scale = Vec3::ONE * 0.5;

    let size = 256;
    let mut device = Device::new(size, size);

    let camera = Camera::new(Vec3::new(2.0, 0.0, 10.0), Vec3::ZERO, Vec3::UNIT_Y);
    device.set_camera(&camera);
    device.set_perspective(10.0, 1.0, 1.0, 10.0);

    let color = Color::new(0.5, 1.0, 0.6, 1.0);
    let light = Vec3::new(1.0, 1.0, 1.0);
    device.set_shader(FlatShader::new(color, light));

    device.clear_color_buffer(BLACK);
    device.clear_depth_buffer(f64::INFINITY);
    device.draw_mesh(&mesh);

    device.to_image().save("out.png")?;
    Ok(())
}
