//! Scanline triangle fill and depth-tested line drawing.
//!
//! Triangles are filled one horizontal row at a time between two active
//! edges. The y-sorted vertices select the edge pair by comparing the
//! inverse slopes of the two edges leaving the topmost vertex, which makes
//! the fill independent of the input winding order. Shading attributes are
//! interpolated with barycentric weights against the original (unsorted)
//! triangle; depth is interpolated along the scanline edges instead, which
//! is affine in screen space and intentionally kept distinct from the
//! attribute path.

use super::framebuffer::FrameBuffer;
use crate::color::Color;
use crate::math::{interpolate, vec3::Vec3};
use crate::mesh::Vertex;
use crate::shader::Shader;

/// Fills a screen-space triangle, invoking `shader.fragment` per pixel.
pub(crate) fn fill_triangle(
    fb: &mut FrameBuffer,
    shader: &dyn Shader,
    v1: Vertex,
    v2: Vertex,
    v3: Vertex,
) {
    // Barycentric weights are computed against the unsorted corners so the
    // weight order always matches the caller's attribute order.
    let original = [v1, v2, v3];

    let (mut a, mut b, mut c) = (v1, v2, v3);
    sort_by_y(&mut a, &mut b, &mut c);

    let d12 = inv_slope(a.coordinates, b.coordinates);
    let d13 = inv_slope(a.coordinates, c.coordinates);

    // Rows outside the buffer would be rejected pixel by pixel; skipping
    // them here also bounds the loop when unclipped geometry projects to
    // huge coordinates.
    let y_start = (a.coordinates.y as i32).max(0);
    let y_end = (c.coordinates.y as i32).min(fb.height() as i32 - 1);

    for y in y_start..=y_end {
        let below_mid = (y as f64) < b.coordinates.y;
        // The long edge a->c bounds one side for both halves; the a->b and
        // b->c edges bound the other. Which side is left depends on the
        // slope comparison, not the winding.
        if d12 > d13 {
            if below_mid {
                process_scanline(fb, shader, y, a, c, a, b, &original);
            } else {
                process_scanline(fb, shader, y, a, c, b, c, &original);
            }
        } else if below_mid {
            process_scanline(fb, shader, y, a, b, a, c, &original);
        } else {
            process_scanline(fb, shader, y, b, c, a, c, &original);
        }
    }
}

/// Rasterizes one row between edge (pa, pb) and edge (pc, pd).
#[allow(clippy::too_many_arguments)]
fn process_scanline(
    fb: &mut FrameBuffer,
    shader: &dyn Shader,
    y: i32,
    pa: Vertex,
    pb: Vertex,
    pc: Vertex,
    pd: Vertex,
    original: &[Vertex; 3],
) {
    let (pa, pb, pc, pd) = (pa.coordinates, pb.coordinates, pc.coordinates, pd.coordinates);

    let g1 = (y as f64 - pa.y) / (pb.y - pa.y);
    let g2 = (y as f64 - pc.y) / (pd.y - pc.y);
    // 0/0 on a degenerate edge: nothing meaningful to span.
    if g1.is_nan() || g2.is_nan() {
        return;
    }

    let sx = interpolate(pa.x, pb.x, g1);
    let ex = interpolate(pc.x, pd.x, g2);
    let sz = interpolate(pa.z, pb.z, g1);
    let ez = interpolate(pc.z, pd.z, g2);

    let span = ex - sx;
    let x_start = (sx.min(ex) as i32).max(0);
    let x_end = (sx.max(ex) as i32).min(fb.width() as i32 - 1);

    for x in x_start..=x_end {
        let Some(weights) = barycentric_weights(original, x as f64, y as f64) else {
            continue;
        };

        let fragment = interpolate_vertex(original, weights);
        let color = shader.fragment(&fragment, weights);

        let gz = if span == 0.0 {
            0.0
        } else {
            (x as f64 - sx) / span
        };
        let z = interpolate(sz, ez, gz);

        fb.put_pixel(x, y, z, color);
    }
}

fn sort_by_y(a: &mut Vertex, b: &mut Vertex, c: &mut Vertex) {
    if b.coordinates.y < a.coordinates.y {
        std::mem::swap(a, b);
    }
    if c.coordinates.y < b.coordinates.y {
        std::mem::swap(b, c);
    }
    if b.coordinates.y < a.coordinates.y {
        std::mem::swap(a, b);
    }
}

/// Inverse slope dx/dy of an edge; a zero-height edge counts as 0.
fn inv_slope(from: Vec3, to: Vec3) -> f64 {
    let dy = to.y - from.y;
    if dy == 0.0 {
        0.0
    } else {
        (to.x - from.x) / dy
    }
}

/// Area-ratio barycentric weights of `(x, y)` in the triangle, or `None`
/// when the triangle has zero area.
fn barycentric_weights(vertices: &[Vertex; 3], x: f64, y: f64) -> Option<[f64; 3]> {
    let a = vertices[0].coordinates;
    let b = vertices[1].coordinates;
    let c = vertices[2].coordinates;

    let den = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if den == 0.0 {
        return None;
    }

    let w1 = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / den;
    let w2 = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / den;
    let w3 = 1.0 - w1 - w2;
    Some([w1, w2, w3])
}

/// Weighted sum of the three corners' attributes.
fn interpolate_vertex(vertices: &[Vertex; 3], weights: [f64; 3]) -> Vertex {
    let [w1, w2, w3] = weights;
    let [v1, v2, v3] = vertices;
    Vertex::new(
        v1.coordinates * w1 + v2.coordinates * w2 + v3.coordinates * w3,
        v1.uv * w1 + v2.uv * w2 + v3.uv * w3,
        v1.normal * w1 + v2.normal * w2 + v3.normal * w3,
    )
}

/// Draws a depth-tested line between two screen-space points.
///
/// Integer Bresenham stepping; z is interpolated linearly per step so
/// wireframes participate in the same depth test as filled geometry.
pub(crate) fn draw_line(fb: &mut FrameBuffer, from: Vec3, to: Vec3, color: Color) {
    let (mut x, mut y) = (from.x as i32, from.y as i32);
    let (x1, y1) = (to.x as i32, to.y as i32);

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let steps = dx.max(dy);
    if steps == 0 {
        fb.put_pixel(x, y, from.z, color);
        return;
    }

    let x_step = if x < x1 { 1 } else { -1 };
    let y_step = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let mut step = 0;

    loop {
        let t = step as f64 / steps as f64;
        let z = from.z + (to.z - from.z) * t;
        fb.put_pixel(x, y, z, color);

        if x == x1 && y == y1 {
            break;
        }
        step += 1;

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += x_step;
        }
        if e2 < dx {
            err += dx;
            y += y_step;
        }
    }
}
