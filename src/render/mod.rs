//! Crate-internal rasterization primitives.

mod framebuffer;
mod scanline;

pub(crate) use framebuffer::FrameBuffer;
pub(crate) use scanline::{draw_line, fill_triangle};
