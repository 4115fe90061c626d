//! Look-at camera description.

use crate::math::vec3::Vec3;

/// A camera defined by its position, the point it looks at, and its up
/// direction.
///
/// Pure value type: the view matrix is derived by the device when the
/// camera is installed with [`crate::device::Device::set_camera`], never
/// stored here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub const fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
        }
    }
}
