//! GPU-side layouts for the render boundary.
//!
//! The field is uploaded once as a vertex buffer of [`GpuPoint`]s; each frame
//! only the small [`FrameUniforms`] block changes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::field::ParticleField;
use crate::frame::FrameInputs;

/// One particle as seen by the vertex shader (per-instance attributes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPoint {
    pub source: [f32; 3],
    pub target: [f32; 3],
    pub color: [f32; 3],
}

impl GpuPoint {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    /// Instance-stepped buffer layout matching the shader's vertex inputs.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuPoint>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Flatten a field into vertex data, preserving index order.
pub fn pack_field(field: &ParticleField) -> Vec<GpuPoint> {
    field
        .iter()
        .map(|(source, target, color)| GpuPoint {
            source: source.to_array(),
            target: target.to_array(),
            color: color.to_array(),
        })
        .collect()
}

/// Per-frame uniform block.
///
/// Layout follows WGSL uniform rules: `heart_color` is a `vec3` that
/// shares its 16-byte slot with `time`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub heart_color: [f32; 3],
    pub time: f32,
    pub morph: f32,
    pub rotation: f32,
    pub pulse: f32,
    pub point_size: f32,
    /// Surface size in physical pixels.
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

impl FrameUniforms {
    pub fn new(view_proj: Mat4, inputs: &FrameInputs, heart_color: Vec3, point_size: f32, viewport: (u32, u32)) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            heart_color: heart_color.to_array(),
            time: inputs.elapsed,
            morph: inputs.morph,
            rotation: inputs.rotation,
            pulse: inputs.pulse,
            point_size,
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetKind;
    use std::mem::{offset_of, size_of};

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(size_of::<FrameUniforms>(), 112);
        assert_eq!(offset_of!(FrameUniforms, heart_color), 64);
        assert_eq!(offset_of!(FrameUniforms, time), 76);
        assert_eq!(offset_of!(FrameUniforms, morph), 80);
        assert_eq!(offset_of!(FrameUniforms, point_size), 92);
        assert_eq!(offset_of!(FrameUniforms, viewport), 96);
    }

    #[test]
    fn point_stride_is_tightly_packed() {
        assert_eq!(size_of::<GpuPoint>(), 36);
        assert_eq!(GpuPoint::layout().array_stride, 36);
        assert_eq!(GpuPoint::ATTRIBUTES[2].offset, 24);
    }

    #[test]
    fn packing_keeps_index_alignment() {
        let field = ParticleField::from_parts(
            vec![Vec3::X, Vec3::Y],
            vec![Vec3::Z, Vec3::ONE],
            vec![Vec3::new(0.1, 0.2, 0.3), Vec3::new(0.4, 0.5, 0.6)],
            TargetKind::Image,
        )
        .unwrap();
        let packed = pack_field(&field);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[1].source, [0.0, 1.0, 0.0]);
        assert_eq!(packed[1].target, [1.0, 1.0, 1.0]);
        assert_eq!(packed[1].color, [0.4, 0.5, 0.6]);
    }

    #[test]
    fn uniforms_carry_frame_inputs() {
        let inputs = FrameInputs {
            elapsed: 3.5,
            morph: 0.25,
            rotation: -0.1,
            pulse: 1.02,
        };
        let u = FrameUniforms::new(Mat4::IDENTITY, &inputs, Vec3::X, 2.0, (0, 720));
        assert_eq!(u.time, 3.5);
        assert_eq!(u.morph, 0.25);
        assert_eq!(u.rotation, -0.1);
        assert_eq!(u.pulse, 1.02);
        assert_eq!(u.viewport, [1.0, 720.0]);
        assert_eq!(bytemuck::bytes_of(&u).len(), 112);
    }
}
