use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::coords::{IRect, Rect};

use super::{BufferId, ProgramId, TextureId};

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every stage source must define.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Quad vertex shared by every program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Target pixels.
    pub position: [f32; 2],
    /// Texture pixels (not normalized).
    pub texcoord: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // texcoord
        2 => Float32x4, // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Four vertices in index order (TL, TR, BR, BL).
    pub fn quad(position: Rect, texcoord: Rect, color: [f32; 4]) -> [Vertex; 4] {
        let p = position.corners();
        let t = texcoord.corners();
        core::array::from_fn(|i| Vertex {
            position: p[i].to_array(),
            texcoord: t[i].to_array(),
            color,
        })
    }
}

/// Handle to a uniform or texture slot of a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Value written to a uniform slot.
///
/// `values.len()` is a whole number of elements; element size is `components` for
/// vectors and `dim * dim` for matrices. More than one element targets an array.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float { components: u8, values: Vec<f32> },
    Int { components: u8, values: Vec<i32> },
    /// Column-major unless `transpose` is set.
    Matrix { dim: u8, transpose: bool, values: Vec<f32> },
}

impl UniformValue {
    pub fn float(values: &[f32]) -> Self {
        UniformValue::Float { components: values.len() as u8, values: values.to_vec() }
    }

    pub fn int(values: &[i32]) -> Self {
        UniformValue::Int { components: values.len() as u8, values: values.to_vec() }
    }

    /// Checks the element shape. Returns a human readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let (size, len) = match self {
            UniformValue::Float { components, values } => {
                check_components(*components)?;
                (*components as usize, values.len())
            }
            UniformValue::Int { components, values } => {
                check_components(*components)?;
                (*components as usize, values.len())
            }
            UniformValue::Matrix { dim, values, .. } => {
                if !(2..=4).contains(dim) {
                    return Err(format!("unsupported matrix dimension {dim}"));
                }
                (*dim as usize * *dim as usize, values.len())
            }
        };
        if len == 0 {
            return Err("no values".to_owned());
        }
        if len % size != 0 {
            return Err(format!("{len} values is not a multiple of element size {size}"));
        }
        Ok(())
    }

    /// Number of elements (array length).
    pub fn count(&self) -> usize {
        match self {
            UniformValue::Float { components, values } => values.len() / (*components).max(1) as usize,
            UniformValue::Int { components, values } => values.len() / (*components).max(1) as usize,
            UniformValue::Matrix { dim, values, .. } => {
                values.len() / ((*dim as usize) * (*dim as usize)).max(1)
            }
        }
    }

    /// Matrix values normalized to column-major order. `None` for non-matrices.
    pub fn column_major(&self) -> Option<Vec<f32>> {
        let UniformValue::Matrix { dim, transpose, values } = self else {
            return None;
        };
        if !*transpose {
            return Some(values.clone());
        }
        let n = *dim as usize;
        let mut out = Vec::with_capacity(values.len());
        for m in values.chunks_exact(n * n) {
            for col in 0..n {
                for row in 0..n {
                    out.push(m[row * n + col]);
                }
            }
        }
        Some(out)
    }
}

fn check_components(components: u8) -> Result<(), String> {
    if (1..=4).contains(&components) {
        Ok(())
    } else {
        Err(format!("unsupported component count {components}"))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
}

impl BlendFactor {
    fn to_wgpu(self) -> wgpu::BlendFactor {
        match self {
            BlendFactor::Zero => wgpu::BlendFactor::Zero,
            BlendFactor::One => wgpu::BlendFactor::One,
            BlendFactor::SrcColor => wgpu::BlendFactor::Src,
            BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
            BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
            BlendFactor::DstColor => wgpu::BlendFactor::Dst,
            BlendFactor::OneMinusDstColor => wgpu::BlendFactor::OneMinusDst,
            BlendFactor::DstAlpha => wgpu::BlendFactor::DstAlpha,
            BlendFactor::OneMinusDstAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
        }
    }
}

/// Blend state carried by a shader program independently of its compiled code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlendConfig {
    pub equation: BlendEquation,
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            equation: BlendEquation::Add,
            src_rgb: BlendFactor::SrcAlpha,
            dst_rgb: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

impl BlendConfig {
    pub fn to_wgpu(self) -> wgpu::BlendState {
        let operation = match self.equation {
            BlendEquation::Add => wgpu::BlendOperation::Add,
            BlendEquation::Subtract => wgpu::BlendOperation::Subtract,
            BlendEquation::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
            BlendEquation::Min => wgpu::BlendOperation::Min,
            BlendEquation::Max => wgpu::BlendOperation::Max,
        };
        // Min/Max ignore factors; wgpu requires them to be One.
        let minmax = matches!(self.equation, BlendEquation::Min | BlendEquation::Max);
        let component = |src: BlendFactor, dst: BlendFactor| wgpu::BlendComponent {
            src_factor: if minmax { wgpu::BlendFactor::One } else { src.to_wgpu() },
            dst_factor: if minmax { wgpu::BlendFactor::One } else { dst.to_wgpu() },
            operation,
        };
        wgpu::BlendState {
            color: component(self.src_rgb, self.dst_rgb),
            alpha: component(self.src_alpha, self.dst_alpha),
        }
    }
}

/// Texture bound to a program slot for one draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub unit: u32,
    pub location: UniformLocation,
    pub texture: TextureId,
}

/// A fully resolved quad draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramId,
    pub target: TextureId,
    pub viewport: IRect,
    pub vertices: BufferId,
    pub first_quad: u32,
    pub quad_count: u32,
    pub blend: BlendConfig,
    pub textures: Vec<TextureBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn quad_pairs_corners() {
        let v = Vertex::quad(Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(10.0, 20.0, 1.0, 1.0), [1.0; 4]);
        assert_eq!(v[2].position, [2.0, 2.0]);
        assert_eq!(v[2].texcoord, [11.0, 21.0]);
        assert_eq!(v[3].position, [0.0, 2.0]);
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        assert!(UniformValue::Float { components: 5, values: vec![0.0; 5] }.validate().is_err());
        assert!(UniformValue::Float { components: 2, values: vec![0.0; 3] }.validate().is_err());
        assert!(UniformValue::Int { components: 1, values: vec![] }.validate().is_err());
        assert!(UniformValue::Matrix { dim: 5, transpose: false, values: vec![0.0; 25] }.validate().is_err());
        assert!(UniformValue::Float { components: 2, values: vec![0.0; 6] }.validate().is_ok());
    }

    #[test]
    fn count_is_elements_not_scalars() {
        assert_eq!(UniformValue::Float { components: 2, values: vec![0.0; 6] }.count(), 3);
        assert_eq!(UniformValue::Matrix { dim: 2, transpose: false, values: vec![0.0; 8] }.count(), 2);
    }

    #[test]
    fn transpose_produces_column_major() {
        let m = UniformValue::Matrix { dim: 2, transpose: true, values: vec![1.0, 2.0, 3.0, 4.0] };
        assert_eq!(m.column_major(), Some(vec![1.0, 3.0, 2.0, 4.0]));
    }

    #[test]
    fn default_blend_is_alpha_over() {
        let b = BlendConfig::default().to_wgpu();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(b.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.alpha.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }

    #[test]
    fn min_max_force_unit_factors() {
        let cfg = BlendConfig { equation: BlendEquation::Max, ..BlendConfig::default() };
        let b = cfg.to_wgpu();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.color.operation, wgpu::BlendOperation::Max);
    }
}
