//! WGSL validation and uniform reflection.
//!
//! Programs expose a GL-style flat namespace: every member of the `@group(0)` uniform
//! block, every texture and every sampler gets a [`UniformLocation`]. Locations index
//! into [`ProgramLayout::slots`].

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, ArraySize, Handle, Type, TypeInner};

use crate::error::GpuError;

use super::{ShaderStage, UniformLocation, UniformValue};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Int,
}

/// Placement of one uniform value inside the uniform block.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSlot {
    pub offset: u32,
    pub kind: ScalarKind,
    /// Vector width, or matrix row count.
    pub components: u8,
    /// Matrix column count; 1 for scalars and vectors.
    pub columns: u8,
    pub column_stride: u32,
    /// 1 for non-arrays.
    pub array_len: u32,
    pub array_stride: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    Uniform(UniformSlot),
    Texture { binding: u32 },
    Sampler { binding: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSlot {
    pub name: String,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, PartialEq)]
struct UniformBlock {
    binding: u32,
    size: u32,
    members: Vec<ProgramSlot>,
}

/// Result of compiling one stage.
#[derive(Debug, Clone)]
pub struct StageReflection {
    pub stage: ShaderStage,
    uniform_block: Option<UniformBlock>,
    resources: Vec<ProgramSlot>,
}

/// Parses, validates and reflects a WGSL stage.
///
/// The stage must define its entry point (`vs_main` or `fs_main`).
pub fn reflect_stage(stage: ShaderStage, source: &str) -> Result<StageReflection, GpuError> {
    let compile_err = |log: String| GpuError::Compile { stage, log };

    let module =
        naga::front::wgsl::parse_str(source).map_err(|e| compile_err(e.emit_to_string(source)))?;
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let wanted = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let has_entry = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == wanted && ep.name == stage.entry_point());
    if !has_entry {
        return Err(compile_err(format!("missing {stage} entry point `{}`", stage.entry_point())));
    }

    let mut uniform_block = None;
    let mut resources = Vec::new();

    for (_, var) in module.global_variables.iter() {
        let (Some(binding), Some(name)) = (&var.binding, &var.name) else {
            continue;
        };
        if binding.group != 0 {
            log::debug!("reflect: ignoring `{name}` in bind group {}", binding.group);
            continue;
        }

        let inner = &module.types[var.ty].inner;
        match var.space {
            AddressSpace::Uniform => {
                if uniform_block.is_some() {
                    return Err(compile_err("only one uniform block per stage is supported".to_owned()));
                }
                let members = match inner {
                    TypeInner::Struct { members, .. } => members
                        .iter()
                        .filter_map(|m| {
                            let name = m.name.clone()?;
                            let slot = uniform_slot(&module, m.ty, m.offset)?;
                            Some(ProgramSlot { name, kind: SlotKind::Uniform(slot) })
                        })
                        .collect(),
                    _ => uniform_slot(&module, var.ty, 0)
                        .map(|slot| vec![ProgramSlot { name: name.clone(), kind: SlotKind::Uniform(slot) }])
                        .unwrap_or_default(),
                };
                uniform_block = Some(UniformBlock {
                    binding: binding.binding,
                    size: inner.size(module.to_ctx()),
                    members,
                });
            }
            AddressSpace::Handle => match inner {
                TypeInner::Image { .. } => resources.push(ProgramSlot {
                    name: name.clone(),
                    kind: SlotKind::Texture { binding: binding.binding },
                }),
                TypeInner::Sampler { .. } => resources.push(ProgramSlot {
                    name: name.clone(),
                    kind: SlotKind::Sampler { binding: binding.binding },
                }),
                _ => {}
            },
            _ => log::debug!("reflect: ignoring `{name}` in unsupported address space"),
        }
    }

    Ok(StageReflection { stage, uniform_block, resources })
}

fn uniform_slot(module: &naga::Module, ty: Handle<Type>, offset: u32) -> Option<UniformSlot> {
    let (element, array_len, array_stride) = match &module.types[ty].inner {
        TypeInner::Array { base, size: ArraySize::Constant(n), stride } => (*base, n.get(), *stride),
        _ => (ty, 1, 0),
    };

    let (kind, components, columns, column_stride) = match &module.types[element].inner {
        TypeInner::Scalar(s) => (scalar_kind(s.kind)?, 1, 1, 0),
        TypeInner::Vector { size, scalar } => (scalar_kind(scalar.kind)?, *size as u8, 1, 0),
        TypeInner::Matrix { columns, rows, scalar } => {
            let rows = *rows as u8;
            (scalar_kind(scalar.kind)?, rows, *columns as u8, if rows == 2 { 8 } else { 16 })
        }
        _ => return None,
    };

    let array_stride = if array_len == 1 && array_stride == 0 {
        module.types[element].inner.size(module.to_ctx())
    } else {
        array_stride
    };

    Some(UniformSlot { offset, kind, components, columns, column_stride, array_len, array_stride })
}

fn scalar_kind(kind: naga::ScalarKind) -> Option<ScalarKind> {
    match kind {
        naga::ScalarKind::Float => Some(ScalarKind::Float),
        naga::ScalarKind::Sint | naga::ScalarKind::Uint => Some(ScalarKind::Int),
        _ => None,
    }
}

/// Merged slot table of a linked vertex + fragment pair.
#[derive(Debug, Clone, Default)]
pub struct ProgramLayout {
    slots: Vec<ProgramSlot>,
    uniform_binding: Option<u32>,
    uniform_size: u32,
}

impl ProgramLayout {
    pub fn link(vertex: &StageReflection, fragment: &StageReflection) -> Result<Self, GpuError> {
        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err(GpuError::Link("stages attached in the wrong slots".to_owned()));
        }

        let mut layout = Self::default();
        for block in [&vertex.uniform_block, &fragment.uniform_block].into_iter().flatten() {
            match layout.uniform_binding {
                None => {
                    layout.uniform_binding = Some(block.binding);
                    layout.uniform_size = block.size;
                }
                Some(b) if b == block.binding && layout.uniform_size == block.size => {}
                Some(b) => {
                    return Err(GpuError::Link(format!(
                        "uniform block at binding {} does not match the block at binding {b}",
                        block.binding
                    )));
                }
            }
            for member in &block.members {
                layout.merge(member.clone())?;
            }
        }
        for res in vertex.resources.iter().chain(&fragment.resources) {
            layout.merge(res.clone())?;
        }
        Ok(layout)
    }

    fn merge(&mut self, slot: ProgramSlot) -> Result<(), GpuError> {
        match self.slots.iter().find(|s| s.name == slot.name) {
            Some(existing) if *existing == slot => Ok(()),
            Some(_) => Err(GpuError::Link(format!(
                "`{}` is declared differently in the two stages",
                slot.name
            ))),
            None => {
                self.slots.push(slot);
                Ok(())
            }
        }
    }

    pub fn slots(&self) -> &[ProgramSlot] {
        &self.slots
    }

    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.slots
            .iter()
            .position(|s| s.name == name)
            .map(|i| UniformLocation(i as u32))
    }

    pub fn slot(&self, location: UniformLocation) -> Option<&ProgramSlot> {
        self.slots.get(location.0 as usize)
    }

    pub fn uniform_binding(&self) -> Option<u32> {
        self.uniform_binding
    }

    /// Uniform block size, rounded up to 16 bytes.
    pub fn uniform_size(&self) -> u32 {
        self.uniform_size.div_ceil(16) * 16
    }

    pub fn texture_binding(&self, location: UniformLocation) -> Option<u32> {
        match self.slot(location)?.kind {
            SlotKind::Texture { binding } => Some(binding),
            _ => None,
        }
    }

    pub fn texture_bindings(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().filter_map(|s| match s.kind {
            SlotKind::Texture { binding } => Some(binding),
            _ => None,
        })
    }

    pub fn sampler_bindings(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().filter_map(|s| match s.kind {
            SlotKind::Sampler { binding } => Some(binding),
            _ => None,
        })
    }

    /// Writes `value` into the uniform block image `data` at `location`.
    ///
    /// Arrays longer than the declared array are truncated.
    pub fn encode(
        &self,
        location: UniformLocation,
        value: &UniformValue,
        data: &mut [u8],
    ) -> Result<(), GpuError> {
        let Some(slot) = self.slot(location) else {
            return Err(GpuError::InvalidUniform(format!("unknown location {}", location.0)));
        };
        let SlotKind::Uniform(u) = &slot.kind else {
            return Err(GpuError::InvalidUniform(format!("`{}` is not a uniform value", slot.name)));
        };
        value.validate().map_err(GpuError::InvalidUniform)?;

        let mismatch = || {
            GpuError::InvalidUniform(format!(
                "`{}` expects {}x{} {:?} values",
                slot.name, u.columns, u.components, u.kind
            ))
        };
        let count = value.count().min(u.array_len as usize);
        let stride = u.array_stride as usize;

        match value {
            UniformValue::Float { components, values } => {
                if u.kind != ScalarKind::Float || u.columns != 1 || u.components != *components {
                    return Err(mismatch());
                }
                let n = *components as usize;
                for i in 0..count {
                    for c in 0..n {
                        let at = u.offset as usize + i * stride + c * 4;
                        put(data, at, values[i * n + c].to_le_bytes())?;
                    }
                }
            }
            UniformValue::Int { components, values } => {
                if u.kind != ScalarKind::Int || u.columns != 1 || u.components != *components {
                    return Err(mismatch());
                }
                let n = *components as usize;
                for i in 0..count {
                    for c in 0..n {
                        let at = u.offset as usize + i * stride + c * 4;
                        put(data, at, values[i * n + c].to_le_bytes())?;
                    }
                }
            }
            UniformValue::Matrix { dim, .. } => {
                if u.kind != ScalarKind::Float || u.columns != *dim || u.components != *dim {
                    return Err(mismatch());
                }
                let n = *dim as usize;
                let values = value.column_major().unwrap_or_default();
                for i in 0..count {
                    for col in 0..n {
                        for row in 0..n {
                            let at = u.offset as usize
                                + i * stride
                                + col * u.column_stride as usize
                                + row * 4;
                            put(data, at, values[i * n * n + col * n + row].to_le_bytes())?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn put(data: &mut [u8], at: usize, bytes: [u8; 4]) -> Result<(), GpuError> {
    let Some(dst) = data.get_mut(at..at + 4) else {
        return Err(GpuError::InvalidUniform("write past the end of the uniform block".to_owned()));
    };
    dst.copy_from_slice(&bytes);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
struct Params {
    projection: mat4x4<f32>,
    offset: vec2<f32>,
    values: array<vec4<f32>, 2>,
    tile: f32,
    mode: i32,
};

@group(0) @binding(0) var<uniform> params: Params;
@group(0) @binding(1) var tex: texture_2d<f32>;
@group(0) @binding(2) var samp: sampler;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) texcoord: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.pos = params.projection * vec4<f32>(position + params.offset, 0.0, 1.0);
    out.uv = texcoord * params.tile + params.values[1].xy;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(tex, samp, in.uv);
}
"#;

    fn layout() -> ProgramLayout {
        let vs = reflect_stage(ShaderStage::Vertex, SAMPLE).unwrap();
        let fs = reflect_stage(ShaderStage::Fragment, SAMPLE).unwrap();
        ProgramLayout::link(&vs, &fs).unwrap()
    }

    fn uniform(layout: &ProgramLayout, name: &str) -> UniformSlot {
        let loc = layout.location(name).unwrap();
        match &layout.slot(loc).unwrap().kind {
            SlotKind::Uniform(u) => u.clone(),
            other => panic!("{name} is {other:?}"),
        }
    }

    // ── reflection ────────────────────────────────────────────────────────

    #[test]
    fn members_follow_wgsl_layout_rules() {
        let l = layout();
        assert_eq!(uniform(&l, "projection").offset, 0);
        assert_eq!(uniform(&l, "offset").offset, 64);
        let values = uniform(&l, "values");
        assert_eq!(values.offset, 80);
        assert_eq!(values.array_len, 2);
        assert_eq!(values.array_stride, 16);
        assert_eq!(uniform(&l, "tile").offset, 112);
        assert_eq!(uniform(&l, "mode").kind, ScalarKind::Int);
        assert_eq!(l.uniform_size() % 16, 0);
        assert!(l.uniform_size() >= 120);
    }

    #[test]
    fn textures_and_samplers_get_locations() {
        let l = layout();
        assert_eq!(l.texture_binding(l.location("tex").unwrap()), Some(1));
        assert_eq!(l.sampler_bindings().collect::<Vec<_>>(), vec![2]);
        assert!(l.location("missing").is_none());
    }

    #[test]
    fn syntax_error_reports_stage_and_log() {
        let err = reflect_stage(ShaderStage::Fragment, "fn fs_main( {").unwrap_err();
        match err {
            GpuError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let src = "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        assert!(matches!(
            reflect_stage(ShaderStage::Fragment, src),
            Err(GpuError::Compile { .. })
        ));
    }

    #[test]
    fn link_rejects_swapped_stages() {
        let vs = reflect_stage(ShaderStage::Vertex, SAMPLE).unwrap();
        let fs = reflect_stage(ShaderStage::Fragment, SAMPLE).unwrap();
        assert!(matches!(ProgramLayout::link(&fs, &vs), Err(GpuError::Link(_))));
    }

    // ── encode ────────────────────────────────────────────────────────────

    fn read_f32(data: &[u8], at: usize) -> f32 {
        f32::from_le_bytes(data[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn encode_vec2_writes_both_components() {
        let l = layout();
        let mut data = vec![0u8; l.uniform_size() as usize];
        l.encode(l.location("offset").unwrap(), &UniformValue::float(&[3.0, 4.0]), &mut data)
            .unwrap();
        assert_eq!(read_f32(&data, 64), 3.0);
        assert_eq!(read_f32(&data, 68), 4.0);
    }

    #[test]
    fn encode_array_uses_stride_and_truncates() {
        let l = layout();
        let mut data = vec![0u8; l.uniform_size() as usize];
        let v = UniformValue::Float { components: 4, values: (0..12).map(|i| i as f32).collect() };
        l.encode(l.location("values").unwrap(), &v, &mut data).unwrap();
        assert_eq!(read_f32(&data, 80), 0.0);
        assert_eq!(read_f32(&data, 96), 4.0);
        // Third element is beyond the declared array and dropped.
        assert_eq!(read_f32(&data, 112), 0.0);
    }

    #[test]
    fn encode_transposed_matrix() {
        let l = layout();
        let mut data = vec![0u8; l.uniform_size() as usize];
        let mut rows = vec![0.0f32; 16];
        rows[3] = 7.0; // row 0, column 3
        let v = UniformValue::Matrix { dim: 4, transpose: true, values: rows };
        l.encode(l.location("projection").unwrap(), &v, &mut data).unwrap();
        assert_eq!(read_f32(&data, 3 * 16), 7.0);
    }

    #[test]
    fn encode_rejects_shape_mismatch() {
        let l = layout();
        let mut data = vec![0u8; l.uniform_size() as usize];
        let loc = l.location("tile").unwrap();
        assert!(l.encode(loc, &UniformValue::float(&[1.0, 2.0]), &mut data).is_err());
        assert!(l.encode(loc, &UniformValue::int(&[1]), &mut data).is_err());
        let tex = l.location("tex").unwrap();
        assert!(l.encode(tex, &UniformValue::float(&[1.0]), &mut data).is_err());
    }
}
