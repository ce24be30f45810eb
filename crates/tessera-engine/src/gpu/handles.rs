use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::GpuError;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU64);

        impl $name {
            pub const KIND: &'static str = $kind;

            #[inline]
            pub fn raw(self) -> u64 {
                self.0.get()
            }

            #[inline]
            pub(crate) fn unknown(self) -> GpuError {
                GpuError::UnknownResource { kind: Self::KIND, id: self.raw() }
            }
        }
    };
}

gpu_handle!(
    /// Vertex or fragment stage object.
    ShaderId, "shader"
);
gpu_handle!(
    /// Linked program object.
    ProgramId, "program"
);
gpu_handle!(
    /// RGBA8 texture, also usable as a render target.
    TextureId, "texture"
);
gpu_handle!(
    /// Vertex buffer holding quads.
    BufferId, "buffer"
);

/// Issues opaque handles on the logic side.
///
/// Handles are reserved before the render thread creates the object they name, so a
/// producer can post creation and use in the same breath without waiting.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: AtomicU64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> NonZeroU64 {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        NonZeroU64::MIN.saturating_add(n)
    }

    pub fn shader(&self) -> ShaderId {
        ShaderId(self.next())
    }

    pub fn program(&self) -> ProgramId {
        ProgramId(self.next())
    }

    pub fn texture(&self) -> TextureId {
        TextureId(self.next())
    }

    pub fn buffer(&self) -> BufferId {
        BufferId(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_across_kinds() {
        let alloc = HandleAllocator::new();
        let a = alloc.shader().raw();
        let b = alloc.program().raw();
        let c = alloc.texture().raw();
        let d = alloc.buffer().raw();
        assert_eq!([a, b, c, d], [1, 2, 3, 4]);
    }

    #[test]
    fn unknown_names_the_kind() {
        let alloc = HandleAllocator::new();
        let id = alloc.texture();
        let msg = id.unknown().to_string();
        assert!(msg.contains("texture"), "{msg}");
    }
}
