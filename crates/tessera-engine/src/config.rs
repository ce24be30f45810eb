//! Renderer configuration.

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Forces a software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::default(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            force_fallback_adapter: false,
        }
    }
}

/// Configuration of the render worker.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Size of the screen render target in pixels.
    pub resolution: (u32, u32),

    /// Device bring-up parameters. Ignored by the headless backend.
    pub gpu: GpuInit,

    /// Name given to the render thread.
    pub thread_name: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            resolution: (640, 480),
            gpu: GpuInit::default(),
            thread_name: "tessera-render".to_owned(),
        }
    }
}
