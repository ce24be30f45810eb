//! Logic-side bitmaps.
//!
//! A [`Bitmap`] names a GPU texture owned by the render thread. Pixel uploads and
//! disposal are posted as tasks; observers hear about every content change so
//! dependent caches (atlases) can invalidate.

use std::cell::Cell;
use std::rc::Rc;

use image::RgbaImage;

use crate::coords::{IRect, Vec2i};
use crate::gpu::TextureId;
use crate::observer::{ObserverList, Subscription};
use crate::worker::RenderHandle;

struct BitmapInner {
    runner: RenderHandle,
    texture: TextureId,
    width: u32,
    height: u32,
    disposed: Cell<bool>,
    observers: ObserverList,
}

impl BitmapInner {
    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let texture = self.texture;
        self.runner.post(move |ctx| {
            ctx.delete_texture(texture);
            Ok(())
        });
    }
}

impl Drop for BitmapInner {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Shared handle; clones refer to the same texture.
#[derive(Clone)]
pub struct Bitmap {
    inner: Rc<BitmapInner>,
}

impl Bitmap {
    /// Allocates a transparent bitmap.
    pub fn new(runner: &RenderHandle, width: u32, height: u32) -> Self {
        let texture = runner.handles().texture();
        runner.post(move |ctx| {
            ctx.backend().create_texture(texture, width, height)?;
            Ok(())
        });
        Self {
            inner: Rc::new(BitmapInner {
                runner: runner.clone(),
                texture,
                width,
                height,
                disposed: Cell::new(false),
                observers: ObserverList::new(),
            }),
        }
    }

    /// Allocates a bitmap holding `image`.
    pub fn from_image(runner: &RenderHandle, image: RgbaImage) -> Self {
        let bitmap = Self::new(runner, image.width(), image.height());
        bitmap.post_write(0, 0, image);
        bitmap
    }

    pub fn texture(&self) -> TextureId {
        self.inner.texture
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn rect(&self) -> IRect {
        IRect::new(0, 0, self.inner.width as i32, self.inner.height as i32)
    }

    /// Uploads `image` at (`x`, `y`) and notifies observers.
    pub fn write(&self, x: u32, y: u32, image: RgbaImage) {
        if self.skip_disposed() {
            return;
        }
        self.post_write(x, y, image);
        self.inner.observers.notify();
    }

    /// Copies `src_rect` of `source` into this bitmap at `dst`.
    pub fn blit(&self, dst: Vec2i, source: &Bitmap, src_rect: IRect) {
        if self.skip_disposed() || source.skip_disposed() {
            return;
        }
        let (src, dst_tex) = (source.texture(), self.texture());
        self.inner.runner.post(move |ctx| {
            ctx.backend().copy_texture(src, src_rect, dst_tex, dst)?;
            Ok(())
        });
        self.inner.observers.notify();
    }

    /// Clears to transparent and notifies observers.
    pub fn clear(&self) {
        if self.skip_disposed() {
            return;
        }
        let texture = self.texture();
        self.inner.runner.post(move |ctx| {
            ctx.backend().clear_texture(texture)?;
            Ok(())
        });
        self.inner.observers.notify();
    }

    /// Releases the texture and notifies observers. Clones see the disposal too.
    pub fn dispose(&self) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner.dispose();
        self.inner.observers.notify();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.observers.subscribe(callback)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Bitmap) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn post_write(&self, x: u32, y: u32, image: RgbaImage) {
        let texture = self.texture();
        self.inner.runner.post(move |ctx| {
            ctx.backend().write_texture(texture, x, y, &image)?;
            Ok(())
        });
    }

    fn skip_disposed(&self) -> bool {
        let disposed = self.inner.disposed.get();
        if disposed {
            log::debug!("Bitmap: ignoring operation on disposed bitmap {:?}", self.inner.texture);
        }
        disposed
    }
}
