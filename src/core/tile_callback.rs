// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;

/// Observer hooks around frame updates.
///
/// Every lane invokes the hooks on its own schedule, so implementations
/// must be idempotent and safe to call concurrently. The frame reference
/// passed to `post_render` is only valid for the duration of the call.
pub trait TileCallback: Send + Sync {
    /// About to start refining the given canvas region.
    fn pre_render(&self, x: usize, y: usize, width: usize, height: usize);

    /// A new version of the frame has been developed.
    fn post_render(&self, frame: &Bitmap);
}
