//! Image assets
//!
//! Loading is asynchronous on the web; the loop never waits for it. A
//! [`SpriteHandle`] is shared between the loader callbacks and the renderer,
//! and the renderer polls [`SpriteHandle::is_ready`] every frame.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::Color;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Sprite {
    /// Wrap raw RGBA8 pixels; `None` if the length does not match
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour lookup at texture coordinates in `[0, 1)`
    pub fn sample(&self, uv: Vec2) -> Color {
        let x = ((uv.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as u32).min(self.height - 1);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        [p[0], p[1], p[2], p[3]]
    }
}

/// Load progress of one asset
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready(Sprite),
    Failed,
}

/// Shared slot the loader fills and the renderer polls
#[derive(Debug, Clone, Default)]
pub struct SpriteHandle(Rc<RefCell<AssetStatus>>);

impl SpriteHandle {
    pub fn pending() -> Self {
        Self::default()
    }

    /// Completion callback
    pub fn complete(&self, sprite: Sprite) {
        log::info!("Sprite loaded ({}x{})", sprite.width, sprite.height);
        *self.0.borrow_mut() = AssetStatus::Ready(sprite);
    }

    /// Failure callback; the renderer keeps drawing the placeholder
    pub fn fail(&self, reason: &str) {
        log::warn!("Sprite failed to load: {reason}");
        *self.0.borrow_mut() = AssetStatus::Failed;
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.0.borrow(), AssetStatus::Ready(_))
    }

    pub fn status(&self) -> AssetStatus {
        self.0.borrow().clone()
    }

    /// Borrow the sprite if it has loaded
    pub fn sprite(&self) -> Option<Ref<'_, Sprite>> {
        Ref::filter_map(self.0.borrow(), |status| match status {
            AssetStatus::Ready(sprite) => Some(sprite),
            _ => None,
        })
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Sprite {
        // 2x2: red, green / blue, white
        let pixels = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        Sprite::from_rgba(2, 2, pixels).unwrap()
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Sprite::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Sprite::from_rgba(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_sample_nearest() {
        let sprite = checker();
        assert_eq!(sprite.sample(Vec2::new(0.1, 0.1)), [255, 0, 0, 255]);
        assert_eq!(sprite.sample(Vec2::new(0.9, 0.1)), [0, 255, 0, 255]);
        assert_eq!(sprite.sample(Vec2::new(0.1, 0.9)), [0, 0, 255, 255]);
        assert_eq!(sprite.sample(Vec2::new(0.99, 0.99)), [255, 255, 255, 255]);
    }

    #[test]
    fn test_handle_lifecycle() {
        let handle = SpriteHandle::pending();
        let loader_side = handle.clone();
        assert!(!handle.is_ready());
        assert!(handle.sprite().is_none());

        loader_side.complete(checker());
        assert!(handle.is_ready());
        assert_eq!(handle.sprite().map(|s| s.width()), Some(2));
    }

    #[test]
    fn test_failed_load_is_not_ready() {
        let handle = SpriteHandle::pending();
        handle.fail("404");
        assert!(!handle.is_ready());
        assert_eq!(handle.status(), AssetStatus::Failed);
    }
}
