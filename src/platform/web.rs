//! Browser frame timing and image loading

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Window};

use super::{FrameHandle, FrameScheduler};
use crate::assets::{Sprite, SpriteHandle};

/// `requestAnimationFrame` scheduler
///
/// Every request re-registers the same callback, so the closure is created
/// once and lives as long as the page.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
        }
    }

    /// Install the per-frame callback; must happen before the loop starts
    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let Some(callback) = &self.callback else {
            log::error!("Frame requested before a callback was installed");
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id as u64),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {e:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

/// Start loading `url` into `handle`
///
/// Returns immediately; `onload` decodes the image and marks the handle ready,
/// `onerror` marks it failed.
pub fn load_sprite(url: &str, handle: SpriteHandle) -> Result<(), JsValue> {
    let image = HtmlImageElement::new()?;

    let onload = {
        let image = image.clone();
        let handle = handle.clone();
        Closure::<dyn FnMut()>::new(move || match decode(&image) {
            Ok(sprite) => handle.complete(sprite),
            Err(e) => handle.fail(&format!("{e:?}")),
        })
    };
    let onerror = {
        let url = url.to_string();
        Closure::<dyn FnMut()>::new(move || handle.fail(&format!("could not load {url}")))
    };

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    image.set_src(url);
    log::debug!("Loading sprite {url}");
    Ok(())
}

/// Read the image's pixels back through a scratch 2D canvas
fn decode(image: &HtmlImageElement) -> Result<Sprite, JsValue> {
    let (width, height) = (image.natural_width(), image.natural_height());
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;
    let data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    Sprite::from_rgba(width, height, data.data().0)
        .ok_or_else(|| JsValue::from_str("image has no pixels"))
}
