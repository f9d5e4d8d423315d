//! Browser glue: clock, sprite decoding and the game-over event

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, CustomEvent, CustomEventInit, HtmlCanvasElement, HtmlImageElement};

use crate::assets::{AssetError, SpriteAttempt, SpriteImage, SpriteManifest, SpriteSet};
use crate::sim::SessionReport;

/// Event name the embedding page listens for
pub const GAME_OVER_EVENT: &str = "runner:gameover";

/// High resolution clock in ms
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Fetch one image and read its pixels back through an offscreen canvas
pub async fn load_image(url: &str) -> Result<SpriteImage, AssetError> {
    let fetch_err = |reason: String| AssetError::Fetch {
        url: url.to_string(),
        reason,
    };
    let decode_err = |reason: String| AssetError::Decode {
        url: url.to_string(),
        reason,
    };

    let image = HtmlImageElement::new().map_err(|e| fetch_err(describe(&e)))?;
    image.set_cross_origin(Some("anonymous"));

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(url);
    let result = JsFuture::from(loaded).await;
    image.set_onload(None);
    image.set_onerror(None);
    result.map_err(|_| fetch_err("image failed to load".to_string()))?;

    let (width, height) = (image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        return Err(AssetError::Empty {
            url: url.to_string(),
        });
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| decode_err("no document".to_string()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| decode_err(describe(&e)))?
        .dyn_into()
        .map_err(|_| decode_err("not a canvas".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| decode_err(describe(&e)))?
        .ok_or_else(|| decode_err("no 2d context".to_string()))?
        .dyn_into()
        .map_err(|_| decode_err("not a 2d context".to_string()))?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|e| decode_err(describe(&e)))?;
    let pixels = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| decode_err(describe(&e)))?;

    SpriteImage::new(url, width, height, pixels.data().0)
}

/// Walk every fallback chain with real image loads
pub async fn acquire_sprites(manifest: &SpriteManifest) -> SpriteSet {
    let mut set = SpriteSet::empty();
    for source in &manifest.sources {
        let mut attempt = SpriteAttempt::new(source);
        while let Some(url) = attempt.next_url().map(str::to_owned) {
            attempt.record(load_image(&url).await);
        }
        set.insert(attempt);
    }
    log::info!("{}", set.load_report());
    set
}

/// Hand the final numbers to the page as `runner:gameover`
pub fn dispatch_game_over(report: &SessionReport) -> Result<(), JsValue> {
    let json = serde_json::to_string(report).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let detail = js_sys::JSON::parse(&json)?;

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(GAME_OVER_EVENT, &init)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.dispatch_event(&event)?;
    log::info!("Dispatched {} {}", GAME_OVER_EVENT, json);
    Ok(())
}
