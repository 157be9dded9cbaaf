//! Browser helpers - frame rasterization, file download, fullscreen

use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, Element, HtmlAnchorElement,
    HtmlCanvasElement, HtmlVideoElement, Url,
};

use crate::config::CaptureQuality;
use crate::error::{describe_js_error, AnalysisError};

fn platform(e: JsValue) -> AnalysisError {
    AnalysisError::Platform(describe_js_error(&e))
}

fn document() -> Result<Document, AnalysisError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AnalysisError::Platform("no document".into()))
}

/// Draw the current video frame (plus the overlay, when given) into an
/// offscreen canvas and encode it as a JPEG data URL
pub fn rasterize_frame(
    video: &HtmlVideoElement,
    overlay: Option<&HtmlCanvasElement>,
    quality: CaptureQuality,
) -> Result<String, AnalysisError> {
    if video.video_width() == 0 || video.video_height() == 0 {
        return Err(AnalysisError::NoVideoDimensions);
    }
    let width = (video.video_width() as f64 * quality.scale()).round().max(1.0);
    let height = (video.video_height() as f64 * quality.scale()).round().max(1.0);

    let canvas = document()?
        .create_element("canvas")
        .map_err(platform)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| AnalysisError::Canvas("created element is not a canvas".into()))?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let ctx = canvas
        .get_context("2d")
        .map_err(|e| AnalysisError::Canvas(describe_js_error(&e)))?
        .ok_or_else(|| AnalysisError::Canvas("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| AnalysisError::Canvas("context is not a CanvasRenderingContext2d".into()))?;

    ctx.draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, width, height)
        .map_err(|e| AnalysisError::Canvas(describe_js_error(&e)))?;
    if let Some(overlay) = overlay {
        ctx.draw_image_with_html_canvas_element_and_dw_and_dh(overlay, 0.0, 0.0, width, height)
            .map_err(|e| AnalysisError::Canvas(describe_js_error(&e)))?;
    }

    canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(quality.encoder_quality()))
        .map_err(|e| AnalysisError::Canvas(describe_js_error(&e)))
}

/// Offer `contents` as a file download through a temporary object URL
pub fn download_text(file_name: &str, contents: &str, mime: &str) -> Result<(), AnalysisError> {
    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(platform)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(platform)?;

    let anchor = document()?
        .create_element("a")
        .map_err(platform)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| AnalysisError::Platform("created element is not an anchor".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(platform)
}

/// Enter fullscreen on `target`, or leave it if something is already
/// fullscreen. Returns whether fullscreen is now active.
pub fn toggle_fullscreen(target: &Element) -> Result<bool, AnalysisError> {
    let document = document()?;
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        Ok(false)
    } else {
        target.request_fullscreen().map_err(platform)?;
        Ok(true)
    }
}

/// Human-readable text for the video element's current error
pub fn media_error_message(video: &HtmlVideoElement) -> String {
    match video.error() {
        Some(err) => {
            let kind = match err.code() {
                1 => "MEDIA_ERR_ABORTED",
                2 => "MEDIA_ERR_NETWORK",
                3 => "MEDIA_ERR_DECODE",
                4 => "MEDIA_ERR_SRC_NOT_SUPPORTED",
                _ => "MEDIA_ERR_UNKNOWN",
            };
            let detail = err.message();
            if detail.is_empty() {
                kind.to_string()
            } else {
                format!("{}: {}", kind, detail)
            }
        }
        None => "unknown media error".to_string(),
    }
}
