//! Portrait download and decoding.

use reqwest::Client as HttpClient;

const PORTRAIT_MAX_EDGE: u32 = 512;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub async fn fetch_portrait(http: &HttpClient, url: &str) -> Result<PreviewImage, String> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|err| format!("request to {url} failed: {err}"))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| format!("request to {url} failed: {err}"))?;
    decode_preview_image(&bytes)
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes)
        .map_err(|err| format!("unsupported image data: {err}"))?;
    let resized = dynamic
        .thumbnail(PORTRAIT_MAX_EDGE, PORTRAIT_MAX_EDGE)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
