//! Reading and writing the persisted style and drawing entries.

use super::store::KeyValueStore;
use crate::draw::Color;
use crate::input::StyleState;
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};

pub const LINE_COLOR_KEY: &str = "lineColor";
pub const LINE_WEIGHT_KEY: &str = "lineWeight";
pub const CURRENT_DRAWING_KEY: &str = "currentDrawing";

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Seeds `style` from persisted values. Malformed entries are logged and skipped.
pub fn restore_style(store: &dyn KeyValueStore, style: &mut StyleState) {
    if let Some(raw) = store.get(LINE_COLOR_KEY) {
        match Color::from_hex(&raw) {
            Some(color) => {
                style.set_color(color);
            }
            None => warn!("Ignoring malformed persisted {LINE_COLOR_KEY} '{raw}'"),
        }
    }

    if let Some(raw) = store.get(LINE_WEIGHT_KEY) {
        match raw.trim().parse::<u32>() {
            Ok(weight) if weight > 0 => {
                style.set_width(weight);
            }
            _ => warn!("Ignoring malformed persisted {LINE_WEIGHT_KEY} '{raw}'"),
        }
    }
}

/// Writes both style keys.
pub fn save_style(store: &mut dyn KeyValueStore, style: &StyleState) -> Result<()> {
    store.set(LINE_COLOR_KEY, style.color().to_hex())?;
    store.set(LINE_WEIGHT_KEY, style.width().to_string())?;
    Ok(())
}

/// Returns the PNG bytes of the persisted drawing, if present and well formed.
pub fn load_drawing(store: &dyn KeyValueStore) -> Option<Vec<u8>> {
    let raw = store.get(CURRENT_DRAWING_KEY)?;
    let decoded = decode_data_url(&raw);
    if decoded.is_none() {
        warn!("Ignoring malformed persisted {CURRENT_DRAWING_KEY}");
    }
    decoded
}

pub fn save_drawing(store: &mut dyn KeyValueStore, png: &[u8]) -> Result<()> {
    let url = encode_data_url(png);
    debug!("Persisting drawing ({} bytes encoded)", url.len());
    store.set(CURRENT_DRAWING_KEY, url)
}

/// Encodes PNG bytes as a self-contained `data:` URL.
pub fn encode_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

/// Decodes a PNG `data:` URL produced by [`encode_data_url`].
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let payload = url.trim().strip_prefix(PNG_DATA_URL_PREFIX)?;
    STANDARD.decode(payload).ok()
}
