//! System clipboard helpers (OS-level copy/paste via arboard).

use image::RgbaImage;

/// Write the exported coordinate text to the system clipboard.
pub fn copy_text(text: &str) -> Result<(), arboard::Error> {
    let mut clip = arboard::Clipboard::new()?;
    clip.set_text(text.to_owned())
}

/// Try to read an image from the system clipboard. Returns None if nothing
/// usable is available. Two cases are handled:
///   1. Raw image data (screenshot, copy from another editor).
///   2. Text on the clipboard that happens to be a valid image file path.
pub fn paste_image() -> Option<RgbaImage> {
    let mut clip = arboard::Clipboard::new().ok()?;

    if let Ok(img_data) = clip.get_image() {
        if let Some(img) = RgbaImage::from_raw(
            img_data.width as u32,
            img_data.height as u32,
            img_data.bytes.into_owned(),
        ) {
            return Some(img);
        }
    }

    if let Ok(text) = clip.get_text() {
        let path = std::path::Path::new(text.trim());
        if path.is_file() {
            if let Ok(img) = crate::load::open_image(path) {
                return Some(img.to_rgba8());
            }
        }
    }

    None
}
