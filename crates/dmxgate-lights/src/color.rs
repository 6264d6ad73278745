//! Colour and brightness helpers
//!
//! Lights remember an unscaled colour (brightest component at 255) and a
//! separate brightness. The channels carry the colour scaled by brightness.

/// An RGB triple
pub type Rgb = [u8; 3];

/// Colour used by RGB lights without a configured default
pub const WHITE: Rgb = [255, 255, 255];

/// Scale each component by `brightness / 255`, rounding to nearest
pub fn scale_rgb_to_brightness(rgb: Rgb, brightness: u8) -> Rgb {
    let scale = f64::from(brightness) / 255.0;
    rgb.map(|c| (f64::from(c) * scale).round() as u8)
}

/// Split a configured colour into an unscaled colour and a brightness.
///
/// Brightness is the largest component. The colour is stretched so that
/// component becomes 255 (truncating the others). Black has no hue and
/// comes back as white at brightness 0.
pub fn normalize_default_color(rgb: Rgb) -> (Rgb, u8) {
    let brightness = rgb.iter().copied().max().unwrap_or(0);
    if brightness == 0 {
        return (WHITE, 0);
    }

    let scale = f64::from(brightness) / 255.0;
    let unscaled = rgb.map(|c| (f64::from(c) / scale).min(255.0) as u8);
    (unscaled, brightness)
}
