//! Decorative chain band tiling.
//!
//! The chain strip is three viewport widths wide and starts offset one
//! viewport width to the left, so it already extends a full screen to either
//! side before the slide runs — that is what makes the horizontal shift in
//! the transition read as one seamless, endless chain. Recomputed whenever
//! the viewport width changes.

/// Width of one chain-link tile in CSS pixels (matches the SVG viewBox).
pub const CHAIN_TILE_WIDTH: f64 = 60.0;
/// Height of the chain band in CSS pixels.
pub const CHAIN_BAND_HEIGHT: f64 = 40.0;

/// Number of tiles needed to cover a band three viewport widths wide.
/// A zero-width viewport tiles to nothing.
pub fn tile_count(viewport_w: f64, tile_w: f64) -> usize {
    if viewport_w <= 0.0 || tile_w <= 0.0 {
        return 0;
    }
    ((viewport_w * 3.0) / tile_w).ceil() as usize
}

/// Total strip width for a given viewport width.
pub fn band_width(viewport_w: f64) -> f64 {
    viewport_w * 3.0
}

/// Baseline horizontal offset of the strip: one viewport width to the left.
pub fn band_offset(viewport_w: f64) -> f64 {
    -viewport_w
}

/// Inline SVG markup for one chain-link tile (two crossing gold curves).
pub fn tile_svg() -> &'static str {
    concat!(
        "<svg width=\"60\" height=\"40\" viewBox=\"0 0 60 40\" preserveAspectRatio=\"none\">",
        "<path d=\"M0,20 Q15,0 30,20 T60,20\" fill=\"none\" stroke=\"#FFD700\" stroke-width=\"2\"/>",
        "<path d=\"M0,20 Q15,40 30,20 T60,20\" fill=\"none\" stroke=\"#FFD700\" stroke-width=\"2\"/>",
        "</svg>"
    )
}
