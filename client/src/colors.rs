/// Format RGBA as a CSS color string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// Accent gold used for active site markers.
pub const ACTIVE_RGB: (u8, u8, u8) = (245, 197, 66);
/// Muted slate used for filtered-out markers.
pub const INACTIVE_RGB: (u8, u8, u8) = (90, 95, 110);
