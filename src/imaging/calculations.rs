//! Pure calculation functions for derivative dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions of a width-constrained derivative.
///
/// The height follows the source aspect ratio, rounded, and never drops
/// below one pixel. Targets at or above the source width return the source
/// dimensions unchanged (no upscaling).
///
/// # Examples
/// ```
/// # use picture_press::imaging::calculate_derivative_dimensions;
/// assert_eq!(calculate_derivative_dimensions((2000, 1500), 400), (400, 300));
/// assert_eq!(calculate_derivative_dimensions((600, 400), 800), (600, 400));
/// ```
pub fn calculate_derivative_dimensions(source: (u32, u32), target_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if target_width >= src_w || src_w == 0 {
        return source;
    }
    let h = (src_h as f64 * target_width as f64 / src_w as f64).round() as u32;
    (target_width, h.max(1))
}
