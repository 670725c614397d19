//! Image variants: naming, dimensions and identification.
//!
//! | Operation | Where |
//! |---|---|
//! | **Derivative lookup** | [`DerivativeProvider`] trait + [`NamingProvider`] |
//! | **Derivative size** | proportional height, never upscaled |
//! | **Identify** | `image::image_dimensions` (header only) |
//!
//! The module is split into:
//! - **Backend**: [`DerivativeProvider`] trait and [`DerivativeError`]
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Naming**: URL convention for derivatives and WebP siblings
//! - **Identify**: intrinsic dimensions of files on disk

pub mod backend;
mod calculations;
pub mod identify;
pub mod naming;

pub use backend::{DerivativeError, DerivativeProvider};
pub use calculations::calculate_derivative_dimensions;
pub use identify::{Dimensions, identify, is_supported};
pub use naming::{NamingProvider, derivative_url, encode_path_segment, file_name, webp_url};
