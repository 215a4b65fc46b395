#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use rasterkit_grid as grid;

#[doc(inline)]
pub use rasterkit_resample as resample;
