//! FIR filter design with the window method

pub mod types;
pub mod windows;
pub mod design;

pub use types::{
    BandpassStrategy, BandstopStrategy, FilterOrder, FilterTypeStrategy, HighpassStrategy,
    LowpassStrategy, TypeStrategy, MAX_FILTER_LENGTH,
};
pub use windows::{
    bessel_i0, kaiser_alpha, BlackmanWindow, FilterWindowStrategy, HammingWindow, KaiserShape,
    KaiserWindow, WindowStrategy,
};
pub use design::{mirror_coefficients, DesignParameters, FilterDesign, FirDesigner};
