pub mod cie1931;
pub mod srgb;
