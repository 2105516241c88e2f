//! Page layout helpers.

mod region;

pub use region::{Region, RegionLayout, RegionName, DEFAULT_BAND_HEIGHT};
