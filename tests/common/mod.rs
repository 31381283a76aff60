//! Image fixtures for integration tests, shared with the unit tests.

#[allow(dead_code)]
#[path = "../../src/core/testdata.rs"]
mod testdata;

pub use testdata::exif_jpeg;
