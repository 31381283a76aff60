//! # exif-scan CLI
//!
//! ## Usage
//! ```bash
//! exif-scan ~/Photos
//! exif-scan ~/Photos --ignore-file ~/Photos/.gitignore --exit-when-done
//! exif-scan ~/Photos --no-metrics --output json
//! ```

mod cli;

use exif_scan::Result;

fn main() -> Result<()> {
    cli::run()
}
