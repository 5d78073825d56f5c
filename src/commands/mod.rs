pub mod config;
pub mod info;
pub mod merge;
pub mod rotate;
pub mod split;

use crate::settings::Settings;
use std::path::Path;

/// The export-directory override tier: an explicit flag beats the persisted
/// default output directory; absent both, resolution falls back to the input.
pub(crate) fn override_dir<'a>(flag: Option<&'a Path>, settings: &'a Settings) -> Option<&'a Path> {
    flag.or(settings.default_output_dir.as_deref())
}
