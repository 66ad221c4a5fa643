// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::model::ProcessOptions;
use crate::decode::TextEncoding;
use crate::errors::Result;
use crate::types::Encoding;

/// Read a TOML options file into [`ProcessOptions`].
///
/// This only performs deserialization. Use [`load_options`] for the checked
/// entry point.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ProcessOptions> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let options: ProcessOptions = toml::from_str(&contents)?;

    Ok(options)
}

/// Load options from a TOML file and report suspicious settings.
///
/// An encoding label that is neither `buffer`, `native` nor a known charset
/// is accepted (it decodes to raw bytes) but logged, since it is usually a
/// typo.
pub fn load_options(path: impl AsRef<Path>) -> Result<ProcessOptions> {
    let path = path.as_ref();
    let options = load_from_path(path)?;

    if let Some(Encoding::Named(label)) = &options.encoding {
        if TextEncoding::from_label(label).is_none() {
            warn!(
                path = %path.display(),
                encoding = %label,
                "unrecognized encoding label; buffered output will stay raw bytes"
            );
        }
    }

    debug!(path = %path.display(), ?options, "loaded process options");
    Ok(options)
}
