use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::config::{BackgroundType, DesignConfig};

/// Decoded images referenced by a design, keyed by their config reference.
///
/// Preparation never fails: an image that cannot be resolved or decoded is logged and left
/// out, and the renderer paints the black container in its place.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssets {
    root: PathBuf,
    images: HashMap<String, DecodedImage>,
}

impl PreparedAssets {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn prepare(config: &DesignConfig, root: impl AsRef<Path>) -> Self {
        let mut out = Self {
            root: root.as_ref().to_path_buf(),
            images: HashMap::new(),
        };
        if config.bg_type == BackgroundType::Image
            && let Some(source) = config.bg_image.as_deref()
        {
            match out.load(source) {
                Ok(img) => {
                    tracing::debug!(source, width = img.width, height = img.height, "prepared background");
                    out.images.insert(source.to_string(), img);
                }
                Err(err) => {
                    tracing::warn!(source, error = %err, "background image unavailable; painting black");
                }
            }
        }
        out
    }

    /// Register an already-decoded image under `source`.
    pub fn insert(&mut self, source: impl Into<String>, image: DecodedImage) {
        self.images.insert(source.into(), image);
    }

    pub fn image(&self, source: &str) -> Option<&DecodedImage> {
        self.images.get(source)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn load(&self, source: &str) -> SocialflowResult<DecodedImage> {
        let rel = normalize_rel_path(source)?;
        let path = self.root.join(&rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))?;
        decode_image(&bytes)
    }
}

/// Normalize and validate asset references relative to the assets root.
///
/// The result uses `/` separators and has no `.` segments. Absolute paths and parent
/// traversals (`..`) are rejected.
pub fn normalize_rel_path(source: &str) -> SocialflowResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(SocialflowError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.contains(':') {
        return Err(SocialflowError::validation(format!(
            "asset path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(SocialflowError::validation(format!(
                    "asset path '{source}' must not contain '..'"
                )));
            }
            _ => out.push(part),
        }
    }
    if out.is_empty() {
        return Err(SocialflowError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
