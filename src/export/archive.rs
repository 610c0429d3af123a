use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::Context;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::export::pipeline::ExportedImage;
use crate::foundation::error::{SocialflowError, SocialflowResult};

/// File name offered for the bundled download.
pub const ARCHIVE_FILE_NAME: &str = "socialflow-carousel.zip";

/// Bundle exported slides into a zip, one `slide-<n>.png` entry each, in slide order.
///
/// PNG data is already compressed, so entries are stored as-is.
pub fn bundle_zip(images: &[ExportedImage]) -> SocialflowResult<Vec<u8>> {
    if images.is_empty() {
        return Err(SocialflowError::export("cannot bundle an empty export"));
    }
    let mut ordered: Vec<&ExportedImage> = images.iter().collect();
    ordered.sort_by_key(|img| img.index);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for img in ordered {
        let name = img.file_name();
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start zip entry '{name}'"))?;
        zip.write_all(&img.png)
            .with_context(|| format!("write zip entry '{name}'"))?;
    }
    let cursor = zip.finish().context("finish zip archive")?;
    Ok(cursor.into_inner())
}

/// Bundle and write the archive to `path`, creating parent directories.
pub fn write_archive(images: &[ExportedImage], path: &Path) -> SocialflowResult<()> {
    let bytes = bundle_zip(images)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write zip '{}'", path.display()))?;
    tracing::info!(path = %path.display(), entries = images.len(), "wrote archive");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
