use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ImgOpError, ImgOpResult};
use crate::raster::codec::{decode_image, encode_png};
use crate::raster::float_image::FloatImage;

/// Load/store boundary used by the `i` and `o` operators.
///
/// Both calls are synchronous; a failure aborts the running program.
pub trait ImageStore {
    /// Decode the image at `path`.
    fn load(&mut self, path: &Path) -> ImgOpResult<FloatImage>;
    /// Encode `img` to `path`.
    fn store(&mut self, path: &Path, img: &FloatImage) -> ImgOpResult<()>;
}

/// Reads any format supported by the `image` crate and always writes PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageStore;

impl FsImageStore {
    /// Create a filesystem-backed store.
    pub fn new() -> Self {
        Self
    }
}

impl ImageStore for FsImageStore {
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    fn load(&mut self, path: &Path) -> ImgOpResult<FloatImage> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))
            .map_err(ImgOpError::io)?;
        let img = decode_image(&bytes).map_err(|e| match e {
            ImgOpError::Io(err) => {
                ImgOpError::io(err.context(format!("decode image '{}'", path.display())))
            }
            other => other,
        })?;
        tracing::debug!(width = img.width(), height = img.height(), "loaded image");
        Ok(img)
    }

    #[tracing::instrument(skip(self, img), fields(path = %path.display()))]
    fn store(&mut self, path: &Path, img: &FloatImage) -> ImgOpResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))
                .map_err(ImgOpError::io)?;
        }
        let png = encode_png(img)?;
        std::fs::write(path, png)
            .with_context(|| format!("write png '{}'", path.display()))
            .map_err(ImgOpError::io)?;
        tracing::info!(
            width = img.width(),
            height = img.height(),
            "wrote {}",
            path.display()
        );
        Ok(())
    }
}

/// In-memory store for tests and embedding.
///
/// Stored images pass through the same 8-bit quantization as PNG export, so a later `load`
/// sees exactly what a file round trip would produce.
#[derive(Debug, Default, Clone)]
pub struct InMemoryImageStore {
    images: HashMap<PathBuf, FloatImage>,
}

impl InMemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under `path`, as if it had been decoded from disk.
    pub fn insert(&mut self, path: impl Into<PathBuf>, img: FloatImage) {
        self.images.insert(path.into(), img);
    }

    /// Borrow the image stored under `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&FloatImage> {
        self.images.get(path.as_ref())
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for InMemoryImageStore {
    fn load(&mut self, path: &Path) -> ImgOpResult<FloatImage> {
        self.images.get(path).cloned().ok_or_else(|| {
            ImgOpError::io(anyhow::anyhow!(
                "read image '{}': not found in memory store",
                path.display()
            ))
        })
    }

    fn store(&mut self, path: &Path, img: &FloatImage) -> ImgOpResult<()> {
        let quantized = FloatImage::from_rgba8(img.width(), img.height(), &img.to_rgba8())?;
        self.images.insert(path.to_path_buf(), quantized);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/store.rs"]
mod tests;
