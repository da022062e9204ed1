//! Preview images copied into `<config>/images/`.
//!
//! Images share one flat directory keyed by file name. Attaching an image
//! whose name is already taken overwrites the earlier file, even when another
//! record still points at it.

use std::path::{Path, PathBuf};

use crate::error::{ModError, Result};
use crate::paths;

/// Copy `source` into `images_dir` under its own file name and return the
/// destination path.
pub fn import_image(images_dir: &Path, source: &Path) -> Result<PathBuf> {
    let name = paths::file_name(source).ok_or_else(|| {
        ModError::Validation(format!("image has no usable file name: {}", source.display()))
    })?;
    std::fs::create_dir_all(images_dir).map_err(ModError::io("create directory", images_dir))?;

    let destination = images_dir.join(name);
    if destination.exists() {
        tracing::warn!("Overwriting existing image {}", destination.display());
    }
    std::fs::copy(source, &destination).map_err(ModError::io("copy", source))?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_copies_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("preview.png");
        std::fs::write(&src, b"png").unwrap();
        let images = tmp.path().join("cfg/images");

        let dest = import_image(&images, &src).unwrap();
        assert_eq!(dest, images.join("preview.png"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"png");
        assert!(src.exists());
    }

    #[test]
    fn test_same_name_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let images = tmp.path().join("images");
        let first = tmp.path().join("a/cover.jpg");
        let second = tmp.path().join("b/cover.jpg");
        for (p, data) in [(&first, b"one"), (&second, b"two")] {
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, data).unwrap();
        }

        import_image(&images, &first).unwrap();
        let dest = import_image(&images, &second).unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"two");
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = import_image(&tmp.path().join("images"), &tmp.path().join("nope.png"))
            .unwrap_err();
        assert!(matches!(err, ModError::Io { action: "copy", .. }));
    }
}
