//! Reading source images from disk and saving generated ones.
//!
//! Files are opened through `cap_std` by splitting the path into its parent
//! directory and file name.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::{Error, ErrorMessage, InlineImage, mime_type_for_extension};

/// Encode raw file bytes as a `data:` URI.
///
/// # Examples
/// ```
/// use nano_studio::outbound::image_file::encode_file;
///
/// assert_eq!(encode_file(b"hi", "image/gif"), "data:image/gif;base64,aGk=");
/// ```
#[must_use]
pub fn encode_file(bytes: &[u8], mime_type: &'static str) -> String {
    InlineImage::from_bytes(mime_type, bytes).to_data_uri()
}

/// Load an image file, inferring its MIME type from the extension.
///
/// # Errors
///
/// A missing or unsupported extension is a validation error; I/O failures
/// are reported as storage errors carrying the OS message.
pub fn read_image_file(path: &Utf8Path) -> Result<InlineImage, Error> {
    let extension = path.extension().unwrap_or_default();
    let mime_type = mime_type_for_extension(extension).ok_or_else(|| {
        Error::validation(ErrorMessage::UnsupportedImageType {
            extension: extension.to_ascii_lowercase(),
        })
    })?;
    let bytes = with_parent(path, |dir, name| dir.read(name))
        .map_err(|err| Error::storage(format!("failed to read {path}: {err}")))?;
    debug!(%path, mime_type, bytes = bytes.len(), "image file loaded");
    Ok(InlineImage::from_bytes(mime_type, &bytes))
}

/// Decode `image` and write its bytes to `path`, replacing any existing file.
///
/// # Errors
///
/// Invalid base64 is a validation error; I/O failures are storage errors.
pub fn write_image_file(path: &Utf8Path, image: &InlineImage) -> Result<(), Error> {
    let bytes = image.decode()?;
    with_parent(path, |dir, name| dir.write(name, &bytes))
        .map_err(|err| Error::storage(format!("failed to write {path}: {err}")))?;
    debug!(%path, bytes = bytes.len(), "image file written");
    Ok(())
}

fn with_parent<T>(
    path: &Utf8Path,
    operation: impl FnOnce(&Dir, &str) -> io::Result<T>,
) -> io::Result<T> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent.as_std_path(), ambient_authority())?;
    operation(&dir, file_name)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn path_in(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8Path::from_path(dir.path())
            .expect("utf-8 temp path")
            .join(name)
    }

    #[rstest]
    fn written_images_read_back_with_mime(workdir: TempDir) {
        let path = path_in(&workdir, "banana.PNG");
        let image = InlineImage::from_bytes("image/png", b"\x89PNG fake");
        write_image_file(&path, &image).expect("write");

        let loaded = read_image_file(&path).expect("read");
        assert_eq!(loaded.mime_type(), "image/png");
        assert_eq!(loaded.decode().expect("decode"), b"\x89PNG fake");
    }

    #[rstest]
    #[case("notes.txt", "txt")]
    #[case("README", "")]
    fn unsupported_extensions_are_rejected_before_reading(
        workdir: TempDir,
        #[case] name: &str,
        #[case] extension: &str,
    ) {
        let err = read_image_file(&path_in(&workdir, name)).expect_err("unsupported");
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(
            err.message(),
            &ErrorMessage::UnsupportedImageType {
                extension: extension.to_owned()
            }
        );
    }

    #[rstest]
    fn missing_file_is_a_storage_error(workdir: TempDir) {
        let err = read_image_file(&path_in(&workdir, "absent.jpg")).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::Storage);
    }
}
