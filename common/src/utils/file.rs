//! File helpers: path resolution and attachment sniffing.

use std::{
    env,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

/// Extensions rendered as inline images.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Expands a leading `~` to the home directory and anchors relative paths
/// at the current directory.
fn expand_tilde<P: AsRef<Path>>(input: P) -> Result<PathBuf, Error> {
    let path = input.as_ref();

    if let Ok(rest) = path.strip_prefix("~") {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, "home directory not found"))?;
        return Ok(home.join(rest));
    }

    if path.is_relative() {
        return Ok(env::current_dir()?.join(path));
    }

    Ok(path.to_path_buf())
}

/// Resolves a file path to an existing absolute path.
pub fn resolve_path<P: AsRef<Path>>(input: P) -> Result<PathBuf, Error> {
    let path = expand_tilde(input.as_ref())?;

    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        ));
    }

    path.canonicalize()
}

/// The final component of `path`, or the whole path when it has none.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Whether a file name or URL points at an image, judged by extension.
///
/// Query strings and fragments are ignored so upload URLs like
/// `photo.png?ver=2` are still recognised.
pub fn is_image_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
