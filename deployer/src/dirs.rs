//! Home directory resolution.
//!
//! The local repository defaults to a location under the user's home
//! directory. [`BaseDirs`] lets tests substitute a temporary directory.

use camino::Utf8PathBuf;

/// Source of platform base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory, when it is known and valid UTF-8.
    fn home_dir(&self) -> Option<Utf8PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
///
/// When the platform reports no home directory, [`BaseDirs::home_dir`]
/// returns `None`.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: Option<directories_next::BaseDirs>,
}

impl SystemBaseDirs {
    /// Query the platform for its base directories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: directories_next::BaseDirs::new(),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<Utf8PathBuf> {
        let inner = self.inner.as_ref()?;
        Utf8PathBuf::from_path_buf(inner.home_dir().to_path_buf()).ok()
    }
}
