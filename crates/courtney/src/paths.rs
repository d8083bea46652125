//! Conversion between package-qualified file names and on-disk paths.
//!
//! Coverage profiles name files in package-qualified form
//! (`ns/pkg/file.go`); the exclusion set and the enforcement reporter
//! work with filesystem paths. The host decides how the two relate;
//! [`DirMapper`] covers the common layout where one package prefix maps
//! onto one source root.

use std::path::{Component, Path, PathBuf};

use crate::result::{CourtneyError, CourtneyResult};

/// Bidirectional conversion between profile names and paths.
pub trait PathMapper {
    /// On-disk path for a package-qualified file name.
    fn file_path(&self, name: &str) -> CourtneyResult<PathBuf>;

    /// Package-qualified name for an on-disk path.
    fn profile_name(&self, path: &Path) -> CourtneyResult<String>;
}

/// Maps a package prefix onto a source root directory.
///
/// `DirMapper::new("github.com/acme/ns", "/work/ns")` maps
/// `github.com/acme/ns/a/a.go` to `/work/ns/a/a.go` and back.
#[derive(Debug, Clone)]
pub struct DirMapper {
    prefix: String,
    root: PathBuf,
}

impl DirMapper {
    /// Create a mapper from a package prefix and its source root.
    #[must_use]
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
        }
    }
}

impl PathMapper for DirMapper {
    fn file_path(&self, name: &str) -> CourtneyResult<PathBuf> {
        let relative = name
            .strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| CourtneyError::PathMapping {
                name: name.to_string(),
            })?;
        Ok(self.root.join(relative))
    }

    fn profile_name(&self, path: &Path) -> CourtneyResult<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| CourtneyError::PathMapping {
                name: path.display().to_string(),
            })?;
        let mut name = self.prefix.clone();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                name.push('/');
                name.push_str(&part.to_string_lossy());
            }
        }
        Ok(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn maps_names_to_paths_and_back() {
        let mapper = DirMapper::new("github.com/acme/ns", "/work/ns");

        let path = mapper.file_path("github.com/acme/ns/a/a.go").unwrap();
        assert_eq!(path, PathBuf::from("/work/ns/a/a.go"));

        let name = mapper.profile_name(Path::new("/work/ns/a/a.go")).unwrap();
        assert_eq!(name, "github.com/acme/ns/a/a.go");
    }

    #[test]
    fn foreign_names_are_rejected() {
        let mapper = DirMapper::new("ns", "/work/ns");
        assert!(matches!(
            mapper.file_path("other/a.go"),
            Err(CourtneyError::PathMapping { .. })
        ));
        // A prefix match must end at a path boundary.
        assert!(mapper.file_path("nsx/a.go").is_err());
    }

    #[test]
    fn foreign_paths_are_rejected() {
        let mapper = DirMapper::new("ns", "/work/ns");
        assert!(mapper.profile_name(Path::new("/elsewhere/a.go")).is_err());
    }
}
