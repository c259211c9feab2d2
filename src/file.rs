//! Loading TOML configuration files into map sources.
//!
//! Files are read eagerly, before any field is resolved. Unlike discovered
//! search paths, every file here was named explicitly (on the command line
//! or through the builder), so a missing file is an error.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FieldfigError;
use crate::source::{MapSource, MapsSource};

/// Read and parse one TOML file.
pub fn load_toml_file(path: &Path) -> Result<MapSource, FieldfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| FieldfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source = MapSource::from_toml_str(path.display().to_string(), &content)?;
    debug!(path = %path.display(), keys = source.table().len(), "loaded TOML configuration file");
    Ok(source)
}

/// Load files in order. Earlier files take precedence over later ones.
pub fn load_toml_files(paths: &[PathBuf]) -> Result<MapsSource, FieldfigError> {
    let mut maps = MapsSource::default();
    for path in paths {
        maps.push(load_toml_file(path)?);
    }
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ValueSource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_one_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "port = 3000\n[server]\nhost = \"0.0.0.0\"\n").unwrap();

        let source = load_toml_file(&path).unwrap();
        assert_eq!(source.lookup("port").unwrap().as_integer(), Some(3000));
        assert_eq!(source.lookup("server.host").unwrap().as_str(), Some("0.0.0.0"));
        assert!(source.name().ends_with("app.toml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_toml_file(&path).unwrap_err();
        assert!(matches!(err, FieldfigError::IoError { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "port = = 1\n").unwrap();
        let err = load_toml_file(&path).unwrap_err();
        assert!(matches!(err, FieldfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn load_multiple_files_keeps_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(&first, "host = \"a\"\n").unwrap();
        fs::write(&second, "host = \"b\"\nport = 1000\n").unwrap();

        let maps = load_toml_files(&[first, second]).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps.lookup("host").unwrap().as_str(), Some("a"));
        assert_eq!(maps.lookup("port").unwrap().as_integer(), Some(1000));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_returns_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("app.toml");
        fs::write(&file_path, "port = 1\n").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; only assert when the read actually fails.
        if fs::read_to_string(&file_path).is_err() {
            let result = load_toml_file(&file_path);
            assert!(matches!(result, Err(FieldfigError::IoError { .. })));
        }

        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
