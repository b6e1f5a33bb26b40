//! Error types for backskin.

use std::io;

/// Errors produced by the backskin crates.
#[derive(Debug, thiserror::Error)]
pub enum BackskinError {
    #[error("config error: {0}")]
    Config(String),

    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("skin error: {0}")]
    Skin(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BackskinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = BackskinError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn vfs_error_display() {
        let e = BackskinError::Vfs("file not found".into());
        assert_eq!(format!("{e}"), "VFS error: file not found");
    }

    #[test]
    fn settings_error_display() {
        let e = BackskinError::Settings("no database".into());
        assert_eq!(format!("{e}"), "settings error: no database");
    }

    #[test]
    fn skin_error_display() {
        let e = BackskinError::Skin("bad code".into());
        assert_eq!(format!("{e}"), "skin error: bad code");
    }

    #[test]
    fn asset_error_display() {
        let e = BackskinError::Asset("empty bundle".into());
        assert_eq!(format!("{e}"), "asset error: empty bundle");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let e: BackskinError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: BackskinError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn display_prefix_per_variant() {
        let errors = [
            BackskinError::Config("c".into()),
            BackskinError::Vfs("v".into()),
            BackskinError::Settings("s".into()),
            BackskinError::Skin("k".into()),
            BackskinError::Asset("a".into()),
            io::Error::other("x").into(),
            toml::from_str::<toml::Table>("[[[").unwrap_err().into(),
        ];
        for e in errors {
            let prefix = match &e {
                BackskinError::Config(_) => "config error",
                BackskinError::Vfs(_) => "VFS error",
                BackskinError::Settings(_) => "settings error",
                BackskinError::Skin(_) => "skin error",
                BackskinError::Asset(_) => "asset error",
                BackskinError::Io(_) => "I/O error",
                BackskinError::TomlParse(_) => "TOML parse error",
                BackskinError::TomlWrite(_) => "TOML write error",
            };
            assert!(e.to_string().starts_with(prefix), "{e}");
        }
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(BackskinError::Vfs("oops".into()));
        assert!(r.is_err());
    }
}
