//! Adapters implementing the persistence port.

pub mod json_repository;
pub mod msgpack_repository;

use std::path::Path;

pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;

use crate::{Error, Result, ports::TableRepository, q_learning::SavedAgent};

/// Pick a repository by file extension: `.json` is JSON, anything else MessagePack.
pub fn repository_for(path: &Path) -> Box<dyn TableRepository> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Box::new(JsonRepository::new()),
        _ => Box::new(MsgPackRepository::new()),
    }
}

/// Save without clobbering an existing file unless `overwrite` is set.
///
/// # Errors
///
/// Returns [`Error::Io`] with `AlreadyExists` when the target exists and
/// `overwrite` is false, or any error from the underlying repository.
pub fn save_agent(saved: &SavedAgent, path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(Error::Io {
            operation: format!("save agent to {}", path.display()),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "file already exists, save aborted",
            ),
        });
    }
    repository_for(path).save(saved, path)
}

/// Load a saved agent, choosing the format by extension.
pub fn load_agent(path: &Path) -> Result<SavedAgent> {
    repository_for(path).load(path)
}
