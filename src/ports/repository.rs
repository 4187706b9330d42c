//! Repository port for trained-agent persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading trained value tables.
///
/// The core never serializes on its own; consumers that need a frozen
/// policy later (evaluation, interactive play) go through this trait.
///
/// # Examples
///
/// ```no_run
/// use qlearn_ttt::adapters::MsgPackRepository;
/// use qlearn_ttt::ports::TableRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let saved = repo.load(Path::new("trained.msgpack"))?;
/// println!("{} entries", saved.table.len());
/// # Ok::<(), qlearn_ttt::Error>(())
/// ```
pub trait TableRepository {
    /// Save a trained agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization fails.
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load a trained agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, corrupt, or written by an
    /// unsupported format version.
    fn load(&self, path: &Path) -> Result<SavedAgent>;
}
