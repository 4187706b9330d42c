//! JSON implementation of the table repository, for inspectable tables.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedAgent};

/// Pretty-printed JSON table repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for JsonRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, agent)?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let agent: SavedAgent = serde_json::from_reader(BufReader::new(file))?;
        agent.check_version()?;
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::{QLearningAgent, QLearningConfig, TrainingMetadata};

    #[test]
    fn test_json_rejects_future_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("agent.json");

        let agent = QLearningAgent::new(QLearningConfig::default()).unwrap();
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 2;
        JsonRepository::new().save(&saved, &path).unwrap();

        let result = JsonRepository::new().load(&path);
        assert!(matches!(
            result,
            Err(Error::UnsupportedVersion { found: 2, .. })
        ));
    }
}
