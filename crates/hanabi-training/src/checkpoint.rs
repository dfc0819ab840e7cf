//! Population snapshots on disk.
//!
//! A [`Checkpoint`] stores the id counter and every policy; fitness is not
//! persisted, so a restored population has to be re-evaluated. The JSON shape
//! is
//!
//! ```json
//! {"id": 42, "agents": [{"name": "id7", "rules": [{"rule_type": 1, "criterion": 6, "threshold": 0.95}]}]}
//! ```

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use hanabi_evaluator::policy::Policy;

/// Serialized population: the next offspring id and the member policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: u64,
    pub agents: Vec<Policy>,
}

/// Failure to read or write a checkpoint or another JSON file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CheckpointError {
    #[display("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads and decodes one JSON file.
///
/// Checkpoints and evolution parameters both go through here.
pub fn read_json<T>(path: &Path) -> Result<T, CheckpointError>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| CheckpointError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CheckpointError::Json {
        path: path.to_owned(),
        source,
    })
}

/// Durable storage for checkpoints.
pub trait CheckpointStore {
    fn save(&mut self, epoch: usize, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;
}

/// Writes `training_<epoch>.json` files into one directory.
///
/// Each file is written under a temporary name and renamed into place, so a
/// crash never leaves a truncated checkpoint behind.
#[derive(Debug, Clone)]
pub struct JsonCheckpointDir {
    dir: PathBuf,
}

impl JsonCheckpointDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("training_{epoch}.json"))
    }

    /// Reads one checkpoint file, such as one written by
    /// [`CheckpointStore::save`].
    pub fn load(path: &Path) -> Result<Checkpoint, CheckpointError> {
        read_json(path)
    }
}

impl CheckpointStore for JsonCheckpointDir {
    fn save(&mut self, epoch: usize, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let path = self.path_for(epoch);
        let tmp_path = self.dir.join(format!(".training_{epoch}.json.tmp"));
        let io_error = |source| CheckpointError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_error)?;
        let file = File::create(&tmp_path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, checkpoint).map_err(|source| {
            CheckpointError::Json {
                path: path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_error)?;
        drop(writer);
        fs::rename(&tmp_path, &path).map_err(io_error)?;

        tracing::info!(path = %path.display(), agents = checkpoint.agents.len(), "checkpoint saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hanabi_evaluator::rule::{HintCriterion, Rule, SlotCriterion};

    use super::*;

    fn checkpoint() -> Checkpoint {
        Checkpoint {
            id: 12,
            agents: vec![
                Policy::new("id3", vec![Rule::play(SlotCriterion::All, 0.95)]),
                Policy::new(
                    "id11",
                    vec![
                        Rule::hint(HintCriterion::Playable),
                        Rule::discard(SlotCriterion::Oldest, 0.5),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(checkpoint()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 12,
                "agents": [
                    {"name": "id3", "rules": [{"rule_type": 1, "criterion": 6, "threshold": 0.95}]},
                    {"name": "id11", "rules": [
                        {"rule_type": 3, "criterion": 1},
                        {"rule_type": 2, "criterion": 3, "threshold": 0.5},
                    ]},
                ],
            })
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonCheckpointDir::new(dir.path().join("checkpoints"));
        store.save(20, &checkpoint()).unwrap();

        let path = store.path_for(20);
        assert_eq!(path.file_name().unwrap(), "training_20.json");
        assert_eq!(JsonCheckpointDir::load(&path).unwrap(), checkpoint());
        let leftovers = fs::read_dir(dir.path().join("checkpoints"))
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".tmp")
            })
            .count();
        assert_eq!(leftovers, 0);

        // Saving the same epoch again replaces the file.
        let mut updated = checkpoint();
        updated.id = 13;
        store.save(20, &updated).unwrap();
        assert_eq!(JsonCheckpointDir::load(&path).unwrap().id, 13);
    }

    #[test]
    fn test_load_rejects_malformed_rule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_0.json");
        fs::write(
            &path,
            r#"{"id": 1, "agents": [{"name": "id0", "rules": [{"rule_type": 7, "criterion": 1}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            JsonCheckpointDir::load(&path),
            Err(CheckpointError::Json { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            JsonCheckpointDir::load(&dir.path().join("nope.json")),
            Err(CheckpointError::Io { .. })
        ));
    }

    #[test]
    fn test_read_json_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"cohort_size": 2}"#).unwrap();
        let params: crate::EvolverParams = read_json(&path).unwrap();
        assert_eq!(params.cohort_size, 2);
        assert_eq!(params.batch_size, 4);
    }
}
