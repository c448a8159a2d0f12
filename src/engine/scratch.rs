//! Temporary simulator input files for engines that read from disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use super::Scenario;
use crate::Result;

const ROADNET_FILE: &str = "roadnet.json";
const FLOW_FILE: &str = "flow.json";
const CONFIG_FILE: &str = "config.json";

/// The engine configuration file pointing at the roadnet and flow files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// The duration of a step in s.
    pub interval: f64,
    pub seed: u64,
    /// The directory other paths are relative to; must end with a separator.
    pub dir: String,
    pub roadnet_file: String,
    pub flow_file: String,
    /// Whether signals are controlled externally instead of by their phase plans.
    pub rl_traffic_light: bool,
    pub save_replay: bool,
    pub roadnet_log_file: String,
    pub replay_log_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            seed: 0,
            dir: String::new(),
            roadnet_file: ROADNET_FILE.into(),
            flow_file: FLOW_FILE.into(),
            rl_traffic_light: false,
            save_replay: false,
            roadnet_log_file: "roadnet_log.json".into(),
            replay_log_file: "replay.txt".into(),
        }
    }
}

/// A uniquely named directory holding the files for one simulation run.
///
/// The directory and everything in it are deleted when this is dropped,
/// including when a run fails part way.
#[derive(Debug)]
pub struct ScratchFiles {
    dir: TempDir,
    config: EngineConfig,
}

impl ScratchFiles {
    /// Writes the scenario and an engine configuration to a new temporary directory.
    ///
    /// The `dir`, `roadnet_file` and `flow_file` fields of `config` are
    /// replaced to point into the directory.
    pub fn write(scenario: &Scenario, config: &EngineConfig) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("roadnet-synth-").tempdir()?;
        let mut config = config.clone();
        config.dir = format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR);
        config.roadnet_file = ROADNET_FILE.into();
        config.flow_file = FLOW_FILE.into();

        write_json(&dir.path().join(ROADNET_FILE), &scenario.roadnet)?;
        write_json(&dir.path().join(FLOW_FILE), &scenario.flows)?;
        write_json(&dir.path().join(CONFIG_FILE), &config)?;

        log::debug!("Wrote simulator inputs to {}", dir.path().display());
        Ok(Self { dir, config })
    }

    /// The directory containing the files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// The path of the engine configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE)
    }

    pub fn roadnet_path(&self) -> PathBuf {
        self.dir.path().join(ROADNET_FILE)
    }

    pub fn flow_path(&self) -> PathBuf {
        self.dir.path().join(FLOW_FILE)
    }

    /// The configuration as written.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
