use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::extraction::domain::sampling_policy::frame_index_of;
use crate::shared::error::BoxError;

/// Index of the batch files in a directory and the frames each one holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub batch_size: usize,
    /// `(width, height)` of every frame in every batch.
    pub output_size: (u32, u32),
    pub channels: usize,
    pub batches: Vec<BatchEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    /// File name relative to the manifest's directory.
    pub file: String,
    pub frames: Vec<PathBuf>,
    /// Source frame index per row, when the file name carries one.
    pub frame_indices: Vec<Option<usize>>,
}

impl BatchManifest {
    pub fn new(batch_size: usize, output_size: (u32, u32), channels: usize) -> Self {
        Self {
            batch_size,
            output_size,
            channels,
            batches: Vec::new(),
        }
    }

    pub fn record(&mut self, index: usize, batch_file: &Path, frames: &[PathBuf]) {
        let file = batch_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.batches.push(BatchEntry {
            index,
            file,
            frames: frames.to_vec(),
            frame_indices: frames.iter().map(|p| frame_index_of(p)).collect(),
        });
    }

    pub fn total_frames(&self) -> usize {
        self.batches.iter().map(|b| b.frames.len()).sum()
    }

    pub fn save(&self, path: &Path) -> Result<(), BoxError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, BoxError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(indices: &[usize]) -> Vec<PathBuf> {
        indices
            .iter()
            .map(|i| PathBuf::from(format!("frames/frame_{i}.jpg")))
            .collect()
    }

    #[test]
    fn test_record_keeps_order_and_indices() {
        let mut manifest = BatchManifest::new(2, (224, 224), 3);
        manifest.record(0, Path::new("out/batch_0.npy"), &frames(&[0, 30]));
        manifest.record(1, Path::new("out/batch_1.npy"), &frames(&[60]));

        assert_eq!(manifest.batches.len(), 2);
        assert_eq!(manifest.batches[0].file, "batch_0.npy");
        assert_eq!(manifest.batches[0].frame_indices, vec![Some(0), Some(30)]);
        assert_eq!(manifest.batches[1].frame_indices, vec![Some(60)]);
        assert_eq!(manifest.total_frames(), 3);
    }

    #[test]
    fn test_foreign_frame_names_have_no_index() {
        let mut manifest = BatchManifest::new(4, (8, 8), 3);
        manifest.record(0, Path::new("batch_0.npy"), &[PathBuf::from("a.png")]);
        assert_eq!(manifest.batches[0].frame_indices, vec![None]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let mut manifest = BatchManifest::new(4, (224, 112), 3);
        manifest.record(0, Path::new("batch_0.npy"), &frames(&[0, 30, 60, 90]));
        manifest.save(&path).unwrap();

        let loaded = BatchManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = BatchManifest::new(4, (8, 8), 3);
        assert!(manifest
            .save(&dir.path().join("missing").join("manifest.json"))
            .is_err());
    }
}
