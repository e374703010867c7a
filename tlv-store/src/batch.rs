//! Record batch files: the three tiers serialized as one JSON document

use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tlv_core::{TierKind, TimeRecord};
use tracing::debug;

/// Records for all three tiers, as supplied by the host after a fetch.
///
/// Each tier should be sorted most recent first; the model re-sorts
/// batches that are not. Records are validated while deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "P: Serialize", deserialize = "P: DeserializeOwned"))]
pub struct RecordBatch<P> {
    #[serde(default = "Vec::new")]
    pub major1: Vec<TimeRecord<P>>,
    #[serde(default = "Vec::new")]
    pub major2: Vec<TimeRecord<P>>,
    #[serde(default = "Vec::new")]
    pub background: Vec<TimeRecord<P>>,
}

impl<P> Default for RecordBatch<P> {
    fn default() -> Self {
        Self {
            major1: Vec::new(),
            major2: Vec::new(),
            background: Vec::new(),
        }
    }
}

impl<P> RecordBatch<P> {
    /// Records of one tier
    pub fn tier(&self, kind: TierKind) -> &[TimeRecord<P>] {
        match kind {
            TierKind::Background => &self.background,
            TierKind::Major1 => &self.major1,
            TierKind::Major2 => &self.major2,
        }
    }

    /// Splits the batch into `(major1, major2, background)`, the argument
    /// order of `TimelineModel::load_initial`
    pub fn into_tiers(self) -> (Vec<TimeRecord<P>>, Vec<TimeRecord<P>>, Vec<TimeRecord<P>>) {
        (self.major1, self.major2, self.background)
    }

    pub fn len(&self) -> usize {
        self.major1.len() + self.major2.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: DeserializeOwned> RecordBatch<P> {
    /// Reads a batch from a reader
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let batch: Self = serde_json::from_reader(reader)?;
        debug!(
            major1 = batch.major1.len(),
            major2 = batch.major2.len(),
            background = batch.background.len(),
            "record batch read"
        );
        Ok(batch)
    }

    /// Reads a batch from a JSON file
    pub fn open(path: &Path) -> Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }
}

impl<P: Serialize> RecordBatch<P> {
    /// Writes the batch to a writer
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Writes the batch to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
