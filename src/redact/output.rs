//! Output materialization.
//!
//! Redaction either edits the input file in place or first copies it byte
//! for byte to a separate output. The choice is made once, from whether the
//! two paths name the same file, and carried as an [`OutputPlan`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IoError;
use crate::io::{AccessMode, ByteStore};

/// Where redacted bytes are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPlan {
    /// Output and input are the same file
    InPlace,
    /// Output is a distinct file, created as a copy of the input
    Separate(PathBuf),
}

impl OutputPlan {
    /// Decide between in-place and copy-then-edit.
    ///
    /// The paths name the same file when the output exists and refers to
    /// the same file as the input (same device and inode on Unix, same file
    /// index on Windows). Symlinks, `..` and hard links all resolve
    /// `InPlace`, so a separate output never truncates the input.
    pub fn resolve(input: &Path, output: &Path) -> Result<Self, IoError> {
        if !output.exists() {
            return Ok(OutputPlan::Separate(output.to_path_buf()));
        }

        let same = same_file::is_same_file(input, output).map_err(|e| IoError::Open {
            path: input.display().to_string(),
            message: e.to_string(),
        })?;

        let plan = if same {
            OutputPlan::InPlace
        } else {
            OutputPlan::Separate(output.to_path_buf())
        };

        debug!(input = %input.display(), output = %output.display(), ?plan, "Resolved output");
        Ok(plan)
    }

    /// How the input must be mapped for this plan.
    pub fn input_mode(&self) -> AccessMode {
        match self {
            OutputPlan::InPlace => AccessMode::ReadWrite,
            OutputPlan::Separate(_) => AccessMode::ReadOnly,
        }
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, OutputPlan::InPlace)
    }

    /// Turn the opened input into the stores the engine works on.
    ///
    /// For a separate output this creates the file with the input's length
    /// and copies every input byte before anything is modified.
    pub fn materialize(self, source: ByteStore) -> Result<StorePair, IoError> {
        match self {
            OutputPlan::InPlace => Ok(StorePair::Aliased(source)),
            OutputPlan::Separate(path) => {
                let mut target = ByteStore::create(&path, source.len())?;
                target.copy_from(&source)?;
                Ok(StorePair::Distinct { source, target })
            }
        }
    }
}

// =============================================================================
// StorePair
// =============================================================================

/// The input and output stores of one redaction run.
#[derive(Debug)]
pub enum StorePair {
    /// One writable store serves as both input and output
    Aliased(ByteStore),
    /// Independent input and output stores
    Distinct {
        source: ByteStore,
        target: ByteStore,
    },
}

impl StorePair {
    /// Store that tag values are resolved from.
    pub fn source(&self) -> &ByteStore {
        match self {
            StorePair::Aliased(store) => store,
            StorePair::Distinct { source, .. } => source,
        }
    }

    pub fn target(&self) -> &ByteStore {
        match self {
            StorePair::Aliased(store) => store,
            StorePair::Distinct { target, .. } => target,
        }
    }

    /// Store that strips and tags are written to.
    pub fn target_mut(&mut self) -> &mut ByteStore {
        match self {
            StorePair::Aliased(store) => store,
            StorePair::Distinct { target, .. } => target,
        }
    }

    pub fn is_aliased(&self) -> bool {
        matches!(self, StorePair::Aliased(_))
    }

    pub fn flush(&self) -> Result<(), IoError> {
        self.target().flush()
    }
}
