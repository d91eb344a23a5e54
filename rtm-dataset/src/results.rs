use crate::{Dataset, DatasetError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A dataset together with the file it was loaded from or last saved to.
#[derive(Debug, Clone)]
pub struct Results {
    pub dataset: Arc<Dataset>,
    pub file: Option<PathBuf>,
}

impl Results {
    pub fn unsaved(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            file: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let dataset = Dataset::load_from_file(path)?;
        Ok(Self {
            dataset: Arc::new(dataset),
            file: Some(path.to_path_buf()),
        })
    }

    pub fn is_saved(&self) -> bool {
        self.file.is_some()
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let path = path.as_ref();
        self.dataset.save_to_file(path)?;
        log::info!("saved results to {}", path.display());
        self.file = Some(path.to_path_buf());
        Ok(())
    }

    /// Identity comparison: two handles refer to the same in-memory dataset.
    pub fn same_dataset(&self, other: &Results) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset)
    }
}
