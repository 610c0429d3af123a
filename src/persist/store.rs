use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;

use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::document::Document;
use crate::style::normalize::normalize;

/// Key of the single durable record.
pub const STORAGE_NAMESPACE: &str = "socialflow_state_v5";

/// Durable key-value slot holding the serialized document.
pub trait StateStore {
    /// Raw stored text, `None` when nothing has been saved.
    fn load_raw(&self) -> SocialflowResult<Option<String>>;
    fn save_raw(&self, raw: &str) -> SocialflowResult<()>;
    fn clear(&self) -> SocialflowResult<()>;

    fn save(&self, doc: &Document) -> SocialflowResult<()> {
        self.save_raw(&doc.to_json_string()?)
    }
}

/// Load the stored document. Absent, unreadable, or corrupt state yields the
/// built-in default; failures are logged and never surfaced.
///
/// The stored config is normalized before validation, so a record that only breaks a
/// coupling rule is repaired instead of discarded.
pub fn load_or_default(store: &dyn StateStore) -> Document {
    match store.load_raw() {
        Ok(None) => Document::default(),
        Ok(Some(raw)) => match parse_stored(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(error = %err, "stored state is corrupt; using defaults");
                Document::default()
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "stored state is unreadable; using defaults");
            Document::default()
        }
    }
}

fn parse_stored(raw: &str) -> SocialflowResult<Document> {
    let mut doc: Document = serde_json::from_str(raw)?;
    doc.config = normalize(&doc.config);
    doc.validate()?;
    Ok(doc)
}

/// JSON file `<dir>/<namespace>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_NAMESPACE}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn load_raw(&self) -> SocialflowResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SocialflowError::persistence(format!(
                "read '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn save_raw(&self, raw: &str) -> SocialflowResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create state dir '{}'", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .with_context(|| format!("write state file '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace state file '{}'", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> SocialflowResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SocialflowError::persistence(format!(
                "remove '{}': {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-process store; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn load_raw(&self) -> SocialflowResult<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn save_raw(&self, raw: &str) -> SocialflowResult<()> {
        *self.slot.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> SocialflowResult<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
