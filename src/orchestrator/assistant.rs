use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::SessionError;
use crate::section::Section;
use crate::session::SessionStore;

struct SectionSlot<'a> {
    section: Box<dyn Section + 'a>,
    started: bool,
    data: Value,
}

impl<'a> SectionSlot<'a> {
    fn new(section: Box<dyn Section + 'a>) -> Self {
        let data = section.default_data();
        Self {
            section,
            started: false,
            data,
        }
    }

    /// Quit the section and keep whatever data it hands back.
    fn quit(&mut self) {
        debug!(section = self.section.name(), "Quitting section");
        if let Some(data) = self.section.quit() {
            self.data = data;
        }
    }
}

/// Snapshot of one section as seen by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionStatus {
    pub index: usize,
    pub name: String,
    pub started: bool,
    pub data: Value,
}

/// Starts and quits an ordered list of sections, persisting their data
/// between runs.
///
/// Sections are started in list order and stop at the first failure. Quit
/// and rollback walk the list in the same order. Sections may be owned by
/// the assistant or lent to it as `&mut S` for the lifetime `'a`.
pub struct Assistant<'a> {
    sections: Vec<SectionSlot<'a>>,
    store: SessionStore,
    auto_rollback: bool,
}

impl<'a> Assistant<'a> {
    pub fn new(
        sections: Vec<Box<dyn Section + 'a>>,
        session_file: Option<PathBuf>,
        auto_rollback: bool,
    ) -> Self {
        Self::with_store(sections, SessionStore::new(session_file), auto_rollback)
    }

    pub fn with_store(
        sections: Vec<Box<dyn Section + 'a>>,
        store: SessionStore,
        auto_rollback: bool,
    ) -> Self {
        Self {
            sections: sections.into_iter().map(SectionSlot::new).collect(),
            store,
            auto_rollback,
        }
    }

    /// Append a section after the existing ones.
    pub fn add_section(&mut self, section: impl Section + 'a) -> &mut Self {
        self.sections.push(SectionSlot::new(Box::new(section)));
        self
    }

    pub fn auto_rollback(&self) -> bool {
        self.auto_rollback
    }

    pub fn set_auto_rollback(&mut self, auto_rollback: bool) {
        self.auto_rollback = auto_rollback;
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session_file(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Data currently held for each section, in order.
    pub fn data(&self) -> Vec<Value> {
        self.sections.iter().map(|slot| slot.data.clone()).collect()
    }

    pub fn statuses(&self) -> Vec<SectionStatus> {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, slot)| SectionStatus {
                index,
                name: slot.section.name().to_string(),
                started: slot.started,
                data: slot.data.clone(),
            })
            .collect()
    }

    /// Start every section in order.
    ///
    /// Returns `Ok(false)` as soon as one section fails to start; with
    /// auto-rollback enabled the already started sections are quit first.
    /// Errors only come from reading or writing the session file.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        self.load_session()?;

        let mut failed = None;
        for (index, slot) in self.sections.iter_mut().enumerate() {
            debug!(section = slot.section.name(), index, "Starting section");
            let ok = slot.section.start(&slot.data);
            slot.started = true;
            if !ok {
                failed = Some(index);
                break;
            }
        }

        let Some(index) = failed else {
            info!(sections = self.sections.len(), "All sections started");
            return Ok(true);
        };

        warn!(
            section = self.sections[index].section.name(),
            index, "Section failed to start"
        );
        if self.auto_rollback {
            self.rollback()?;
        }
        Ok(false)
    }

    /// Quit every section in order, then save the session.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        for slot in &mut self.sections {
            slot.quit();
        }
        info!(sections = self.sections.len(), "All sections quit");
        self.store_session()
    }

    /// Quit only the sections that were started, then save the session.
    pub fn rollback(&mut self) -> Result<(), SessionError> {
        let mut rolled_back = 0;
        for slot in self.sections.iter_mut().filter(|slot| slot.started) {
            slot.quit();
            rolled_back += 1;
        }
        info!(rolled_back, "Rolled back started sections");
        self.store_session()
    }

    /// Overlay saved data onto the sections. Extra saved entries are ignored
    /// and sections past the end of the record keep their current data.
    fn load_session(&mut self) -> Result<(), SessionError> {
        let Some(saved) = self.store.load()? else {
            return Ok(());
        };

        if saved.len() != self.sections.len() {
            warn!(
                saved = saved.len(),
                sections = self.sections.len(),
                "Session length differs from section count, applying overlapping entries"
            );
        }

        for (slot, data) in self.sections.iter_mut().zip(saved) {
            slot.data = data;
        }
        Ok(())
    }

    fn store_session(&self) -> Result<(), SessionError> {
        self.store.save(&self.data())
    }
}
