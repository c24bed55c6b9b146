//! The section capability consumed by the [`Assistant`](crate::orchestrator::Assistant).
//!
//! A section is any subsystem that can be started with some data and shut
//! down again, optionally handing back new data to persist. Two flavours:
//! - [`Section`]: works on untyped `serde_json::Value` data
//! - [`TypedSection`]: works on its own serde type, adapted through [`Typed`]

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// A startable/stoppable unit of an application.
pub trait Section {
    /// Display name used in logs and status output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Data used when no session has been saved yet.
    fn default_data(&self) -> Value {
        Value::Null
    }

    /// Bring the subsystem up. Returns `false` on an expected failure.
    fn start(&mut self, data: &Value) -> bool;

    /// Shut the subsystem down. `Some` replaces the data held for this
    /// section; `None` keeps it.
    ///
    /// Must be safe to call after a failed `start`.
    fn quit(&mut self) -> Option<Value> {
        None
    }
}

impl<S: Section + ?Sized> Section for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn default_data(&self) -> Value {
        (**self).default_data()
    }

    fn start(&mut self, data: &Value) -> bool {
        (**self).start(data)
    }

    fn quit(&mut self) -> Option<Value> {
        (**self).quit()
    }
}

impl<S: Section + ?Sized> Section for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn default_data(&self) -> Value {
        (**self).default_data()
    }

    fn start(&mut self, data: &Value) -> bool {
        (**self).start(data)
    }

    fn quit(&mut self) -> Option<Value> {
        (**self).quit()
    }
}

/// A section with a concrete data type.
pub trait TypedSection {
    type Data: Serialize + DeserializeOwned;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn default_data(&self) -> Self::Data;

    fn start(&mut self, data: Self::Data) -> bool;

    fn quit(&mut self) -> Option<Self::Data> {
        None
    }
}

/// Adapts a [`TypedSection`] to the untyped [`Section`] interface.
///
/// Session data that does not decode into `S::Data` is replaced by the
/// section's default data. The default is then handed back from `quit` when
/// the section itself returns nothing, so the stale value is not saved again.
#[derive(Debug, Clone, Default)]
pub struct Typed<S> {
    section: S,
    replaced: Option<Value>,
}

impl<S> Typed<S> {
    pub fn new(section: S) -> Self {
        Self {
            section,
            replaced: None,
        }
    }

    pub fn inner(&self) -> &S {
        &self.section
    }

    pub fn into_inner(self) -> S {
        self.section
    }
}

impl<S: TypedSection> Section for Typed<S> {
    fn name(&self) -> &str {
        self.section.name()
    }

    fn default_data(&self) -> Value {
        serde_json::to_value(self.section.default_data()).unwrap_or_else(|e| {
            warn!(section = self.section.name(), error = %e, "Default data is not serializable, using null");
            Value::Null
        })
    }

    fn start(&mut self, data: &Value) -> bool {
        self.replaced = None;
        match serde_json::from_value::<S::Data>(data.clone()) {
            Ok(decoded) => self.section.start(decoded),
            Err(e) => {
                warn!(
                    section = self.section.name(),
                    error = %e,
                    "Session data does not match section data type, starting with defaults"
                );
                let default = <Self as Section>::default_data(self);
                if !default.is_null() {
                    self.replaced = Some(default);
                }
                let data = self.section.default_data();
                self.section.start(data)
            }
        }
    }

    fn quit(&mut self) -> Option<Value> {
        let replaced = self.replaced.take();
        let Some(data) = self.section.quit() else {
            return replaced;
        };
        match serde_json::to_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(section = self.section.name(), error = %e, "Quit data is not serializable, keeping previous data");
                replaced
            }
        }
    }
}
