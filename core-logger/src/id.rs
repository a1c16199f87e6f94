use std::sync::RwLock;

/// Identifier attached to every remote log line.
#[derive(Debug, Default)]
pub struct LoggerId {
    id: RwLock<Option<String>>,
}

impl LoggerId {
    /// Header carrying the identifier.
    pub const HEADER_KEY: &'static str = "uoh-logger-id";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: impl Into<String>) {
        if let Ok(mut slot) = self.id.write() {
            *slot = Some(id.into());
        }
    }

    /// The current identifier; an empty one counts as unset.
    pub fn get(&self) -> Option<String> {
        self.id
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .filter(|id| !id.is_empty())
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.id.write() {
            *slot = None;
        }
    }
}
