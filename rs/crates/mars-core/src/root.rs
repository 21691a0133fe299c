//! The mount point the dashboard renders into.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::error::RenderError;

/// A container whose whole content is replaced on every render.
#[async_trait]
pub trait Root: Send + Sync {
    async fn mount(&self, markup: String) -> Result<(), RenderError>;
}

/// Keeps the latest markup in memory. Used for server-side first paint and
/// in tests.
#[derive(Debug, Default)]
pub struct MemoryRoot {
    inner: Mutex<Mounted>,
}

#[derive(Debug, Default)]
struct Mounted {
    markup: String,
    mounts: usize,
}

impl MemoryRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup from the most recent mount (empty before the first one).
    pub fn markup(&self) -> String {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).markup.clone()
    }

    /// How many times content has been mounted.
    pub fn mounts(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).mounts
    }
}

#[async_trait]
impl Root for MemoryRoot {
    async fn mount(&self, markup: String) -> Result<(), RenderError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.markup = markup;
        inner.mounts += 1;
        Ok(())
    }
}
