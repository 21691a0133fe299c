//! Mount point backed by connected browsers.
//!
//! Each render stores the markup and broadcasts it; `/sse` subscribers
//! replace their `#root` content with every message.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use mars_core::{RenderError, Root};
use tokio::sync::broadcast;

pub struct BroadcastRoot {
    markup: RwLock<String>,
    tx: broadcast::Sender<String>,
}

impl BroadcastRoot {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            markup: RwLock::new(String::new()),
            tx,
        }
    }

    /// Subscribe to future renders. The returned markup is the content
    /// current at subscription time, so no render falls between the two.
    pub fn subscribe(&self) -> (String, broadcast::Receiver<String>) {
        let markup = self.markup.read().unwrap_or_else(PoisonError::into_inner);
        (markup.clone(), self.tx.subscribe())
    }

    pub fn clients(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl Root for BroadcastRoot {
    async fn mount(&self, markup: String) -> Result<(), RenderError> {
        let mut current = self.markup.write().unwrap_or_else(PoisonError::into_inner);
        *current = markup.clone();
        // No subscribers is fine: the markup is kept for the next page load.
        let _ = self.tx.send(markup);
        Ok(())
    }
}
