//! The dashboard controller: owns the current snapshot and runs every
//! fetch → merge → render cycle.
//!
//! Merge and render happen under one lock, so renders are applied in the
//! order their deltas were committed. Photo requests are tagged with a
//! monotonically increasing token; a response whose token no longer matches
//! the selection is dropped instead of overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::api::RoverApi;
use crate::delta::Delta;
use crate::error::{CoreError, CoreResult};
use crate::root::Root;
use crate::state::AppState;
use crate::store;

pub struct Dashboard<R, A> {
    root: R,
    api: A,
    state: Mutex<Arc<AppState>>,
    last_token: AtomicU64,
}

impl<R: Root, A: RoverApi> Dashboard<R, A> {
    pub fn new(root: R, api: A) -> Self {
        Self::with_state(root, api, AppState::initial())
    }

    pub fn with_state(root: R, api: A, state: AppState) -> Self {
        Self {
            root,
            api,
            state: Mutex::new(Arc::new(state)),
            last_token: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&*self.state.lock().await)
    }

    /// Page load: render the initial snapshot, then fetch and show the rover
    /// list. A failed fetch is rendered as an error message.
    pub async fn load(&self) -> CoreResult<Arc<AppState>> {
        {
            let current = self.state.lock().await;
            store::render(&self.root, &**current).await?;
        }
        self.fetch_rovers().await
    }

    /// Fetch the rover list again, clearing any previous error first.
    pub async fn reload(&self) -> CoreResult<Arc<AppState>> {
        self.apply(Delta::clear_error()).await?;
        self.fetch_rovers().await
    }

    async fn fetch_rovers(&self) -> CoreResult<Arc<AppState>> {
        info!("fetching rover list");
        match self.api.fetch_rover_list().await {
            Ok(list) => {
                info!(count = list.rovers.len(), "rover list loaded");
                self.apply(Delta::rovers(list.rovers)).await
            }
            Err(e) => {
                warn!(error = %e, "rover list unavailable");
                self.apply(Delta::error(format!("Could not load rovers: {}", e))).await
            }
        }
    }

    /// Select a loaded rover by name and load its latest photos.
    ///
    /// The photo request is the continuation of the loading render, so it
    /// only starts once that render has succeeded. The snapshot lock is
    /// released before the request goes out.
    pub async fn select_rover(&self, name: &str) -> CoreResult<Arc<AppState>> {
        let token = self.last_token.fetch_add(1, Ordering::Relaxed) + 1;
        let current = self.state.lock().await;
        let base = Arc::clone(&*current);
        let rover = base
            .rover(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownRover(name.to_string()))?;

        store::update_with(&self.root, &base, &Delta::select(rover, token), |next| async move {
            let mut current = current;
            let next = Arc::new(next);
            *current = Arc::clone(&next);
            drop(current);
            self.load_gallery(&next, token).await
        })
        .await?
    }

    async fn load_gallery(&self, selected: &AppState, token: u64) -> CoreResult<Arc<AppState>> {
        let Some(selection) = selected.selected_rover.as_ref() else {
            return Ok(self.snapshot().await);
        };
        let rover = &selection.rover;
        info!(rover = %rover.name, max_date = %rover.max_date, token, "fetching rover photos");

        let delta = match self.api.fetch_rover_photos(&rover.name, &rover.max_date).await {
            Ok(resp) => {
                info!(rover = %rover.name, count = resp.photos.len(), "photos loaded");
                Delta::photos_loaded(resp.photos)
            }
            Err(e) => {
                warn!(rover = %rover.name, error = %e, "photos unavailable");
                Delta::photos_failed(format!("Could not load photos for {}: {}", rover.name, e))
            }
        };

        let applied = self
            .commit(|current| Ok(current.is_current_request(token).then_some(delta)))
            .await?;
        match applied {
            Some(state) => Ok(state),
            None => {
                debug!(token, "discarding stale photo response");
                Ok(self.snapshot().await)
            }
        }
    }

    /// Route a UI action.
    pub async fn dispatch(&self, action: Action) -> CoreResult<Arc<AppState>> {
        debug!(action = action.name(), "dispatch");
        match action {
            Action::SelectRover { rover } => self.select_rover(&rover).await,
            Action::Reload => self.reload().await,
            Action::DismissError => self.apply(Delta::clear_error()).await,
        }
    }

    /// Merge `delta` into the current snapshot and render it.
    pub async fn apply(&self, delta: Delta) -> CoreResult<Arc<AppState>> {
        let applied = self.commit(|_| Ok(Some(delta))).await?;
        match applied {
            Some(state) => Ok(state),
            None => Ok(self.snapshot().await),
        }
    }

    /// Build a delta from the current snapshot and, if one is produced,
    /// merge and render it. The snapshot is only replaced after a
    /// successful render.
    async fn commit<F>(&self, build: F) -> CoreResult<Option<Arc<AppState>>>
    where
        F: FnOnce(&AppState) -> CoreResult<Option<Delta>> + Send,
    {
        let mut current = self.state.lock().await;
        let Some(delta) = build(&**current)? else {
            return Ok(None);
        };
        let next = Arc::new(store::update(&self.root, &**current, &delta).await?);
        *current = Arc::clone(&next);
        Ok(Some(next))
    }
}
