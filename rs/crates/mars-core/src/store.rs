//! The update loop: merge a delta, re-render, then continue.

use std::future::Future;

use tracing::debug;

use crate::delta::Delta;
use crate::error::RenderError;
use crate::root::Root;
use crate::state::AppState;
use crate::view::render_markup;

/// Replace the root's content with markup derived from `state`.
pub async fn render<R: Root + ?Sized>(root: &R, state: &AppState) -> Result<(), RenderError> {
    let markup = render_markup(state);
    debug!(bytes = markup.len(), "render");
    root.mount(markup).await
}

/// Merge `delta` into `current`, render the result and return it.
///
/// `current` is not modified. If rendering fails the new snapshot is dropped
/// and the error returned.
pub async fn update<R: Root + ?Sized>(
    root: &R,
    current: &AppState,
    delta: &Delta,
) -> Result<AppState, RenderError> {
    let next = current.merge(delta);
    render(root, &next).await?;
    Ok(next)
}

/// Like [`update`], then hand the new snapshot to `continuation` once the
/// render has finished.
pub async fn update_with<R, F, Fut, T>(
    root: &R,
    current: &AppState,
    delta: &Delta,
    continuation: F,
) -> Result<T, RenderError>
where
    R: Root + ?Sized,
    F: FnOnce(AppState) -> Fut,
    Fut: Future<Output = T>,
{
    let next = update(root, current, delta).await?;
    Ok(continuation(next).await)
}
