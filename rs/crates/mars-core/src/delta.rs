//! Deltas: typed partial updates, and the merge that applies them.
//!
//! Every field of [`AppState`] has its own slot in [`Delta`]. Leaf slots are
//! overwritten or cleared; the nested `user` and `selected_rover` slots merge
//! key by key, so a delta that only says `loading: false` keeps the selected
//! rover's name and dates.

use std::sync::Arc;

use crate::state::{AppState, Gallery, Photo, Rover, Selection, User};

/// What a delta does to one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Slot not mentioned: keep the current value.
    #[default]
    Keep,
    /// Slot explicitly set to "absent".
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Later patch wins unless it leaves the slot alone.
    fn then(self, later: Patch<T>) -> Patch<T> {
        match later {
            Patch::Keep => self,
            other => other,
        }
    }
}

impl<T: Clone> Patch<T> {
    fn resolve(&self, current: &Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current.clone(),
            Patch::Clear => None,
            Patch::Set(v) => Some(v.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
}

impl UserPatch {
    fn apply(&self, current: &User) -> User {
        User {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
        }
    }

    fn then(self, later: UserPatch) -> UserPatch {
        UserPatch { name: later.name.or(self.name) }
    }
}

/// Partial update of the selection. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPatch {
    pub rover: Option<Rover>,
    pub loading: Option<bool>,
    pub token: Option<u64>,
}

impl SelectionPatch {
    /// Merge into the current selection. Without a rover there is nothing to
    /// attach `loading`/`token` to, so an absent selection stays absent.
    fn apply(&self, current: Option<&Selection>) -> Option<Selection> {
        let rover = match (&self.rover, current) {
            (Some(r), _) => r.clone(),
            (None, Some(sel)) => sel.rover.clone(),
            (None, None) => return None,
        };
        Some(Selection {
            rover,
            loading: self
                .loading
                .unwrap_or_else(|| current.is_some_and(|s| s.loading)),
            token: self
                .token
                .unwrap_or_else(|| current.map_or(0, |s| s.token)),
        })
    }

    fn then(self, later: SelectionPatch) -> SelectionPatch {
        SelectionPatch {
            rover: later.rover.or(self.rover),
            loading: later.loading.or(self.loading),
            token: later.token.or(self.token),
        }
    }

    /// The patch that yields the same selection as `self.apply(None)`
    /// regardless of what it is merged into.
    fn into_replacement(self) -> Patch<SelectionPatch> {
        match self.rover {
            Some(rover) => Patch::Set(SelectionPatch {
                rover: Some(rover),
                loading: Some(self.loading.unwrap_or(false)),
                token: Some(self.token.unwrap_or(0)),
            }),
            None => Patch::Clear,
        }
    }
}

/// A partial state update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub user: Option<UserPatch>,
    pub rovers: Patch<Arc<[Rover]>>,
    pub selected_rover: Patch<SelectionPatch>,
    pub selected_rover_gal: Patch<Gallery>,
    pub error: Patch<String>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.rovers.is_keep()
            && self.selected_rover.is_keep()
            && self.selected_rover_gal.is_keep()
            && self.error.is_keep()
    }

    pub fn user_name(name: &str) -> Self {
        Self {
            user: Some(UserPatch { name: Some(name.to_string()) }),
            ..Self::default()
        }
    }

    /// The rover list has arrived.
    pub fn rovers(rovers: Vec<Rover>) -> Self {
        Self {
            rovers: Patch::Set(rovers.into()),
            ..Self::default()
        }
    }

    /// A rover was picked: drop the old gallery and any error left by the
    /// previous selection, and mark the new one as loading under `token`.
    pub fn select(rover: Rover, token: u64) -> Self {
        Self {
            selected_rover: Patch::Set(SelectionPatch {
                rover: Some(rover),
                loading: Some(true),
                token: Some(token),
            }),
            selected_rover_gal: Patch::Clear,
            error: Patch::Clear,
            ..Self::default()
        }
    }

    /// Photos for the current selection have arrived.
    pub fn photos_loaded(photos: Vec<Photo>) -> Self {
        Self {
            selected_rover: Patch::Set(SelectionPatch {
                loading: Some(false),
                ..SelectionPatch::default()
            }),
            selected_rover_gal: Patch::Set(Gallery::new(photos)),
            ..Self::default()
        }
    }

    /// The photo request for the current selection failed.
    pub fn photos_failed(message: String) -> Self {
        Self {
            selected_rover: Patch::Set(SelectionPatch {
                loading: Some(false),
                ..SelectionPatch::default()
            }),
            error: Patch::Set(message),
            ..Self::default()
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            error: Patch::Set(message),
            ..Self::default()
        }
    }

    pub fn clear_error() -> Self {
        Self {
            error: Patch::Clear,
            ..Self::default()
        }
    }

    /// Compose two deltas: merging `self.then(later)` matches merging `self`
    /// and then `later`.
    ///
    /// One case is not exact: a selection patch without a rover is dropped
    /// when it lands on an absent selection, which a composed patch cannot
    /// know in advance.
    pub fn then(self, later: Delta) -> Delta {
        let user = match (self.user, later.user) {
            (Some(a), Some(b)) => Some(a.then(b)),
            (a, b) => b.or(a),
        };
        let selected_rover = match (self.selected_rover, later.selected_rover) {
            (a, Patch::Keep) => a,
            (_, Patch::Clear) => Patch::Clear,
            (Patch::Keep, Patch::Set(b)) => Patch::Set(b),
            (Patch::Clear, Patch::Set(b)) => b.into_replacement(),
            (Patch::Set(a), Patch::Set(b)) => Patch::Set(a.then(b)),
        };
        Delta {
            user,
            rovers: self.rovers.then(later.rovers),
            selected_rover,
            selected_rover_gal: self.selected_rover_gal.then(later.selected_rover_gal),
            error: self.error.then(later.error),
        }
    }
}

impl AppState {
    /// Produce the next snapshot. `self` is left untouched and fields the
    /// delta does not mention are shared with it.
    pub fn merge(&self, delta: &Delta) -> AppState {
        let selected_rover = match &delta.selected_rover {
            Patch::Keep => self.selected_rover.clone(),
            Patch::Clear => None,
            Patch::Set(p) => p.apply(self.selected_rover.as_ref()),
        };
        AppState {
            user: match &delta.user {
                Some(p) => p.apply(&self.user),
                None => self.user.clone(),
            },
            rovers: delta.rovers.resolve(&self.rovers),
            selected_rover,
            selected_rover_gal: delta.selected_rover_gal.resolve(&self.selected_rover_gal),
            error: delta.error.resolve(&self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rover(name: &str, status: &str) -> Rover {
        Rover {
            name: name.into(),
            launch_date: "2011-11-26".into(),
            landing_date: "2012-08-06".into(),
            status: status.into(),
            max_date: "2024-02-19".into(),
        }
    }

    fn photo(src: &str) -> Photo {
        Photo {
            img_src: src.into(),
            earth_date: "2024-02-19".into(),
            rover: rover("Curiosity", "active"),
            ..Photo::default()
        }
    }

    fn loaded_state() -> AppState {
        AppState::initial().merge(&Delta::rovers(vec![
            rover("Curiosity", "active"),
            rover("Spirit", "complete"),
        ]))
    }

    #[test]
    fn merge_does_not_touch_the_input_snapshot() {
        let before = AppState::initial();
        let copy = before.clone();
        let after = before.merge(&Delta::rovers(vec![rover("Curiosity", "active")]));
        assert_eq!(before, copy);
        assert!(before.rovers.is_none());
        assert_eq!(after.rovers.as_deref().map(|r| r.len()), Some(1));
    }

    #[test]
    fn untouched_subtrees_are_shared() {
        let state = loaded_state();
        let next = state.merge(&Delta::user_name("Ada"));
        let (a, b) = (state.rovers.as_ref().unwrap(), next.rovers.as_ref().unwrap());
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(next.user.name, "Ada");
    }

    #[test]
    fn empty_delta_is_identity() {
        let state = loaded_state();
        assert!(Delta::new().is_empty());
        assert_eq!(state.merge(&Delta::new()), state);
    }

    #[test]
    fn selection_merges_key_by_key() {
        let curiosity = rover("Curiosity", "active");
        let state = loaded_state().merge(&Delta::select(curiosity.clone(), 3));
        assert!(state.is_loading("Curiosity"));
        assert!(state.selected_rover_gal.is_none());

        let state = state.merge(&Delta::photos_loaded(vec![photo("a.jpg")]));
        let sel = state.selected_rover.as_ref().unwrap();
        assert_eq!(sel.rover, curiosity);
        assert!(!sel.loading);
        assert_eq!(sel.token, 3);
        assert_eq!(state.photos().len(), 1);
    }

    #[test]
    fn selection_patch_without_rover_does_not_create_a_selection() {
        let state = loaded_state().merge(&Delta::photos_loaded(vec![]));
        assert!(state.selected_rover.is_none());
        assert_eq!(state.photos().len(), 0);
        assert!(state.selected_rover_gal.is_some());
    }

    #[test]
    fn selecting_clears_previous_gallery() {
        let state = loaded_state()
            .merge(&Delta::select(rover("Curiosity", "active"), 1))
            .merge(&Delta::photos_loaded(vec![photo("a.jpg")]))
            .merge(&Delta::select(rover("Spirit", "complete"), 2));
        assert!(state.selected_rover_gal.is_none());
        assert!(state.is_loading("Spirit"));
        assert!(state.is_current_request(2));
        assert!(!state.is_current_request(1));
    }

    #[test]
    fn disjoint_deltas_compose_like_sequential_merges() {
        let state = AppState::initial();
        let a = Delta::rovers(vec![rover("Curiosity", "active")]);
        let b = Delta::user_name("Ada").then(Delta::error("boom".into()));

        let sequential = state.merge(&a).merge(&b);
        let composed = state.merge(&a.clone().then(b.clone()));
        assert_eq!(sequential, composed);

        let reversed = state.merge(&b).merge(&a);
        assert_eq!(sequential, reversed);
    }

    #[test]
    fn overlapping_deltas_compose_with_later_winning() {
        let state = loaded_state();
        let a = Delta::select(rover("Curiosity", "active"), 1);
        let b = Delta::photos_loaded(vec![photo("a.jpg")]).then(Delta::clear_error());
        assert_eq!(state.merge(&a).merge(&b), state.merge(&a.clone().then(b)));

        let c = Delta::select(rover("Spirit", "complete"), 2);
        let clear_then_set = Delta {
            selected_rover: Patch::Clear,
            ..Delta::new()
        };
        let seeded = state.merge(&a);
        assert_eq!(
            seeded.merge(&clear_then_set).merge(&c),
            seeded.merge(&clear_then_set.then(c)),
        );
    }

    #[test]
    fn overwriting_delta_is_idempotent() {
        let state = loaded_state();
        let delta = Delta::select(rover("Spirit", "complete"), 9)
            .then(Delta::rovers(vec![rover("Opportunity", "complete")]))
            .then(Delta::error("offline".into()));
        let once = state.merge(&delta);
        let twice = once.merge(&delta);
        assert_eq!(once, twice);
    }

    #[test]
    fn clear_error_removes_message() {
        let state = loaded_state().merge(&Delta::error("offline".into()));
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert!(state.merge(&Delta::clear_error()).error.is_none());
    }
}
