//! Application state snapshots.
//!
//! A snapshot is never edited in place: every change goes through
//! [`AppState::merge`](crate::delta) and yields a new value. Sequences are held
//! in `Arc<[T]>` so untouched subtrees are shared between snapshots.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Name shown in the greeting of a fresh dashboard.
pub const DEFAULT_USER: &str = "Student";

pub const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
}

/// A rover record as served by the API. Extra wire fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rover {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub launch_date: String,
    #[serde(default)]
    pub landing_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub max_date: String,
}

impl Rover {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub img_src: String,
    #[serde(default)]
    pub earth_date: String,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub rover: Rover,
}

/// The rover the user picked, plus the progress of its photo request.
///
/// `token` identifies the request that produced this selection; photo
/// responses carrying another token are stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(flatten)]
    pub rover: Rover,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    #[serde(default = "empty_photos")]
    pub photos: Arc<[Photo]>,
}

impl Gallery {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos: photos.into() }
    }
}

fn empty_photos() -> Arc<[Photo]> {
    Arc::from(Vec::new())
}

/// One immutable snapshot of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub user: User,

    /// `None` until the rover list has been fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rovers: Option<Arc<[Rover]>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "absent_or_false")]
    pub selected_rover: Option<Selection>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "absent_or_false")]
    pub selected_rover_gal: Option<Gallery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppState {
    /// The snapshot a dashboard starts from: a named user and nothing loaded.
    pub fn initial() -> Self {
        Self {
            user: User { name: DEFAULT_USER.to_string() },
            rovers: None,
            selected_rover: None,
            selected_rover_gal: None,
            error: None,
        }
    }

    /// Look up a loaded rover by name.
    pub fn rover(&self, name: &str) -> Option<&Rover> {
        self.rovers.as_deref()?.iter().find(|r| r.name == name)
    }

    /// Whether `name` is the selected rover and its photos are still loading.
    pub fn is_loading(&self, name: &str) -> bool {
        self.selected_rover
            .as_ref()
            .is_some_and(|s| s.loading && s.rover.name == name)
    }

    /// Whether the current selection was produced by request `token`.
    pub fn is_current_request(&self, token: u64) -> bool {
        self.selected_rover.as_ref().is_some_and(|s| s.token == token)
    }

    /// The selected rover when the current error comes from its photo
    /// request: the selection has settled without a gallery.
    pub fn failed_selection(&self) -> Option<&Rover> {
        self.error.as_ref()?;
        self.selected_rover
            .as_ref()
            .filter(|s| !s.loading && self.selected_rover_gal.is_none())
            .map(|s| &s.rover)
    }

    pub fn photos(&self) -> &[Photo] {
        match &self.selected_rover_gal {
            Some(g) => &g.photos,
            None => &[],
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Accept a nested object, `null`, or the legacy `false` sentinel. `false`
/// and `null` both mean "no value".
fn absent_or_false<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slot<T> {
        Flag(bool),
        Value(T),
    }

    match Option::<Slot<T>>::deserialize(deserializer)? {
        None | Some(Slot::Flag(false)) => Ok(None),
        Some(Slot::Flag(true)) => Err(de::Error::custom("expected an object, null or false")),
        Some(Slot::Value(v)) => Ok(Some(v)),
    }
}
