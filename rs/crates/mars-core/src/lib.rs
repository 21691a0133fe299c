//! mars-core — state, merge, views and the update loop of the Mars dashboard
//!
//! A [`Dashboard`] holds one [`AppState`] snapshot at a time. Every change is a
//! [`Delta`] merged into the current snapshot, after which the whole view is
//! re-rendered into a [`Root`]. Data comes from a [`RoverApi`].

pub mod action;
pub mod api;
pub mod dashboard;
pub mod delta;
pub mod error;
pub mod root;
pub mod state;
pub mod store;
pub mod view;

pub use action::{parse_action, Action};
pub use api::{ListResponse, PhotoResponse, RoverApi};
pub use dashboard::Dashboard;
pub use delta::{Delta, Patch, SelectionPatch, UserPatch};
pub use error::{CoreError, CoreResult, RenderError};
pub use root::{MemoryRoot, Root};
pub use state::{AppState, Camera, Gallery, Photo, Rover, Selection, User};
pub use store::{render, update, update_with};
pub use view::{render_markup, view};
