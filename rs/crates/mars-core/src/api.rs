//! The remote rover API, as seen by the dashboard.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::state::{Photo, Rover};

/// Body of `GET /rovers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub rovers: Vec<Rover>,
}

/// Body of `GET /rovers/{name}?max_date={date}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[async_trait]
pub trait RoverApi: Send + Sync {
    async fn fetch_rover_list(&self) -> CoreResult<ListResponse>;

    async fn fetch_rover_photos(&self, rover_name: &str, max_date: &str) -> CoreResult<PhotoResponse>;
}

#[async_trait]
impl<T: RoverApi + ?Sized> RoverApi for std::sync::Arc<T> {
    async fn fetch_rover_list(&self) -> CoreResult<ListResponse> {
        (**self).fetch_rover_list().await
    }

    async fn fetch_rover_photos(&self, rover_name: &str, max_date: &str) -> CoreResult<PhotoResponse> {
        (**self).fetch_rover_photos(rover_name, max_date).await
    }
}
