//! mars-client — Rover API client
//!
//! Two requests, both plain GETs against one configurable base URL:
//!   - `GET {base}/rovers`                        → rover list
//!   - `GET {base}/rovers/{name}?max_date={date}` → latest photos of a rover

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use mars_core::{CoreError, CoreResult, ListResponse, PhotoResponse, RoverApi};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {0}")]
    Url(String),
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<FetchError> for CoreError {
    fn from(e: FetchError) -> Self {
        CoreError::Fetch(e.to_string())
    }
}

pub struct RoverClient {
    http: reqwest::Client,
    base: Url,
}

impl RoverClient {
    pub fn new(http: reqwest::Client, config: &ApiConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url).map_err(|_| FetchError::Url(config.base_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::Url(config.base_url.clone()));
        }
        Ok(Self { http, base })
    }

    /// Client with its own `reqwest::Client`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("mars-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Self::new(http, config)
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn rovers_url(&self) -> Url {
        self.endpoint(&["rovers"])
    }

    /// The rover name is one escaped path segment; `max_date` is query-encoded.
    pub fn photos_url(&self, rover_name: &str, max_date: &str) -> Url {
        let mut url = self.endpoint(&["rovers", rover_name]);
        url.query_pairs_mut().append_pair("max_date", max_date);
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let label = url.to_string();
        debug!(url = %label, "GET");

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Http { url: label.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: label, status: status.as_u16() });
        }

        let body = resp
            .text()
            .await
            .map_err(|source| FetchError::Http { url: label.clone(), source })?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url: label, source })
    }

    pub async fn rover_list(&self) -> Result<ListResponse, FetchError> {
        self.get_json(self.rovers_url()).await
    }

    pub async fn rover_photos(&self, rover_name: &str, max_date: &str) -> Result<PhotoResponse, FetchError> {
        self.get_json(self.photos_url(rover_name, max_date)).await
    }
}

#[async_trait]
impl RoverApi for RoverClient {
    async fn fetch_rover_list(&self) -> CoreResult<ListResponse> {
        Ok(self.rover_list().await?)
    }

    async fn fetch_rover_photos(&self, rover_name: &str, max_date: &str) -> CoreResult<PhotoResponse> {
        Ok(self.rover_photos(rover_name, max_date).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn photos(Path(name): Path<String>, Query(q): Query<HashMap<String, String>>) -> axum::response::Response {
        match name.as_str() {
            "Broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "Garbled" => "not json".into_response(),
            _ => Json(json!({
                "photos": [{
                    "id": 102693,
                    "img_src": "https://mars.nasa.gov/a.jpg",
                    "earth_date": q.get("max_date").cloned().unwrap_or_default(),
                    "camera": { "name": "FHAZ", "full_name": "Front Hazard Avoidance Camera" },
                    "rover": { "name": name.clone(), "status": "active", "landing_date": "2012-08-06", "launch_date": "2011-11-26" }
                }]
            }))
            .into_response(),
        }
    }

    fn api_router() -> Router {
        Router::new()
            .route(
                "/rovers",
                get(|| async {
                    Json(json!({
                        "rovers": [
                            { "name": "Curiosity", "status": "active", "launch_date": "2011-11-26",
                              "landing_date": "2012-08-06", "max_date": "2024-02-19", "total_photos": 695670 },
                            { "name": "Spirit", "status": "complete", "launch_date": "2003-06-10",
                              "landing_date": "2004-01-04", "max_date": "2010-03-21" }
                        ]
                    }))
                }),
            )
            .route("/rovers/:name", get(photos))
    }

    fn client(base_url: &str) -> RoverClient {
        RoverClient::from_config(&ApiConfig { base_url: base_url.to_string() }).unwrap()
    }

    #[test]
    fn builds_urls() {
        let c = client("http://localhost:3000/");
        assert_eq!(c.rovers_url().as_str(), "http://localhost:3000/rovers");
        assert_eq!(
            c.photos_url("Curiosity", "2024-02-19").as_str(),
            "http://localhost:3000/rovers/Curiosity?max_date=2024-02-19"
        );

        let nested = client("http://api.local/v1");
        assert_eq!(nested.rovers_url().as_str(), "http://api.local/v1/rovers");
        assert_eq!(
            nested.photos_url("Mars 2020/x", "a&b").as_str(),
            "http://api.local/v1/rovers/Mars%202020%2Fx?max_date=a%26b"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            RoverClient::from_config(&ApiConfig { base_url: "mailto:rover@mars".into() }),
            Err(FetchError::Url(_))
        ));
        assert!(matches!(
            RoverClient::from_config(&ApiConfig { base_url: "not a url".into() }),
            Err(FetchError::Url(_))
        ));
    }

    #[test]
    fn default_config_points_at_local_api() {
        assert_eq!(ApiConfig::default().base_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn fetches_rover_list() {
        let base = serve(api_router()).await;
        let list = client(&base).fetch_rover_list().await.unwrap();
        assert_eq!(list.rovers.len(), 2);
        assert_eq!(list.rovers[0].name, "Curiosity");
        assert_eq!(list.rovers[1].max_date, "2010-03-21");
    }

    #[tokio::test]
    async fn fetches_photos_with_max_date() {
        let base = serve(api_router()).await;
        let resp = client(&base)
            .fetch_rover_photos("Mars 2020", "2024-02-19")
            .await
            .unwrap();
        assert_eq!(resp.photos.len(), 1);
        let photo = &resp.photos[0];
        assert_eq!(photo.rover.name, "Mars 2020");
        assert_eq!(photo.earth_date, "2024-02-19");
        assert_eq!(photo.camera.full_name, "Front Hazard Avoidance Camera");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = serve(api_router()).await;
        let err = client(&base).rover_photos("Broken", "x").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let base = serve(api_router()).await;
        let err = client(&base).rover_photos("Garbled", "x").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));

        let core: CoreError = err.into();
        assert!(core.to_string().starts_with("fetch failed: could not decode"));
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).rover_list().await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
    }
}
