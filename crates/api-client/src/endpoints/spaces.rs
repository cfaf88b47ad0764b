//! Space endpoints

use crate::client::SpacesClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreatedSpace, CreatedToplevelThread, NewSpace, Space, TextContent, Thread, ThreadPage};
use crate::query::{encode_path_segment, QueryParams};
use spaces_geo::Location;
use uuid::Uuid;

/// Default search radius around the user, in meters
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 500.0;

/// Parameters for a nearby-spaces lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacesNearQuery {
    pub location: Location,
    pub radius_m: f64,
    /// Result cap; `None` lets the server decide
    pub count: Option<u32>,
}

impl SpacesNearQuery {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
            count: None,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    /// Request path including the query string
    pub fn path(&self) -> String {
        let query = QueryParams::new()
            .param("location", self.location.to_query_value())
            .param("radius", self.radius_m)
            .maybe("count", self.count)
            .build();
        format!("/spaces{query}")
    }
}

/// Space API interface
#[derive(Clone)]
pub struct SpacesApi {
    client: SpacesClient,
}

impl SpacesApi {
    pub(crate) fn new(client: SpacesClient) -> Self {
        Self { client }
    }

    /// Spaces whose geofence lies around the query location, nearest first
    ///
    /// GET /spaces?count=&location=&radius=
    pub async fn near(&self, query: &SpacesNearQuery) -> ApiResult<Vec<Space>> {
        self.client.get(&query.path()).await
    }

    /// GET /spaces/:spaceid
    pub async fn get(&self, space_id: Uuid) -> ApiResult<Space> {
        self.client.get(&format!("/spaces/{space_id}")).await
    }

    /// Validate locally, then POST /spaces
    pub async fn create(&self, space: &NewSpace) -> ApiResult<CreatedSpace> {
        let validation = space.validate();
        if !validation.is_valid() {
            let messages: Vec<String> = validation.violations().iter().map(ToString::to_string).collect();
            return Err(ApiError::Validation(messages.join("; ")));
        }
        self.client.post("/spaces", space).await
    }

    /// GET /spaces/:spaceid/toplevel-threads?count=&offset=&sort=
    pub async fn toplevel_threads(&self, space_id: Uuid, page: &ThreadPage) -> ApiResult<Vec<Thread>> {
        let query = QueryParams::new()
            .param("sort", page.sort)
            .param("offset", page.offset)
            .param("count", page.count)
            .build();
        let path = format!("/spaces/{}/toplevel-threads{query}", encode_path_segment(&space_id.to_string()));
        self.client.get(&path).await
    }

    /// POST /spaces/:spaceid/toplevel-threads
    pub async fn create_toplevel_thread(
        &self,
        space_id: Uuid,
        content: &str,
    ) -> ApiResult<CreatedToplevelThread> {
        let path = format!("/spaces/{space_id}/toplevel-threads");
        self.client.post(&path, &TextContent::new(content)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_path() {
        let query = SpacesNearQuery::new(Location::new(52.52, 13.405)).with_count(Some(11));
        assert_eq!(
            query.path(),
            "/spaces?count=11&location=13.405%2C52.52&radius=500"
        );
    }

    #[test]
    fn test_near_path_uncapped() {
        let query = SpacesNearQuery::new(Location::new(-33.5, 151.25)).with_radius(250.0);
        assert_eq!(query.path(), "/spaces?location=151.25%2C-33.5&radius=250");
    }

    #[test]
    fn test_create_rejects_invalid_space_without_sending() {
        let client = SpacesClient::new().unwrap();
        let space = NewSpace {
            name: String::new(),
            theme_color_hexa_code: "#69701e".to_string(),
            radius: 250.0,
            location: Location::new(52.52, 13.405),
        };

        let err = tokio_test::block_on(client.spaces().create(&space)).unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert!(message.contains("name: Field is required"), "{message}");
                assert!(message.contains("radius"), "{message}");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
