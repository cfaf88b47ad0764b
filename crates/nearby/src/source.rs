//! Data source seam for the coordinator

use crate::query::QueryError;
use spaces_api_client::models::{Address, Space};
use spaces_api_client::{SpacesClient, SpacesNearQuery};
use spaces_geo::Location;
use std::future::Future;

/// Where the coordinator gets nearby spaces and addresses from.
pub trait NearbySource: Send + Sync + 'static {
    fn spaces_near(
        &self,
        query: SpacesNearQuery,
    ) -> impl Future<Output = Result<Vec<Space>, QueryError>> + Send;

    fn address_of(
        &self,
        location: Location,
    ) -> impl Future<Output = Result<Address, QueryError>> + Send;
}

impl NearbySource for SpacesClient {
    fn spaces_near(
        &self,
        query: SpacesNearQuery,
    ) -> impl Future<Output = Result<Vec<Space>, QueryError>> + Send {
        let api = self.spaces();
        async move { api.near(&query).await.map_err(QueryError::from) }
    }

    fn address_of(
        &self,
        location: Location,
    ) -> impl Future<Output = Result<Address, QueryError>> + Send {
        let api = self.address();
        async move { api.of(location).await.map_err(QueryError::from) }
    }
}
