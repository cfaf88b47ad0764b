//! Reverse-geocoding endpoint

use crate::client::SpacesClient;
use crate::error::ApiResult;
use crate::models::Address;
use crate::query::QueryParams;
use spaces_geo::Location;

/// Address API interface
#[derive(Clone)]
pub struct AddressApi {
    client: SpacesClient,
}

impl AddressApi {
    pub(crate) fn new(client: SpacesClient) -> Self {
        Self { client }
    }

    /// GET /address?location=<lon>,<lat>
    pub async fn of(&self, location: Location) -> ApiResult<Address> {
        self.client.get(&address_path(location)).await
    }
}

fn address_path(location: Location) -> String {
    let query = QueryParams::new()
        .param("location", location.to_query_value())
        .build();
    format!("/address{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_path_is_lon_first() {
        assert_eq!(
            address_path(Location::new(48.8566, 2.3522)),
            "/address?location=2.3522%2C48.8566"
        );
    }
}
