//! Nearby spaces and address for a location

use super::Context;
use crate::output::{format_distance, print_json, report_error, Status};
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use spaces_core::error::{exit_codes, Error};
use spaces_geo::Location;
use spaces_nearby::{CoordinatorConfig, NearbyCoordinator, QueryState};
use std::process::ExitCode;

fn settled<T>(state: &QueryState<T>) -> bool {
    !state.is_fetching && (state.data.is_some() || state.error.is_some())
}

fn slot_json<T: Serialize>(state: &QueryState<T>) -> Value {
    json!({
        "data": state.data,
        "error": state.error.as_ref().map(|e| json!({
            "message": e.message,
            "status": e.status,
            "retryable": e.retryable,
        })),
    })
}

pub async fn run(
    ctx: &Context,
    location: Location,
    radius_m: Option<f64>,
    count: Option<u32>,
) -> Result<ExitCode> {
    let mut config = CoordinatorConfig::from(&ctx.config.schema.nearby);
    if let Some(radius_m) = radius_m {
        config.search_radius_m = radius_m;
    }
    if count.is_some() {
        config.result_cap = count;
    }

    let coordinator = NearbyCoordinator::new(ctx.client()?, config);
    let mut snapshots = coordinator.subscribe();
    coordinator.set_location(Some(location));

    let snapshot = snapshots
        .wait_for(|s| settled(&s.spaces) && settled(&s.address))
        .await?
        .clone();
    coordinator.dispose();

    let spaces = &snapshot.spaces;
    let address = &snapshot.address;

    if ctx.json() {
        print_json(&json!({
            "location": location,
            "spaces": slot_json(spaces),
            "address": slot_json(address),
        }))?;
    } else {
        Status::header(&format!("Nearby {location}"));

        match (&address.data, &address.error) {
            (Some(found), _) => {
                let line = found.display_line().unwrap_or_else(|| "unknown address".to_string());
                Status::field("address", line);
            }
            (None, Some(err)) => Status::error(&format!("address: {err}")),
            (None, None) => {}
        }

        match (&spaces.data, &spaces.error) {
            (Some(found), _) if found.is_empty() => Status::info("no spaces nearby"),
            (Some(found), _) => {
                for space in found {
                    let distance = space.distance.map(format_distance).unwrap_or_default();
                    println!("  {:<40} {:>10}  {}", space.name, distance, space.id);
                }
            }
            (None, Some(err)) => Status::error(&format!("spaces: {err}")),
            (None, None) => {}
        }
    }

    if let (Some(spaces_err), Some(address_err)) = (&spaces.error, &address.error) {
        let err = Error::query_failed(
            &format!("spaces and address near {location}"),
            format!("spaces: {spaces_err}; address: {address_err}"),
        );
        report_error(&err, ctx.json());
        return Ok(ExitCode::from(exit_codes::QUERY_ERROR as u8));
    }
    Ok(ExitCode::SUCCESS)
}
