//! Offline map math: viewport, circle, distance

use super::Context;
use crate::output::{format_distance, format_position, print_json, Status};
use anyhow::{ensure, Result};
use serde_json::json;
use spaces_geo::{bounding_box, geo_circle, haversine_distance_meters, Location};
use std::process::ExitCode;

fn ensure_valid(location: &Location) -> Result<()> {
    ensure!(
        location.is_valid(),
        "location out of range: lat {}, lon {}",
        location.latitude,
        location.longitude
    );
    Ok(())
}

pub fn viewport(ctx: &Context, center: Location, radius_m: f64, aspect: Option<f64>) -> Result<ExitCode> {
    ensure_valid(&center)?;
    let aspect_ratio = aspect.unwrap_or(ctx.config.schema.map.aspect_ratio);
    let bounds = bounding_box(center, radius_m, aspect_ratio)?;

    if ctx.json() {
        print_json(&json!({
            "center": center,
            "radius_m": radius_m,
            "aspect_ratio": aspect_ratio,
            "bounds": bounds,
            "degenerate": bounds.is_degenerate(),
        }))?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::header(&format!("Viewport around {center}"));
    Status::field("southwest", format_position(bounds.southwest));
    Status::field("northeast", format_position(bounds.northeast));
    Status::field("radius", format_distance(radius_m));
    Status::field("aspect", aspect_ratio);
    if bounds.is_degenerate() {
        Status::warning("radius is not positive; the viewport is a single point");
    }

    Ok(ExitCode::SUCCESS)
}

pub fn circle(
    ctx: &Context,
    center: Location,
    radius_m: f64,
    steps: Option<usize>,
    geojson: bool,
) -> Result<ExitCode> {
    ensure_valid(&center)?;
    let steps = steps.unwrap_or(ctx.config.schema.map.circle_steps);
    let circle = geo_circle(center, radius_m, steps)?;

    if geojson {
        print_json(&circle.to_geojson())?;
        return Ok(ExitCode::SUCCESS);
    }

    if ctx.json() {
        print_json(&json!({
            "center": center,
            "radius_m": radius_m,
            "steps": steps,
            "vertices": circle.vertices(),
        }))?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::header(&format!("Geofence around {center}"));
    Status::field("radius", format_distance(radius_m));
    Status::field("steps", steps);
    for (i, vertex) in circle.vertices().iter().enumerate() {
        println!("  {i:>4}  {}", format_position(*vertex));
    }

    Ok(ExitCode::SUCCESS)
}

pub fn distance(ctx: &Context, from: Location, to: Location) -> Result<ExitCode> {
    let meters = haversine_distance_meters(&from, &to);

    if ctx.json() {
        print_json(&json!({
            "from": from,
            "to": to,
            "meters": meters,
            "kilometers": meters / 1000.0,
        }))?;
    } else {
        println!("{}", format_distance(meters));
    }

    Ok(ExitCode::SUCCESS)
}
