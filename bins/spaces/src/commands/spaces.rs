//! Space lookups and validation

use super::Context;
use crate::output::{format_distance, print_json, Status};
use anyhow::Result;
use serde_json::json;
use spaces_api_client::models::{NewSpace, Sorting, ThreadPage};
use spaces_core::error::exit_codes;
use spaces_geo::Location;
use std::process::ExitCode;
use uuid::Uuid;

pub fn new_space(name: String, color: String, radius: f64, location: Location) -> NewSpace {
    NewSpace {
        name,
        theme_color_hexa_code: color,
        radius,
        location,
    }
}

pub async fn show(ctx: &Context, id: Uuid) -> Result<ExitCode> {
    let space = ctx.client()?.spaces().get(id).await?;

    if ctx.json() {
        print_json(&space)?;
    } else {
        Status::header(&space.name);
        Status::field("id", space.id);
        Status::field("location", space.location);
        Status::field("radius", format_distance(space.radius));
        Status::field("color", &space.theme_color_hexa_code);
        Status::field("admin", &space.admin_id);
        Status::field("created", space.created_at.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn threads(
    ctx: &Context,
    space_id: Uuid,
    sort: Sorting,
    offset: u32,
    count: u32,
) -> Result<ExitCode> {
    let page = ThreadPage { sort, offset, count };
    let threads = ctx.client()?.spaces().toplevel_threads(space_id, &page).await?;

    if ctx.json() {
        print_json(&threads)?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::header(&format!("Threads in {space_id} ({sort})"));
    if threads.is_empty() {
        Status::info("no threads");
    }
    for thread in &threads {
        let preview = thread
            .first_message
            .as_ref()
            .map(|m| m.content.chars().take(60).collect::<String>())
            .unwrap_or_default();
        println!("  {}  {:>4} msgs  {}", thread.id, thread.messages_count, preview);
    }

    Ok(ExitCode::SUCCESS)
}

/// Report violations; exits with the validation code when any are found
pub fn validate(ctx: &Context, space: &NewSpace) -> Result<ExitCode> {
    let result = space.validate();

    if ctx.json() {
        print_json(&json!({
            "valid": result.is_valid(),
            "violations": result.violations(),
        }))?;
    } else if result.is_valid() {
        Status::success(&format!("\"{}\" is valid", space.name));
    } else {
        for violation in result.violations() {
            Status::error(&violation.to_string());
        }
    }

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(exit_codes::VALIDATION_ERROR as u8)
    })
}

pub async fn create(ctx: &Context, space: &NewSpace) -> Result<ExitCode> {
    if !space.validate().is_valid() {
        return validate(ctx, space);
    }

    let created = ctx.client()?.spaces().create(space).await?;
    if ctx.json() {
        print_json(&created)?;
    } else {
        Status::success(&format!("created space {}", created.space_id));
    }

    Ok(ExitCode::SUCCESS)
}
