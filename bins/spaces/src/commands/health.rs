//! API health check

use super::Context;
use crate::output::{print_json, Status};
use anyhow::Result;
use spaces_core::error::exit_codes;
use std::process::ExitCode;

pub async fn run(ctx: &Context) -> Result<ExitCode> {
    let client = ctx.client()?;
    let status = client.health().status().await;

    if ctx.json() {
        print_json(&status)?;
    } else {
        Status::header("API Health");
        Status::field("url", &status.url);
        Status::field("latency", format!("{} ms", status.response_time.as_millis()));
        match (&status.error, status.is_healthy) {
            (_, true) => Status::success("healthy"),
            (Some(error), false) => Status::error(error),
            (None, false) => Status::warning("responded but reported itself unhealthy"),
        }
    }

    Ok(if status.is_healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(exit_codes::QUERY_ERROR as u8)
    })
}
