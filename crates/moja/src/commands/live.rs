//! Live device command handlers: status, sensor, stream.
//!
//! Each call is routed per invocation; the origin that served it is
//! reported on stderr so stdout stays machine-readable.

use moja_core::{DeviceApi, SensorSample, StaticToken};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, or_dash};

fn report_route(base: &moja_core::BaseAddress, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("{}", output::route_line(base, output::should_color(&global.color)));
    }
}

fn sample_detail(s: &SensorSample) -> String {
    [
        format!("Temperature:      {}", or_dash(s.temperature.map(|t| format!("{t:.1} °C")))),
        format!("Humidity:         {}", or_dash(s.humidity.map(|h| format!("{h:.1} %")))),
        format!(
            "CPU temperature:  {}",
            or_dash(s.cpu_temperature.map(|t| format!("{t:.1} °C")))
        ),
    ]
    .join("\n")
}

pub async fn status(
    api: &DeviceApi,
    identity: &StaticToken,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let routed = api.status(identity, name).await?;
    report_route(&routed.base, global);

    // The status document is opaque; tables fall back to pretty JSON.
    let format = match global.output {
        OutputFormat::Table => &OutputFormat::Json,
        ref other => other,
    };
    let out = output::render_single(
        format,
        &routed.response,
        serde_json::Value::to_string,
        serde_json::Value::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn sensor(
    api: &DeviceApi,
    identity: &StaticToken,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let routed = api.sensor(identity, name).await?;
    report_route(&routed.base, global);

    let out = output::render_single(&global.output, &routed.response, sample_detail, |s| {
        or_dash(s.temperature)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn stream(
    api: &DeviceApi,
    identity: &StaticToken,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = api.start_stream(identity, name).await?;
    report_route(&session.base, global);

    let out = output::render_single(
        &global.output,
        &session,
        |s| s.url.clone(),
        |s| s.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
