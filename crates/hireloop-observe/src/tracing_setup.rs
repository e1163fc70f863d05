//! Global tracing subscriber.
//!
//! ```no_run
//! // Structured logging at `info` unless RUST_LOG says otherwise
//! hireloop_observe::init_tracing("info", false).unwrap();
//!
//! // Also bridge spans (including the gen_ai.* LLM spans) to OpenTelemetry
//! hireloop_observe::init_tracing("info,hireloop_core=debug", true).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Build the level filter: `RUST_LOG` when set, otherwise `default_filter`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
///
/// Always adds a `fmt` layer that logs span close timings. With
/// `enable_otel`, spans are also exported through a stdout OpenTelemetry
/// exporter.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let filter = build_filter(default_filter);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("hireloop");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush buffered spans and shut the tracer provider down.
///
/// No-op when OpenTelemetry was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let filter = build_filter("warn,hireloop=debug");
        let rendered = filter.to_string();
        assert!(rendered.contains("warn") || std::env::var("RUST_LOG").is_ok());
    }

    #[test]
    fn shutdown_without_init_is_a_no_op() {
        shutdown_tracing();
    }
}
