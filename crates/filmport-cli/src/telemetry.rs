//! Tracing subscriber setup.
//!
//! Console output goes through the `fmt` layer filtered by `RUST_LOG`
//! (default `info`). With the `otel` feature, spans are also exported
//! over OTLP/HTTP when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

/// Returns the `RUST_LOG` filter, or `info` when unset or invalid.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
#[cfg(not(feature = "otel"))]
pub fn init_tracing() {
    fmt().with_env_filter(env_filter()).with_target(false).init();
}

/// Installs the global tracing subscriber.
#[cfg(feature = "otel")]
pub fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .and_then(|_| {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .build()
                .ok()?;

            let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                .with_simple_exporter(exporter)
                .build();

            let tracer = opentelemetry::trace::TracerProvider::tracer(
                &tracer_provider,
                env!("CARGO_PKG_NAME"),
            );
            opentelemetry::global::set_tracer_provider(tracer_provider);

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        });

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .with(otel_layer)
        .init();
}
