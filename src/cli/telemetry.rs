use anyhow::Result;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{Tracer, TracerProvider},
    Resource,
};
use std::{env::var, sync::OnceLock, time::Duration};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

static TRACER_PROVIDER: OnceLock<TracerProvider> = OnceLock::new();

const QUIET_TARGETS: [&str; 5] = [
    "hyper=error",
    "hyper_util=error",
    "reqwest=warn",
    "tokio=error",
    "opentelemetry_sdk=warn",
];

/// Collector endpoint with a scheme; bare `host:port` values are taken as https.
fn otlp_endpoint(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    match raw.split_once("://") {
        Some(("http" | "https", _)) => raw.to_string(),
        _ => format!("https://{raw}"),
    }
}

/// Default level from `-v`, overridable per target through `RUST_LOG`.
/// HTTP stack internals stay quiet so request spans are readable.
fn filter(level: Level) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    for directive in QUIET_TARGETS {
        filter = filter.add_directive(directive.parse()?);
    }

    Ok(filter)
}

fn init_tracer(endpoint: &str) -> Result<Tracer> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_endpoint(endpoint))
        .with_timeout(Duration::from_secs(3))
        .build()?;

    // service.instance.id defaults to a fresh ULID per run
    let instance_id = var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string());

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("service.instance.id", instance_id),
        ]))
        .build();

    let _ = TRACER_PROVIDER.set(provider.clone());
    global::set_tracer_provider(provider.clone());

    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

/// Initialize logging to stderr, plus span export when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// Result lines go to stdout, so diagnostics never interleave with them.
///
/// # Errors
///
/// Returns an error if tracer or subscriber initialization fails
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let filter = filter(verbosity_level)?;

    if let Ok(endpoint) = var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        let tracer = init_tracer(&endpoint)?;
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let subscriber = Registry::default()
            .with(fmt_layer)
            .with(otel_layer)
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Flush and shut down the span exporter (noop if not initialized)
pub fn shutdown_tracer() {
    if let Some(tp) = TRACER_PROVIDER.get() {
        debug!("shutting down tracer provider");
        let _ = tp.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otlp_endpoint_keeps_scheme() {
        assert_eq!(otlp_endpoint("http://localhost:4317"), "http://localhost:4317");
        assert_eq!(
            otlp_endpoint("https://otel.example.com:4317/"),
            "https://otel.example.com:4317"
        );
    }

    #[test]
    fn otlp_endpoint_defaults_to_https() {
        assert_eq!(otlp_endpoint(" collector:4317/ "), "https://collector:4317");
    }

    #[test]
    fn quiet_targets_parse() {
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = filter(Level::DEBUG);
            assert!(filter.is_ok());
            let rendered = filter.map(|f| f.to_string()).unwrap_or_default();
            assert!(rendered.contains("hyper=error"));
            assert!(rendered.contains("debug"));
        });
    }

    #[test]
    fn shutdown_without_provider_is_noop() {
        shutdown_tracer();
    }
}
