use anyhow::anyhow;
use opentelemetry::global;
use opentelemetry::metrics::Meter;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::{BatchLogProcessor, SdkLoggerProvider};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{BatchSpanProcessor, SdkTracerProvider};
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;

/// Initialize logs, traces, and metrics and return a guard that flushes
/// everything on drop. Exports over OTLP when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set, to stdout otherwise.
pub fn init_telemetry() -> Result<TelemetryGuard, anyhow::Error> {
    let log_provider = init_logs()?;

    let log_layer = OpenTelemetryTracingBridge::new(&log_provider).with_filter(
        EnvFilter::new("info")
            .add_directive("hyper=off".parse()?)
            .add_directive("tonic=off".parse()?)
            .add_directive("rig-core=off".parse()?)
            .add_directive("reqwest=off".parse()?),
    );
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_names(true)
        .with_filter(EnvFilter::new("info").add_directive("opentelemetry=info".parse()?));

    let trace_provider = init_traces()?;
    let span_layer = OpenTelemetryLayer::new(trace_provider.tracer(service_name().as_str()))
        .with_filter(EnvFilter::new("info").add_directive("opentelemetry=info".parse()?));

    subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(log_layer)
            .with(span_layer)
            .with(fmt_layer),
    )?;

    let meter_provider = init_metrics()?;

    Ok(TelemetryGuard {
        log_provider,
        trace_provider,
        meter_provider,
    })
}

/// Creates or returns the process-wide meter.
pub fn get_meter() -> &'static Meter {
    static METER: OnceLock<Meter> = OnceLock::new();
    METER.get_or_init(|| global::meter(service_name().as_str()))
}

/// Holds the provider handles so spans, logs, and metrics are flushed when
/// the process exits, on success or failure.
pub struct TelemetryGuard {
    log_provider: SdkLoggerProvider,
    trace_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl TelemetryGuard {
    fn shutdown(&self) -> Result<(), anyhow::Error> {
        let mut errors = Vec::new();
        if let Err(e) = self.log_provider.shutdown() {
            errors.push(format!("log provider shutdown failed: {}", e));
        }
        if let Err(e) = self.trace_provider.shutdown() {
            errors.push(format!("trace provider shutdown failed: {}", e));
        }
        if let Err(e) = self.meter_provider.shutdown() {
            errors.push(format!("meter provider shutdown failed: {}", e));
        }
        if !errors.is_empty() {
            return Err(anyhow!(errors.join("\n")));
        }
        Ok(())
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("Error during telemetry shutdown: {}", e);
        }
    }
}

fn service_name() -> &'static String {
    static SERVICE: OnceLock<String> = OnceLock::new();
    SERVICE
        .get_or_init(|| env::var("OTEL_SERVICE_NAME").unwrap_or("travel-planner".to_owned()))
}

fn resource() -> Resource {
    static RESOURCE: OnceLock<Resource> = OnceLock::new();
    RESOURCE
        .get_or_init(|| {
            Resource::builder()
                .with_service_name(service_name().as_str())
                .build()
        })
        .clone()
}

fn otlp_endpoint() -> Option<String> {
    env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()
}

fn init_traces() -> Result<SdkTracerProvider, anyhow::Error> {
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(BaggagePropagator::new()),
        Box::new(TraceContextPropagator::new()),
    ]));

    let batch_config = opentelemetry_sdk::trace::BatchConfigBuilder::default()
        .with_max_queue_size(1000)
        .with_scheduled_delay(Duration::from_secs(1))
        .with_max_export_batch_size(100)
        .build();
    let processor = match otlp_endpoint() {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()?;
            BatchSpanProcessor::new(exporter, batch_config)
        }
        None => BatchSpanProcessor::new(
            opentelemetry_stdout::SpanExporter::default(),
            batch_config,
        ),
    };
    let provider = SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_resource(resource())
        .build();

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

fn init_metrics() -> Result<SdkMeterProvider, anyhow::Error> {
    let builder = SdkMeterProvider::builder().with_resource(resource());
    let provider = match otlp_endpoint() {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::MetricExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()?;
            builder
                .with_reader(
                    PeriodicReader::builder(exporter)
                        .with_interval(Duration::from_secs(1))
                        .build(),
                )
                .build()
        }
        None => builder
            .with_reader(
                PeriodicReader::builder(opentelemetry_stdout::MetricExporter::builder().build())
                    .with_interval(Duration::from_secs(1))
                    .build(),
            )
            .build(),
    };
    global::set_meter_provider(provider.clone());
    Ok(provider)
}

fn init_logs() -> Result<SdkLoggerProvider, anyhow::Error> {
    let processor = match otlp_endpoint() {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::LogExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()?;
            BatchLogProcessor::builder(exporter).build()
        }
        None => BatchLogProcessor::builder(opentelemetry_stdout::LogExporter::default()).build(),
    };
    Ok(SdkLoggerProvider::builder()
        .with_log_processor(processor)
        .with_resource(resource())
        .build())
}
