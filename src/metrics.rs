use crate::error::{PlanError, WeatherError};
use crate::otel;
use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;
use std::sync::OnceLock;

pub fn inc_plan_success() {
    plan_success().add(1, &[])
}

pub fn inc_plan_error(error: &PlanError) {
    let kind = match error {
        PlanError::Validation { .. } => "Validation",
        PlanError::Orchestration(_) => "Orchestration",
        PlanError::EmptyResponse => "EmptyResponse",
    };
    plan_error().add(1, &[KeyValue::new("kind", kind)])
}

pub fn inc_weather_fallback(error: &WeatherError) {
    weather_fallback().add(1, &[KeyValue::new("kind", error.kind())])
}

fn plan_success() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        otel::get_meter()
            .u64_counter("travel_plan_success")
            .with_description("Number of travel plans generated successfully")
            .build()
    })
}

fn plan_error() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        otel::get_meter()
            .u64_counter("travel_plan_error")
            .with_description("Number of travel plan requests that failed")
            .build()
    })
}

fn weather_fallback() -> &'static Counter<u64> {
    static COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
    COUNTER.get_or_init(|| {
        otel::get_meter()
            .u64_counter("weather_fallback")
            .with_description("Number of weather lookups that degraded to fallback data")
            .build()
    })
}
