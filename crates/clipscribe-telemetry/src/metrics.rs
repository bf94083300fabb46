//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::global;
use opentelemetry::metrics::{Histogram, Meter};

/// Requests that reached the transcription handler, by outcome
pub const TRANSCRIPTION_REQUEST_COUNT: &str = "transcription.request.count";
/// Time spent waiting on the provider, in seconds
pub const TRANSCRIPTION_REQUEST_DURATION: &str = "transcription.request.duration";

/// Meter shared by every instrument of the service
///
/// Falls back to a no-op meter when no exporter is configured.
pub fn meter() -> Meter {
    global::meter("clipscribe")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
