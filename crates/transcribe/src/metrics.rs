use std::time::Instant;

use clipscribe_core::ResponseFormat;
use clipscribe_telemetry::metrics::{TRANSCRIPTION_REQUEST_COUNT, TRANSCRIPTION_REQUEST_DURATION, meter, record_duration};
use clipscribe_telemetry::{Counter, Histogram, KeyValue};

use crate::error::TranscribeError;

/// Instruments recorded by the transcription endpoint
pub(crate) struct TranscriptionMetrics {
    requests: Counter<u64>,
    duration: Histogram<f64>,
}

impl TranscriptionMetrics {
    pub fn new() -> Self {
        let meter = meter();

        Self {
            requests: meter
                .u64_counter(TRANSCRIPTION_REQUEST_COUNT)
                .with_description("Transcription requests by outcome")
                .build(),
            duration: meter
                .f64_histogram(TRANSCRIPTION_REQUEST_DURATION)
                .with_description("Provider round trip time")
                .with_unit("s")
                .build(),
        }
    }

    /// Request refused before reaching the provider
    pub fn rejected(&self, error: &TranscribeError) {
        self.requests.add(
            1,
            &[KeyValue::new("outcome", "rejected"), KeyValue::new("error", error.kind())],
        );
    }

    /// Provider call finished, successfully or not
    pub fn completed(&self, format: ResponseFormat, outcome: Result<(), &TranscribeError>, start: Instant) {
        let outcome = match outcome {
            Ok(()) => "success",
            Err(e) => e.kind(),
        };
        let attributes = [
            KeyValue::new("response_format", format.as_ref().to_string()),
            KeyValue::new("outcome", outcome),
        ];

        self.requests.add(1, &attributes);
        record_duration(&self.duration, start, &attributes);
    }
}
