//! Metrics definitions for the store client.

use shared::metrics_defs::{MetricDef, MetricType};

pub const STORE_REQUEST_DURATION: MetricDef = MetricDef {
    name: "store.request.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete a store operation in seconds, labelled by operation",
};

pub const STORE_REQUEST_ERRORS: MetricDef = MetricDef {
    name: "store.request.errors",
    metric_type: MetricType::Counter,
    description: "Number of store operations that failed, labelled by operation",
};

pub const ALL_METRICS: &[MetricDef] = &[STORE_REQUEST_DURATION, STORE_REQUEST_ERRORS];
