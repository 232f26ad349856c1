//! Metrics definitions for the item API.

use shared::metrics_defs::{MetricDef, MetricType};

pub const ITEM_REQUESTS: MetricDef = MetricDef {
    name: "items.requests",
    metric_type: MetricType::Counter,
    description: "Number of item API requests, labelled by operation and outcome",
};

pub const ITEMS_READ_SKIPPED: MetricDef = MetricDef {
    name: "items.read.skipped",
    metric_type: MetricType::Counter,
    description: "Number of stored records skipped on read because they could not be decoded",
};

pub const ALL_METRICS: &[MetricDef] = &[ITEM_REQUESTS, ITEMS_READ_SKIPPED];
