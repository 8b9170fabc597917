//! Metrics collection and reporting

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Observations a histogram keeps for percentile queries
const HISTOGRAM_RESERVOIR: usize = 10_000;

/// Counter metric
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: String) -> Self {
        Self {
            name,
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment the counter
    pub fn inc(&self) {
        self.add(1);
    }

    /// Add a value to the counter
    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct HistogramState {
    count: u64,
    sum: f64,
    recent: VecDeque<f64>,
}

/// Histogram metric for tracking distributions.
///
/// Count and sum cover every observation; percentiles cover the most
/// recent observations only.
#[derive(Debug)]
pub struct Histogram {
    name: String,
    state: Mutex<HistogramState>,
}

impl Histogram {
    /// Create a new histogram
    pub fn new(name: String) -> Self {
        Self {
            name,
            state: Mutex::new(HistogramState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observe a value
    pub fn observe(&self, value: f64) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.count += 1;
        state.sum += value;
        if state.recent.len() == HISTOGRAM_RESERVOIR {
            state.recent.pop_front();
        }
        state.recent.push_back(value);
    }

    /// Observe a duration
    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// Get count of observations
    pub fn count(&self) -> u64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    /// Get sum of all values
    pub fn sum(&self) -> f64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).sum
    }

    /// Get average value
    pub fn avg(&self) -> f64 {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.count == 0 {
            0.0
        } else {
            state.sum / state.count as f64
        }
    }

    /// Get percentile (0-100) over the retained observations
    pub fn percentile(&self, p: f64) -> f64 {
        let mut values: Vec<f64> = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent
            .iter()
            .copied()
            .collect();
        if values.is_empty() {
            return 0.0;
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let index = ((p.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64).round() as usize;
        values[index]
    }
}

/// Metrics trait
pub trait Metrics: Send + Sync {
    /// Get a counter
    fn counter(&self, name: &str) -> Arc<Counter>;

    /// Get a histogram
    fn histogram(&self, name: &str) -> Arc<Histogram>;

    /// Record execution time
    fn record_execution_time(&self, operation: &str, duration: Duration);

    /// Record error
    fn record_error(&self, error_type: &str);
}

/// Metrics collector
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all counter names
    pub fn counter_names(&self) -> Vec<String> {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Get all histogram names
    pub fn histogram_names(&self) -> Vec<String> {
        self.histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return counter.clone();
        }

        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Counter::new(name.to_string())))
            .clone()
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        if let Some(histogram) = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return histogram.clone();
        }

        self.histograms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::new(name.to_string())))
            .clone()
    }

    fn record_execution_time(&self, operation: &str, duration: Duration) {
        let hist = self.histogram(&format!("{}_duration", operation));
        hist.observe_duration(duration);
    }

    fn record_error(&self, error_type: &str) {
        let counter = self.counter(&format!("errors_{}", error_type));
        counter.inc();
    }
}
