use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_runs: AtomicU64,
    ingest_rows: AtomicU64,
    ingest_errors: AtomicU64,
    alerts_generated: AtomicU64,
}

impl Metrics {
    pub fn record_ingest(&self, row_count: usize) {
        self.ingest_runs.fetch_add(1, Ordering::Relaxed);
        self.ingest_rows
            .fetch_add(row_count as u64, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alerts(&self, count: usize) {
        self.alerts_generated
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let runs = self.ingest_runs.load(Ordering::Relaxed);
        let rows = self.ingest_rows.load(Ordering::Relaxed);
        let errors = self.ingest_errors.load(Ordering::Relaxed);
        let alerts = self.alerts_generated.load(Ordering::Relaxed);

        format!(
            "# TYPE shapeflow_ingest_runs_total counter\n\
shapeflow_ingest_runs_total {}\n\
# TYPE shapeflow_ingest_rows_total counter\n\
shapeflow_ingest_rows_total {}\n\
# TYPE shapeflow_ingest_errors_total counter\n\
shapeflow_ingest_errors_total {}\n\
# TYPE shapeflow_alerts_generated_total counter\n\
shapeflow_alerts_generated_total {}\n",
            runs, rows, errors, alerts
        )
    }
}
