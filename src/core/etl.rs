use std::time::Instant;

use crate::core::report::ImportReport;
use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ImportEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ImportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<ImportReport> {
        let started = Instant::now();
        tracing::info!("Starting import");
        self.monitor.log_phase("start");

        let batches = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} collection(s)", batches.len());
        self.monitor.log_phase("extract");

        let transformed = self.pipeline.transform(batches).await?;
        let records: usize = transformed.outcomes.iter().map(|o| o.normalized.len()).sum();
        tracing::debug!("Normalized {} record(s)", records);
        self.monitor.log_phase("transform");

        let report = self.pipeline.load(transformed).await?;
        self.monitor.log_phase("load");

        tracing::info!(
            status = %report.status(),
            elapsed = ?started.elapsed(),
            "Import finished"
        );

        Ok(report)
    }
}
