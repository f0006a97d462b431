use recsync_services::SyncReport;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// One-line summary of a run for the final log line.
pub fn summarize(report: &SyncReport) -> String {
    format!(
        "{} discovered, {} uploaded, {} failed, index {}",
        report.discovered.len(),
        report.uploaded,
        report.failed,
        if report.index_written { "written" } else { "unchanged" }
    )
}
