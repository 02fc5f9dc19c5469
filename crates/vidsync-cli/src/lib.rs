use chrono::Local;

/// Timestamp prefix for output filenames, e.g. `2026-08-25_03.14PM_`.
pub fn tag_time() -> String {
    Local::now().format("%Y-%m-%d_%I.%M%p_").to_string()
}

/// Output filename for a converted course: timestamp plus the course id with
/// path separators flattened.
pub fn output_filename(course_id: &str) -> String {
    format!("{}{}.tar.gz", tag_time(), course_id.replace('/', "_"))
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
