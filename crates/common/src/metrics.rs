use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "franchise_hub_mutations_total",
        "Successful write operations by table and action",
        &["table", "action"]
    )
    .expect("register mutations_total")
});

pub static CONTACT_SUBMISSIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "franchise_hub_contact_submissions_total",
        "Contact form submissions accepted"
    )
    .expect("register contact_submissions_total")
});

pub static IMAGE_UPLOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "franchise_hub_image_uploads_total",
        "Images written to the object store"
    )
    .expect("register image_uploads_total")
});

pub static IMAGE_UPLOAD_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "franchise_hub_image_upload_failures_total",
        "Image uploads that failed and were skipped"
    )
    .expect("register image_upload_failures_total")
});

pub fn record_mutation(table: &str, action: &str) {
    MUTATIONS_TOTAL.with_label_values(&[table, action]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("metrics encode error: {e}"))?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_counter_shows_up_in_exposition() {
        record_mutation("industries", "insert");
        CONTACT_SUBMISSIONS_TOTAL.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("franchise_hub_mutations_total"));
        assert!(text.contains("table=\"industries\""));
        assert!(text.contains("franchise_hub_contact_submissions_total"));
    }
}
