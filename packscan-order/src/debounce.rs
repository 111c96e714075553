use packscan_core::SkuCode;
use std::time::{Duration, Instant};

/// Drops repeat decodes of the same QR code while it stays in front of the camera.
///
/// A SKU is accepted when it differs from the last accepted one or when the
/// window has elapsed since that acceptance.
#[derive(Debug, Clone)]
pub struct ScanDebouncer {
    window: Duration,
    last: Option<(SkuCode, Instant)>,
}

impl ScanDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn accept(&mut self, raw_sku: &str, now: Instant) -> bool {
        let sku = SkuCode::new(raw_sku);
        if sku.is_empty() {
            return false;
        }

        if let Some((last_sku, at)) = &self.last {
            if *last_sku == sku && now.saturating_duration_since(*at) <= self.window {
                return false;
            }
        }

        self.last = Some((sku, now));
        true
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl Default for ScanDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
