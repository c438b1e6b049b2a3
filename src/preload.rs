//! Bounded batch probing of image links.
//!
//! Links are split into chunks of `limit`. Chunks run one after another; the
//! probes inside a chunk run in parallel on the rayon pool. A failed probe is
//! counted and logged, never propagated, so one dead link can't fail the
//! batch.
//!
//! There is no timeout and no cancellation. A probe that never returns stalls
//! its own chunk, and with it every chunk after it.

use crate::link::{self, LinkKind};
use rayon::prelude::*;
use thiserror::Error;

/// Links probed at once when nothing else is configured.
pub const DEFAULT_PRELOAD_LIMIT: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{url}: {reason}")]
pub struct ProbeError {
    pub url: String,
    pub reason: String,
}

impl ProbeError {
    pub fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Something that can check whether a link loads.
pub trait Probe: Sync {
    fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

impl<F> Probe for F
where
    F: Fn(&str) -> Result<(), ProbeError> + Sync,
{
    fn probe(&self, url: &str) -> Result<(), ProbeError> {
        self(url)
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub loaded: usize,
    pub failed: Vec<ProbeError>,
}

impl PreloadReport {
    pub fn total(&self) -> usize {
        self.loaded + self.failed.len()
    }
}

/// Probe every link, at most `limit` at a time. `limit == 0` is treated as 1.
///
/// Failures are returned in input order.
pub fn preload_images<P>(urls: &[String], limit: usize, probe: &P) -> PreloadReport
where
    P: Probe + ?Sized,
{
    let limit = limit.max(1);
    let mut report = PreloadReport::default();
    for chunk in urls.chunks(limit) {
        let results: Vec<Result<(), ProbeError>> =
            chunk.par_iter().map(|url| probe.probe(url)).collect();
        for result in results {
            match result {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    tracing::debug!(error = %err, "preload probe failed");
                    report.failed.push(err);
                }
            }
        }
    }
    report
}

/// Offline probe: fails links the normalizer can't turn into something an
/// `<img>` tag can load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkProbe;

impl Probe for LinkProbe {
    fn probe(&self, url: &str) -> Result<(), ProbeError> {
        if url.trim().is_empty() {
            return Err(ProbeError::new(url, "empty link"));
        }
        match link::classify(&link::normalize(url)) {
            LinkKind::OneDriveShort => Err(ProbeError::new(
                url,
                "OneDrive short link; paste the full share URL",
            )),
            LinkKind::OneDriveShare => Err(ProbeError::new(
                url,
                "OneDrive link without resid or cid+id",
            )),
            LinkKind::GoogleShare => Err(ProbeError::new(url, "Google Drive link without a file id")),
            LinkKind::GoogleDirect | LinkKind::OneDriveDownload | LinkKind::Other => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn always_ok(_: &str) -> Result<(), ProbeError> {
        Ok(())
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/{i}.jpg")).collect()
    }

    #[test]
    fn all_probes_succeed() {
        let report = preload_images(&urls(7), 3, &always_ok);
        assert_eq!(report.loaded, 7);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn failures_are_collected_not_fatal() {
        let probe = |url: &str| {
            if url.ends_with("/1.jpg") || url.ends_with("/4.jpg") {
                Err(ProbeError::new(url, "404"))
            } else {
                Ok(())
            }
        };
        let report = preload_images(&urls(6), 2, &probe);
        assert_eq!(report.loaded, 4);
        assert_eq!(report.total(), 6);
        let failed: Vec<&str> = report.failed.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            failed,
            vec!["https://example.com/1.jpg", "https://example.com/4.jpg"]
        );
    }

    #[test]
    fn in_flight_never_exceeds_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let probe = |_: &str| -> Result<(), ProbeError> {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        };
        let report = preload_images(&urls(10), 3, &probe);
        assert_eq!(report.loaded, 10);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn slow_probe_holds_back_later_chunks() {
        // The second chunk must not start until the slow first chunk is done.
        let order = Mutex::new(Vec::new());
        let probe = |url: &str| -> Result<(), ProbeError> {
            if url.ends_with("/0.jpg") {
                std::thread::sleep(Duration::from_millis(50));
            }
            order.lock().unwrap().push(url.to_string());
            Ok(())
        };
        preload_images(&urls(4), 2, &probe);
        let order = order.into_inner().unwrap();
        let slow = order.iter().position(|u| u.ends_with("/0.jpg")).unwrap();
        let later = order.iter().position(|u| u.ends_with("/2.jpg")).unwrap();
        assert!(slow < later);
    }

    #[test]
    fn zero_limit_behaves_like_one() {
        let report = preload_images(&urls(3), 0, &always_ok);
        assert_eq!(report.loaded, 3);
    }

    #[test]
    fn empty_batch() {
        let report = preload_images(&[], 3, &LinkProbe);
        assert_eq!(report, PreloadReport::default());
    }

    #[test]
    fn link_probe_classifies() {
        assert!(LinkProbe.probe("https://drive.google.com/file/d/ABC/view").is_ok());
        assert!(LinkProbe.probe("https://example.com/a.jpg").is_ok());
        assert!(LinkProbe.probe("https://1drv.ms/i/s!x").is_err());
        assert!(LinkProbe.probe("https://onedrive.live.com/?cid=1").is_err());
        assert!(LinkProbe.probe("https://drive.google.com/drive/folders/x").is_err());
        assert!(LinkProbe.probe("   ").is_err());
    }
}
