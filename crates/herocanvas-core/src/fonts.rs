//! Best-effort font warm-up with a hard timeout.

use futures::channel::oneshot;
use futures::future::{self, Either};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Default warm-up budget.
pub const DEFAULT_FONT_TIMEOUT: Duration = Duration::from_millis(1500);

/// Font loading errors.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font not available: {0}")]
    NotAvailable(String),
    #[error("Invalid font shorthand: {0:?}")]
    InvalidSpec(String),
    #[error("Font load failed: {0}")]
    Other(String),
}

/// A CSS-style font shorthand such as `700 64px "Space Grotesk"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub weight: u16,
    pub size_px: f64,
    pub family: String,
}

impl FontSpec {
    pub fn new(weight: u16, size_px: f64, family: impl Into<String>) -> Self {
        Self {
            weight,
            size_px,
            family: family.into(),
        }
    }

    /// Fonts used by the title and subtitle labels.
    pub fn defaults() -> Vec<FontSpec> {
        vec![
            FontSpec::new(700, 64.0, "Space Grotesk"),
            FontSpec::new(400, 22.0, "Inter"),
        ]
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px \"{}\"", self.weight, self.size_px, self.family)
    }
}

impl FromStr for FontSpec {
    type Err = FontLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FontLoadError::InvalidSpec(s.to_string());
        let mut rest = s.trim();

        let mut weight = 400;
        if let Some((first, tail)) = rest.split_once(char::is_whitespace) {
            if let Ok(value) = first.parse::<u16>() {
                weight = value;
                rest = tail.trim_start();
            }
        }

        let (size, family) = rest.split_once(char::is_whitespace).ok_or_else(invalid)?;
        let size_px = size
            .strip_suffix("px")
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(invalid)?;
        let family = family.trim().trim_matches(|c| c == '"' || c == '\'');
        if family.is_empty() {
            return Err(invalid());
        }
        Ok(FontSpec::new(weight, size_px, family))
    }
}

/// Something that can make a font available for rendering.
pub trait FontSource {
    fn load(&self, spec: &FontSpec) -> BoxFuture<'_, Result<(), FontLoadError>>;
}

/// Async sleep provider.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Timer backed by a sleeping thread per request.
///
/// The thread is detached and always sleeps the full duration, even after
/// the race it was started for has been decided. Each font gate leaves one
/// such thread behind until its timeout elapses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

impl Timer for ThreadTimer {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel::<()>();
        std::thread::spawn(move || {
            std::thread::sleep(duration);
            let _ = tx.send(());
        });
        Box::pin(async move {
            // A dropped sender still ends the wait
            let _ = rx.await;
        })
    }
}

/// Outcome counts of one warm-up. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontGateReport {
    pub loaded: usize,
    pub failed: usize,
    pub timed_out: usize,
}

pub struct FontPreloadGate;

impl FontPreloadGate {
    /// Race every font load against its own timer and wait for all races.
    ///
    /// Never fails: load errors and timeouts are only counted and logged.
    pub async fn wait(
        source: &dyn FontSource,
        timer: &dyn Timer,
        specs: &[FontSpec],
        timeout: Duration,
    ) -> FontGateReport {
        let races = specs.iter().map(|spec| async move {
            let outcome = future::select(source.load(spec), timer.sleep(timeout)).await;
            match outcome {
                Either::Left((Ok(()), _)) => {
                    log::debug!("Font ready: {}", spec);
                    Outcome::Loaded
                }
                Either::Left((Err(err), _)) => {
                    log::debug!("Font load failed for {}: {}", spec, err);
                    Outcome::Failed
                }
                Either::Right(_) => {
                    log::debug!("Font load timed out after {:?}: {}", timeout, spec);
                    Outcome::TimedOut
                }
            }
        });

        let mut report = FontGateReport::default();
        for outcome in future::join_all(races).await {
            match outcome {
                Outcome::Loaded => report.loaded += 1,
                Outcome::Failed => report.failed += 1,
                Outcome::TimedOut => report.timed_out += 1,
            }
        }
        report
    }
}

enum Outcome {
    Loaded,
    Failed,
    TimedOut,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Inter loads, Space Grotesk never settles, anything else fails.
    struct FakeSource;

    impl FontSource for FakeSource {
        fn load(&self, spec: &FontSpec) -> BoxFuture<'_, Result<(), FontLoadError>> {
            match spec.family.as_str() {
                "Inter" => Box::pin(future::ready(Ok(()))),
                "Space Grotesk" => Box::pin(future::pending()),
                other => Box::pin(future::ready(Err(FontLoadError::NotAvailable(other.to_string())))),
            }
        }
    }

    struct ImmediateTimer;

    impl Timer for ImmediateTimer {
        fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
            Box::pin(future::ready(()))
        }
    }

    #[test]
    fn test_parse_shorthand() {
        let spec: FontSpec = "700 64px \"Space Grotesk\"".parse().unwrap();
        assert_eq!(spec, FontSpec::new(700, 64.0, "Space Grotesk"));
        assert_eq!(spec.to_string(), "700 64px \"Space Grotesk\"");

        let spec: FontSpec = "22px Inter".parse().unwrap();
        assert_eq!(spec, FontSpec::new(400, 22.0, "Inter"));

        assert!("bold Inter".parse::<FontSpec>().is_err());
        assert!("700 64px".parse::<FontSpec>().is_err());
    }

    #[test]
    fn test_defaults_round_trip() {
        for spec in FontSpec::defaults() {
            assert_eq!(spec.to_string().parse::<FontSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_gate_counts_outcomes() {
        let specs = vec![
            FontSpec::new(400, 22.0, "Inter"),
            FontSpec::new(700, 64.0, "Space Grotesk"),
            FontSpec::new(400, 16.0, "Comic Sans"),
        ];
        let report = pollster::block_on(FontPreloadGate::wait(
            &FakeSource,
            &ImmediateTimer,
            &specs,
            DEFAULT_FONT_TIMEOUT,
        ));
        assert_eq!(
            report,
            FontGateReport {
                loaded: 1,
                failed: 1,
                timed_out: 1
            }
        );
    }

    #[test]
    fn test_gate_is_bounded_by_timeout() {
        let start = Instant::now();
        let report = pollster::block_on(FontPreloadGate::wait(
            &FakeSource,
            &ThreadTimer,
            &[FontSpec::new(700, 64.0, "Space Grotesk")],
            Duration::from_millis(20),
        ));
        assert_eq!(report.timed_out, 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_empty_gate_completes() {
        let report = pollster::block_on(FontPreloadGate::wait(&FakeSource, &ThreadTimer, &[], DEFAULT_FONT_TIMEOUT));
        assert_eq!(report, FontGateReport::default());
    }
}
