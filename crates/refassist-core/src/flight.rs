//! Single-flight controls and the shared progress indicator.
//!
//! Both are released by dropping a guard, so a round-trip that fails, returns
//! early, or unwinds still re-enables its control and hides the indicator.
//! Guards are `Send` so they can travel with a job onto a runtime worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Per-operation "control disabled while in flight" flag.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the control. `None` if an invocation is already in flight.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds a [`SingleFlight`] control disabled until dropped.
#[derive(Debug)]
pub struct FlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Indeterminate progress indicator, visible while any holder exists.
#[derive(Debug, Clone, Default)]
pub struct Indicator {
    holders: Arc<AtomicUsize>,
}

impl Indicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self) -> IndicatorGuard {
        self.holders.fetch_add(1, Ordering::AcqRel);
        IndicatorGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }
}

#[derive(Debug)]
pub struct IndicatorGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for IndicatorGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}

/// The controls each orchestrator operation guards itself with.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    /// The "Check" control.
    pub check: SingleFlight,
    /// The "Process files" control.
    pub extract: SingleFlight,
    /// The "Download report" control.
    pub download: SingleFlight,
    pub progress: Indicator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let flight = SingleFlight::new();
        let guard = flight.try_acquire().expect("first acquire");
        assert!(flight.is_busy());
        assert!(flight.try_acquire().is_none());
        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_acquire().is_some());
    }

    #[test]
    fn indicator_counts_overlapping_holders() {
        let indicator = Indicator::new();
        let a = indicator.show();
        let b = indicator.show();
        drop(a);
        assert!(indicator.is_visible());
        drop(b);
        assert!(!indicator.is_visible());
    }

    #[test]
    fn guard_released_on_unwind() {
        let flight = SingleFlight::new();
        let cloned = flight.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = cloned.try_acquire().unwrap();
            panic!("fault while in flight");
        });
        assert!(result.is_err());
        assert!(!flight.is_busy());
    }
}
