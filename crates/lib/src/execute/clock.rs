//! CPU time sampling.
//!
//! The executor samples CPU time before and after a build and reports the
//! difference. The default clock reads `getrusage` for this process and its
//! reaped children, which covers the engine client processes the build spawns.

use tracing::debug;

/// Cumulative CPU seconds at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
  pub user: f64,
  pub system: f64,
}

impl CpuTimes {
  /// Time elapsed between `earlier` and `self`.
  pub fn since(self, earlier: CpuTimes) -> CpuTimes {
    CpuTimes {
      user: self.user - earlier.user,
      system: self.system - earlier.system,
    }
  }
}

pub trait CpuClock {
  fn sample(&self) -> CpuTimes;
}

/// Process-level CPU clock backed by `getrusage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCpuClock;

#[cfg(unix)]
impl CpuClock for ProcessCpuClock {
  fn sample(&self) -> CpuTimes {
    use nix::sys::resource::{UsageWho, getrusage};
    use nix::sys::time::TimeVal;

    fn seconds(tv: TimeVal) -> f64 {
      tv.tv_sec() as f64 + tv.tv_usec() as f64 / 1_000_000.0
    }

    let mut total = CpuTimes::default();
    for who in [UsageWho::RUSAGE_SELF, UsageWho::RUSAGE_CHILDREN] {
      match getrusage(who) {
        Ok(usage) => {
          total.user += seconds(usage.user_time());
          total.system += seconds(usage.system_time());
        }
        Err(e) => debug!(error = %e, "getrusage failed"),
      }
    }
    total
  }
}

#[cfg(not(unix))]
impl CpuClock for ProcessCpuClock {
  fn sample(&self) -> CpuTimes {
    debug!("cpu time sampling unsupported on this platform");
    CpuTimes::default()
  }
}
