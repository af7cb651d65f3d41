// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticker abstraction for the waits between driver steps
//!
//! Drivers never call `tokio::time::sleep` directly. Production code uses
//! [`TokioTicker`]; tests use [`FakeTicker`], which moves a [`FakeClock`]
//! forward instead of waiting, so a full pipeline runs in virtual time.

use crate::clock::FakeClock;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Suspends the caller for a simulated amount of time
#[async_trait]
pub trait Ticker: Clone + Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// Ticker backed by the tokio timer
#[derive(Clone, Default)]
pub struct TokioTicker;

#[async_trait]
impl Ticker for TokioTicker {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Ticker that advances a fake clock and returns immediately
#[derive(Clone)]
pub struct FakeTicker {
    clock: FakeClock,
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl FakeTicker {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            slept: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every duration slept so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Total virtual time slept
    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Ticker for FakeTicker {
    async fn sleep(&self, duration: Duration) {
        self.clock.advance(duration);
        self.slept
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;

    #[tokio::test]
    async fn fake_ticker_advances_clock() {
        let clock = FakeClock::new();
        let ticker = FakeTicker::new(clock.clone());
        let start = clock.now();

        ticker.sleep(Duration::from_secs(3)).await;
        ticker.sleep(Duration::from_millis(500)).await;

        assert_eq!(ticker.total(), Duration::from_millis(3500));
        assert_eq!(
            clock.now() - start,
            chrono::TimeDelta::milliseconds(3500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_waits_on_virtual_timer() {
        let before = tokio::time::Instant::now();
        TokioTicker.sleep(Duration::from_secs(10)).await;
        assert!(before.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn tokio_ticker_zero_duration_yields() {
        TokioTicker.sleep(Duration::ZERO).await;
    }
}
