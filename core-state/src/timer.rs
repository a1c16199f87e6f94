//! # Countdown Timer
//!
//! Counts down from `max_time` once per period. A run emits `max_time`
//! immediately, then one decremented value per tick, and stops on its own
//! once the remaining value would become negative (that value is not
//! emitted). [`CountdownTimer::start`] while running restarts from
//! `max_time`.
//!
//! Values are fanned out with a `broadcast` channel, so a [`time`] stream
//! spans every run of the timer; the stopped flag lives in a `watch`
//! channel.
//!
//! [`time`]: CountdownTimer::time

use crate::error::{Result, StateError};
use futures::stream::{self, Stream};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
const TICK_CAPACITY: usize = 64;

struct TimerInner {
    max_time: i64,
    period: Duration,
    ticks: broadcast::Sender<i64>,
    stopped: watch::Sender<bool>,
    run: Mutex<Option<CancellationToken>>,
}

impl TimerInner {
    /// Cancels the current run and raises the stopped flag.
    fn halt(&self) {
        if let Ok(mut run) = self.run.lock() {
            if let Some(token) = run.take() {
                token.cancel();
            }
            self.stopped.send_replace(true);
        }
    }

    /// Ends the run owning `token`, unless a restart already replaced it.
    ///
    /// Returns whether the flag was raised.
    fn expire(&self, token: &CancellationToken) -> bool {
        let Ok(mut run) = self.run.lock() else {
            return false;
        };
        // start() cancels the previous token under this lock
        if token.is_cancelled() {
            return false;
        }
        run.take();
        self.stopped.send_replace(true);
        true
    }
}

/// Restartable countdown.
pub struct CountdownTimer {
    inner: Arc<TimerInner>,
}

impl CountdownTimer {
    /// Timer ticking once per second.
    pub fn new(max_time: i64) -> Self {
        Self::with_period(max_time, DEFAULT_PERIOD)
    }

    pub fn with_period(max_time: i64, period: Duration) -> Self {
        let (ticks, _) = broadcast::channel(TICK_CAPACITY);
        let (stopped, _) = watch::channel(true);
        Self {
            inner: Arc::new(TimerInner {
                max_time,
                period,
                ticks,
                stopped,
                run: Mutex::new(None),
            }),
        }
    }

    pub fn max_time(&self) -> i64 {
        self.inner.max_time
    }

    /// Whether a run is in progress.
    pub fn is_active(&self) -> bool {
        !*self.inner.stopped.borrow()
    }

    /// Starts (or restarts) the countdown from `max_time`.
    ///
    /// Fails when called outside a Tokio runtime.
    pub fn start(&self) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| StateError::RuntimeUnavailable(e.to_string()))?;

        let token = CancellationToken::new();
        {
            let mut run = self
                .inner
                .run
                .lock()
                .map_err(|_| StateError::RuntimeUnavailable("timer lock poisoned".to_string()))?;
            if let Some(previous) = run.replace(token.clone()) {
                previous.cancel();
            }
            self.inner.stopped.send_replace(false);
        }

        debug!(max_time = self.inner.max_time, "Timer started");

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            let mut ticker = interval(inner.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut elapsed: i64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let remaining = inner.max_time - elapsed;
                        if remaining < 0 {
                            if inner.expire(&token) {
                                debug!("Timer expired");
                            }
                            break;
                        }
                        trace!(remaining, "Timer tick");
                        // No subscribers is fine
                        let _ = inner.ticks.send(remaining);
                        elapsed += 1;
                    }
                }
            }
        });

        Ok(())
    }

    /// Stops the current run, if any.
    pub fn stop(&self) {
        self.inner.halt();
    }

    /// Countdown values of every run started after subscribing.
    pub fn time(&self) -> impl Stream<Item = i64> + Send + 'static {
        let rx = self.inner.ticks.subscribe();
        stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(value) => return Some((value, rx)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }

    /// The stopped flag: its current value, then every change.
    pub fn stopped(&self) -> impl Stream<Item = bool> + Send + 'static {
        let rx = self.inner.stopped.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let value = *rx.borrow_and_update();
            Some((value, (rx, false)))
        })
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.inner.halt();
    }
}
