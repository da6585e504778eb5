use std::{future::Future, time::Duration};

use tokio::{sync::watch, time::Instant};
use tracing::warn;

use nest_common::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub attempts: u32,
    pub failures: u32,
    pub cancelled: bool,
}

pub async fn poll_for<F, Fut, T>(
    duration: Duration,
    interval: Duration,
    shutdown: &mut watch::Receiver<bool>,
    mut read: F,
) -> PollReport
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut report = PollReport {
        attempts: 0,
        failures: 0,
        cancelled: false,
    };

    if *shutdown.borrow() {
        report.cancelled = true;
        return report;
    }

    attempt(&mut read, &mut report).await;

    let start = Instant::now();
    while start.elapsed() < duration {
        attempt(&mut read, &mut report).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop_requested(shutdown) => {
                report.cancelled = true;
                break;
            }
        }
    }

    report
}

async fn attempt<F, Fut, T>(read: &mut F, report: &mut PollReport)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    report.attempts += 1;
    if let Err(err) = read().await {
        report.failures += 1;
        warn!("thermostat read failed: {err}");
    }
}

// `None` when a stop is requested before `work` completes.
pub async fn unless_stopped<F: Future>(
    shutdown: &mut watch::Receiver<bool>,
    work: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = stop_requested(shutdown) => None,
        output = work => Some(output),
    }
}

async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender can never request a stop.
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
