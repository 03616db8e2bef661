use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::{probe_dimensions, NaturalSize, ProbeError, ProbeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Pending,
    Loaded(NaturalSize),
    Failed,
    TimedOut,
}

impl ProbeStatus {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A dimension probe running on a worker thread.
///
/// Polled from the UI loop; once finished, the status sticks.
#[derive(Debug)]
pub struct PendingProbe {
    rx: mpsc::Receiver<ProbeResult<NaturalSize>>,
    deadline: Instant,
    finished: Option<ProbeStatus>,
}

pub fn spawn_probe(data_url: String, timeout: Duration) -> PendingProbe {
    spawn_probe_with(move || probe_dimensions(&data_url), timeout)
}

pub fn spawn_probe_with<W>(work: W, timeout: Duration) -> PendingProbe
where
    W: FnOnce() -> ProbeResult<NaturalSize> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });
    PendingProbe {
        rx,
        deadline: Instant::now() + timeout,
        finished: None,
    }
}

impl PendingProbe {
    pub fn poll(&mut self) -> ProbeStatus {
        if let Some(status) = self.finished {
            return status;
        }
        let status = match self.rx.try_recv() {
            Ok(result) => Self::status_for(result),
            Err(mpsc::TryRecvError::Disconnected) => {
                Self::status_for(Err(ProbeError::WorkerDisconnected))
            }
            Err(mpsc::TryRecvError::Empty) if Instant::now() >= self.deadline => {
                tracing::warn!("image dimension probe timed out; keeping default size");
                ProbeStatus::TimedOut
            }
            Err(mpsc::TryRecvError::Empty) => return ProbeStatus::Pending,
        };
        self.finished = Some(status);
        status
    }

    /// Blocks until the probe reports or the deadline passes.
    pub fn wait(&mut self) -> ProbeStatus {
        if let Some(status) = self.finished {
            return status;
        }
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        let status = match self.rx.recv_timeout(remaining) {
            Ok(result) => Self::status_for(result),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Self::status_for(Err(ProbeError::WorkerDisconnected))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!("image dimension probe timed out; keeping default size");
                ProbeStatus::TimedOut
            }
        };
        self.finished = Some(status);
        status
    }

    fn status_for(result: ProbeResult<NaturalSize>) -> ProbeStatus {
        match result {
            Ok(size) => ProbeStatus::Loaded(size),
            Err(err) => {
                tracing::warn!(%err, "image dimension probe failed; keeping default size");
                ProbeStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_reports_loaded_size() {
        let mut probe = spawn_probe_with(
            || Ok(NaturalSize::new(640, 480)),
            Duration::from_secs(5),
        );
        assert_eq!(probe.wait(), ProbeStatus::Loaded(NaturalSize::new(640, 480)));
        assert_eq!(probe.poll(), ProbeStatus::Loaded(NaturalSize::new(640, 480)));
    }

    #[test]
    fn failed_probe_reports_failure() {
        let mut probe =
            spawn_probe("data:image/png;base64,@@@".to_string(), Duration::from_secs(5));
        assert_eq!(probe.wait(), ProbeStatus::Failed);
    }

    #[test]
    fn stalled_probe_times_out_and_stays_timed_out() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let mut probe = spawn_probe_with(
            move || {
                let _ = release_rx.recv();
                Ok(NaturalSize::new(1, 1))
            },
            Duration::ZERO,
        );
        assert_eq!(probe.poll(), ProbeStatus::TimedOut);
        let _ = release_tx.send(());
        assert_eq!(probe.wait(), ProbeStatus::TimedOut);
    }

    #[test]
    fn poll_is_pending_before_deadline() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let mut probe = spawn_probe_with(
            move || {
                let _ = release_rx.recv();
                Ok(NaturalSize::new(2, 3))
            },
            Duration::from_secs(30),
        );
        assert_eq!(probe.poll(), ProbeStatus::Pending);
        release_tx.send(()).expect("worker should be waiting");
        assert_eq!(probe.wait(), ProbeStatus::Loaded(NaturalSize::new(2, 3)));
    }
}
