//! Liveness sampling
//!
//! Each displayed instance gets a periodic sampler that probes its health
//! endpoint and appends to a bounded rolling window. Sampler tasks are
//! bound to the instance's display lifetime: the handle must be released
//! when the instance disappears, which aborts the timer. An orphaned
//! sampler is a resource leak, so [`SamplerHandle`] also aborts on drop.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::node::NodeApiClient;
use crate::types::Result;

/// Window capacity: 10 retained samples plus the newly appended one
/// before the oldest is trimmed.
pub const WINDOW_CAPACITY: usize = 11;

/// Default sampling interval
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Bounded rolling window of liveness samples for one instance
#[derive(Debug, Clone, Default)]
pub struct LivenessWindow {
    samples: VecDeque<f64>,
}

impl LivenessWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Append a sample, trimming the oldest once the window is full.
    /// Length never exceeds [`WINDOW_CAPACITY`].
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() >= WINDOW_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Samples in arrival order, oldest first
    pub fn samples(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Source of liveness samples for one instance
#[async_trait]
pub trait UptimeProbe: Send + Sync {
    async fn sample(&self) -> Result<f64>;
}

/// Probe backed by an instance's unauthenticated health endpoint,
/// sampling response latency in milliseconds.
pub struct HealthEndpointProbe {
    client: NodeApiClient,
    endpoint: String,
}

impl HealthEndpointProbe {
    pub fn new(client: NodeApiClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl UptimeProbe for HealthEndpointProbe {
    async fn sample(&self) -> Result<f64> {
        self.client.probe_health(&self.endpoint).await
    }
}

/// Handle to a running sampler task.
///
/// Aborts the task on [`cancel`](Self::cancel) or drop so no timer can
/// outlive the instance it samples.
pub struct SamplerHandle {
    window: Arc<Mutex<LivenessWindow>>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Shared handle to the sampler's window
    pub fn window(&self) -> Arc<Mutex<LivenessWindow>> {
        Arc::clone(&self.window)
    }

    /// Snapshot of the current window, oldest first
    pub async fn samples(&self) -> Vec<f64> {
        self.window.lock().await.samples()
    }

    /// Stop the sampler
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a periodic sampler for one instance.
///
/// With a probe configured, each tick appends the probe's sample; a probe
/// failure skips that tick. Without a probe, a synthetic random sample in
/// `0..10` stands in so the window still moves.
pub fn spawn_sampler(probe: Option<Arc<dyn UptimeProbe>>, interval: Duration) -> SamplerHandle {
    let window = Arc::new(Mutex::new(LivenessWindow::new()));

    let task = tokio::spawn({
        let window = Arc::clone(&window);
        async move {
            loop {
                tokio::time::sleep(interval).await;

                let sample = match &probe {
                    Some(probe) => match probe.sample().await {
                        Ok(value) => value,
                        Err(e) => {
                            debug!(error = %e, "Liveness probe failed, skipping tick");
                            continue;
                        }
                    },
                    None => rand::thread_rng().gen::<f64>() * 10.0,
                };

                window.lock().await.push(sample);
            }
        }
    });

    SamplerHandle { window, task }
}

/// Samplers keyed by (host identifier, instance index).
///
/// Binding a key again replaces (and thereby aborts) the previous sampler;
/// releasing a host or clearing the set aborts every affected timer.
#[derive(Default)]
pub struct SamplerSet {
    samplers: HashMap<(String, usize), SamplerHandle>,
}

impl SamplerSet {
    pub fn new() -> Self {
        Self {
            samplers: HashMap::new(),
        }
    }

    pub fn bind(&mut self, host: &str, instance: usize, handle: SamplerHandle) {
        self.samplers.insert((host.to_string(), instance), handle);
    }

    pub fn get(&self, host: &str, instance: usize) -> Option<&SamplerHandle> {
        self.samplers.get(&(host.to_string(), instance))
    }

    /// Release every sampler belonging to one host
    pub fn release_host(&mut self, host: &str) {
        self.samplers.retain(|(h, _), _| h != host);
    }

    pub fn clear(&mut self) {
        self.samplers.clear();
    }

    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_stays_bounded() {
        let mut window = LivenessWindow::new();
        for i in 0..30 {
            window.push(i as f64);
            assert!(window.len() <= WINDOW_CAPACITY);
        }
        assert_eq!(window.len(), WINDOW_CAPACITY);
    }

    #[test]
    fn test_window_trims_oldest() {
        let mut window = LivenessWindow::new();
        for i in 1..=11 {
            window.push(i as f64);
        }
        assert_eq!(window.samples()[0], 1.0);

        // Append #12 evicts the oldest of the original 11
        window.push(12.0);
        let samples = window.samples();
        assert_eq!(samples.len(), WINDOW_CAPACITY);
        assert_eq!(samples[0], 2.0);
        assert_eq!(window.latest(), Some(12.0));
    }

    #[tokio::test]
    async fn test_sampler_synthetic_fallback() {
        let handle = spawn_sampler(None, Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(60)).await;

        let samples = handle.samples().await;
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| (0.0..10.0).contains(s)));
    }

    #[tokio::test]
    async fn test_cancel_stops_sampling() {
        let handle = spawn_sampler(None, Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(30)).await;

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let frozen = handle.samples().await.len();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(handle.samples().await.len(), frozen);
    }

    #[tokio::test]
    async fn test_sampler_set_releases_timers() {
        let mut set = SamplerSet::new();
        set.bind("host-a", 0, spawn_sampler(None, Duration::from_millis(5)));
        set.bind("host-a", 1, spawn_sampler(None, Duration::from_millis(5)));
        set.bind("host-b", 0, spawn_sampler(None, Duration::from_millis(5)));
        assert_eq!(set.len(), 3);

        // Dropping the handles aborts the tasks
        let window = set.get("host-b", 0).unwrap().window();
        set.clear();
        assert!(set.is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let frozen = window.lock().await.len();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(window.lock().await.len(), frozen);
    }

    #[tokio::test]
    async fn test_failing_probe_skips_tick() {
        struct FailingProbe;

        #[async_trait]
        impl UptimeProbe for FailingProbe {
            async fn sample(&self) -> Result<f64> {
                Err(crate::types::LookoutError::Probe("down".into()))
            }
        }

        let handle = spawn_sampler(Some(Arc::new(FailingProbe)), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(handle.samples().await.is_empty());
    }
}
