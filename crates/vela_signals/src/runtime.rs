//! The tick runtime.
//!
//! Two interval tasks on one logical thread: a sampling loop that polls
//! each registered sampler and pushes bar targets, and a faster smoothing
//! loop that ticks the bars and republishes the dominant category. Start
//! and stop are idempotent; stopping freezes the bars at their last value
//! rather than resetting them.

use crate::bars::{Dominant, EmotionBars};
use crate::sampler::{IdleJitter, Sampler, SamplerMode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex, RwLock};
use vela_core::{EmotionEvent, EventBus, TopEmotion, VelaConfig};

pub struct SignalRuntime {
    bars: Arc<RwLock<EmotionBars>>,
    samplers: Arc<Mutex<Vec<Box<dyn Sampler>>>>,
    bus: EventBus,
    config: VelaConfig,
    epoch: Instant,

    dominant_tx: watch::Sender<Option<Dominant>>,
    dominant_rx: watch::Receiver<Option<Dominant>>,

    shutdown_tx: watch::Sender<bool>,
    running: bool,
}

impl SignalRuntime {
    pub fn new(config: VelaConfig, bus: EventBus) -> Self {
        let bars = EmotionBars::new(
            config.vocabulary.categories().map(|s| s.to_string()),
            config.smoothing.clone(),
        );
        let (dominant_tx, dominant_rx) = watch::channel(None);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            bars: Arc::new(RwLock::new(bars)),
            samplers: Arc::new(Mutex::new(Vec::new())),
            bus,
            config,
            epoch: Instant::now(),
            dominant_tx,
            dominant_rx,
            shutdown_tx,
            running: false,
        }
    }

    /// Milliseconds since runtime creation; the monotonic clock every
    /// observation and gate decision uses.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    pub async fn add_sampler(&self, sampler: Box<dyn Sampler>) {
        self.samplers.lock().await.push(sampler);
    }

    /// Subscribe to announced dominant-category updates.
    pub fn subscribe_dominant(&self) -> watch::Receiver<Option<Dominant>> {
        self.dominant_rx.clone()
    }

    pub async fn bars_snapshot(&self, category: &str) -> Option<crate::bars::SmoothedBar> {
        self.bars.read().await.get(category)
    }

    /// Spawn the sampling and smoothing loops. Calling twice is a no-op.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        let _ = self.shutdown_tx.send(false);

        self.spawn_sampling_loop();
        self.spawn_smoothing_loop();
    }

    /// Stop both loops. Idempotent; bars freeze at their last value.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let _ = self.shutdown_tx.send(true);
    }

    fn spawn_sampling_loop(&self) {
        let bars = Arc::clone(&self.bars);
        let samplers = Arc::clone(&self.samplers);
        let bus = self.bus.clone();
        let epoch = self.epoch;
        let interval_ms = self.config.sampler.interval_ms;
        let jitter = IdleJitter::new(self.config.sampler.idle_jitter);
        let mut shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
            // Indexed alongside the sampler list; one log per failing sampler
            let mut failure_reported: Vec<bool> = Vec::new();

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now_ms = epoch.elapsed().as_millis() as u64;
                        let mut any_active = false;

                        {
                            let mut samplers = samplers.lock().await;
                            let mut bars = bars.write().await;
                            if failure_reported.len() < samplers.len() {
                                failure_reported.resize(samplers.len(), false);
                            }
                            for (i, sampler) in samplers.iter_mut().enumerate() {
                                if sampler.mode() == SamplerMode::Idle {
                                    continue;
                                }
                                match sampler.sample(now_ms) {
                                    Ok(obs) if obs.is_well_formed() => {
                                        any_active = true;
                                        failure_reported[i] = false;
                                        bars.set_target(&obs.label, obs.score * 100.0);
                                        for (label, score) in sampler.background_targets() {
                                            bars.set_target(&label, score * 100.0);
                                        }
                                        bus.publish_emotion(EmotionEvent {
                                            source: obs.channel,
                                            top: TopEmotion::new(obs.label.clone(), obs.score),
                                            ts_ms: obs.ts_ms,
                                        });
                                    }
                                    Ok(obs) => {
                                        tracing::debug!(?obs, "malformed observation dropped");
                                    }
                                    Err(e) => {
                                        // Fail soft: log once per sampler, keep ticking
                                        if !failure_reported[i] {
                                            tracing::warn!(
                                                channel = %sampler.channel(),
                                                error = %e,
                                                "sampler entered placeholder mode"
                                            );
                                            failure_reported[i] = true;
                                        }
                                    }
                                }
                            }

                            // Idle jitter keeps the bars alive when nothing
                            // is actively sampling
                            if !any_active {
                                let categories: Vec<String> =
                                    bars.categories().map(|s| s.to_string()).collect();
                                for category in categories {
                                    bars.nudge_target(&category, jitter.nudge());
                                }
                            }
                        }

                        if !any_active {
                            tracing::trace!("idle jitter tick");
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            tracing::debug!("sampling loop stopped");
                            break;
                        }
                    }
                }
            }
        });
    }

    fn spawn_smoothing_loop(&self) {
        let bars = Arc::clone(&self.bars);
        let dominant_tx = self.dominant_tx.clone();
        let epoch = self.epoch;
        let tick_ms = self.config.smoothing.tick_ms;
        let mut shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now_ms = epoch.elapsed().as_millis() as u64;
                        // Smoothing completes before dominant re-evaluation
                        // inside tick(); the announcement goes out after.
                        let dominant = bars.write().await.tick(now_ms);
                        if let Some(d) = dominant {
                            let _ = dominant_tx.send(Some(d));
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            tracing::debug!("smoothing loop stopped");
                            break;
                        }
                    }
                }
            }
        });
    }
}
