// src/controller.rs
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::api::StateBackend;
use crate::debounce::Debouncer;
use crate::render::{
    render_preview, Badge, Preview, TEXT_CONNECTED, TEXT_DISCONNECTED, TEXT_SAVED,
    TEXT_SAVE_ERROR,
};
use crate::state::{parse_count, DeviceState, RemoteState, SaveReceipt};

pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// How requests leave the UI thread.
#[derive(Clone)]
pub enum Executor {
    /// One worker thread per request. `waker` is called once the outcome is
    /// queued so the UI can repaint.
    Threaded { waker: Option<Waker> },
    /// Run the request on the caller's thread. Outcomes still wait for `tick`.
    Inline,
}

enum Outcome {
    Loaded(anyhow::Result<RemoteState>),
    Saved(anyhow::Result<SaveReceipt>),
}

/// Values mirrored into the input widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inputs {
    pub color: String,
    pub count: String,
}

pub struct Controller {
    state: DeviceState,
    preview: Preview,
    badge: Badge,
    inputs: Inputs,
    debouncer: Debouncer,
    backend: Arc<dyn StateBackend>,
    executor: Executor,
    tx: Sender<(u64, Outcome)>,
    rx: Receiver<(u64, Outcome)>,
    next_seq: u64,
    last_applied: u64,
}

impl Controller {
    pub fn new(backend: Arc<dyn StateBackend>, executor: Executor, delay: Duration) -> Self {
        let state = DeviceState::default();
        let (tx, rx) = mpsc::channel();
        Self {
            preview: render_preview(&state),
            inputs: Inputs {
                color: state.color.clone(),
                count: state.count.to_string(),
            },
            state,
            badge: Badge::default(),
            debouncer: Debouncer::new(delay),
            backend,
            executor,
            tx,
            rx,
            next_seq: 0,
            last_applied: 0,
        }
    }

    /// Draw the defaults and kick off the initial load.
    pub fn start(&mut self) {
        self.redraw();
        self.load_state();
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn badge(&self) -> &Badge {
        &self.badge
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn on_color_input(&mut self, color: &str, now: Instant) {
        self.inputs.color = color.to_string();
        self.state.set_color(color);
        self.redraw();
        self.debouncer.schedule(now);
    }

    pub fn on_count_input(&mut self, text: &str, now: Instant) {
        self.inputs.count = text.to_string();
        self.state.count = parse_count(text);
        self.redraw();
        self.debouncer.schedule(now);
    }

    /// Blank the strip and save right away.
    pub fn turn_off(&mut self) {
        self.state.set_count(0);
        self.inputs.count = "0".to_string();
        self.redraw();
        self.save_state();
    }

    pub fn save_now(&mut self) {
        self.save_state();
    }

    /// Time left before a debounced save fires, if one is pending.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    /// Fire a due save, then apply every finished request in arrival order.
    pub fn tick(&mut self, now: Instant) {
        if self.debouncer.poll(now) {
            self.save_state();
        }
        while let Ok((seq, outcome)) = self.rx.try_recv() {
            self.apply(seq, outcome);
        }
    }

    pub fn load_state(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.dispatch(move || Outcome::Loaded(backend.fetch()));
    }

    pub fn save_state(&mut self) {
        let payload = self.state.update_payload();
        let backend = Arc::clone(&self.backend);
        tracing::debug!(color = %payload.color, count = payload.count, "saving state");
        self.dispatch(move || Outcome::Saved(backend.store(&payload)));
    }

    fn dispatch<F>(&mut self, job: F)
    where
        F: FnOnce() -> Outcome + Send + 'static,
    {
        self.next_seq += 1;
        let seq = self.next_seq;
        let tx = self.tx.clone();
        match &self.executor {
            Executor::Inline => {
                let _ = tx.send((seq, job()));
            }
            Executor::Threaded { waker } => {
                let waker = waker.clone();
                thread::spawn(move || {
                    let _ = tx.send((seq, job()));
                    if let Some(wake) = waker {
                        wake();
                    }
                });
            }
        }
    }

    fn apply(&mut self, seq: u64, outcome: Outcome) {
        if seq < self.last_applied {
            tracing::debug!(seq, last = self.last_applied, "response arrived out of order");
        }
        self.last_applied = self.last_applied.max(seq);

        match outcome {
            Outcome::Loaded(Ok(remote)) => {
                self.state.apply_remote(remote);
                self.inputs.color = self.state.color.clone();
                self.inputs.count = self.state.count.to_string();
                self.redraw();
                self.badge.set(true, TEXT_CONNECTED);
                tracing::info!(seq, color = %self.state.color, count = self.state.count, "state loaded");
            }
            Outcome::Loaded(Err(e)) => {
                self.badge.set(false, TEXT_DISCONNECTED);
                tracing::warn!(seq, "load failed: {e:#}");
            }
            Outcome::Saved(Ok(receipt)) => {
                self.state.merge_receipt(receipt);
                self.redraw();
                self.badge.set(true, TEXT_SAVED);
                tracing::debug!(seq, rev = ?self.state.rev, "state saved");
            }
            Outcome::Saved(Err(e)) => {
                self.badge.set(false, TEXT_SAVE_ERROR);
                tracing::error!(seq, "save failed: {e:#}");
            }
        }
    }

    fn redraw(&mut self) {
        self.preview = render_preview(&self.state);
    }
}
