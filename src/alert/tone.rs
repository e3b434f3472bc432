use std::f32::consts::PI;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::error;
use rodio::{OutputStream, Sink, Source};

use super::AlertSink;

enum ToneCommand {
    Start,
    Stop,
}

/// Audible alert: a pulsed tone looping until stopped.
///
/// rodio's output stream is not `Send`, so the stream and sink live on a
/// dedicated thread that is spawned lazily on the first `start` and fed
/// over a channel. Commands after the thread dies are dropped silently;
/// a missing audio device must never take the detection loop down.
pub struct ToneAlert {
    tx: Arc<Mutex<Option<Sender<ToneCommand>>>>,
}

impl ToneAlert {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Option<Sender<ToneCommand>> {
        let mut guard = self.tx.lock().ok()?;
        if let Some(tx) = guard.as_ref() {
            return Some(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<ToneCommand>();

        let spawned = thread::Builder::new()
            .name("alert-tone".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        ToneCommand::Start => {
                            if sink.is_some() {
                                continue;
                            }
                            let (stream, handle) = match OutputStream::try_default() {
                                Ok(pair) => pair,
                                Err(err) => {
                                    error!("no audio output for alert tone: {err}");
                                    continue;
                                }
                            };
                            let new_sink = match Sink::try_new(&handle) {
                                Ok(sink) => sink,
                                Err(err) => {
                                    error!("failed to open alert sink: {err}");
                                    continue;
                                }
                            };
                            new_sink.append(AlertPulse::new());
                            _stream = Some(stream);
                            sink = Some(new_sink);
                        }
                        ToneCommand::Stop => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                        }
                    }
                }
            });

        match spawned {
            Ok(_) => {
                *guard = Some(tx.clone());
                Some(tx)
            }
            Err(err) => {
                error!("failed to spawn alert tone thread: {err}");
                None
            }
        }
    }
}

impl Default for ToneAlert {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for ToneAlert {
    fn start(&self) {
        if let Some(tx) = self.ensure_thread() {
            let _ = tx.send(ToneCommand::Start);
        }
    }

    fn stop(&self) {
        if let Some(tx) = self.tx.lock().ok().and_then(|guard| guard.clone()) {
            let _ = tx.send(ToneCommand::Stop);
        }
    }
}

const TONE_FREQ_HZ: f32 = 880.0;
const PULSE_PERIOD_SECS: f32 = 0.7;

/// Infinite mono sine gated into on/off pulses. The gap between pulses
/// is what makes the alert read as an alarm rather than a steady hum.
struct AlertPulse {
    sample_rate: u32,
    num_sample: usize,
}

impl AlertPulse {
    fn new() -> Self {
        Self {
            sample_rate: 44100,
            num_sample: 0,
        }
    }
}

impl Iterator for AlertPulse {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.num_sample = self.num_sample.wrapping_add(1);

        let t = self.num_sample as f32 / self.sample_rate as f32;
        let in_pulse = (t % PULSE_PERIOD_SECS) < PULSE_PERIOD_SECS / 2.0;

        let sample = if in_pulse {
            (2.0 * PI * TONE_FREQ_HZ * t).sin()
        } else {
            0.0
        };

        Some(sample * 0.2) // Lower amplitude to prevent clipping
    }
}

impl Source for AlertPulse {
    fn current_frame_len(&self) -> Option<usize> {
        None // Infinite stream
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Infinite
    }
}
