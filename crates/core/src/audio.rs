//! Non-blocking playback of the per-month audio clips.
//!
//! The GUI thread never touches the audio device. It sends commands to a
//! dedicated playback thread which owns the output stream and at most one
//! live sink; starting a new clip replaces (and thereby stops) the prior
//! one.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use rodio::{buffer::SamplesBuffer, OutputStream, Sink};

/// Command sent to the playback thread.
pub enum PlayerCommand {
    /// Decode a WAV file and play it, replacing any current clip.
    PlayFile(PathBuf),
    /// Stop playback. No-op if nothing is playing.
    Stop,
}

/// Shared playback state readable from the GUI thread.
#[derive(Clone)]
pub struct PlayerState {
    is_playing: Arc<Mutex<bool>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            is_playing: Arc::new(Mutex::new(false)),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_playing(&self) -> bool {
        *self.is_playing.lock().unwrap()
    }

    fn set_playing(&self, playing: bool) {
        *self.is_playing.lock().unwrap() = playing;
    }

    /// Store an error message from the playback thread.
    pub fn set_error(&self, msg: String) {
        *self.last_error.lock().unwrap() = Some(msg);
    }

    /// Take the last error, clearing it.
    pub fn take_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().take()
    }
}

/// Handle to the playback thread.
///
/// Send work via [`Player::play_file`] / [`Player::stop`], read playback
/// state from `state`.
pub struct Player {
    command_tx: mpsc::Sender<PlayerCommand>,
    pub state: PlayerState,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create the player and spawn its playback thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let state = PlayerState::new();

        let thread_state = state.clone();
        std::thread::Builder::new()
            .name("clip-player".into())
            .spawn(move || {
                player_thread(rx, thread_state);
            })
            .expect("Failed to spawn playback thread");

        Self {
            command_tx: tx,
            state,
        }
    }

    fn send(&self, cmd: PlayerCommand) {
        if self.command_tx.send(cmd).is_err() {
            log::error!("Playback thread is not running (channel closed)");
            self.state
                .set_error("Playback thread stopped unexpectedly".into());
        }
    }

    /// Play the clip at `path`, replacing any current clip.
    pub fn play_file(&self, path: impl Into<PathBuf>) {
        self.send(PlayerCommand::PlayFile(path.into()));
    }

    /// Stop playback. Idempotent.
    pub fn stop(&self) {
        self.send(PlayerCommand::Stop);
    }
}

/// Read a WAV file and return (samples_f32, sample_rate).
///
/// - Normalizes int16/int32 PCM to f32 in [-1, 1]
/// - Passes through float WAVs
/// - Takes the first channel if stereo/multi-channel
fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .enumerate()
                .filter_map(|(i, s)| {
                    // Take first channel only
                    if i % channels == 0 {
                        Some(s.map(|v| v as f32 / max_val))
                    } else {
                        let _ = s;
                        None
                    }
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to read WAV samples")?
        }
        SampleFormat::Float => {
            reader
                .into_samples::<f32>()
                .enumerate()
                .filter_map(|(i, s)| if i % channels == 0 { Some(s) } else { None })
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to read WAV samples")?
        }
    };

    Ok((samples, sample_rate))
}

fn process_command(
    cmd: PlayerCommand,
    stream_handle: Option<&rodio::OutputStreamHandle>,
    sink: &mut Option<Sink>,
    state: &PlayerState,
) {
    match cmd {
        PlayerCommand::PlayFile(path) => {
            // Decode before touching the live sink, so a missing or broken
            // file leaves current playback exactly as it was.
            let (samples, sample_rate) = match read_wav_mono(&path) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::error!("Skipping playback: {e:#}");
                    state.set_error(format!("Audio clip: {e}"));
                    return;
                }
            };
            if samples.is_empty() {
                log::warn!("Audio clip is empty: {}", path.display());
                return;
            }

            if let Some(handle) = stream_handle {
                // At-most-one-active: dropping the old sink stops it.
                drop(sink.take());
                match Sink::try_new(handle) {
                    Ok(new_sink) => {
                        let duration_s = samples.len() as f64 / f64::from(sample_rate);
                        new_sink.append(SamplesBuffer::new(1, sample_rate, samples));
                        new_sink.play();
                        *sink = Some(new_sink);
                        state.set_playing(true);
                        log::debug!(
                            "Playing {} ({:.2}s at {} Hz)",
                            path.display(),
                            duration_s,
                            sample_rate
                        );
                    }
                    Err(e) => {
                        log::error!("Failed to create audio sink: {e}");
                        state.set_error(format!("Audio sink: {e}"));
                    }
                }
            } else {
                state.set_error("No audio output device available".into());
            }
        }
        PlayerCommand::Stop => {
            drop(sink.take());
            state.set_playing(false);
        }
    }
}

fn player_thread(rx: mpsc::Receiver<PlayerCommand>, state: PlayerState) {
    // Try to open audio output; if it fails, the thread still consumes
    // commands so senders never block or panic.
    // OutputStream must stay alive for the entire thread lifetime.
    let audio = match OutputStream::try_default() {
        Ok(pair) => {
            log::info!("Clip player: audio device opened successfully");
            Some(pair)
        }
        Err(e) => {
            log::error!("Failed to open audio output: {e}");
            state.set_error(format!("Audio device: {e}"));
            None
        }
    };
    let stream_handle = audio.as_ref().map(|(_, h)| h);

    // A fresh Sink per clip: Sink::stop() permanently kills a sink, so the
    // old one is simply dropped when a new clip starts.
    let mut sink: Option<Sink> = None;

    loop {
        match rx.recv_timeout(Duration::from_millis(10)) {
            Ok(cmd) => {
                process_command(cmd, stream_handle, &mut sink, &state);
                // Drain any additional pending commands without blocking
                while let Ok(cmd) = rx.try_recv() {
                    process_command(cmd, stream_handle, &mut sink, &state);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // No commands — fall through to the finished-clip check
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // Sender dropped, shut down the thread
                break;
            }
        }

        if let Some(ref s) = sink {
            if s.empty() {
                state.set_playing(false);
                sink = None;
            }
        }
    }
}
