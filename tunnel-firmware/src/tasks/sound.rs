//! Sound effects task
//!
//! Polls the audio module, classifies what it reports and feeds the
//! result to the effect tracker.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_rp::uart::BufferedUart;
use embassy_time::{Duration, Ticker};

use tunnel_core::audio::AudioModule;
use tunnel_core::config::AudioConfig;
use tunnel_core::sound::{SoundFx, Track};
use tunnel_drivers::{BusyPin, IoStream};
use tunnel_protocol::{classify, AudioEvent, Device};

use crate::clock::EmbassyClock;

/// Poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5;

/// Receive staging buffer; a few frames' worth
const RX_STAGING_SIZE: usize = 32;

/// Sound task - owns the audio link and the effect tracker
#[embassy_executor::task]
pub async fn sound_task(uart: BufferedUart, busy: Input<'static>, config: AudioConfig) {
    info!("Sound task started");

    let stream: IoStream<_, RX_STAGING_SIZE> = IoStream::new(uart);
    let mut audio = match AudioModule::new(stream, EmbassyClock, config) {
        Ok(audio) => audio,
        Err(e) => {
            error!("Invalid audio config: {:?}", e);
            return;
        }
    };
    let mut sfx = SoundFx::new(BusyPin::new(busy));

    if let Err(e) = sfx.begin(&mut audio) {
        warn!("Audio reset failed: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut dropped = 0;

    loop {
        ticker.next().await;
        audio.poll();

        while let Some(module_event) = audio.next_event() {
            for event in classify(&module_event) {
                log_event(&event);

                if let Err(e) = sfx.handle(&event, &mut audio) {
                    warn!("Audio write failed: {:?}", e);
                }

                // Start the ambient loop once the card shows it is there
                let sd_count = matches!(
                    event,
                    AudioEvent::DeviceFileCount {
                        device: Device::SdCard,
                        ..
                    }
                );
                if sd_count && sfx.has(Track::Ambient) && !sfx.is_busy() {
                    info!("Starting ambient loop");
                    if let Err(e) = sfx.play(Some(Track::Ambient), &mut audio) {
                        warn!("Audio write failed: {:?}", e);
                    }
                }
            }
        }

        if audio.dropped_events() != dropped {
            dropped = audio.dropped_events();
            warn!("Audio event queue overflowed, {} dropped", dropped);
        }
    }
}

fn log_event(event: &AudioEvent) {
    match event {
        AudioEvent::Error(code) => {
            warn!("Audio module error 0x{:04x}: {}", code.code(), code.description());
        }
        AudioEvent::MessageInvalid => warn!("Invalid message from audio module"),
        other => debug!("Audio event: {:?}", other),
    }
}
