//! Request/response dispatcher for the audio module
//!
//! One request is in flight at a time. Sending arms a single timeout;
//! any complete incoming frame cancels it. A newer send replaces the
//! pending one, so a reply is always attributed to the latest request.

use heapless::Deque;
use tunnel_hal::{ByteStream, Clock, Ticks};
use tunnel_protocol::{Feedback, Frame, ModuleEvent, MsgId};

use super::error::AudioError;
use crate::config::{AudioConfig, ConfigError};
use crate::timeout::Timeout;

/// Capacity of the dispatcher event queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Dispatcher between the host and one audio module
pub struct AudioModule<S: ByteStream, C: Clock> {
    stream: S,
    rx: Frame,
    tx: Frame,
    timeout: Timeout<C>,
    config: AudioConfig,
    request_window: C::Ticks,
    reset_window: C::Ticks,
    events: Deque<ModuleEvent, EVENT_QUEUE_DEPTH>,
    dropped_events: u32,
}

impl<S: ByteStream, C: Clock> AudioModule<S, C> {
    /// Create a dispatcher over `stream`, timing requests with `clock`
    ///
    /// Fails if the configured request windows do not fit the clock's
    /// tick type.
    pub fn new(stream: S, clock: C, config: AudioConfig) -> Result<Self, ConfigError> {
        config.validate_for::<C::Ticks>()?;
        Ok(Self {
            stream,
            rx: Frame::new(),
            tx: Frame::new(),
            timeout: Timeout::new(clock),
            request_window: C::Ticks::saturating_from_u32(config.request_timeout_ticks),
            reset_window: C::Ticks::saturating_from_u32(config.reset_timeout_ticks),
            config,
            events: Deque::new(),
            dropped_events: 0,
        })
    }

    /// Send a command and wait for its reply
    pub fn send_command(
        &mut self,
        msg_id: MsgId,
        param: u16,
        feedback: Feedback,
    ) -> Result<(), AudioError<S::Error>> {
        self.send(msg_id, param, feedback, self.request_window)
    }

    /// Send a query; the reply carries the answer so no ACK is requested
    pub fn send_query(&mut self, msg_id: MsgId) -> Result<(), AudioError<S::Error>> {
        self.send(msg_id, 0, Feedback::NoFeedback, self.request_window)
    }

    /// Reset the module, waiting the extended reset window for a reply
    ///
    /// Causes an audible click on the output.
    pub fn reset(&mut self) -> Result<(), AudioError<S::Error>> {
        self.send(MsgId::Reset, 0, Feedback::Feedback, self.reset_window)
    }

    fn send(
        &mut self,
        msg_id: MsgId,
        param: u16,
        feedback: Feedback,
        window: C::Ticks,
    ) -> Result<(), AudioError<S::Error>> {
        self.tx.set(msg_id, param, feedback);
        self.stream
            .write(self.tx.as_bytes())
            .map_err(AudioError::Stream)?;
        self.timeout.set(window);

        #[cfg(feature = "defmt")]
        defmt::trace!("audio tx {:02x}", self.tx.as_bytes());

        self.push_event(ModuleEvent::Sent(self.tx));
        Ok(())
    }

    /// Process incoming bytes and the request timeout
    ///
    /// Reads at most the number of bytes available on entry, so a stream
    /// that keeps filling cannot hold the caller here. Call periodically.
    pub fn poll(&mut self) {
        let pending = self.stream.available();
        for _ in 0..pending {
            let Some(byte) = self.stream.read() else {
                break;
            };
            if self.rx.receive(byte) {
                self.timeout.cancel();

                #[cfg(feature = "defmt")]
                defmt::trace!("audio rx {:02x}", self.rx.as_bytes());

                self.push_event(ModuleEvent::Received(self.rx));
            }
        }

        if self.timeout.expired() {
            self.timeout.cancel();

            #[cfg(feature = "defmt")]
            defmt::warn!("audio request 0x{:02x} timed out", self.tx.msg_id());

            self.push_event(ModuleEvent::TimedOut);
        }
    }

    /// Take the oldest queued event
    pub fn next_event(&mut self) -> Option<ModuleEvent> {
        self.events.pop_front()
    }

    /// Returns true while a request is awaiting its reply
    pub fn is_pending(&self) -> bool {
        self.timeout.active()
    }

    /// Events discarded because the queue was full
    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }

    /// The most recently encoded request
    pub fn last_sent(&self) -> &Frame {
        &self.tx
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    fn push_event(&mut self, event: ModuleEvent) {
        if self.events.is_full() {
            // Drop oldest
            self.events.pop_front();
            self.dropped_events = self.dropped_events.wrapping_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!("audio event queue full, dropped {}", self.dropped_events);
        }
        let _ = self.events.push_back(event);
    }
}
