/// Forwarding stage
///
/// Decoding produces values; a `MessageSink` consumes them. `Pipeline` runs
/// a stream into a sink, counting every outcome. Neither a bad message nor a
/// failing sink stops the stream.

use crate::config::SessionConfig;
use crate::decoder::DecodeResult;
use crate::protocol::Decoded;
use crate::stats::DecodeStats;
use crate::stream;
use log::warn;
use std::error::Error;

pub type SinkError = Box<dyn Error + Send + Sync>;

/// Downstream consumer of decoded messages
pub trait MessageSink {
    fn forward(&mut self, message: &Decoded) -> Result<(), SinkError>;
}

impl MessageSink for Vec<Decoded> {
    fn forward(&mut self, message: &Decoded) -> Result<(), SinkError> {
        self.push(message.clone());
        Ok(())
    }
}

/// Sink backed by a closure
pub struct FnSink<F>(F);

pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&Decoded) -> Result<(), SinkError>,
{
    FnSink(f)
}

impl<F> MessageSink for FnSink<F>
where
    F: FnMut(&Decoded) -> Result<(), SinkError>,
{
    fn forward(&mut self, message: &Decoded) -> Result<(), SinkError> {
        (self.0)(message)
    }
}

pub struct Pipeline<S> {
    config: SessionConfig,
    sink: S,
    stats: DecodeStats,
}

impl<S: MessageSink> Pipeline<S> {
    pub fn new(config: SessionConfig, sink: S) -> Self {
        Pipeline {
            config,
            sink,
            stats: DecodeStats::new(),
        }
    }

    /// Decode a direct-feed buffer and forward every message in order
    pub fn run_direct(&mut self, buf: &[u8]) -> &DecodeStats {
        self.stats.record_input(buf.len());
        for result in stream::decode_direct(buf, &self.config) {
            self.handle(result);
        }
        &self.stats
    }

    /// Decode a multicast buffer and forward every message in order
    pub fn run_multicast(&mut self, buf: &[u8]) -> &DecodeStats {
        self.stats.record_input(buf.len());
        let mut messages = stream::decode_multicast(buf, &self.config);
        for result in messages.by_ref() {
            self.handle(result);
        }
        self.stats.record_blocks(messages.blocks());
        self.stats.record_gaps(messages.session().gaps().gap_count());
        &self.stats
    }

    fn handle(&mut self, result: DecodeResult<Decoded>) {
        match result {
            Ok(decoded) => {
                self.stats.record_decoded(decoded.message_type);
                if let Err(e) = self.sink.forward(&decoded) {
                    warn!("sink rejected {:?}: {}", decoded.message_type, e);
                    self.stats.record_sink_failure();
                }
            }
            // already logged where they were detected
            Err(e) => self.stats.record_error(&e),
        }
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
