/// Lazy decode streams
///
/// Each stream owns its `Session`, so independent streams never share state.
/// Results come out in arrival order: one per frame, successful or not.

use crate::config::SessionConfig;
use crate::decoder::{DecodeResult, Decoder};
use crate::framing::{DirectFrames, MulticastFrames};
use crate::protocol::{Decoded, Feed};
use crate::session::Session;
use log::warn;

pub struct DirectStream<'a> {
    frames: DirectFrames<'a>,
    session: Session,
}

impl<'a> DirectStream<'a> {
    pub fn new(buf: &'a [u8], session: Session) -> Self {
        DirectStream {
            frames: DirectFrames::new(buf),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bytes of input consumed so far
    pub fn position(&self) -> usize {
        self.frames.position()
    }
}

impl<'a> Iterator for DirectStream<'a> {
    type Item = DecodeResult<Decoded>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = match self.frames.next()? {
            Ok(frame) => frame,
            Err(e) => {
                warn!("direct record skipped: {}", e);
                return Some(Err(e));
            }
        };
        Some(Decoder::decode_direct(
            frame.code,
            frame.relative_ms,
            frame.body,
            &self.session,
        ))
    }
}

/// Multicast stream; ends after the first `TruncatedStream` error
pub struct MulticastStream<'a> {
    frames: MulticastFrames<'a>,
    session: Session,
}

impl<'a> MulticastStream<'a> {
    pub fn new(buf: &'a [u8], session: Session) -> Self {
        MulticastStream {
            frames: MulticastFrames::new(buf),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn blocks(&self) -> usize {
        self.frames.blocks()
    }
}

impl<'a> Iterator for MulticastStream<'a> {
    type Item = DecodeResult<Decoded>;

    fn next(&mut self) -> Option<Self::Item> {
        let sub = match self.frames.next()? {
            Ok(sub) => sub,
            Err(e) => {
                warn!("multicast framing: {}", e);
                return Some(Err(e));
            }
        };
        self.session.enter(sub.context);
        Some(Decoder::decode_multicast(sub.code, sub.body, &mut self.session))
    }
}

pub fn decode_direct<'a>(buf: &'a [u8], config: &SessionConfig) -> DirectStream<'a> {
    DirectStream::new(buf, Session::new(*config))
}

pub fn decode_multicast<'a>(buf: &'a [u8], config: &SessionConfig) -> MulticastStream<'a> {
    MulticastStream::new(buf, Session::new(*config))
}

/// Decode a whole buffer, handing every result to `callback`
///
/// Stops early when the callback returns `false`. Returns the number of
/// results delivered.
pub fn decode_stream<F>(feed: Feed, buf: &[u8], config: &SessionConfig, mut callback: F) -> usize
where
    F: FnMut(DecodeResult<Decoded>) -> bool,
{
    let mut count = 0;
    let results: Box<dyn Iterator<Item = DecodeResult<Decoded>> + '_> = match feed {
        Feed::Direct => Box::new(decode_direct(buf, config)),
        Feed::Multicast => Box::new(decode_multicast(buf, config)),
    };
    for result in results {
        count += 1;
        if !callback(result) {
            break;
        }
    }
    count
}
