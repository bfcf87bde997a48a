/// Frame readers for both wire variants
///
/// Direct feed: one record per line,
///   [marker(1)][timestamp(7 ASCII digits, ms)][type(1)][body]
///
/// Multicast feed: sequence blocks,
///   [block_length: u16][message_count: u8][unit: u8][sequence: u32]
/// followed by `message_count` sub-messages of
///   [length: u8][type: u8][body: length - 2]
/// All integers little-endian. `block_length` includes the block header.
///
/// Readers advance strictly by declared lengths and never re-derive offsets
/// from content.

use crate::catalog::{self, DIRECT_PREFIX_WIDTH};
use crate::codec::{Decimal, NumericCodec};
use crate::decoder::{DecodeError, DecodeResult};
use crate::session::SequenceContext;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

pub const DIRECT_TIMESTAMP_WIDTH: usize = 7;
pub const BLOCK_HEADER_SIZE: usize = 8;
pub const MESSAGE_HEADER_SIZE: usize = 2;

/// One direct-feed record split into prefix and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectFrame<'a> {
    /// Byte offset of the record in the input
    pub offset: usize,
    pub relative_ms: u32,
    pub code: u8,
    pub body: &'a [u8],
}

/// Line reader for the direct feed
///
/// Empty lines are skipped. Records whose type code is not in the catalog are
/// dropped without being reported.
pub struct DirectFrames<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DirectFrames<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        DirectFrames { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_line(&mut self) -> Option<(usize, &'a [u8])> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.buf[start..];
        let line = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos = start + end + 1;
                &rest[..end]
            }
            None => {
                self.pos = self.buf.len();
                rest
            }
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Some((start, line))
    }

    fn split(offset: usize, line: &'a [u8]) -> DecodeResult<DirectFrame<'a>> {
        if line.len() < DIRECT_PREFIX_WIDTH {
            return Err(DecodeError::TruncatedMessage {
                kind: "record prefix",
                need: DIRECT_PREFIX_WIDTH,
                have: line.len(),
            });
        }
        let digits = &line[1..1 + DIRECT_TIMESTAMP_WIDTH];
        let relative_ms = Decimal::unsigned(digits).map_err(|reason| DecodeError::MalformedField {
            kind: "record prefix",
            field: "timestamp",
            reason,
        })?;
        Ok(DirectFrame {
            offset,
            // seven digits always fit
            relative_ms: relative_ms as u32,
            code: line[DIRECT_PREFIX_WIDTH - 1],
            body: &line[DIRECT_PREFIX_WIDTH..],
        })
    }
}

impl<'a> Iterator for DirectFrames<'a> {
    type Item = DecodeResult<DirectFrame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (offset, line) = self.next_line()?;
            if line.is_empty() {
                continue;
            }
            if let Some(&code) = line.get(DIRECT_PREFIX_WIDTH - 1) {
                if !catalog::DIRECT.contains(code) {
                    debug!("direct record at {} with unknown type {:?} dropped", offset, code as char);
                    continue;
                }
            }
            return Some(Self::split(offset, line));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceBlockHeader {
    pub block_length: u16,
    pub message_count: u8,
    pub unit_id: u8,
    pub starting_sequence: u32,
}

impl SequenceBlockHeader {
    /// `None` when fewer than 8 bytes remain
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < BLOCK_HEADER_SIZE {
            return None;
        }
        Some(SequenceBlockHeader {
            block_length: LittleEndian::read_u16(&buf[0..2]),
            message_count: buf[2],
            unit_id: buf[3],
            starting_sequence: LittleEndian::read_u32(&buf[4..8]),
        })
    }

    pub fn encode(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut out = [0u8; BLOCK_HEADER_SIZE];
        LittleEndian::write_u16(&mut out[0..2], self.block_length);
        out[2] = self.message_count;
        out[3] = self.unit_id;
        LittleEndian::write_u32(&mut out[4..8], self.starting_sequence);
        out
    }

    /// A zero block length marks the end of the stream
    pub fn is_end(&self) -> bool {
        self.block_length == 0
    }
}

/// One sub-message inside a sequence block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMessage<'a> {
    /// Byte offset of the length byte in the input
    pub offset: usize,
    pub length: u8,
    pub code: u8,
    pub body: &'a [u8],
    pub context: SequenceContext,
}

struct Block {
    header: SequenceBlockHeader,
    end: usize,
    cursor: usize,
    index: u8,
}

/// Sequence block walker for the multicast feed
///
/// Yields exactly `message_count` sub-messages per intact block. A sub-message
/// that overruns its block abandons the rest of that block; one that overruns
/// the input ends the stream with `TruncatedStream`.
pub struct MulticastFrames<'a> {
    buf: &'a [u8],
    block_start: usize,
    block: Option<Block>,
    blocks: usize,
    done: bool,
}

impl<'a> MulticastFrames<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        MulticastFrames {
            buf,
            block_start: 0,
            block: None,
            blocks: 0,
            done: false,
        }
    }

    /// Number of block headers read so far
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn current_block(&self) -> Option<SequenceBlockHeader> {
        self.block.as_ref().map(|b| b.header)
    }

    fn open_block(&mut self) -> Option<DecodeResult<()>> {
        let header = match SequenceBlockHeader::parse(&self.buf[self.block_start.min(self.buf.len())..]) {
            Some(h) if !h.is_end() => h,
            _ => {
                debug!("end of stream at offset {}", self.block_start);
                self.done = true;
                return None;
            }
        };
        let length = header.block_length as usize;
        if length < BLOCK_HEADER_SIZE {
            self.done = true;
            return Some(Err(DecodeError::TruncatedStream {
                offset: self.block_start,
                need: BLOCK_HEADER_SIZE,
                have: length,
            }));
        }
        debug!(
            "block unit={} seq={} count={} len={}",
            header.unit_id, header.starting_sequence, header.message_count, length
        );
        self.blocks += 1;
        self.block = Some(Block {
            header,
            end: self.block_start + length,
            cursor: self.block_start + BLOCK_HEADER_SIZE,
            index: 0,
        });
        Some(Ok(()))
    }

    fn close_block(&mut self) {
        if let Some(block) = self.block.take() {
            self.block_start = block.end;
        }
    }

    fn abandon_block(&mut self, need: usize, have: usize) -> DecodeError {
        self.close_block();
        DecodeError::TruncatedMessage {
            kind: "sequence block",
            need,
            have,
        }
    }

    fn end_stream(&mut self, offset: usize, need: usize) -> DecodeError {
        self.done = true;
        DecodeError::TruncatedStream {
            offset,
            need,
            have: self.buf.len().saturating_sub(offset),
        }
    }
}

impl<'a> Iterator for MulticastFrames<'a> {
    type Item = DecodeResult<SubMessage<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            let Some(block) = self.block.as_ref() else {
                if let Err(e) = self.open_block()? {
                    return Some(Err(e));
                }
                continue;
            };
            if block.index >= block.header.message_count {
                self.close_block();
                continue;
            }

            let (cursor, end) = (block.cursor, block.end);
            if cursor + MESSAGE_HEADER_SIZE > end {
                return Some(Err(self.abandon_block(MESSAGE_HEADER_SIZE, end.saturating_sub(cursor))));
            }
            if cursor + MESSAGE_HEADER_SIZE > self.buf.len() {
                return Some(Err(self.end_stream(cursor, MESSAGE_HEADER_SIZE)));
            }
            let length = self.buf[cursor] as usize;
            let code = self.buf[cursor + 1];
            if length < MESSAGE_HEADER_SIZE {
                return Some(Err(self.abandon_block(MESSAGE_HEADER_SIZE, length)));
            }
            if cursor + length > end {
                return Some(Err(self.abandon_block(length, end - cursor)));
            }
            if cursor + length > self.buf.len() {
                return Some(Err(self.end_stream(cursor, length)));
            }

            let header = block.header;
            let index = block.index;
            let context = SequenceContext {
                unit: header.unit_id,
                block_sequence: header.starting_sequence,
                sequence: header.starting_sequence.wrapping_add(index as u32),
            };
            if let Some(block) = self.block.as_mut() {
                block.cursor += length;
                block.index += 1;
            }
            return Some(Ok(SubMessage {
                offset: cursor,
                length: length as u8,
                code,
                body: &self.buf[cursor + MESSAGE_HEADER_SIZE..cursor + length],
                context,
            }));
        }
    }
}
