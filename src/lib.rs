/// PITCH Decoder - BATS Chi-X Europe market data decoding
///
/// Decodes both wire variants of the PITCH feed into typed messages:
/// - Direct feed: newline-delimited ASCII records
/// - Multicast feed: sequenced binary blocks (little-endian)
/// - Catalog-driven fixed-width field layouts, checked at compile time
/// - Per-variant flag tables with their documented defaults
/// - Timestamp reconstruction from midnight, Time base and offsets
/// - Per-message error isolation: a bad message never desynchronizes a stream
/// - Sequence gap detection and decode statistics

pub mod protocol;
pub mod codec;
pub mod flags;
pub mod timestamp;
pub mod config;
pub mod session;
pub mod fields;
pub mod catalog;
pub mod decoder;
pub mod framing;
pub mod stream;
pub mod sink;
pub mod gap_detector;
pub mod stats;

pub use protocol::{Decoded, Feed, Message, MessageType, Side};
pub use codec::{Price, Token};
pub use flags::{ExecutionFlags, FlagTable, TradeFlags, TradeReportFlags};
pub use timestamp::{EventTime, TimeUnit};
pub use config::SessionConfig;
pub use session::{SequenceContext, Session};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use decoder::{DecodeError, DecodeResult, Decoder, FieldError};
pub use framing::SequenceBlockHeader;
pub use stream::{decode_direct, decode_multicast, decode_stream, DirectStream, MulticastStream};
pub use sink::{MessageSink, Pipeline, SinkError};
pub use gap_detector::GapDetector;
pub use stats::DecodeStats;
