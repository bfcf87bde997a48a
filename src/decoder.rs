/// Message dispatcher
///
/// Looks a discriminator up in the feed's catalog, interprets the body along
/// the catalog layout and returns a `Decoded` value or a per-message error.
/// Decoding never touches the stream cursor: callers always advance by the
/// declared width, so one bad message cannot misalign the rest.

use crate::catalog::{self, CatalogEntry};
use crate::codec::{Binary, Decimal, NumericCodec};
use crate::fields::Fields;
use crate::flags::{ExecutionFlags, FlagTables, TradeFlags, TradeReportFlags, DIRECT_FLAGS, MULTICAST_FLAGS};
use crate::protocol::*;
use crate::session::Session;
use crate::timestamp::{self, EventTime};
use log::{debug, warn};
use thiserror::Error;

/// Why a single field could not be interpreted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("non-numeric byte {0:#04x}")]
    NonNumeric(u8),

    #[error("numeric overflow")]
    Overflow,

    #[error("unsupported width {0}")]
    Width(usize),

    #[error("empty field")]
    Empty,

    #[error("invalid side code {0:#04x}")]
    InvalidSide(u8),

    #[error("field not present in layout")]
    NotInLayout,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown message type {0:#04x}")]
    UnknownMessageType(u8),

    #[error("malformed {kind} message: field `{field}`: {reason}")]
    MalformedField {
        kind: &'static str,
        field: &'static str,
        reason: FieldError,
    },

    #[error("truncated {kind}: need {need} bytes, have {have}")]
    TruncatedMessage {
        kind: &'static str,
        need: usize,
        have: usize,
    },

    #[error("truncated stream at offset {offset}: need {need} bytes, have {have}")]
    TruncatedStream {
        offset: usize,
        need: usize,
        have: usize,
    },
}

impl DecodeError {
    /// Errors after which the current parse call cannot continue
    pub fn ends_stream(&self) -> bool {
        matches!(self, DecodeError::TruncatedStream { .. })
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

pub struct Decoder;

impl Decoder {
    /// Decode one direct-feed record body
    ///
    /// `relative_ms` is the record's timestamp prefix (milliseconds past
    /// midnight).
    pub fn decode_direct(
        code: u8,
        relative_ms: u32,
        body: &[u8],
        session: &Session,
    ) -> DecodeResult<Decoded> {
        let entry = lookup(&catalog::DIRECT, code)?;
        let result = Fields::<Decimal>::new(entry, body).and_then(|fields| {
            let message = build(&fields, &DIRECT_FLAGS, session)?;
            Ok(Decoded {
                message_type: entry.message_type,
                timestamp: session.resolve_direct(relative_ms),
                context: None,
                message,
            })
        });
        report(entry, body, result)
    }

    /// Decode one multicast sub-message body (after its length/type header)
    ///
    /// A Time message updates the session's time base for every message that
    /// follows it.
    pub fn decode_multicast(code: u8, body: &[u8], session: &mut Session) -> DecodeResult<Decoded> {
        let entry = lookup(&catalog::MULTICAST, code)?;
        let result = Fields::<Binary>::new(entry, body).and_then(|fields| {
            let message = build(&fields, &MULTICAST_FLAGS, session)?;
            let timestamp = match &message {
                Message::Time(t) => session.resolve_time_base(t.base),
                _ if fields.has("time_offset") => {
                    session.resolve_multicast(fields.unsigned("time_offset")? as u32)
                }
                _ => EventTime::Untimed,
            };
            Ok(Decoded {
                message_type: entry.message_type,
                timestamp,
                context: session.context(),
                message,
            })
        });
        if let Ok(Decoded { message: Message::Time(t), .. }) = &result {
            session.set_time_base(t.base);
        }
        report(entry, body, result)
    }
}

fn lookup(catalog: &catalog::Catalog, code: u8) -> DecodeResult<&'static CatalogEntry> {
    catalog.lookup(code).ok_or_else(|| {
        debug!("{:?} feed: unknown message type {:#04x}", catalog.feed, code);
        DecodeError::UnknownMessageType(code)
    })
}

fn report(entry: &CatalogEntry, body: &[u8], result: DecodeResult<Decoded>) -> DecodeResult<Decoded> {
    if let Err(e) = &result {
        let shown = &body[..body.len().min(entry.body_width())];
        warn!("{} message ignored ({}): {}", entry.name, e, hex::encode(shown));
    }
    result
}

/// Interpret a body along its layout; shared by both feeds
fn build<C: NumericCodec>(
    f: &Fields<'_, C>,
    flags: &FlagTables,
    session: &Session,
) -> DecodeResult<Message> {
    let message = match f.entry().message_type {
        MessageType::Login => Message::Login(Login {
            session_sub_id: f.token("session_sub_id")?,
            username: f.token("username")?,
            password: f.token("password")?,
        }),
        MessageType::LoginResponse => Message::LoginResponse(LoginResponse {
            status: f.flag("status", &flags.login_status)?,
        }),
        MessageType::GapRequest => Message::GapRequest(GapRequest {
            unit: f.unsigned("unit")? as u8,
            sequence: f.unsigned("sequence")? as u32,
            count: f.unsigned("count")? as u16,
        }),
        MessageType::GapResponse => Message::GapResponse(GapResponse {
            unit: f.unsigned("unit")? as u8,
            sequence: f.unsigned("sequence")? as u32,
            count: f.unsigned("count")? as u16,
            status: f.flag("status", &flags.gap_status)?,
        }),
        MessageType::Time => Message::Time(Time {
            base: f.unsigned("time")? as u32,
        }),
        MessageType::Clear => Message::Clear(Clear {
            symbol: f.token_opt("symbol")?,
        }),
        MessageType::AddOrder | MessageType::AddOrderLong | MessageType::AddOrderExpanded => {
            Message::AddOrder(AddOrder {
                order_id: f.token("order_id")?,
                side: f.side("side")?,
                quantity: f.quantity("quantity")?,
                symbol: f.token("symbol")?,
                price: f.price("price")?,
                display: f.code_opt("display")?.map(|c| c == b'Y'),
                order_type: f.code_opt("order_type")?,
                order_flags: f.code_opt("order_flags")?,
                participant: f.token_opt("participant")?,
            })
        }
        MessageType::OrderExecuted
        | MessageType::OrderExecutedLong
        | MessageType::OrderExecutedAtPrice => Message::OrderExecuted(OrderExecuted {
            order_id: f.token("order_id")?,
            quantity: f.quantity("quantity")?,
            execution_id: f.token("execution_id")?,
            remaining: if f.has("remaining") {
                Some(f.quantity("remaining")?)
            } else {
                None
            },
            price: if f.has("price") { Some(f.price("price")?) } else { None },
            flags: f.flag_set("flags", |raw| ExecutionFlags::decode(raw, flags))?,
        }),
        MessageType::OrderCancel
        | MessageType::OrderCancelLong
        | MessageType::ReduceSizeLong
        | MessageType::ReduceSizeShort => Message::OrderCancel(OrderCancel {
            order_id: f.token("order_id")?,
            quantity: f.quantity("quantity")?,
        }),
        MessageType::ModifyOrderLong | MessageType::ModifyOrderShort => {
            Message::ModifyOrder(ModifyOrder {
                order_id: f.token("order_id")?,
                quantity: f.quantity("quantity")?,
                price: f.price("price")?,
            })
        }
        MessageType::DeleteOrder => Message::DeleteOrder(DeleteOrder {
            order_id: f.token("order_id")?,
        }),
        MessageType::Trade | MessageType::TradeLong => Message::Trade(Trade {
            order_id: f.token("order_id")?,
            side: f.side("side")?,
            quantity: f.quantity("quantity")?,
            symbol: f.token("symbol")?,
            price: f.price("price")?,
            execution_id: f.token("execution_id")?,
            flags: f.flag_set("flags", |raw| TradeFlags::decode(raw, flags))?,
        }),
        MessageType::TradeBreak => Message::TradeBreak(TradeBreak {
            execution_id: f.token("execution_id")?,
        }),
        MessageType::TradeReport => Message::TradeReport(TradeReport {
            quantity: f.quantity("quantity")?,
            symbol: f.token("symbol")?,
            price: f.price("price")?,
            trade_id: f.token("trade_id")?,
            trade_time: trade_time(f, session)?,
            execution_venue: f.token("venue")?,
            currency: f.token("currency")?,
            flags: f.flag_set("flags", |raw| TradeReportFlags::decode(raw, flags))?,
        }),
        MessageType::EndOfSession => Message::EndOfSession,
        MessageType::TradingStatus => Message::TradingStatus(TradingStatus {
            symbol: f.token("symbol")?,
            status: f.flag("status", &flags.trading_status)?,
        }),
        MessageType::Statistics => Message::Statistics(Statistics {
            symbol: f.token("symbol")?,
            price: f.price("price")?,
            statistic_type: f.flag("statistic_type", &flags.statistic_type)?,
            price_determination: f.flag("price_determination", &flags.price_determination)?,
        }),
        MessageType::AuctionUpdate => Message::AuctionUpdate(AuctionUpdate {
            symbol: f.token("symbol")?,
            auction_type: f.flag("auction_type", &flags.auction_type)?,
            reference_price: f.price("reference_price")?,
            buy_quantity: f.quantity("buy_quantity")?,
            sell_quantity: f.quantity("sell_quantity")?,
            indicative_price: f.price("indicative_price")?,
        }),
        MessageType::AuctionSummary => Message::AuctionSummary(AuctionSummary {
            symbol: f.token("symbol")?,
            auction_type: f.flag("auction_type", &flags.auction_type)?,
            price: f.price("price")?,
            quantity: f.quantity("quantity")?,
        }),
    };
    Ok(message)
}

/// Execution time carried inside a trade report
///
/// Direct reports embed a `YYYYMMDD` date plus milliseconds past that date's
/// midnight; multicast reports embed nanoseconds since the epoch.
fn trade_time<C: NumericCodec>(f: &Fields<'_, C>, session: &Session) -> DecodeResult<EventTime> {
    if f.has("trade_date") {
        let date = f.unsigned("trade_date")?;
        let time_ms = f.unsigned("trade_time")?;
        return Ok(timestamp::trade_date_time(date, time_ms, session.config().utc_offset));
    }
    Ok(timestamp::unix_nanos(f.unsigned("trade_timestamp")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use time::macros::{date, datetime};

    fn session() -> Session {
        Session::new(SessionConfig::new(date!(2015 - 03 - 23)))
    }

    #[test]
    fn test_decode_direct_clear() {
        let decoded = Decoder::decode_direct(b's', 10, b"AAAAAAAA", &session()).unwrap();
        assert_eq!(decoded.message_type, MessageType::Clear);
        assert_eq!(
            decoded.timestamp.resolved(),
            Some(datetime!(2015-03-23 00:00:00.01 UTC))
        );
        match decoded.message {
            Message::Clear(Clear { symbol: Some(s) }) => assert!(s == "AAAAAAAA"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type() {
        let result = Decoder::decode_multicast(0xee, &[0u8; 4], &mut session());
        assert_eq!(result, Err(DecodeError::UnknownMessageType(0xee)));
        let result = Decoder::decode_direct(b'?', 0, b"", &session());
        assert_eq!(result, Err(DecodeError::UnknownMessageType(b'?')));
    }

    #[test]
    fn test_time_message_sets_base() {
        let mut s = session();
        let decoded = Decoder::decode_multicast(0x20, &3_600_000u32.to_le_bytes(), &mut s).unwrap();
        assert_eq!(decoded.message, Message::Time(Time { base: 3_600_000 }));
        assert_eq!(s.time_base(), Some(3_600_000));

        let mut body = 500u32.to_le_bytes().to_vec();
        body.extend_from_slice(&[0x01; 8]);
        let decoded = Decoder::decode_multicast(0x29, &body, &mut s).unwrap();
        assert_eq!(
            decoded.timestamp.resolved(),
            Some(datetime!(2015-03-23 01:00:00.5 UTC))
        );
    }

    #[test]
    fn test_malformed_side() {
        let mut body = vec![0u8; 23];
        body[12] = b'Q';
        let result = Decoder::decode_multicast(0x22, &body, &mut session());
        assert_eq!(
            result,
            Err(DecodeError::MalformedField {
                kind: "add_order",
                field: "side",
                reason: FieldError::InvalidSide(b'Q'),
            })
        );
    }

    #[test]
    fn test_ends_stream() {
        assert!(DecodeError::TruncatedStream { offset: 0, need: 8, have: 2 }.ends_stream());
        assert!(!DecodeError::UnknownMessageType(1).ends_stream());
    }
}
