/// Message catalogs: discriminator -> layout
///
/// The single source of truth for every message width and field position.
/// Direct-feed widths are published as whole-record widths (marker, 7-digit
/// timestamp and type code included); layouts cover the body that follows.
/// Multicast widths cover the body after the 2-byte length/type header.

use crate::fields::{field, layout_width, Field, Layout};
use crate::protocol::{Feed, MessageType};
use thiserror::Error;

/// Marker byte + 7-digit timestamp + type code
pub const DIRECT_PREFIX_WIDTH: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: u8,
    pub message_type: MessageType,
    pub name: &'static str,
    /// Width as published for this feed
    pub declared: usize,
    /// Part of `declared` that precedes the body
    pub overhead: usize,
    pub layout: Layout,
}

impl CatalogEntry {
    pub const fn body_width(&self) -> usize {
        self.declared - self.overhead
    }

    pub const fn is_consistent(&self) -> bool {
        self.overhead <= self.declared && layout_width(self.layout) == self.body_width()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{name} (code {code:#04x}): layout covers {layout} bytes, declared body is {declared}")]
    WidthMismatch {
        name: &'static str,
        code: u8,
        layout: usize,
        declared: usize,
    },

    #[error("duplicate code {0:#04x}")]
    DuplicateCode(u8),
}

#[derive(Debug)]
pub struct Catalog {
    pub feed: Feed,
    pub entries: &'static [CatalogEntry],
}

impl Catalog {
    pub fn lookup(&self, code: u8) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn contains(&self, code: u8) -> bool {
        self.lookup(code).is_some()
    }

    /// Check every layout against its declared width, and codes for uniqueness
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, e) in self.entries.iter().enumerate() {
            if !e.is_consistent() {
                return Err(CatalogError::WidthMismatch {
                    name: e.name,
                    code: e.code,
                    layout: layout_width(e.layout),
                    declared: e.body_width(),
                });
            }
            if self.entries[..i].iter().any(|p| p.code == e.code) {
                return Err(CatalogError::DuplicateCode(e.code));
            }
        }
        Ok(())
    }
}

const fn entry(
    code: u8,
    message_type: MessageType,
    name: &'static str,
    declared: usize,
    overhead: usize,
    layout: Layout,
) -> CatalogEntry {
    CatalogEntry {
        code,
        message_type,
        name,
        declared,
        overhead,
        layout,
    }
}

const fn direct(code: u8, t: MessageType, name: &'static str, declared: usize, layout: Layout) -> CatalogEntry {
    entry(code, t, name, declared, DIRECT_PREFIX_WIDTH, layout)
}

const fn multicast(code: u8, t: MessageType, name: &'static str, declared: usize, layout: Layout) -> CatalogEntry {
    entry(code, t, name, declared, 0, layout)
}

// Direct feed layouts: ASCII, numeric fields zero filled

const D_CLEAR: &[Field] = &[field("symbol", 8)];

const D_ADD_ORDER: &[Field] = &[
    field("order_id", 12),
    field("side", 1),
    field("quantity", 6),
    field("symbol", 6),
    field("price", 10),
    field("display", 1),
];

const D_ADD_ORDER_LONG: &[Field] = &[
    field("order_id", 12),
    field("side", 1),
    field("quantity", 10),
    field("symbol", 8),
    field("price", 19),
    field("display", 1),
];

const D_ADD_ORDER_EXPANDED: &[Field] = &[
    field("order_id", 12),
    field("side", 1),
    field("quantity", 10),
    field("symbol", 8),
    field("price", 19),
    field("order_type", 1),
    field("participant", 4),
];

const D_ORDER_EXECUTED: &[Field] = &[
    field("order_id", 12),
    field("quantity", 6),
    field("execution_id", 12),
    field("flags", 3),
];

const D_ORDER_EXECUTED_LONG: &[Field] = &[
    field("order_id", 12),
    field("quantity", 10),
    field("execution_id", 12),
    field("flags", 3),
];

const D_ORDER_CANCEL: &[Field] = &[field("order_id", 12), field("quantity", 6)];

const D_ORDER_CANCEL_LONG: &[Field] = &[field("order_id", 12), field("quantity", 10)];

const D_TRADE: &[Field] = &[
    field("order_id", 12),
    field("side", 1),
    field("quantity", 6),
    field("symbol", 6),
    field("price", 10),
    field("execution_id", 12),
    field("flags", 4),
];

const D_TRADE_LONG: &[Field] = &[
    field("order_id", 12),
    field("side", 1),
    field("quantity", 10),
    field("symbol", 8),
    field("price", 19),
    field("execution_id", 12),
    field("flags", 4),
];

const D_TRADE_BREAK: &[Field] = &[field("execution_id", 12)];

const D_TRADE_REPORT: &[Field] = &[
    field("quantity", 12),
    field("symbol", 8),
    field("price", 19),
    field("trade_id", 12),
    field("trade_date", 8),
    field("trade_time", 8),
    field("venue", 4),
    field("currency", 3),
    field("flags", 11),
];

const D_TRADING_STATUS: &[Field] = &[field("symbol", 8), field("status", 1), field("reserved", 3)];

const D_STATISTICS: &[Field] = &[
    field("symbol", 8),
    field("price", 19),
    field("statistic_type", 1),
    field("price_determination", 1),
];

const D_AUCTION_UPDATE: &[Field] = &[
    field("symbol", 8),
    field("auction_type", 1),
    field("reference_price", 19),
    field("buy_quantity", 10),
    field("sell_quantity", 10),
    field("indicative_price", 19),
];

const D_AUCTION_SUMMARY: &[Field] = &[
    field("symbol", 8),
    field("auction_type", 1),
    field("price", 19),
    field("quantity", 10),
];

const DIRECT_ENTRIES: &[CatalogEntry] = &[
    direct(b's', MessageType::Clear, "clear", 17, D_CLEAR),
    direct(b'A', MessageType::AddOrder, "add_order", 45, D_ADD_ORDER),
    direct(b'c', MessageType::AddOrderLong, "add_order_long", 60, D_ADD_ORDER_LONG),
    direct(b't', MessageType::AddOrderExpanded, "add_order_expanded", 64, D_ADD_ORDER_EXPANDED),
    direct(b'E', MessageType::OrderExecuted, "order_executed", 42, D_ORDER_EXECUTED),
    direct(b'e', MessageType::OrderExecutedLong, "order_executed_long", 46, D_ORDER_EXECUTED_LONG),
    direct(b'X', MessageType::OrderCancel, "order_cancel", 27, D_ORDER_CANCEL),
    direct(b'x', MessageType::OrderCancelLong, "order_cancel_long", 31, D_ORDER_CANCEL_LONG),
    direct(b'P', MessageType::Trade, "trade", 60, D_TRADE),
    direct(b'q', MessageType::TradeLong, "trade_long", 75, D_TRADE_LONG),
    direct(b'B', MessageType::TradeBreak, "trade_break", 21, D_TRADE_BREAK),
    direct(b'O', MessageType::TradeReport, "trade_report", 94, D_TRADE_REPORT),
    direct(b'H', MessageType::TradingStatus, "trading_status", 21, D_TRADING_STATUS),
    direct(b'Z', MessageType::Statistics, "statistics", 38, D_STATISTICS),
    direct(b'k', MessageType::AuctionUpdate, "auction_update", 76, D_AUCTION_UPDATE),
    direct(b'j', MessageType::AuctionSummary, "auction_summary", 47, D_AUCTION_SUMMARY),
];

// Multicast feed layouts: little-endian binary, ids are raw 8-byte keys

const M_LOGIN: &[Field] = &[
    field("session_sub_id", 4),
    field("username", 4),
    field("filler", 2),
    field("password", 10),
];

const M_LOGIN_RESPONSE: &[Field] = &[field("status", 1)];

const M_GAP_REQUEST: &[Field] = &[field("unit", 1), field("sequence", 4), field("count", 2)];

const M_GAP_RESPONSE: &[Field] = &[
    field("unit", 1),
    field("sequence", 4),
    field("count", 2),
    field("status", 1),
];

const M_TIME: &[Field] = &[field("time", 4)];

const M_TIME_OFFSET_ONLY: &[Field] = &[field("time_offset", 4)];

const M_ADD_ORDER: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("side", 1),
    field("quantity", 2),
    field("symbol", 6),
    field("price", 2),
];

const M_ADD_ORDER_LONG: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("side", 1),
    field("quantity", 4),
    field("symbol", 8),
    field("price", 8),
];

const M_ADD_ORDER_EXPANDED: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("side", 1),
    field("quantity", 4),
    field("symbol", 8),
    field("price", 8),
    field("order_flags", 1),
    field("participant", 4),
];

const M_ORDER_EXECUTED: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 4),
    field("execution_id", 8),
    field("flags", 3),
];

const M_ORDER_EXECUTED_AT_PRICE: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 4),
    field("remaining", 4),
    field("execution_id", 8),
    field("price", 8),
    field("flags", 3),
];

const M_REDUCE_SIZE_LONG: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 4),
];

const M_REDUCE_SIZE_SHORT: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 2),
];

const M_MODIFY_ORDER_LONG: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 4),
    field("price", 8),
];

const M_MODIFY_ORDER_SHORT: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("quantity", 2),
    field("price", 2),
];

const M_DELETE_ORDER: &[Field] = &[field("time_offset", 4), field("order_id", 8)];

const M_TRADE_SHORT: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("side", 1),
    field("quantity", 2),
    field("symbol", 6),
    field("price", 2),
    field("execution_id", 8),
    field("flags", 4),
];

const M_TRADE_LONG: &[Field] = &[
    field("time_offset", 4),
    field("order_id", 8),
    field("side", 1),
    field("quantity", 4),
    field("symbol", 8),
    field("price", 8),
    field("execution_id", 8),
    field("flags", 4),
];

const M_TRADE_BREAK: &[Field] = &[field("time_offset", 4), field("execution_id", 8)];

const M_TRADE_REPORT: &[Field] = &[
    field("time_offset", 4),
    field("quantity", 8),
    field("symbol", 8),
    field("price", 8),
    field("trade_id", 8),
    field("trade_timestamp", 8),
    field("venue", 4),
    field("currency", 3),
    field("flags", 11),
];

const M_TRADING_STATUS: &[Field] = &[
    field("time_offset", 4),
    field("symbol", 8),
    field("status", 1),
    field("reserved", 8),
];

const M_STATISTICS: &[Field] = &[
    field("time_offset", 4),
    field("symbol", 8),
    field("price", 8),
    field("statistic_type", 1),
    field("price_determination", 1),
];

const M_AUCTION_UPDATE: &[Field] = &[
    field("time_offset", 4),
    field("symbol", 8),
    field("auction_type", 1),
    field("reference_price", 8),
    field("buy_quantity", 4),
    field("sell_quantity", 4),
    field("indicative_price", 8),
    field("reserved", 8),
];

const M_AUCTION_SUMMARY: &[Field] = &[
    field("time_offset", 4),
    field("symbol", 8),
    field("auction_type", 1),
    field("price", 8),
    field("quantity", 4),
];

const MULTICAST_ENTRIES: &[CatalogEntry] = &[
    multicast(0x01, MessageType::Login, "login", 20, M_LOGIN),
    multicast(0x02, MessageType::LoginResponse, "login_response", 1, M_LOGIN_RESPONSE),
    multicast(0x03, MessageType::GapRequest, "gap_request", 7, M_GAP_REQUEST),
    multicast(0x04, MessageType::GapResponse, "gap_response", 8, M_GAP_RESPONSE),
    multicast(0x20, MessageType::Time, "time", 4, M_TIME),
    multicast(0x97, MessageType::Clear, "unit_clear", 4, M_TIME_OFFSET_ONLY),
    multicast(0x22, MessageType::AddOrder, "add_order", 23, M_ADD_ORDER),
    multicast(0x40, MessageType::AddOrderLong, "add_order_long", 33, M_ADD_ORDER_LONG),
    multicast(0x2f, MessageType::AddOrderExpanded, "add_order_expanded", 38, M_ADD_ORDER_EXPANDED),
    multicast(0x23, MessageType::OrderExecuted, "order_executed", 27, M_ORDER_EXECUTED),
    multicast(
        0x24,
        MessageType::OrderExecutedAtPrice,
        "order_executed_at_price",
        39,
        M_ORDER_EXECUTED_AT_PRICE,
    ),
    multicast(0x25, MessageType::ReduceSizeLong, "reduce_size_long", 16, M_REDUCE_SIZE_LONG),
    multicast(0x26, MessageType::ReduceSizeShort, "reduce_size_short", 14, M_REDUCE_SIZE_SHORT),
    multicast(0x27, MessageType::ModifyOrderLong, "modify_order_long", 24, M_MODIFY_ORDER_LONG),
    multicast(0x28, MessageType::ModifyOrderShort, "modify_order_short", 16, M_MODIFY_ORDER_SHORT),
    multicast(0x29, MessageType::DeleteOrder, "delete_order", 12, M_DELETE_ORDER),
    multicast(0x2b, MessageType::Trade, "trade", 35, M_TRADE_SHORT),
    multicast(0x41, MessageType::TradeLong, "trade_long", 45, M_TRADE_LONG),
    multicast(0x2c, MessageType::TradeBreak, "trade_break", 12, M_TRADE_BREAK),
    multicast(0x32, MessageType::TradeReport, "trade_report", 62, M_TRADE_REPORT),
    multicast(0x2d, MessageType::EndOfSession, "end_of_session", 4, M_TIME_OFFSET_ONLY),
    multicast(0x31, MessageType::TradingStatus, "trading_status", 21, M_TRADING_STATUS),
    multicast(0x34, MessageType::Statistics, "statistics", 22, M_STATISTICS),
    multicast(0x95, MessageType::AuctionUpdate, "auction_update", 45, M_AUCTION_UPDATE),
    multicast(0x96, MessageType::AuctionSummary, "auction_summary", 25, M_AUCTION_SUMMARY),
];

pub static DIRECT: Catalog = Catalog {
    feed: Feed::Direct,
    entries: DIRECT_ENTRIES,
};

pub static MULTICAST: Catalog = Catalog {
    feed: Feed::Multicast,
    entries: MULTICAST_ENTRIES,
};

pub fn for_feed(feed: Feed) -> &'static Catalog {
    match feed {
        Feed::Direct => &DIRECT,
        Feed::Multicast => &MULTICAST,
    }
}

// Compile-time assertions for layout widths
const _: () = {
    const fn check(entries: &[CatalogEntry]) {
        let mut i = 0;
        while i < entries.len() {
            assert!(entries[i].is_consistent());
            i += 1;
        }
    }
    check(DIRECT_ENTRIES);
    check(MULTICAST_ENTRIES);
};
