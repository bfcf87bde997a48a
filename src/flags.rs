/// Flag byte decoding
///
/// Each indicator is a single ASCII code mapped to a small enumerant through a
/// documented table. Unlisted codes decode to the table's own default, and
/// defaults are not uniform: the direct feed falls back to 2 or 3 for several
/// indicators where the multicast feed falls back to 0.

use crate::decoder::FieldError;

/// Code to enumerant lookup with an explicit fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagTable {
    pub name: &'static str,
    pub codes: &'static [(u8, u8)],
    pub default: u8,
}

impl FlagTable {
    pub const fn new(name: &'static str, codes: &'static [(u8, u8)], default: u8) -> Self {
        FlagTable { name, codes, default }
    }

    pub fn decode(&self, code: u8) -> u8 {
        self.codes
            .iter()
            .find(|&&(c, _)| c == code)
            .map_or(self.default, |&(_, v)| v)
    }

    pub fn is_documented(&self, code: u8) -> bool {
        self.codes.iter().any(|&(c, _)| c == code)
    }
}

const MARKET_MECHANISM: &[(u8, u8)] = &[(b'1', 1), (b'2', 2), (b'3', 3), (b'4', 4)];

const TRADING_MODE: &[(u8, u8)] = &[
    (b'1', 1),
    (b'2', 2),
    (b'3', 3),
    (b'4', 4),
    (b'5', 5),
    (b'6', 6),
    (b'7', 7),
    (b'O', 8),
    (b'K', 9),
    (b'I', 10),
    (b'U', 11),
];

const TRANSACTION_CATEGORY: &[(u8, u8)] =
    &[(b'P', 1), (b'D', 2), (b'T', 3), (b'G', 4), (b'F', 5)];

const NEGOTIATED_TRADE: &[(u8, u8)] = &[(b'N', 1)];
const CROSSING_TRADE: &[(u8, u8)] = &[(b'X', 1)];
const MODIFICATION_INDICATOR: &[(u8, u8)] = &[(b'A', 1), (b'C', 2)];
const BENCHMARK_INDICATOR: &[(u8, u8)] = &[(b'B', 1)];
const EX_CUM_DIVIDEND: &[(u8, u8)] = &[(b'E', 1)];
const OFFBOOK_AUTOMATED_INDICATOR: &[(u8, u8)] = &[(b'Q', 1), (b'M', 2)];
const PUBLICATION_INDICATOR: &[(u8, u8)] = &[(b'1', 1)];
const TRADE_TIMING_INDICATOR: &[(u8, u8)] = &[(b'1', 1), (b'2', 2)];

const TRADING_STATUS: &[(u8, u8)] = &[
    (b'T', 1),
    (b'R', 2),
    (b'C', 3),
    (b'S', 4),
    (b'N', 5),
    (b'V', 6),
    (b'O', 7),
    (b'E', 8),
    (b'H', 9),
    (b'M', 10),
    (b'P', 11),
];

const STATISTIC_TYPE: &[(u8, u8)] = &[(b'C', 1), (b'H', 2), (b'L', 3), (b'O', 4), (b'P', 5)];
const PRICE_DETERMINATION: &[(u8, u8)] = &[(b'0', 1), (b'1', 2)];
const AUCTION_TYPE: &[(u8, u8)] = &[(b'O', 1), (b'C', 2), (b'H', 3), (b'V', 4)];
const LOGIN_STATUS: &[(u8, u8)] = &[(b'A', 1), (b'N', 2), (b'B', 3), (b'S', 4)];

const GAP_STATUS: &[(u8, u8)] = &[
    (b'A', 1),
    (b'O', 2),
    (b'D', 3),
    (b'M', 4),
    (b'S', 5),
    (b'C', 6),
    (b'I', 7),
];

/// Complete set of tables for one wire variant
#[derive(Debug, Clone, Copy)]
pub struct FlagTables {
    pub market_mechanism: FlagTable,
    pub trading_mode: FlagTable,
    pub transaction_category: FlagTable,
    pub negotiated_trade: FlagTable,
    pub crossing_trade: FlagTable,
    pub modification_indicator: FlagTable,
    pub benchmark_indicator: FlagTable,
    pub ex_cum_dividend: FlagTable,
    pub offbook_automated_indicator: FlagTable,
    pub publication_indicator: FlagTable,
    pub trade_timing_indicator: FlagTable,
    pub trading_status: FlagTable,
    pub statistic_type: FlagTable,
    pub price_determination: FlagTable,
    pub auction_type: FlagTable,
    pub login_status: FlagTable,
    pub gap_status: FlagTable,
}

impl FlagTables {
    pub fn all(&self) -> [&FlagTable; 17] {
        [
            &self.market_mechanism,
            &self.trading_mode,
            &self.transaction_category,
            &self.negotiated_trade,
            &self.crossing_trade,
            &self.modification_indicator,
            &self.benchmark_indicator,
            &self.ex_cum_dividend,
            &self.offbook_automated_indicator,
            &self.publication_indicator,
            &self.trade_timing_indicator,
            &self.trading_status,
            &self.statistic_type,
            &self.price_determination,
            &self.auction_type,
            &self.login_status,
            &self.gap_status,
        ]
    }
}

/// Direct feed: binary indicators fall back to "not set" (2), three-way ones to 3
pub const DIRECT_FLAGS: FlagTables = FlagTables {
    market_mechanism: FlagTable::new("market_mechanism", MARKET_MECHANISM, 0),
    trading_mode: FlagTable::new("trading_mode", TRADING_MODE, 0),
    transaction_category: FlagTable::new("transaction_category", TRANSACTION_CATEGORY, 0),
    negotiated_trade: FlagTable::new("negotiated_trade", NEGOTIATED_TRADE, 2),
    crossing_trade: FlagTable::new("crossing_trade", CROSSING_TRADE, 2),
    modification_indicator: FlagTable::new("modification_indicator", MODIFICATION_INDICATOR, 3),
    benchmark_indicator: FlagTable::new("benchmark_indicator", BENCHMARK_INDICATOR, 2),
    ex_cum_dividend: FlagTable::new("ex_cum_dividend", EX_CUM_DIVIDEND, 2),
    offbook_automated_indicator: FlagTable::new(
        "offbook_automated_indicator",
        OFFBOOK_AUTOMATED_INDICATOR,
        3,
    ),
    publication_indicator: FlagTable::new("publication_indicator", PUBLICATION_INDICATOR, 2),
    trade_timing_indicator: FlagTable::new("trade_timing_indicator", TRADE_TIMING_INDICATOR, 3),
    trading_status: FlagTable::new("trading_status", TRADING_STATUS, 0),
    statistic_type: FlagTable::new("statistic_type", STATISTIC_TYPE, 0),
    price_determination: FlagTable::new("price_determination", PRICE_DETERMINATION, 0),
    auction_type: FlagTable::new("auction_type", AUCTION_TYPE, 0),
    login_status: FlagTable::new("login_status", LOGIN_STATUS, 0),
    gap_status: FlagTable::new("gap_status", GAP_STATUS, 0),
};

/// Multicast feed: every unlisted code is reserved (0)
pub const MULTICAST_FLAGS: FlagTables = FlagTables {
    market_mechanism: FlagTable::new("market_mechanism", MARKET_MECHANISM, 0),
    trading_mode: FlagTable::new("trading_mode", TRADING_MODE, 0),
    transaction_category: FlagTable::new("transaction_category", TRANSACTION_CATEGORY, 0),
    negotiated_trade: FlagTable::new("negotiated_trade", NEGOTIATED_TRADE, 0),
    crossing_trade: FlagTable::new("crossing_trade", CROSSING_TRADE, 0),
    modification_indicator: FlagTable::new("modification_indicator", MODIFICATION_INDICATOR, 0),
    benchmark_indicator: FlagTable::new("benchmark_indicator", BENCHMARK_INDICATOR, 0),
    ex_cum_dividend: FlagTable::new("ex_cum_dividend", EX_CUM_DIVIDEND, 0),
    offbook_automated_indicator: FlagTable::new(
        "offbook_automated_indicator",
        OFFBOOK_AUTOMATED_INDICATOR,
        0,
    ),
    publication_indicator: FlagTable::new("publication_indicator", PUBLICATION_INDICATOR, 0),
    trade_timing_indicator: FlagTable::new("trade_timing_indicator", TRADE_TIMING_INDICATOR, 0),
    trading_status: FlagTable::new("trading_status", TRADING_STATUS, 0),
    statistic_type: FlagTable::new("statistic_type", STATISTIC_TYPE, 0),
    price_determination: FlagTable::new("price_determination", PRICE_DETERMINATION, 0),
    auction_type: FlagTable::new("auction_type", AUCTION_TYPE, 0),
    login_status: FlagTable::new("login_status", LOGIN_STATUS, 0),
    gap_status: FlagTable::new("gap_status", GAP_STATUS, 0),
};

fn position(raw: &[u8], index: usize) -> Result<u8, FieldError> {
    raw.get(index).copied().ok_or(FieldError::Width(raw.len()))
}

/// Order execution flags: 3 positional bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionFlags {
    pub market_mechanism: u8,
    pub trading_mode: u8,
    pub ex_cum_dividend: u8,
}

impl ExecutionFlags {
    pub const WIDTH: usize = 3;

    pub fn decode(raw: &[u8], tables: &FlagTables) -> Result<Self, FieldError> {
        Ok(ExecutionFlags {
            market_mechanism: tables.market_mechanism.decode(position(raw, 0)?),
            trading_mode: tables.trading_mode.decode(position(raw, 1)?),
            ex_cum_dividend: tables.ex_cum_dividend.decode(position(raw, 2)?),
        })
    }
}

/// Trade flags: 4 positional bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeFlags {
    pub market_mechanism: u8,
    pub trading_mode: u8,
    pub transaction_category: u8,
    pub ex_cum_dividend: u8,
}

impl TradeFlags {
    pub const WIDTH: usize = 4;

    pub fn decode(raw: &[u8], tables: &FlagTables) -> Result<Self, FieldError> {
        Ok(TradeFlags {
            market_mechanism: tables.market_mechanism.decode(position(raw, 0)?),
            trading_mode: tables.trading_mode.decode(position(raw, 1)?),
            transaction_category: tables.transaction_category.decode(position(raw, 2)?),
            ex_cum_dividend: tables.ex_cum_dividend.decode(position(raw, 3)?),
        })
    }
}

/// Trade report flags: 11 positional bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeReportFlags {
    pub trade_timing_indicator: u8,
    pub market_mechanism: u8,
    pub trading_mode: u8,
    pub transaction_category: u8,
    pub negotiated_trade: u8,
    pub crossing_trade: u8,
    pub modification_indicator: u8,
    pub benchmark_indicator: u8,
    pub ex_cum_dividend: u8,
    pub publication_indicator: u8,
    pub offbook_automated_indicator: u8,
}

impl TradeReportFlags {
    pub const WIDTH: usize = 11;

    pub fn decode(raw: &[u8], tables: &FlagTables) -> Result<Self, FieldError> {
        Ok(TradeReportFlags {
            trade_timing_indicator: tables.trade_timing_indicator.decode(position(raw, 0)?),
            market_mechanism: tables.market_mechanism.decode(position(raw, 1)?),
            trading_mode: tables.trading_mode.decode(position(raw, 2)?),
            transaction_category: tables.transaction_category.decode(position(raw, 3)?),
            negotiated_trade: tables.negotiated_trade.decode(position(raw, 4)?),
            crossing_trade: tables.crossing_trade.decode(position(raw, 5)?),
            modification_indicator: tables.modification_indicator.decode(position(raw, 6)?),
            benchmark_indicator: tables.benchmark_indicator.decode(position(raw, 7)?),
            ex_cum_dividend: tables.ex_cum_dividend.decode(position(raw, 8)?),
            publication_indicator: tables.publication_indicator.decode(position(raw, 9)?),
            offbook_automated_indicator: tables
                .offbook_automated_indicator
                .decode(position(raw, 10)?),
        })
    }
}
