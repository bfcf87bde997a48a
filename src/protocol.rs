/// Decoded PITCH message model
///
/// One `Message` case per logical message kind. Both wire variants decode into
/// the same structs; fields that only one variant carries are `Option`s, and
/// `MessageType` keeps the exact wire form (short/long/expanded) that produced
/// the value.

use crate::codec::{Price, Token};
use crate::flags::{ExecutionFlags, TradeFlags, TradeReportFlags};
use crate::session::SequenceContext;
use crate::timestamp::EventTime;

/// Wire variant a message was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Newline-delimited ASCII records
    Direct,
    /// Sequenced binary blocks
    Multicast,
}

/// Every message form listed in either catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Login,
    LoginResponse,
    GapRequest,
    GapResponse,
    Time,
    Clear,
    AddOrder,
    AddOrderLong,
    AddOrderExpanded,
    OrderExecuted,
    OrderExecutedLong,
    OrderExecutedAtPrice,
    OrderCancel,
    OrderCancelLong,
    ReduceSizeLong,
    ReduceSizeShort,
    ModifyOrderLong,
    ModifyOrderShort,
    DeleteOrder,
    Trade,
    TradeLong,
    TradeBreak,
    TradeReport,
    EndOfSession,
    TradingStatus,
    Statistics,
    AuctionUpdate,
    AuctionSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub session_sub_id: Token,
    pub username: Token,
    pub password: Token,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoginResponse {
    pub status: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRequest {
    pub unit: u8,
    pub sequence: u32,
    pub count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapResponse {
    pub unit: u8,
    pub sequence: u32,
    pub count: u16,
    pub status: u8,
}

/// Time reference for subsequent multicast offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    pub base: u32,
}

/// Symbol clear (direct) or unit clear (multicast, no symbol)
#[derive(Debug, Clone, PartialEq)]
pub struct Clear {
    pub symbol: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddOrder {
    pub order_id: Token,
    pub side: Side,
    pub quantity: u64,
    pub symbol: Token,
    pub price: Price,
    /// Direct short/long forms: `Y` display indicator
    pub display: Option<bool>,
    /// Direct expanded form: attributed order type (`S` = SI quote)
    pub order_type: Option<u8>,
    /// Multicast expanded form: raw add-order flags byte
    pub order_flags: Option<u8>,
    pub participant: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderExecuted {
    pub order_id: Token,
    pub quantity: u64,
    pub execution_id: Token,
    /// Executed-at-price form only
    pub remaining: Option<u64>,
    /// Executed-at-price form only
    pub price: Option<Price>,
    pub flags: ExecutionFlags,
}

/// Partial cancel (direct) or reduce size (multicast)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCancel {
    pub order_id: Token,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifyOrder {
    pub order_id: Token,
    pub quantity: u64,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOrder {
    pub order_id: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub order_id: Token,
    pub side: Side,
    pub quantity: u64,
    pub symbol: Token,
    pub price: Price,
    pub execution_id: Token,
    pub flags: TradeFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeBreak {
    pub execution_id: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeReport {
    pub quantity: u64,
    pub symbol: Token,
    pub price: Price,
    pub trade_id: Token,
    /// Time the trade was executed, as carried inside the report
    pub trade_time: EventTime,
    pub execution_venue: Token,
    pub currency: Token,
    pub flags: TradeReportFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradingStatus {
    pub symbol: Token,
    pub status: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub symbol: Token,
    pub price: Price,
    pub statistic_type: u8,
    pub price_determination: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuctionUpdate {
    pub symbol: Token,
    pub auction_type: u8,
    pub reference_price: Price,
    pub buy_quantity: u64,
    pub sell_quantity: u64,
    pub indicative_price: Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuctionSummary {
    pub symbol: Token,
    pub auction_type: u8,
    pub price: Price,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Login(Login),
    LoginResponse(LoginResponse),
    GapRequest(GapRequest),
    GapResponse(GapResponse),
    Time(Time),
    Clear(Clear),
    AddOrder(AddOrder),
    OrderExecuted(OrderExecuted),
    OrderCancel(OrderCancel),
    ModifyOrder(ModifyOrder),
    DeleteOrder(DeleteOrder),
    Trade(Trade),
    TradeBreak(TradeBreak),
    TradeReport(TradeReport),
    EndOfSession,
    TradingStatus(TradingStatus),
    Statistics(Statistics),
    AuctionUpdate(AuctionUpdate),
    AuctionSummary(AuctionSummary),
}

impl Message {
    /// Symbol the message refers to, when it carries one
    pub fn symbol(&self) -> Option<&Token> {
        match self {
            Message::Clear(m) => m.symbol.as_ref(),
            Message::AddOrder(m) => Some(&m.symbol),
            Message::Trade(m) => Some(&m.symbol),
            Message::TradeReport(m) => Some(&m.symbol),
            Message::TradingStatus(m) => Some(&m.symbol),
            Message::Statistics(m) => Some(&m.symbol),
            Message::AuctionUpdate(m) => Some(&m.symbol),
            Message::AuctionSummary(m) => Some(&m.symbol),
            _ => None,
        }
    }
}

/// A fully decoded message with its resolved time and transport identity
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub message_type: MessageType,
    pub timestamp: EventTime,
    /// Unit and sequence the message arrived under (multicast only)
    pub context: Option<SequenceContext>,
    pub message: Message,
}

impl Decoded {
    pub fn sequence(&self) -> Option<u32> {
        self.context.map(|c| c.sequence)
    }
}
