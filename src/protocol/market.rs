//! Market data wire types.
//!
//! Shapes follow the API's JSON bodies field for field; processed
//! variants ([`MarketSummary`], [`MarketDepth`]) fold awkward raw layouts
//! into something callers can use directly.

use serde::{Deserialize, Deserializer};

/// Current market status.
///
/// The `id` field doubles as the server-assigned ordinal consumed by the
/// graph payload computation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub is_open: String,
    pub as_of: String,
    pub id: i64,
}

impl MarketStatus {
    /// Returns `true` if the market is currently open.
    #[must_use]
    pub fn is_market_open(&self) -> bool {
        self.is_open == "OPEN"
    }
}

/// A single label/value row of the market summary response.
#[derive(Clone, Debug, Deserialize)]
pub struct MarketSummaryItem {
    pub detail: String,
    pub value: f64,
}

/// Aggregate market figures for the day.
///
/// The API returns these as label/value rows; [`MarketSummary::from_items`]
/// folds them by label.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarketSummary {
    pub total_turnover: f64,
    pub total_traded_shares: f64,
    pub total_transactions: f64,
    pub total_scrips_traded: f64,
    pub total_market_capitalization: f64,
    pub total_float_market_cap: f64,
}

impl MarketSummary {
    /// Folds the label/value rows of the summary endpoint.
    ///
    /// Unknown labels are ignored so new rows on the server side do not
    /// break parsing.
    #[must_use]
    pub fn from_items(items: &[MarketSummaryItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            match item.detail.trim() {
                "Total Turnover Rs:" => summary.total_turnover = item.value,
                "Total Traded Shares" => summary.total_traded_shares = item.value,
                "Total Transactions" => summary.total_transactions = item.value,
                "Total Scrips Traded" => summary.total_scrips_traded = item.value,
                "Total Market Capitalization Rs:" => {
                    summary.total_market_capitalization = item.value;
                }
                "Total Float Market Capitalization Rs:" => {
                    summary.total_float_market_cap = item.value;
                }
                other => trace!("ignoring market summary row {other:?}"),
            }
        }
        summary
    }
}

/// One row of the index listing; covers the main index and every sector
/// sub-index.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRow {
    pub id: i32,
    pub index: String,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub change: f64,
    pub per_change: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub current_value: f64,
    pub generated_time: String,
}

/// Today's price data for a security.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayPrice {
    pub id: i64,
    pub symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub total_traded_quantity: i64,
    pub total_traded_value: f64,
    pub previous_close: f64,
    #[serde(rename = "differenceRs")]
    pub difference_rs: f64,
    pub percentage_change: f64,
    pub total_trades: i32,
    pub business_date: String,
    pub last_traded_price: f64,
    pub max_price: f64,
    pub min_price: f64,
}

/// Historical OHLCV data for a security.
///
/// The API does not provide an open price in historical rows.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub business_date: String,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub total_traded_quantity: i64,
    pub total_traded_value: f64,
    pub total_trades: i32,
}

/// A single floor sheet contract.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSheetEntry {
    pub contract_id: i64,
    pub stock_symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub buyer_member_id: i32,
    pub seller_member_id: i32,
    pub contract_quantity: i64,
    pub contract_rate: f64,
    pub contract_amount: f64,
    pub business_date: String,
    pub trade_time: String,
    pub buyer_broker_name: String,
    pub seller_broker_name: String,
    pub trade_book_id: i64,
}

/// Envelope of the floor sheet endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct FloorSheetResponse {
    #[serde(rename = "floorsheets")]
    pub floor_sheets: super::Paginated<FloorSheetEntry>,
}

/// A single order book level in market depth.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthEntry {
    pub stock_id: i32,
    #[serde(rename = "orderBookOrderPrice")]
    pub price: f64,
    pub quantity: i64,
    #[serde(rename = "orderCount")]
    pub orders: i32,
    pub is_buy: i32,
}

/// Raw layout of the market depth endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDepthRaw {
    pub total_buy_qty: i64,
    pub total_sell_qty: i64,
    pub market_depth: DepthLists,
}

/// Buy/sell lists nested inside the raw depth response.
#[derive(Clone, Debug, Deserialize)]
pub struct DepthLists {
    #[serde(rename = "buyMarketDepthList")]
    pub buy_list: Vec<DepthEntry>,
    #[serde(rename = "sellMarketDepthList")]
    pub sell_list: Vec<DepthEntry>,
}

/// Processed market depth information.
#[derive(Clone, Debug)]
pub struct MarketDepth {
    pub total_buy_qty: i64,
    pub total_sell_qty: i64,
    pub buy_depth: Vec<DepthEntry>,
    pub sell_depth: Vec<DepthEntry>,
}

impl From<MarketDepthRaw> for MarketDepth {
    fn from(raw: MarketDepthRaw) -> Self {
        Self {
            total_buy_qty: raw.total_buy_qty,
            total_sell_qty: raw.total_sell_qty,
            buy_depth: raw.market_depth.buy_list,
            sell_depth: raw.market_depth.sell_list,
        }
    }
}

/// Entry in the top gainers/losers boards.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMover {
    pub symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub ltp: f64,
    pub point_change: f64,
    pub percentage_change: f64,
}

/// Entry in the top share-volume board.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTrade {
    pub symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub share_traded: i64,
    pub closing_price: f64,
}

/// Entry in the top turnover board.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTurnover {
    pub symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub turnover: f64,
    pub closing_price: f64,
}

/// Entry in the top transaction-count board.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTransaction {
    pub symbol: String,
    pub security_name: String,
    pub security_id: i32,
    pub total_trades: i32,
    pub last_traded_price: f64,
}

/// Live market tick for a security.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMarketEntry {
    pub security_id: String,
    pub symbol: String,
    pub security_name: String,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub last_traded_price: f64,
    pub total_trade_quantity: i64,
    pub total_trade_value: f64,
    pub previous_close: f64,
    pub percentage_change: f64,
    pub last_traded_volume: i64,
    pub last_updated_date_time: String,
    pub average_traded_price: f64,
}

/// A single point of intraday graph data.
///
/// Index graphs return `[timestamp, value]` pairs; scrip graphs return
/// `{"time": ..., "value": ...}` objects. Both deserialize into this.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl<'de> Deserialize<'de> for GraphPoint {
    #[expect(clippy::cast_possible_truncation)]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Pair([f64; 2]),
            Object { time: i64, value: f64 },
        }

        match Wire::deserialize(deserializer)? {
            Wire::Pair([timestamp, value]) => Ok(Self {
                timestamp: timestamp as i64,
                value,
            }),
            Wire::Object { time, value } => Ok(Self {
                timestamp: time,
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_status_open_flag() {
        let status: MarketStatus = serde_json::from_str(
            r#"{"isOpen":"OPEN","asOf":"2026-07-27 11:00:00","id":79}"#,
        )
        .expect("parse failed");
        assert!(status.is_market_open());
        assert_eq!(status.id, 79);
    }

    #[test]
    fn summary_folds_by_label() {
        let items: Vec<MarketSummaryItem> = serde_json::from_str(
            r#"[
                {"detail":"Total Turnover Rs:","value":5200000000.0},
                {"detail":"Total Traded Shares","value":12000000.0},
                {"detail":"Total Transactions","value":65000.0},
                {"detail":"Total Scrips Traded","value":310.0},
                {"detail":"Something New","value":1.0}
            ]"#,
        )
        .expect("parse failed");

        let summary = MarketSummary::from_items(&items);
        assert!((summary.total_turnover - 5_200_000_000.0).abs() < f64::EPSILON);
        assert!((summary.total_scrips_traded - 310.0).abs() < f64::EPSILON);
        // Unknown label ignored, missing labels stay zero.
        assert!(summary.total_market_capitalization.abs() < f64::EPSILON);
    }

    #[test]
    fn graph_point_parses_pair_form() {
        let point: GraphPoint =
            serde_json::from_str("[1721900000, 2024.55]").expect("parse failed");
        assert_eq!(point.timestamp, 1_721_900_000);
        assert!((point.value - 2024.55).abs() < f64::EPSILON);
    }

    #[test]
    fn graph_point_parses_object_form() {
        let point: GraphPoint =
            serde_json::from_str(r#"{"time":1721900000,"value":655.0}"#).expect("parse failed");
        assert_eq!(point.timestamp, 1_721_900_000);
        assert!((point.value - 655.0).abs() < f64::EPSILON);
    }

    #[test]
    fn depth_raw_folds_into_processed_form() {
        let raw: MarketDepthRaw = serde_json::from_str(
            r#"{
                "totalBuyQty": 900, "totalSellQty": 400,
                "marketDepth": {
                    "buyMarketDepthList": [
                        {"stockId":131,"orderBookOrderPrice":655.0,
                         "quantity":900,"orderCount":3,"isBuy":1}
                    ],
                    "sellMarketDepthList": []
                }
            }"#,
        )
        .expect("parse failed");

        let depth = MarketDepth::from(raw);
        assert_eq!(depth.total_buy_qty, 900);
        assert_eq!(depth.buy_depth.len(), 1);
        assert!(depth.sell_depth.is_empty());
    }
}
