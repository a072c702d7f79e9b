//! Market data endpoints.

use super::Client;
use crate::error::{Error, Result};
use crate::protocol::market::{
    FloorSheetEntry, FloorSheetResponse, IndexRow, LiveMarketEntry, MarketDepth, MarketDepthRaw,
    MarketStatus, MarketSummary, MarketSummaryItem, PriceHistory, TodayPrice, TopMover, TopTrade,
    TopTransaction, TopTurnover,
};
use crate::protocol::company::{Company, Security};
use crate::protocol::Paginated;

/// ID of the main NEPSE index in the index listing.
const NEPSE_INDEX_ID: i32 = 58;

impl Client {
    /// Returns the current market status.
    ///
    /// Besides the open/close flag, the status carries the server-assigned
    /// ordinal that feeds the graph payload computation.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn market_status(&self) -> Result<MarketStatus> {
        self.api_get(self.endpoint_url(self.config.endpoints.market_status)?)
            .await
    }

    /// Returns `true` if the market is currently open.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn is_market_open(&self) -> Result<bool> {
        Ok(self.market_status().await?.is_market_open())
    }

    /// Returns the aggregate market summary for the day.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn market_summary(&self) -> Result<MarketSummary> {
        let items: Vec<MarketSummaryItem> = self
            .api_get(self.endpoint_url(self.config.endpoints.market_summary)?)
            .await?;
        Ok(MarketSummary::from_items(&items))
    }

    /// Returns every index and sub-index with current values.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn indices(&self) -> Result<Vec<IndexRow>> {
        self.api_get(self.endpoint_url(self.config.endpoints.nepse_index)?)
            .await
    }

    /// Returns the main NEPSE index.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// listing does not contain the main index.
    pub async fn nepse_index(&self) -> Result<IndexRow> {
        self.indices()
            .await?
            .into_iter()
            .find(|row| row.id == NEPSE_INDEX_ID)
            .ok_or_else(|| Error::not_found("main index missing from index listing"))
    }

    /// Returns all sector sub-indices (everything but the main index).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn sub_indices(&self) -> Result<Vec<IndexRow>> {
        let mut rows = self.indices().await?;
        rows.retain(|row| row.id != NEPSE_INDEX_ID);
        Ok(rows)
    }

    /// Returns today's price page for all securities.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn today_prices(&self) -> Result<Paginated<TodayPrice>> {
        self.api_get(self.endpoint_url(self.config.endpoints.today_price)?)
            .await
    }

    /// Returns the historical OHLCV page for a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn price_history(&self, security_id: i32) -> Result<Paginated<PriceHistory>> {
        self.api_get(self.item_url(self.config.endpoints.price_history, security_id)?)
            .await
    }

    /// Returns the floor sheet page for the whole market.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn floor_sheet(&self) -> Result<Paginated<FloorSheetEntry>> {
        let response: FloorSheetResponse = self
            .api_get(self.endpoint_url(self.config.endpoints.floor_sheet)?)
            .await?;
        Ok(response.floor_sheets)
    }

    /// Returns the order book depth for a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn market_depth(&self, security_id: i32) -> Result<MarketDepth> {
        let raw: MarketDepthRaw = self
            .api_get(self.item_url(self.config.endpoints.market_depth, security_id)?)
            .await?;
        Ok(raw.into())
    }

    /// Returns live market ticks for all securities.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn live_market(&self) -> Result<Vec<LiveMarketEntry>> {
        self.api_get(self.endpoint_url(self.config.endpoints.live_market)?)
            .await
    }

    /// Returns the top gainers board.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn top_gainers(&self) -> Result<Vec<TopMover>> {
        self.api_get(self.endpoint_url(self.config.endpoints.top_gainers)?)
            .await
    }

    /// Returns the top losers board.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn top_losers(&self) -> Result<Vec<TopMover>> {
        self.api_get(self.endpoint_url(self.config.endpoints.top_losers)?)
            .await
    }

    /// Returns the top share-volume board.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn top_trades(&self) -> Result<Vec<TopTrade>> {
        self.api_get(self.endpoint_url(self.config.endpoints.top_trade)?)
            .await
    }

    /// Returns the top turnover board.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn top_turnover(&self) -> Result<Vec<TopTurnover>> {
        self.api_get(self.endpoint_url(self.config.endpoints.top_turnover)?)
            .await
    }

    /// Returns the top transaction-count board.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn top_transactions(&self) -> Result<Vec<TopTransaction>> {
        self.api_get(self.endpoint_url(self.config.endpoints.top_transactions)?)
            .await
    }

    /// Returns all listed (non-delisted) securities.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn securities(&self) -> Result<Vec<Security>> {
        self.api_get(self.endpoint_url(self.config.endpoints.security_list)?)
            .await
    }

    /// Returns all listed companies with sector metadata.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn companies(&self) -> Result<Vec<Company>> {
        self.api_get(self.endpoint_url(self.config.endpoints.company_list)?)
            .await
    }

    /// Looks up a security by its ticker symbol, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if no
    /// security carries the symbol.
    pub async fn security_by_symbol(&self, symbol: &str) -> Result<Security> {
        self.securities()
            .await?
            .into_iter()
            .find(|security| security.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| Error::not_found(format!("no security with symbol {symbol:?}")))
    }
}
