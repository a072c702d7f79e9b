//! Intraday graph endpoints.
//!
//! These are the POST endpoints that demand an obfuscated payload ID (see
//! [`payload`](crate::payload)). Each request recomputes the ID from the
//! live market-status ordinal, the current salts, and today's date in
//! Kathmandu, so a request issued across a day boundary stays valid.

use serde::Serialize;

use super::Client;
use crate::error::Result;
use crate::payload;
use crate::protocol::market::GraphPoint;

/// Market indices with intraday graph data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexKind {
    Nepse,
    Sensitive,
    Float,
    SensitiveFloat,
    Banking,
    DevelopmentBank,
    Finance,
    HotelTourism,
    Hydro,
    Investment,
    LifeInsurance,
    Manufacturing,
    Microfinance,
    MutualFund,
    NonLifeInsurance,
    Others,
    Trading,
}

impl IndexKind {
    /// Returns the server's graph ID for this index.
    #[must_use]
    pub fn graph_id(self) -> i32 {
        match self {
            Self::Banking => 51,
            Self::HotelTourism => 52,
            Self::Others => 53,
            Self::Hydro => 54,
            Self::DevelopmentBank => 55,
            Self::Manufacturing => 56,
            Self::Sensitive => 57,
            Self::Nepse => 58,
            Self::NonLifeInsurance => 59,
            Self::Finance => 60,
            Self::Trading => 61,
            Self::Float => 62,
            Self::SensitiveFloat => 63,
            Self::Microfinance => 64,
            Self::LifeInsurance => 65,
            Self::MutualFund => 66,
            Self::Investment => 67,
        }
    }
}

/// Request body of every graph POST.
#[derive(Clone, Copy, Debug, Serialize)]
struct GraphRequest {
    id: i64,
}

impl Client {
    /// Returns intraday graph data for a market index.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, including the
    /// market-status fetch backing the payload ID.
    pub async fn daily_index_graph(&self, kind: IndexKind) -> Result<Vec<GraphPoint>> {
        let (ordinal, day) = self.ordinal_and_day().await?;
        let salts = self.auth().salts().await?;
        let body = GraphRequest {
            id: payload::index_graph(salts, ordinal, day),
        };

        self.api_post(
            self.item_url(self.config.endpoints.graph_index, kind.graph_id())?,
            &body,
        )
        .await
    }

    /// Returns intraday price graph data for a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, including the
    /// market-status fetch backing the payload ID.
    pub async fn daily_scrip_graph(&self, security_id: i32) -> Result<Vec<GraphPoint>> {
        let (ordinal, day) = self.ordinal_and_day().await?;
        let body = GraphRequest {
            id: payload::scrip_graph(ordinal, day),
        };

        self.api_post(
            self.item_url(self.config.endpoints.graph_scrip, security_id)?,
            &body,
        )
        .await
    }

    /// Returns intraday price graph data for a security by ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn daily_scrip_graph_by_symbol(&self, symbol: &str) -> Result<Vec<GraphPoint>> {
        let security = self.security_by_symbol(symbol).await?;
        self.daily_scrip_graph(security.id).await
    }

    /// Fetches the payload inputs: market-status ordinal and the current
    /// Kathmandu day.
    async fn ordinal_and_day(&self) -> Result<(i64, u32)> {
        let status = self.market_status().await?;
        Ok((status.id, payload::current_day()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_ids_are_distinct() {
        let kinds = [
            IndexKind::Nepse,
            IndexKind::Sensitive,
            IndexKind::Float,
            IndexKind::SensitiveFloat,
            IndexKind::Banking,
            IndexKind::DevelopmentBank,
            IndexKind::Finance,
            IndexKind::HotelTourism,
            IndexKind::Hydro,
            IndexKind::Investment,
            IndexKind::LifeInsurance,
            IndexKind::Manufacturing,
            IndexKind::Microfinance,
            IndexKind::MutualFund,
            IndexKind::NonLifeInsurance,
            IndexKind::Others,
            IndexKind::Trading,
        ];

        let mut ids: Vec<i32> = kinds.iter().map(|kind| kind.graph_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), kinds.len());
        assert_eq!(IndexKind::Nepse.graph_id(), 58);
    }

    #[test]
    fn graph_request_serializes_to_wire_shape() {
        let body = serde_json::to_string(&GraphRequest { id: 298 }).expect("serialize failed");
        assert_eq!(body, r#"{"id":298}"#);
    }
}
