//! Client configuration.
//!
//! [`Config`] collects everything the transport and the endpoint wrappers
//! need up front: the API origin, the `User-Agent` string, whether to
//! verify TLS certificates, and the endpoint path table.
//!
//! The defaults target the live exchange. TLS verification is on by
//! default; the NEPSE servers are notorious for serving broken certificate
//! chains, so [`Config::tls_verification`] exists as an explicit opt-out.

use url::Url;

/// The configuration of a [`Client`](crate::client::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Origin of the NEPSE API, without a trailing path.
    pub base_url: Url,

    /// The `User-Agent` string used in API requests.
    ///
    /// The exchange rejects obviously non-browser agents, so the default
    /// mimics a desktop browser.
    pub user_agent: String,

    /// Whether to verify the server's TLS certificate chain.
    ///
    /// The production servers frequently present incomplete chains;
    /// setting this to `false` accepts them anyway.
    pub tls_verification: bool,

    /// Path table for every endpoint the client talks to.
    pub endpoints: Endpoints,
}

impl Config {
    /// Origin of the production NEPSE API.
    const DEFAULT_BASE_URL: &'static str = "https://www.nepalstock.com.np";

    /// Default browser-like `User-Agent`.
    const DEFAULT_USER_AGENT: &'static str = concat!(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
        "(KHTML, like Gecko) Chrome/124.0 Safari/537.36 salter/",
        env!("CARGO_PKG_VERSION"),
    );
}

impl Default for Config {
    /// Returns a configuration pointing at the production exchange.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded origin is invalid, which should never
    /// happen as it's a compile-time constant.
    fn default() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("invalid base url"),
            user_agent: Self::DEFAULT_USER_AGENT.to_owned(),
            tls_verification: true,
            endpoints: Endpoints::default(),
        }
    }
}

/// Endpoint paths of the NEPSE API.
///
/// Paths that address a single security are templates: the security ID is
/// appended as an extra path segment by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Token endpoint; yields the raw token response with salts.
    pub authenticate: &'static str,

    /// Market open/close status; its `id` field is the payload ordinal.
    pub market_status: &'static str,

    /// Aggregate turnover/volume figures for the day.
    pub market_summary: &'static str,

    /// All indices and sub-indices with their current values.
    pub nepse_index: &'static str,

    /// Listed securities (append `?nonDelisted=true` server-side filter).
    pub security_list: &'static str,

    /// Listed companies with sector metadata.
    pub company_list: &'static str,

    /// Today's price page for all securities.
    pub today_price: &'static str,

    /// Historical OHLCV page for one security (`/{id}`).
    pub price_history: &'static str,

    /// Floor sheet page for the whole market.
    pub floor_sheet: &'static str,

    /// Market depth for one security (`/{id}`).
    pub market_depth: &'static str,

    /// Live market ticks for all securities.
    pub live_market: &'static str,

    /// Top-ten boards.
    pub top_gainers: &'static str,
    pub top_losers: &'static str,
    pub top_trade: &'static str,
    pub top_turnover: &'static str,
    pub top_transactions: &'static str,

    /// Company profile for one security (`/{id}`).
    pub company_profile: &'static str,

    /// Board of directors for one security (`/{id}`).
    pub board_of_directors: &'static str,

    /// Corporate actions for one security (`/{id}`).
    pub corporate_actions: &'static str,

    /// Quarterly/annual reports for one security (`/{id}`).
    pub reports: &'static str,

    /// Dividend declarations for one security (`/{id}`).
    pub dividend: &'static str,

    /// Intraday index graph (`/{index-id}`, POST with payload ID).
    pub graph_index: &'static str,

    /// Intraday price graph for one security (`/{id}`, POST with
    /// payload ID).
    pub graph_scrip: &'static str,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authenticate: "/api/authenticate/prove",
            market_status: "/api/nots/nepse-data/market-open",
            market_summary: "/api/nots/market-summary/",
            nepse_index: "/api/nots/nepse-index",
            security_list: "/api/nots/security?nonDelisted=true",
            company_list: "/api/nots/company/list",
            today_price: "/api/nots/nepse-data/today-price",
            price_history: "/api/nots/market/history/security",
            floor_sheet: "/api/nots/nepse-data/floorsheet",
            market_depth: "/api/nots/nepse-data/marketdepth",
            live_market: "/api/nots/nepse-data/live-market",
            top_gainers: "/api/nots/top-ten/top-gainer",
            top_losers: "/api/nots/top-ten/top-loser",
            top_trade: "/api/nots/top-ten/trade",
            top_turnover: "/api/nots/top-ten/turnover",
            top_transactions: "/api/nots/top-ten/transaction",
            company_profile: "/api/nots/security/profile",
            board_of_directors: "/api/nots/security/boardOfDirectors",
            corporate_actions: "/api/nots/security/corporate-actions",
            reports: "/api/nots/application/reports",
            dividend: "/api/nots/application/dividend",
            graph_index: "/api/nots/graph/index",
            graph_scrip: "/api/nots/market/graphdata/daily",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_parses() {
        let config = Config::default();
        assert_eq!(config.base_url.scheme(), "https");
        assert!(config.tls_verification);
    }

    #[test]
    fn endpoint_joins_resolve_against_base() {
        let config = Config::default();
        let url = config
            .base_url
            .join(config.endpoints.authenticate)
            .expect("join failed");
        assert_eq!(
            url.as_str(),
            "https://www.nepalstock.com.np/api/authenticate/prove"
        );
    }
}
