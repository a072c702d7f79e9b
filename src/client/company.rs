//! Company fundamentals endpoints.
//!
//! Every endpoint takes a security ID; the `*_by_symbol` variants resolve
//! a ticker symbol first and cost one extra request for the security
//! list.

use super::Client;
use crate::error::Result;
use crate::protocol::company::{BoardMember, CompanyProfile, CorporateAction, Dividend, Report};

impl Client {
    /// Returns the detailed profile of a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn company_profile(&self, security_id: i32) -> Result<CompanyProfile> {
        self.api_get(self.item_url(self.config.endpoints.company_profile, security_id)?)
            .await
    }

    /// Returns the detailed profile of a security by ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn company_profile_by_symbol(&self, symbol: &str) -> Result<CompanyProfile> {
        let security = self.security_by_symbol(symbol).await?;
        self.company_profile(security.id).await
    }

    /// Returns the board of directors of a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn board_of_directors(&self, security_id: i32) -> Result<Vec<BoardMember>> {
        self.api_get(self.item_url(self.config.endpoints.board_of_directors, security_id)?)
            .await
    }

    /// Returns the board of directors of a security by ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn board_of_directors_by_symbol(&self, symbol: &str) -> Result<Vec<BoardMember>> {
        let security = self.security_by_symbol(symbol).await?;
        self.board_of_directors(security.id).await
    }

    /// Returns corporate actions (bonus, rights, dividends) of a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn corporate_actions(&self, security_id: i32) -> Result<Vec<CorporateAction>> {
        self.api_get(self.item_url(self.config.endpoints.corporate_actions, security_id)?)
            .await
    }

    /// Returns corporate actions of a security by ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn corporate_actions_by_symbol(&self, symbol: &str) -> Result<Vec<CorporateAction>> {
        let security = self.security_by_symbol(symbol).await?;
        self.corporate_actions(security.id).await
    }

    /// Returns quarterly and annual reports of a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn reports(&self, security_id: i32) -> Result<Vec<Report>> {
        self.api_get(self.item_url(self.config.endpoints.reports, security_id)?)
            .await
    }

    /// Returns quarterly and annual reports of a security by ticker
    /// symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn reports_by_symbol(&self, symbol: &str) -> Result<Vec<Report>> {
        let security = self.security_by_symbol(symbol).await?;
        self.reports(security.id).await
    }

    /// Returns the dividend history of a security.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure.
    pub async fn dividends(&self, security_id: i32) -> Result<Vec<Dividend>> {
        self.api_get(self.item_url(self.config.endpoints.dividend, security_id)?)
            .await
    }

    /// Returns the dividend history of a security by ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failure, or
    /// [`NotFound`](crate::error::ErrorKind::NotFound) for an unknown
    /// symbol.
    pub async fn dividends_by_symbol(&self, symbol: &str) -> Result<Vec<Dividend>> {
        let security = self.security_by_symbol(symbol).await?;
        self.dividends(security.id).await
    }
}
