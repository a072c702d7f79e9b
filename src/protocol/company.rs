//! Company and security wire types.

use serde::Deserialize;

/// A listed security.
///
/// The security list endpoint only returns these four fields; sector
/// metadata lives on [`Company`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: i32,
    pub symbol: String,
    pub security_name: String,
    pub active_status: String,
}

/// A listed company with sector metadata.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i32,
    pub company_name: String,
    pub symbol: String,
    pub security_name: String,
    pub status: String,
    pub company_email: String,
    pub website: String,
    pub sector_name: String,
    pub regulatory_body: String,
    pub instrument_type: String,
}

/// Detailed company profile information.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    pub company_email: String,
    pub company_profile: String,
    pub company_contact_person: String,
    pub logo_file_path: String,
    pub address_type: String,
    pub address_field: String,
    pub phone_number: String,
    pub fax: String,
    pub town: String,
}

/// A board of directors member.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub designation: String,
    pub member_photo_path: Option<String>,
    pub description: String,
}

impl BoardMember {
    /// Returns the complete name of the board member.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.middle_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
        }
    }
}

/// A corporate action: bonus shares, rights issue, or cash dividend.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateAction {
    pub active_status: String,
    pub authorization_comments: Option<String>,
    pub submitted_date: String,
    pub file_path: String,
    pub document_id: i32,
    pub ratio_num: f64,
    pub ratio_den: f64,
    pub cash_dividend: Option<f64>,
    pub fiscal_year: String,
    pub right_amount_per_share: Option<f64>,
    pub bonus_percentage: f64,
    pub right_percentage: Option<f64>,
    #[serde(rename = "sdId")]
    pub sd_id: i32,
}

impl CorporateAction {
    /// Returns `true` if this corporate action is a bonus share.
    #[must_use]
    pub fn is_bonus(&self) -> bool {
        self.bonus_percentage > 0.0
    }

    /// Returns `true` if this corporate action is a rights issue.
    #[must_use]
    pub fn is_right(&self) -> bool {
        self.right_percentage.is_some_and(|pct| pct > 0.0)
    }

    /// Returns `true` if this corporate action is a cash dividend.
    #[must_use]
    pub fn is_cash_dividend(&self) -> bool {
        self.cash_dividend.is_some_and(|amount| amount > 0.0)
    }
}

/// A fiscal year.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialYear {
    pub id: i32,
    #[serde(rename = "fyName")]
    pub fy_name: String,
    #[serde(rename = "fyNameNepali")]
    pub fy_name_nepali: String,
    pub from_year: String,
    pub to_year: String,
}

/// A fiscal quarter.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterMaster {
    pub id: i32,
    pub quarter_name: String,
}

/// A report type (annual or quarterly).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTypeMaster {
    pub id: i32,
    pub report_name: String,
}

/// Financial metrics of one report.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalReport {
    pub id: i32,
    pub quarter_master: Option<QuarterMaster>,
    pub report_type_master: Option<ReportTypeMaster>,
    pub financial_year: Option<FinancialYear>,
    #[serde(rename = "peValue")]
    pub pe_value: f64,
    #[serde(rename = "epsValue")]
    pub eps_value: f64,
    pub paid_up_capital: f64,
    pub profit_amount: f64,
    pub net_worth_per_share: f64,
    pub remarks: Option<String>,
}

/// A document attached to a report.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub id: i32,
    pub submitted_date: String,
    pub file_path: String,
    pub encrypted_id: String,
}

/// A quarterly or annual financial report.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i32,
    pub active_status: String,
    pub modified_date: String,
    pub application_type: i32,
    pub application_status: i32,
    pub fiscal_report: Option<FiscalReport>,
    #[serde(default)]
    pub application_document_details_list: Vec<ReportDocument>,
}

impl Report {
    /// Returns `true` if this is an annual report.
    #[must_use]
    pub fn is_annual(&self) -> bool {
        self.report_type() == Some("Annual Report")
    }

    /// Returns `true` if this is a quarterly report.
    #[must_use]
    pub fn is_quarterly(&self) -> bool {
        self.report_type() == Some("Quarterly Report")
    }

    /// Returns the quarter name (e.g. "First Quarter"), or `None` for
    /// annual reports.
    #[must_use]
    pub fn quarter_name(&self) -> Option<&str> {
        self.fiscal_report
            .as_ref()?
            .quarter_master
            .as_ref()
            .map(|quarter| quarter.quarter_name.as_str())
    }

    fn report_type(&self) -> Option<&str> {
        self.fiscal_report
            .as_ref()?
            .report_type_master
            .as_ref()
            .map(|report_type| report_type.report_name.as_str())
    }
}

/// Dividend declaration details.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendNotice {
    pub id: i32,
    pub financial_year: Option<FinancialYear>,
    pub cash_dividend: f64,
    pub bonus_share: f64,
    pub right_share: f64,
    pub remarks: Option<String>,
}

/// A company news item or announcement.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyNews {
    pub id: i32,
    pub news_source: String,
    pub news_headline: String,
    pub news_body: String,
    pub news_type: String,
    pub expiry_date: String,
    pub dividends_notice: Option<DividendNotice>,
}

/// A dividend declaration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    pub id: i32,
    pub active_status: String,
    pub modified_date: String,
    pub application_type: i32,
    pub application_status: i32,
    pub company_news: Option<CompanyNews>,
}

impl Dividend {
    /// Returns `true` if this dividend includes cash.
    #[must_use]
    pub fn has_cash_dividend(&self) -> bool {
        self.cash_percentage() > 0.0
    }

    /// Returns `true` if this dividend includes bonus shares.
    #[must_use]
    pub fn has_bonus_dividend(&self) -> bool {
        self.bonus_percentage() > 0.0
    }

    /// Returns the cash dividend percentage.
    #[must_use]
    pub fn cash_percentage(&self) -> f64 {
        self.notice().map_or(0.0, |notice| notice.cash_dividend)
    }

    /// Returns the bonus dividend percentage.
    #[must_use]
    pub fn bonus_percentage(&self) -> f64 {
        self.notice().map_or(0.0, |notice| notice.bonus_share)
    }

    /// Returns the fiscal year of the dividend, if declared.
    #[must_use]
    pub fn fiscal_year(&self) -> Option<&str> {
        self.notice()?
            .financial_year
            .as_ref()
            .map(|year| year.fy_name.as_str())
    }

    fn notice(&self) -> Option<&DividendNotice> {
        self.company_news.as_ref()?.dividends_notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_member_full_name_skips_empty_middle_name() {
        let member: BoardMember = serde_json::from_str(
            r#"{"firstName":"Ram","middleName":"","lastName":"Shrestha",
                "designation":"Chairman","memberPhotoPath":null,"description":""}"#,
        )
        .expect("parse failed");
        assert_eq!(member.full_name(), "Ram Shrestha");
    }

    #[test]
    fn corporate_action_classification() {
        let action: CorporateAction = serde_json::from_str(
            r#"{"activeStatus":"A","authorizationComments":null,
                "submittedDate":"2026-01-05","filePath":"","documentId":9,
                "ratioNum":0.0,"ratioDen":0.0,"cashDividend":10.53,
                "fiscalYear":"2081/82","rightAmountPerShare":null,
                "bonusPercentage":0.0,"rightPercentage":null,"sdId":42}"#,
        )
        .expect("parse failed");
        assert!(action.is_cash_dividend());
        assert!(!action.is_bonus());
        assert!(!action.is_right());
    }

    #[test]
    fn dividend_percentages_default_to_zero_without_notice() {
        let dividend: Dividend = serde_json::from_str(
            r#"{"id":1,"activeStatus":"A","modifiedDate":"2026-01-05",
                "applicationType":1,"applicationStatus":7,"companyNews":null}"#,
        )
        .expect("parse failed");
        assert!(!dividend.has_cash_dividend());
        assert!(dividend.fiscal_year().is_none());
    }

    #[test]
    fn report_classification_reads_nested_type() {
        let report: Report = serde_json::from_str(
            r#"{"id":1,"activeStatus":"A","modifiedDate":"2026-01-05",
                "applicationType":1,"applicationStatus":7,
                "fiscalReport":{
                    "id":2,
                    "quarterMaster":{"id":1,"quarterName":"First Quarter"},
                    "reportTypeMaster":{"id":2,"reportName":"Quarterly Report"},
                    "financialYear":null,
                    "peValue":12.1,"epsValue":20.5,"paidUpCapital":1.0,
                    "profitAmount":2.0,"netWorthPerShare":150.0,"remarks":null
                },
                "applicationDocumentDetailsList":[]}"#,
        )
        .expect("parse failed");
        assert!(report.is_quarterly());
        assert!(!report.is_annual());
        assert_eq!(report.quarter_name(), Some("First Quarter"));
    }
}
