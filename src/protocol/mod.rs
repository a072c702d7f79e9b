//! Wire types and parsing for the NEPSE API.
//!
//! # Submodules
//!
//! * [`auth`] - token endpoint response with salts
//! * [`market`] - market status, summary, indices, prices, depth
//! * [`company`] - securities, profiles, corporate actions, dividends
//!
//! The module also provides [`json`], the shared body parser that logs
//! responses consistently: parsed structures at TRACE, malformed bodies at
//! ERROR with the raw text preserved at TRACE for protocol analysis.

pub mod auth;
pub mod company;
pub mod market;

use std::fmt::Debug;

use serde::Deserialize;

use crate::error::Result;

/// Parses and logs a JSON response body.
///
/// # Arguments
///
/// * `body` - Response body text to parse
/// * `origin` - Description of the API endpoint for logging
///
/// # Errors
///
/// Returns a parse error if the body is not valid JSON or does not match
/// the target type.
pub fn json<T>(body: &str, origin: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Debug,
{
    match serde_json::from_str(body) {
        Ok(result) => {
            trace!("{origin}: {result:#?}");
            Ok(result)
        }
        Err(e) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
                trace!("{origin}: {json:#?}");
            } else {
                error!("{origin}: failed parsing response ({e:?})");
                trace!("{body}");
            }
            Err(e.into())
        }
    }
}

/// A page of results as the API returns them.
///
/// Several listing endpoints (today's price, floor sheet, price history)
/// wrap their rows in this envelope.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub content: Vec<T>,
    #[serde(rename = "number")]
    pub page_number: i32,
    pub size: i32,
    pub total_elements: i64,
    pub total_pages: i32,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parses_into_target_type() {
        let page: Paginated<i64> = json(
            r#"{"content":[1,2,3],"number":0,"size":3,"totalElements":3,
                "totalPages":1,"first":true,"last":true,"numberOfElements":3}"#,
            "test",
        )
        .expect("parse failed");
        assert_eq!(page.content, vec![1, 2, 3]);
        assert!(page.first && page.last);
    }

    #[test]
    fn json_reports_malformed_bodies() {
        let result: Result<Paginated<i64>> = json("not json", "test");
        assert!(result.is_err());
    }
}
