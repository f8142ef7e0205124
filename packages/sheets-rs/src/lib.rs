//! Minimal Google Sheets values client.
//!
//! Covers the three operations a tracker needs: append rows, read a
//! range, overwrite a range. Authentication is a bearer token the
//! caller obtains out of band.

pub mod models;

use reqwest::Client;
use thiserror::Error;

use crate::models::{AppendResponse, UpdateResponse, ValueRange};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets api error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct SheetsOptions {
    pub access_token: String,
    pub spreadsheet_id: String,
}

#[derive(Debug, Clone)]
pub struct SheetsService {
    options: SheetsOptions,
    client: Client,
}

impl SheetsService {
    pub fn new(options: SheetsOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Append rows after the last row of `range`'s table.
    pub async fn append_values(
        &self,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<AppendResponse, SheetsError> {
        let url = format!(
            "{BASE_URL}/{id}/values/{range}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            id = self.options.spreadsheet_id,
        );
        let body = ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.options.access_token)
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Read a range; absent cells come back as an empty grid.
    pub async fn get_values(&self, range: &str) -> Result<ValueRange, SheetsError> {
        let url = format!(
            "{BASE_URL}/{id}/values/{range}",
            id = self.options.spreadsheet_id,
        );

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.options.access_token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Overwrite cells starting at the top-left of `range`.
    pub async fn update_values(
        &self,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<UpdateResponse, SheetsError> {
        let url = format!(
            "{BASE_URL}/{id}/values/{range}?valueInputOption=USER_ENTERED",
            id = self.options.spreadsheet_id,
        );
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.options.access_token)
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
