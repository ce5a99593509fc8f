use crate::media::{AudioLinks, DriveClient};
use crate::webhook::Analysis;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: Option<String>,
    pub audio: Option<AudioLinks>,
}

impl AnalyzeResponse {
    pub fn new(analysis: Analysis, drive: &DriveClient) -> Self {
        let audio = analysis
            .result
            .as_deref()
            .and_then(|result| drive.links_in(result));

        Self {
            result: analysis.result,
            audio,
        }
    }
}
