use serde::Deserialize;

use crate::config::Config;
use crate::model::School;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub school: School,
    pub config: Config,
}
