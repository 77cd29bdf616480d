use vocab_data::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum PracticeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to parse practice config: {0}")]
    Config(serde_json::Error),
    #[error("invalid practice config: {0}")]
    InvalidConfig(String),
    #[error("failed to read practice transcript: {0}")]
    Transcript(serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(target_arch = "wasm32")]
impl From<PracticeError> for wasm_bindgen::JsValue {
    fn from(error: PracticeError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}
