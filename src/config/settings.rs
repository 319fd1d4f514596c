use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub format: FormatSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FormatSettings {
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Overrides the locale's currency symbol.
    #[serde(default)]
    pub currency_symbol: Option<String>,
    /// Overrides the locale's date pattern (chrono strftime syntax).
    #[serde(default)]
    pub date_format: Option<String>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            currency_symbol: None,
            date_format: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    #[serde(default = "default_page_size")]
    pub page_size: String,
    /// Where rendered files go. Relative paths are taken from the config directory.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            output_dir: None,
        }
    }
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_page_size() -> String {
    "a4".to_string()
}
