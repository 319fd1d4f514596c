mod settings;

pub use settings::{Config, FormatSettings, PdfSettings};

use crate::error::{InvoiceError, Result};
use crate::invoice::{FormattingContext, InvoiceDocumentData};
use crate::pdf::PageSize;
use chrono::NaiveDate;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.invoice-render/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-render") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-render"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, or the defaults when the file does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        log::debug!("No config at {}; using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Output directory for rendered files
pub fn resolve_output_dir(config: &Config, config_dir: &Path) -> PathBuf {
    match config.pdf.output_dir.as_deref() {
        Some(dir) => {
            let path = expand_path(dir);
            if path.is_absolute() {
                path
            } else {
                config_dir.join(path)
            }
        }
        None => config_dir.join("output"),
    }
}

/// Build the formatting context from config, an optional locale override and
/// the date to treat as today
pub fn formatting_context(
    config: &Config,
    locale_override: Option<&str>,
    today: NaiveDate,
) -> Result<FormattingContext> {
    let tag = locale_override.unwrap_or(&config.format.locale);
    let mut ctx = FormattingContext::for_locale(tag, today)
        .ok_or_else(|| InvoiceError::UnknownLocale(tag.to_string()))?;
    if let Some(symbol) = &config.format.currency_symbol {
        ctx.currency_symbol = symbol.clone();
    }
    if let Some(pattern) = &config.format.date_format {
        ctx.date_format = pattern.clone();
    }
    Ok(ctx)
}

/// Parse a page size name
pub fn page_size(name: &str) -> Result<PageSize> {
    match name.to_ascii_lowercase().as_str() {
        "a4" => Ok(PageSize::A4),
        "letter" | "us-letter" => Ok(PageSize::LETTER),
        _ => Err(InvoiceError::UnknownPageSize(name.to_string())),
    }
}

/// Load an invoice snapshot from a .toml or .json file
pub fn load_document(path: &Path) -> Result<InvoiceDocumentData> {
    if !path.exists() {
        return Err(InvoiceError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let parse_error = |reason: String| InvoiceError::InputParse {
        path: path.to_path_buf(),
        reason,
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let data: InvoiceDocumentData = if is_json {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    validate_document(&data)?;
    Ok(data)
}

/// Reject snapshots the renderer cannot represent honestly
pub fn validate_document(data: &InvoiceDocumentData) -> Result<()> {
    if data.client.name.trim().is_empty() {
        return Err(InvoiceError::InvalidDocument {
            number: data.number.clone(),
            reason: "client name is empty".to_string(),
        });
    }
    if let Some(item) = data.items.iter().find(|i| i.unit_price.is_sign_negative()) {
        return Err(InvoiceError::InvalidDocument {
            number: data.number.clone(),
            reason: format!("unit price of '{}' is negative", item.description),
        });
    }
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[format]
locale = "en-US"              # en-US, en-GB, de-DE, fr-FR, pt-BR
# currency_symbol = "$"       # optional, overrides the locale
# date_format = "%B %d, %Y"   # optional, chrono strftime pattern

[pdf]
page_size = "a4"              # a4 or letter
output_dir = "output"         # relative to this directory, or absolute / ~/...
"#;

/// Template content for a sample invoice snapshot
pub const INVOICE_TEMPLATE: &str = r##"# Render with:
#   invoice-render render invoice.toml

number = "INV-2026-0001"
status = "sent"               # draft, sent, paid, overdue, cancelled
issue_date = "2026-01-15"
due_date = "2026-02-14"
total_amount = "212.50"
notes = "Thank you for your business. Payment is due within 30 days."

[client]
name = "Example Client Inc."
email = "jane@example.com"    # optional
address = """
456 Client Avenue
Los Angeles, CA 90001"""      # optional
accent_color = "#0EA5E9"      # optional

[company]                     # optional block, every field optional
name = "Your Company Name"
address = "123 Business Street\nSan Francisco, CA 94102"
email = "billing@yourcompany.com"
phone = "+1-555-123-4567"

[[items]]
description = "Design"
quantity = 2
unit_price = "50.00"

[[items]]
description = "Hosting"
quantity = 1
unit_price = "12.50"

[[items]]
description = "Support"
quantity = 5
unit_price = "20.00"
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_template_is_a_valid_document() {
        let data: InvoiceDocumentData = toml::from_str(INVOICE_TEMPLATE).unwrap();
        validate_document(&data).unwrap();
        assert_eq!(data.items.len(), 3);
        assert_eq!(data.subtotal(), data.total_amount);
    }

    #[test]
    fn config_template_parses() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.format.locale, "en-US");
        assert_eq!(page_size(&config.pdf.page_size).unwrap(), PageSize::A4);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.format.locale, "en-US");
        assert_eq!(config.pdf.page_size, "a4");
        let dir = Path::new("/tmp/cfg");
        assert_eq!(resolve_output_dir(&config, dir), dir.join("output"));
    }

    #[test]
    fn config_overrides_locale_preset() {
        let mut config = Config::default();
        config.format.currency_symbol = Some("US$".to_string());
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let ctx = formatting_context(&config, None, today).unwrap();
        assert_eq!(ctx.currency_symbol, "US$");
        assert!(matches!(
            formatting_context(&config, Some("tlh"), today),
            Err(InvoiceError::UnknownLocale(_))
        ));
    }
}
