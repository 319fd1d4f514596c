mod document;
mod format;

pub use document::{ClientBlock, CompanyBlock, InvoiceDocumentData, InvoiceStatus, LineItem};
pub use format::{FormattingContext, SymbolPosition, SUPPORTED_LOCALES};
