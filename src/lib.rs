pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;

pub use config::{load_config, load_document, Config};
pub use error::{InvoiceError, Result};
pub use invoice::{
    ClientBlock, CompanyBlock, FormattingContext, InvoiceDocumentData, InvoiceStatus, LineItem,
};
pub use pdf::{render, DocumentRenderer, RenderError, RenderedDocument};
