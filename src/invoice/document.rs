use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// The party being billed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientBlock {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form, one address line per `\n`.
    #[serde(default)]
    pub address: Option<String>,
    /// `#RRGGBB` or `#RRGGBBAA`; anything unusable falls back to the brand color.
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// The issuing business, shown in the header.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CompanyBlock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Everything needed to draw one invoice. Built by the caller, read-only
/// during a render.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvoiceDocumentData {
    pub number: String,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub client: ClientBlock,
    #[serde(default)]
    pub company: Option<CompanyBlock>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Drawn verbatim as the invoice total, even if it disagrees with the items.
    pub total_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoiceDocumentData {
    /// Sum of every item's line total, computed independently of `total_amount`.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }
}
