//! Finance aggregation, charts and form rules.

pub mod catalog;
pub mod drafts;
pub mod pie;
pub mod summary;

pub use catalog::{AvailableGood, TrendBar, available_goods, trend_bars};
pub use drafts::{CostDraft, CustomerDraft, DraftError, OrderDraft, SaleDraft, SupplierDraft};
pub use pie::{PieSlice, build_slices};
pub use summary::FinancialSummary;
