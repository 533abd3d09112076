pub mod price_index;
pub mod summary;
pub mod table;

pub use price_index::PriceIndex;
pub use summary::{summarize_quotes, summarize_rows, QuoteSummary};
pub use table::{parse_date_strict, parse_quote_date, DateCell, QuoteRow, QuoteTable};
