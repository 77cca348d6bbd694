pub mod history;
pub mod reports;

pub use history::HistoryLedger;
pub use reports::ReportStore;
