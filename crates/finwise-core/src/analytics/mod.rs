pub mod category;
pub mod monthly;
pub mod summary;
pub mod transaction;

pub use transaction::{TransactionRecord, TransactionType, TypeFilter};
