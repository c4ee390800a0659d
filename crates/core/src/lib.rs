pub mod account;
pub mod category;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId};
pub use category::{Category, CategoryId};
pub use money::Money;
pub use transaction::NormalizedTransaction;
