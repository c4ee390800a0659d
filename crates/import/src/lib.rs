pub mod api;
pub mod classify;
pub mod normalize;
pub mod schema;
pub mod session;
pub mod tokenize;

pub use api::{ApiClient, ApiError, TransactionSink};
pub use classify::{merchant_patterns, Classifier, PatternKind, Suggestion};
pub use normalize::{is_valid_iso_date, normalize_amount, normalize_date};
pub use schema::{infer_schema, ColumnMapping, InferredLayout, SchemaError};
pub use session::{CandidateRow, ImportError, ImportSession, RowField, RowId, SessionState};
pub use tokenize::{tokenize, RawRow};
