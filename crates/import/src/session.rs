//! The preview/edit session: everything between "file selected" and "batch
//! persisted".
//!
//! Candidate rows stay raw, user-editable strings for the whole preview
//! phase; a row is allowed to sit in an invalid state while the user types.
//! Validation only hardens at [`ImportSession::commit`], which re-normalizes
//! every row and refuses the entire batch on the first failure.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use florin_core::{Account, AccountId, Category, Money, NormalizedTransaction};

use crate::api::{ApiError, TransactionSink};
use crate::classify::Classifier;
use crate::normalize::{is_valid_iso_date, normalize_amount, normalize_date};
use crate::schema::{infer_schema, ColumnMapping, SchemaError};
use crate::tokenize::{tokenize, RawRow};

/// Stable within one session; never reused, even after row removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An import row after column-role resolution: still raw strings, still
/// editable, not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRow {
    pub id: RowId,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Date,
    Description,
    Amount,
    Category,
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowField::Date => write!(f, "date"),
            RowField::Description => write!(f, "description"),
            RowField::Amount => write!(f, "amount"),
            RowField::Category => write!(f, "category"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Previewing,
    Committing,
    /// Cleared after a successful commit; the session holds nothing anymore.
    Idle,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Select an account before importing.")]
    MissingAccount,
    #[error("Unknown account id: {0}")]
    UnknownAccount(AccountId),
    #[error("There are no transactions to import.")]
    EmptyBatch,
    #[error("Row {0} is missing a category.")]
    UncategorizedRow(usize),
    #[error("Row {row} has an invalid {field}.")]
    InvalidRow { row: usize, field: RowField },
    #[error("An import is already being committed.")]
    CommitInFlight,
    #[error(transparent)]
    Collaborator(#[from] ApiError),
}

/// One statement import, from file selection to commit or cancel.
///
/// Owns the candidate rows and the reference data they will be validated
/// against. Each file selection gets a fresh session; nothing is shared
/// between imports.
#[derive(Debug)]
pub struct ImportSession {
    rows: Vec<CandidateRow>,
    mapping: ColumnMapping,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    account: Option<AccountId>,
    bulk_category: Option<String>,
    state: SessionState,
}

impl ImportSession {
    /// Tokenizes the statement text, infers the column layout and enters the
    /// preview state. A UTF-8 BOM, common in bank exports saved on Windows,
    /// is ignored.
    pub fn start(text: &str) -> Result<Self, ImportError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let layout = infer_schema(tokenize(text))?;

        let rows: Vec<CandidateRow> = layout
            .data_rows
            .iter()
            .enumerate()
            .map(|(index, raw)| CandidateRow {
                id: RowId(index as u64),
                date: cell(raw, Some(layout.mapping.date)).to_string(),
                description: cell(raw, Some(layout.mapping.description)).to_string(),
                amount: cell(raw, Some(layout.mapping.amount)).to_string(),
                category: cell(raw, layout.mapping.category).to_string(),
            })
            .collect();

        tracing::debug!(rows = rows.len(), "statement parsed into candidate rows");

        Ok(ImportSession {
            rows,
            mapping: layout.mapping,
            accounts: Vec::new(),
            categories: Vec::new(),
            account: None,
            bulk_category: None,
            state: SessionState::Previewing,
        })
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_committing(&self) -> bool {
        self.state == SessionState::Committing
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_account(&self) -> Option<AccountId> {
        self.account
    }

    pub fn bulk_category(&self) -> Option<&str> {
        self.bulk_category.as_deref()
    }

    /// Installs the reference data fetched from the read endpoints. Commit
    /// validation cannot pass before this has happened.
    pub fn seed(&mut self, accounts: Vec<Account>, categories: Vec<Category>) {
        self.accounts = accounts;
        self.categories = categories;
    }

    pub fn select_account(&mut self, id: AccountId) -> Result<(), ImportError> {
        self.ensure_editable()?;
        if !self.accounts.iter().any(|a| a.id == id) {
            return Err(ImportError::UnknownAccount(id));
        }
        self.account = Some(id);
        Ok(())
    }

    /// Edits one field of one row. Returns `Ok(false)` when no row carries
    /// the id (it may have been removed).
    pub fn edit_row(
        &mut self,
        id: RowId,
        field: RowField,
        value: &str,
    ) -> Result<bool, ImportError> {
        self.ensure_editable()?;
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        match field {
            RowField::Date => row.date = value.to_string(),
            RowField::Description => row.description = value.to_string(),
            RowField::Amount => row.amount = value.to_string(),
            RowField::Category => row.category = value.to_string(),
        }
        Ok(true)
    }

    pub fn edit_row_category(&mut self, id: RowId, value: &str) -> Result<bool, ImportError> {
        self.edit_row(id, RowField::Category, value)
    }

    /// Removes a row for the rest of the session. There is no undo.
    pub fn remove_row(&mut self, id: RowId) -> Result<bool, ImportError> {
        self.ensure_editable()?;
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        Ok(self.rows.len() < before)
    }

    /// Overwrites every row's category, including rows already categorized,
    /// and stages the value for display.
    pub fn apply_bulk_category(&mut self, value: &str) -> Result<(), ImportError> {
        self.ensure_editable()?;
        self.bulk_category = Some(value.to_string());
        for row in &mut self.rows {
            row.category = value.to_string();
        }
        Ok(())
    }

    /// Fills in categories for uncategorized rows from learned merchant
    /// patterns. Rows the user already categorized are left alone.
    pub fn suggest_categories(&mut self, classifier: &Classifier) -> Result<usize, ImportError> {
        self.ensure_editable()?;
        let mut filled = 0;
        for row in &mut self.rows {
            if !row.category.trim().is_empty() {
                continue;
            }
            if let Some(suggestion) = classifier.suggest(&row.description) {
                row.category = suggestion.category;
                filled += 1;
            }
        }
        tracing::debug!(filled, "applied category suggestions");
        Ok(filled)
    }

    /// Discards the session and every candidate row. No side effects.
    pub fn cancel(self) {
        tracing::debug!(rows = self.rows.len(), "import cancelled");
    }

    /// Validates and persists the batch.
    ///
    /// Preconditions run first, in order, cheapest first: an account is
    /// selected, at least one row remains, every row has a category. Then
    /// every row is strictly re-normalized; the first invalid date or
    /// invalid/zero amount aborts the whole commit, identifying the 1-based
    /// row. Only a fully valid batch reaches the collaborator, as a single
    /// call. On success the session clears; on collaborator failure the rows
    /// survive untouched so the user can fix and resubmit.
    pub async fn commit<S>(&mut self, sink: &S) -> Result<u64, ImportError>
    where
        S: TransactionSink + Sync + ?Sized,
    {
        if self.state == SessionState::Committing {
            return Err(ImportError::CommitInFlight);
        }
        let account = self.account.ok_or(ImportError::MissingAccount)?;
        if self.rows.is_empty() {
            return Err(ImportError::EmptyBatch);
        }
        if let Some(index) = self
            .rows
            .iter()
            .position(|row| row.category.trim().is_empty())
        {
            return Err(ImportError::UncategorizedRow(index + 1));
        }

        let mut batch = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            let row_number = index + 1;

            let date = normalize_date(&row.date);
            if !is_valid_iso_date(&date) {
                return Err(ImportError::InvalidRow {
                    row: row_number,
                    field: RowField::Date,
                });
            }
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
                ImportError::InvalidRow {
                    row: row_number,
                    field: RowField::Date,
                }
            })?;

            let amount = match normalize_amount(&row.amount) {
                Some(value) => Money::from_decimal(value),
                None => {
                    return Err(ImportError::InvalidRow {
                        row: row_number,
                        field: RowField::Amount,
                    })
                }
            };
            if amount.is_zero() {
                return Err(ImportError::InvalidRow {
                    row: row_number,
                    field: RowField::Amount,
                });
            }

            batch.push(NormalizedTransaction {
                date,
                description: row.description.clone(),
                amount,
                category: row.category.trim().to_string(),
            });
        }

        self.state = SessionState::Committing;
        tracing::info!(rows = batch.len(), account = %account, "committing import batch");

        match sink.create_batch(account, &batch).await {
            Ok(inserted) => {
                tracing::info!(inserted, "import batch accepted");
                self.rows.clear();
                self.state = SessionState::Idle;
                Ok(inserted)
            }
            Err(err) => {
                tracing::warn!(error = %err, "bulk create failed; rows kept for retry");
                self.state = SessionState::Previewing;
                Err(ImportError::Collaborator(err))
            }
        }
    }

    fn ensure_editable(&self) -> Result<(), ImportError> {
        if self.state == SessionState::Committing {
            return Err(ImportError::CommitInFlight);
        }
        Ok(())
    }
}

fn cell(row: &RawRow, index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or("")
}
