use anyhow::{bail, Context};
use comfy_table::Table;
use dialoguer::Confirm;
use std::path::Path;

use florin_core::{AccountId, Money};
use florin_import::{normalize_amount, ApiClient, Classifier, ImportSession};

pub async fn list_accounts(client: &ApiClient) -> anyhow::Result<()> {
    let accounts = client.list_accounts().await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for account in accounts {
        table.add_row(vec![account.id.to_string(), account.name]);
    }
    println!("{table}");
    Ok(())
}

pub async fn list_categories(client: &ApiClient) -> anyhow::Result<()> {
    let categories = client.list_categories().await?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for category in categories {
        table.add_row(vec![category.id.to_string(), category.name]);
    }
    println!("{table}");
    Ok(())
}

pub async fn import(
    client: &ApiClient,
    file: &Path,
    account: i64,
    bulk_category: Option<&str>,
    suggest: bool,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let is_csv = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("CSV file required.");
    }

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut session = ImportSession::start(&text)?;

    let accounts = client.list_accounts().await?;
    let categories = client.list_categories().await?;
    session.seed(accounts, categories);
    session.select_account(AccountId(account))?;

    if let Some(value) = bulk_category {
        session.apply_bulk_category(value)?;
    }

    if suggest {
        let mut classifier = Classifier::new();
        for record in client.list_transactions().await? {
            if let (Some(notes), Some(category)) = (record.notes, record.category) {
                classifier.learn(&notes, &category);
            }
        }
        let filled = session.suggest_categories(&classifier)?;
        if filled > 0 {
            println!("Filled {filled} categories from your history.");
        }
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Description", "Amount", "Category"]);
    for (index, row) in session.rows().iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            row.date.clone(),
            row.description.clone(),
            row.amount.clone(),
            row.category.clone(),
        ]);
    }
    println!("{table}");

    // Net total of the rows that already parse; unparsable amounts surface
    // as commit errors, not here.
    let total = session
        .rows()
        .iter()
        .filter_map(|row| normalize_amount(&row.amount))
        .fold(Money::zero(), |sum, value| sum + Money::from_decimal(value));
    println!("{} rows, net {}", session.rows().len(), total);

    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Import {} transactions?", session.rows().len()))
            .default(false)
            .interact()?;
        if !proceed {
            session.cancel();
            println!("Import cancelled; nothing was saved.");
            return Ok(());
        }
    }

    match session.commit(client).await {
        Ok(inserted) => {
            println!("Imported {inserted} transactions.");
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}
