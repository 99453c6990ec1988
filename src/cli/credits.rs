use serde_json::Value;
use tabled::Table;

use crate::{cli, error, types::CreditTableRow, utils, warning};

/// Prints the scalar fields of the billing document as a table.
pub async fn credits() {
    let client = cli::suno_client();
    let billing = match client.billing_info().await {
        Ok(billing) => billing,
        Err(e) => error!("Failed to fetch billing info. Err: {}", e),
    };

    let Some(fields) = billing.as_object() else {
        warning!("Unexpected billing response: {}", billing);
        return;
    };

    let rows: Vec<CreditTableRow> = fields
        .iter()
        .filter(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
        .map(|(k, v)| CreditTableRow {
            field: k.clone(),
            value: utils::display_value(v),
        })
        .collect();

    println!("{}", Table::new(rows));
}
