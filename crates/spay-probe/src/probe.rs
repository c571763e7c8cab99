//! Runs the configured operation and prints its result as JSON on stdout.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use serde_json::{json, Value};
use spay::{SpayClient, Transport};
use tracing::info;

use crate::config::{Config, Operation};

/// Payload encrypted by the `self-test` operation.
const SELF_TEST_PAYLOAD: &[u8] = br#"{"Referenceid":"0","RequestType":0,"Translocation":"N/A"}"#;

/// Load the client from `SPAY_*`, run the operation and print the result.
pub async fn run(cfg: &Config) -> Result<()> {
    let client = SpayClient::new(spay::ClientConfig::from_env()?)
        .context("failed to build spay client")?;

    let result = execute(cfg, &client).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Run `cfg.operation` against `client`, returning its JSON rendering.
pub async fn execute<T: Transport>(cfg: &Config, client: &SpayClient<T>) -> Result<Value> {
    info!(operation = ?cfg.operation, "running probe");
    let date = cfg.date.unwrap_or_else(|| Local::now().date_naive());

    let value = match cfg.operation {
        Operation::SelfTest => self_test(client)?,
        Operation::ListBanks => to_json(client.list_banks().await?)?,
        Operation::Balance => client.balance_enquiry().await?,
        Operation::Statement => client.statement().await?,
        Operation::NameEnquiry => to_json(client.intrabank_name_enquiry(&cfg.account).await?)?,
        Operation::InterbankNameEnquiry => to_json(
            client
                .interbank_name_enquiry(&cfg.account, &cfg.bank_code)
                .await?,
        )?,
        Operation::Inflows => to_json(client.list_inflows(date).await?)?,
        Operation::AccountInflows => to_json(client.list_account_inflows(&cfg.account).await?)?,
        Operation::SessionInflows => to_json(
            client
                .query_inflows_by_session(&cfg.session_id, date)
                .await?,
        )?,
    };
    Ok(value)
}

fn self_test<T: Transport>(client: &SpayClient<T>) -> Result<Value> {
    let ciphertext = client.encrypt_payload(SELF_TEST_PAYLOAD)?;
    let decrypted = client.decrypt_payload(&ciphertext)?;
    let intact = decrypted.starts_with(SELF_TEST_PAYLOAD);
    if !intact {
        anyhow::bail!("envelope self-test did not reproduce its plaintext");
    }
    Ok(json!({
        "ciphertext": ciphertext,
        "plaintext_len": SELF_TEST_PAYLOAD.len(),
        "padded_len": decrypted.len(),
    }))
}

fn to_json<V: Serialize>(value: V) -> Result<Value> {
    serde_json::to_value(value).context("failed to render result")
}
