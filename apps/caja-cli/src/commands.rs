//! # Commands
//!
//! ```text
//! caja [--config <path>] <command> [options]
//!
//!   generate-sale  --file <request.json> --user <id>
//!   update-product --id <id> --role <role_id> --file <patch.json>
//!   sale-status    --id <id> --status active|inactive
//!   words          <amount>
//! ```
//! Every command prints JSON to stdout.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use caja_core::words::amount_to_words;
use caja_core::{GenerateSaleRequest, ProductUpdate, RecordStatus};
use caja_db::Database;
use caja_sales::{ProductService, SaleService};

use crate::error::ApiError;

#[derive(Parser, Debug)]
#[command(name = "caja", about = "Caja Back Office", long_about = None)]
pub struct Cli {
    /// Config file (default: platform config dir/caja.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate a sale from a JSON request file
    GenerateSale {
        #[arg(long, value_name = "REQUEST_JSON")]
        file: PathBuf,
        /// User recorded as the sale's creator
        #[arg(long = "user", value_name = "ID")]
        user_id: i64,
    },

    /// Apply a partial product update with a role's grants
    UpdateProduct {
        #[arg(long = "id", value_name = "ID")]
        product_id: i64,
        #[arg(long = "role", value_name = "ROLE_ID")]
        role_id: i64,
        #[arg(long, value_name = "PATCH_JSON")]
        file: PathBuf,
    },

    /// Activate or deactivate a sale
    SaleStatus {
        #[arg(long = "id", value_name = "ID")]
        sale_id: i64,
        /// active | inactive
        #[arg(long)]
        status: RecordStatus,
    },

    /// Print an amount in receipt wording
    Words {
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
}

impl Command {
    /// Commands that never open the database.
    pub fn is_offline(&self) -> bool {
        matches!(self, Command::Words { .. })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ApiError::validation(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| ApiError::validation(format!("invalid JSON in {}: {}", path.display(), e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::validation(e.to_string()))
}

// =============================================================================
// Execution
// =============================================================================

/// Runs a command that needs no database.
pub fn run_offline(command: &Command) -> Result<String, ApiError> {
    match command {
        Command::Words { amount } => {
            let text = amount_to_words(*amount)?;
            to_json(&serde_json::json!({ "amount": amount, "text": text }))
        }
        _ => Err(ApiError::validation("command requires a database")),
    }
}

/// Runs a command against `db` and returns its JSON output.
pub async fn run(command: &Command, db: &Database) -> Result<String, ApiError> {
    debug!(?command, "Running command");

    match command {
        Command::GenerateSale { file, user_id } => {
            let request: GenerateSaleRequest = read_json(file)?;
            let sale = SaleService::new(db.clone())
                .generate_sale(&request, *user_id)
                .await?;
            to_json(&sale)
        }
        Command::UpdateProduct {
            product_id,
            role_id,
            file,
        } => {
            let update: ProductUpdate = read_json(file)?;
            let product = ProductService::new(db.clone())
                .update_product_as_role(*product_id, &update, *role_id)
                .await?;
            to_json(&product)
        }
        Command::SaleStatus { sale_id, status } => {
            db.sales().update_status(*sale_id, *status).await?;
            info!(sale_id, ?status, "Sale status changed");
            to_json(&serde_json::json!({ "id": sale_id, "status": status }))
        }
        Command::Words { .. } => run_offline(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use caja_core::NewProduct;
    use caja_db::DbConfig;
    use rust_decimal_macros::dec;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("caja").chain(line.split_whitespace()))
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_sale() {
        let cli = parse("--config ./caja.toml generate-sale --user 3 --file sale.json").unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("./caja.toml")));
        assert_eq!(
            cli.command,
            Command::GenerateSale {
                file: PathBuf::from("sale.json"),
                user_id: 3
            }
        );
    }

    #[test]
    fn test_parse_sale_status() {
        let cli = parse("sale-status --id 5 --status inactive -c caja.toml").unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("caja.toml")));
        assert_eq!(
            cli.command,
            Command::SaleStatus {
                sale_id: 5,
                status: RecordStatus::Inactive
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("generate-sale --file sale.json").is_err());
        assert!(parse("sale-status --id 1 --status closed").is_err());
        assert!(parse("update-product --id x --role 1 --file p.json").is_err());
        assert!(parse("refund").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_words_command() {
        let cli = parse("words 20.00").unwrap();
        assert!(cli.command.is_offline());

        let out = run_offline(&cli.command).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["text"], "VEINTE DOLARES CON CERO CENTAVOS 00/100");
    }

    #[test]
    fn test_words_rejects_negative() {
        let command = Command::Words { amount: dec!(-1) };
        let err = run_offline(&command).unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[tokio::test]
    async fn test_generate_sale_from_file() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branch = db.branches().insert("Centro", false).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                branch_id: Some(branch.id),
                name: "Café molido".to_string(),
                list_price: dec!(10.00),
                purchase_price: Some(dec!(6.00)),
                purchased_by: None,
                stock: dec!(50),
                user_commission_percent: Some(dec!(50)),
                branch_commission_percent: None,
            })
            .await
            .unwrap();

        let request = serde_json::json!({
            "branchId": branch.id,
            "customerId": null,
            "invoiceType": "ticket",
            "paid": true,
            "shippingCost": "0",
            "customerNotes": null,
            "products": [{ "productId": product.id, "price": "10.00", "quantity": "2" }]
        });
        let path = std::env::temp_dir().join(format!("caja-sale-{}.json", std::process::id()));
        std::fs::write(&path, request.to_string()).unwrap();

        let out = run(
            &Command::GenerateSale {
                file: path.clone(),
                user_id: 1,
            },
            &db,
        )
        .await
        .unwrap();
        std::fs::remove_file(&path).ok();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let total = Decimal::from_str(json["total"].as_str().unwrap()).unwrap();
        assert_eq!(total, dec!(20.00));
        assert_eq!(json["saleDetails"].as_array().unwrap().len(), 1);
        assert!(json["customer"].is_null());
    }

    #[tokio::test]
    async fn test_sale_status_missing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = run(
            &Command::SaleStatus {
                sale_id: 42,
                status: RecordStatus::Inactive,
            },
            &db,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, 404);
    }
}
