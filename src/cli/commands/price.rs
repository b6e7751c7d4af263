//! Price command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::price::PriceClient;
use anyhow::Result;

/// Run the price command.
pub async fn run_price(currency: &str, settings: Settings) -> Result<()> {
    let client = PriceClient::new(&settings.price_feed)?;

    let spinner = Output::spinner("Fetching Bitcoin price...");
    let result = client.bitcoin_price(currency).await;
    spinner.finish_and_clear();

    match result {
        Ok(price) => {
            Output::header("Bitcoin");
            Output::kv("Price", &format!("{:.2} {}", price.price, price.currency));
            Output::kv("Last updated", &price.last_updated);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}
