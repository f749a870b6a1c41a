use ledger_api::{Client, LedgerApiError, Request};

#[tokio::main]
pub async fn main() -> Result<(), LedgerApiError> {
    let client = Client::with_token("http://localhost:8000/api", "api_token");

    let budgets = client.send(Request::budgets().list()).await?;
    for budget in budgets {
        println!("{:<24} {:>10.2}", budget.category, budget.amount);
    }
    Ok(())
}
