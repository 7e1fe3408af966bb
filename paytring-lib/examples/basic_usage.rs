//! Basic Paytring Example
//!
//! Walks through the whole client surface against the live gateway:
//! - Create an order and print its payment URL
//! - Fetch the order, plain and with extended detail
//! - Validate a UPI VPA
//! - Create and verify a payload hash
//! - Verify a signed webhook callback
//!
//! # Usage
//!
//! ```bash
//! PAYTRING_API_KEY=test_... PAYTRING_API_SECRET=... \
//!     RUST_LOG=paytring=debug cargo run --example basic_usage
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use http::{HeaderMap, HeaderValue};
use paytring::{create_hash, OrderRequest, Payload, Paytring, PaytringError, SIGNATURE_HEADER};
use serde_json::json;

fn client() -> paytring::Result<Paytring> {
    match Paytring::from_env() {
        Ok(client) => Ok(client),
        Err(PaytringError::InvalidConfig(reason)) => {
            println!("⚠️  {}; using placeholder credentials\n", reason);
            Paytring::new("test_your_api_key_here", "your_api_secret_here")
        }
        Err(e) => Err(e),
    }
}

fn secret() -> String {
    std::env::var("PAYTRING_API_SECRET").unwrap_or_else(|_| "your_api_secret_here".to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("paytring=info")),
        )
        .init();

    println!("🚀 Paytring Rust Client Example\n");

    let paytring = client()?;
    println!("Environment: {:?}\n", paytring.environment());

    // 1. Create a payment order
    println!("1. Creating a payment order...");
    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let order = OrderRequest::new(
        "John Doe",
        "john.doe@example.com",
        9876543210,
        1000, // ₹10.00 in paise
        format!("receipt_{}", stamp),
        "https://your-website.com/payment/callback",
    );

    let created = match paytring.order().create(&order).await {
        Ok(created) => created,
        Err(e) => {
            println!("❌ Order creation failed [{:?}]: {}", e.code(), e);
            if e.is_retryable() {
                println!("   (transient, safe to retry later)");
            }
            return Ok(());
        }
    };
    println!("✅ Order created");
    println!("   Order ID:    {}", created.id);
    println!("   Payment URL: {}", created.payment_url.as_deref().unwrap_or("-"));
    println!("   Status:      {}\n", created.status.as_deref().unwrap_or("-"));

    // 2. Fetch order details
    println!("2. Fetching order details...");
    let fetched = paytring.order().fetch(&created.id).await?;
    println!("✅ Status: {}", fetched.status.as_deref().unwrap_or("-"));
    println!("   Amount: {:?}\n", fetched.amount);

    // 3. Fetch extended order details
    println!("3. Fetching advanced order details...");
    let detailed = paytring.order().fetch_advance(&created.id).await?;
    println!("✅ {} extra fields\n", detailed.extra.len());

    // 4. Validate a UPI VPA
    println!("4. Validating UPI VPA...");
    match paytring.upi().vpa().validate("test@paytm").await {
        Ok(result) => {
            println!("✅ Is valid: {}", result.valid);
            if let (true, Some(name)) = (result.valid, result.name.as_deref()) {
                println!("   Account holder: {}", name);
            }
        }
        Err(e) => println!("❌ VPA validation failed: {}", e),
    }
    println!();

    // 5. Hash creation and verification
    println!("5. Hash verification...");
    let payload: Payload = [
        ("order_id".to_string(), json!(created.id)),
        ("status".to_string(), json!("success")),
        ("amount".to_string(), json!(1000)),
    ]
    .into_iter()
    .collect();
    let secret = secret();
    let digest = create_hash(&payload, &secret);
    let valid = paytring.hash().verify(&payload, &secret, &digest);
    println!("✅ Hash: {}\n", if valid { "valid" } else { "invalid" });

    // 6. Webhook callback
    println!("6. Verifying a webhook callback...");
    let body = serde_json::to_vec(&payload)?;
    let mut headers = HeaderMap::new();
    headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&digest)?);
    let authentic = paytring.webhooks().verify_request(&headers, &body)?;
    println!("✅ Webhook: {}\n", if authentic { "authentic" } else { "rejected" });

    println!("🎉 All examples completed");
    Ok(())
}
