//! Example: enumerate trust-list entries for an identity
//!
//! Run with: cargo run --example list_trust -- <pattern>

use trustlist::{EngineConfig, GpgEngine, TrustQuery};

#[tokio::main]
async fn main() -> trustlist::Result<()> {
    let pattern = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());

    let engine = GpgEngine::open(EngineConfig::default()).await?;
    let mut query = TrustQuery::new(engine);
    query.start(&pattern, 0).await?;

    while let Some(item) = query.next().await? {
        println!("{item}");
    }

    Ok(())
}
