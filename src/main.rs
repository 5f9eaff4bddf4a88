use aliniex::{build_client, KycConfig, KycInformationRequest, Operation, RequestContext};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads ALIX_* variables, from .env if present
    #[cfg(feature = "env-file")]
    let config = KycConfig::from_env_file(".env")?;
    #[cfg(not(feature = "env-file"))]
    let config = KycConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let Some(user_email) = std::env::args().nth(1) else {
        eprintln!("usage: aliniex <user-email>");
        std::process::exit(2);
    };

    let client = build_client(&config)?;
    let ctx = RequestContext::with_timeout(Duration::from_secs(config.timeout_seconds * 2));

    println!("Fetching KYC information for {}...", user_email);
    let envelope = client
        .get_kyc_information_with(&ctx, &KycInformationRequest::new(user_email))
        .await?;

    match envelope.into_result(Operation::GetKycInformation) {
        Ok(info) => {
            println!("KYC status: {}", info.kyc_status);
            if let Some(reason) = info.reject_reason() {
                println!("Reject reason: {}", reason);
            }
        }
        Err(e) => {
            println!("Lookup rejected: {}", e);
        }
    }

    Ok(())
}
