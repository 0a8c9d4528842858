//! # Admin Token
//!
//! Mints a bearer token for the `/admin` routes using the same configuration
//! the server loads (`dokan.toml`, `DOKAN_*`).
//!
//! ## Usage
//! ```bash
//! cargo run -p dokan-storefront-api --bin admin-token -- --subject ops@shop.example
//! ```

use std::env;

use dokan_storefront_api::auth::JwtManager;
use dokan_storefront_api::StorefrontConfig;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut subject = String::from("admin");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--subject" | "-s" => {
                if i + 1 < args.len() {
                    subject = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dokan Admin Token");
                println!();
                println!("Usage: admin-token [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --subject <NAME>  Who the token is issued to [default: admin]");
                println!("  -h, --help            Print help");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = StorefrontConfig::load()?;
    if config.uses_dev_secret() {
        eprintln!("⚠️  Signing with the development secret; set DOKAN_JWT_SECRET for production");
    }

    let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
    let token = jwt.generate_admin_token(&subject)?;

    eprintln!(
        "🔑 Admin token for '{}' (valid {}h)",
        subject,
        config.jwt_lifetime_secs / 3600
    );
    println!("{token}");
    Ok(())
}
