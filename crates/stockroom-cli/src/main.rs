//! Stockroom - a command-line client for the stockroom catalog backend.
//!
//! Signs in against the backend, keeps the session between runs, and
//! manages catalog products with the stored credentials.

mod format;

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use stockroom_core::models::{NewProduct, ProductQuery, ProfileUpdate, RegisterRequest};
use stockroom_core::{ApiError, AuthService, Config, ProductService, SessionEvent, SessionState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage: stockroom <command> [args]

Session:
  login [email]                      Sign in (password is prompted)
  register <email> <full name> [phone]
  logout                             Sign out, even if the server is unreachable
  whoami                             Show the cached profile
  status                             Show whether a session is active
  profile <full name> [phone]        Update your profile

Catalog:
  products list
  products show <id>
  products search <text> [--category <name>]
  products add <name> <price> <stock> [category]
  products rm <id>

Set STOCKROOM_API_URL to point at another backend.";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    if command == "help" || command == "--help" || command == "-h" {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = Config::load()?;
    let gateway = config.connect()?;
    info!(base_url = gateway.base_url(), "Stockroom starting");

    let auth = AuthService::new(gateway.clone());
    let products = ProductService::new(gateway);
    let mut events = auth.subscribe();

    let result = match command.as_str() {
        "login" => login(&auth, &mut config, args.get(1).cloned()).await,
        "register" => register(&auth, &args[1..]).await,
        "logout" => logout(&auth).await,
        "whoami" => whoami(&auth).await,
        "status" => status(&auth).await,
        "profile" => profile(&auth, &args[1..]).await,
        "products" => run_products(&products, &args[1..]).await,
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            Ok(())
        }
    };

    while let Ok(event) = events.try_recv() {
        if event == SessionEvent::Expired {
            eprintln!("Session expired. Please log in again.");
        }
    }

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

async fn login(auth: &AuthService, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let response = auth.login(&email, &password).await?;
    if response.token.is_none() {
        bail!(
            "{}",
            response
                .message
                .unwrap_or_else(|| "Server did not return a session".to_string())
        );
    }

    config.last_email = Some(email);
    config.save()?;

    match response.user {
        Some(user) => println!("Signed in as {}", format::format_user(&user)),
        None => println!("Signed in"),
    }
    Ok(())
}

async fn register(auth: &AuthService, args: &[String]) -> Result<()> {
    let [email, full_name, rest @ ..] = args else {
        bail!("Usage: stockroom register <email> <full name> [phone]");
    };

    let password = rpassword::prompt_password("Choose a password: ")
        .context("Failed to read password")?;
    let confirm = rpassword::prompt_password("Repeat password: ")
        .context("Failed to read password")?;
    if password != confirm {
        bail!("Passwords do not match");
    }

    let data = RegisterRequest {
        email: email.clone(),
        password,
        full_name: full_name.clone(),
        phone: rest.first().cloned(),
    };
    let response = auth.register(&data).await?;
    println!(
        "{}",
        response
            .message
            .unwrap_or_else(|| "Account created. You can now log in.".to_string())
    );
    Ok(())
}

async fn logout(auth: &AuthService) -> Result<()> {
    match auth.logout().await {
        Ok(()) => println!("Signed out"),
        Err(ApiError::Storage(e)) => bail!("Could not clear the local session: {}", e),
        Err(e) => {
            println!("Signed out locally");
            return Err(e).context("Server was not notified of the logout");
        }
    }
    Ok(())
}

async fn whoami(auth: &AuthService) -> Result<()> {
    match auth.current_user().await {
        Some(user) => {
            println!("{}", format::format_user(&user));
            if !auth.is_authenticated().await {
                println!("(session expired - log in again to make changes)");
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

async fn status(auth: &AuthService) -> Result<()> {
    let label = match auth.state().await {
        SessionState::Authenticated => "signed in",
        SessionState::Authenticating => "signing in",
        SessionState::Unauthenticated => "signed out",
    };
    println!("{}", label);
    Ok(())
}

async fn profile(auth: &AuthService, args: &[String]) -> Result<()> {
    let Some(full_name) = args.first() else {
        bail!("Usage: stockroom profile <full name> [phone]");
    };
    let update = ProfileUpdate {
        full_name: Some(full_name.clone()),
        phone: args.get(1).cloned(),
        email: None,
    };
    let user = auth.update_profile(&update).await?;
    println!("Profile updated: {}", format::format_user(&user));
    Ok(())
}

async fn run_products(products: &ProductService, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("list") | None => {
            let list = products.list().await?;
            print_products(&list);
        }
        Some("show") => {
            let id = args.get(1).context("Usage: stockroom products show <id>")?;
            let product = products.get(id).await?;
            println!("{}", format::format_product_detail(&product));
        }
        Some("search") => {
            let query = parse_search(&args[1..])?;
            let found = products.search(&query).await?;
            print_products(&found);
        }
        Some("add") => {
            let [name, price, stock, rest @ ..] = &args[1..] else {
                bail!("Usage: stockroom products add <name> <price> <stock> [category]");
            };
            let product = NewProduct {
                name: name.clone(),
                description: None,
                price: price
                    .parse()
                    .with_context(|| format!("Invalid price: {}", price))?,
                stock: stock
                    .parse()
                    .with_context(|| format!("Invalid stock: {}", stock))?,
                category: rest.first().cloned(),
                image_url: None,
            };
            let created = products.create(&product).await?;
            println!("Created {}", format::format_product_row(&created));
        }
        Some("rm") => {
            let id = args.get(1).context("Usage: stockroom products rm <id>")?;
            products.delete(id).await?;
            println!("Deleted {}", id);
        }
        Some(other) => bail!("Unknown products command: {}", other),
    }
    Ok(())
}

fn parse_search(args: &[String]) -> Result<ProductQuery> {
    let mut query = ProductQuery::default();
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--category" {
            query.category = Some(iter.next().context("--category needs a value")?.clone());
        } else {
            words.push(arg.as_str());
        }
    }
    if !words.is_empty() {
        query.q = Some(words.join(" "));
    }
    if query == ProductQuery::default() {
        bail!("Usage: stockroom products search <text> [--category <name>]");
    }
    Ok(query)
}

fn print_products(products: &[stockroom_core::models::Product]) {
    if products.is_empty() {
        println!("No products");
        return;
    }
    for product in products {
        println!("{}", format::format_product_row(product));
    }
}
