//! Policy proxy CLI.
//!
//! Loads a proxy configuration, builds the policy selector exactly as the
//! proxy does at startup, and answers routing questions against it.
//!
//! ```text
//! policy-proxy --config proxy.toml check
//! policy-proxy --config proxy.toml resolve --mail mary@example.org --path /graph/v1.0/me
//! ```
//!
//! Any configuration error exits non-zero, the same way the proxy refuses to
//! start.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use policy_proxy::config::{load_config, ObservabilityConfig};
use policy_proxy::observability::init_logging;
use policy_proxy::routing::PolicyTable;
use policy_proxy::selector::{Claims, PolicySelector, SelectionInput, User, ROUTING_POLICY_CLAIM};

#[derive(Parser)]
#[command(name = "policy-proxy")]
#[command(about = "Validate and exercise the proxy's policy selector", long_about = None)]
struct Cli {
    /// Proxy configuration file (TOML, or JSON by extension)
    #[arg(short, long, default_value = "policy-proxy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configuration and build the selector
    Check,
    /// Resolve the policy for a synthetic request
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Treat the request as token-authenticated (empty claims bag)
    #[arg(long)]
    authenticated: bool,

    /// Routing policy claim from the identity provider (implies --authenticated)
    #[arg(long)]
    routing_claim: Option<String>,

    /// Resolved user's mail
    #[arg(long)]
    mail: Option<String>,

    /// Resolved user's username
    #[arg(long)]
    username: Option<String>,

    /// Resolved user's id
    #[arg(long)]
    id: Option<String>,

    /// Sticky cookie value
    #[arg(long)]
    cookie: Option<String>,

    /// Request path, for the route lookup
    #[arg(long, default_value = "/")]
    path: String,
}

impl ResolveArgs {
    fn claims(&self) -> Option<Claims> {
        match &self.routing_claim {
            Some(policy) => Some(Claims::new().with(ROUTING_POLICY_CLAIM, policy.as_str())),
            None if self.authenticated => Some(Claims::new()),
            None => None,
        }
    }

    fn user(&self) -> Option<User> {
        if self.mail.is_none() && self.username.is_none() && self.id.is_none() {
            return None;
        }
        Some(User {
            mail: self.mail.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            id: self.id.clone(),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(path = ?cli.config, error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    init_logging(&config.observability);

    let selector = PolicySelector::load(&config.policy_selector).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to initialize policy selector");
    })?;
    let table = PolicyTable::from_config(&config.policies);

    match cli.command {
        Commands::Check => {
            println!("configuration ok");
            println!("strategy: {}", selector.kind());
            if let Some(cookie) = selector.cookie_name() {
                println!("cookie:   {cookie}");
            }
            if let PolicySelector::Regex(regex) = &selector {
                for rule in regex.rules().iter() {
                    println!(
                        "rule:     priority={} property={} match={:?} policy={}",
                        rule.priority(),
                        rule.property(),
                        rule.pattern(),
                        rule.policy()
                    );
                }
            }
            let mut policies: Vec<&str> = table.policy_names().collect();
            policies.sort_unstable();
            println!("policies: {}", policies.join(", "));
        }
        Commands::Resolve(args) => {
            let claims = args.claims();
            let user = args.user();

            let mut input = SelectionInput::new();
            if let Some(claims) = &claims {
                input = input.with_claims(claims);
            }
            if let Some(user) = &user {
                input = input.with_user(user);
            }
            if let Some(cookie) = &args.cookie {
                input = input.with_cookie(cookie);
            }

            let selection = selector.select_with_source(&input);
            println!("policy:  {}", selection.policy);
            println!("source:  {}", selection.source);

            // An empty table means routes live outside this config.
            if !table.is_empty() {
                if !table.contains(selection.policy) {
                    println!("route:   policy {:?} is not declared", selection.policy);
                } else if let Some(route) = table.route(selection.policy, &args.path) {
                    println!("route:   {} -> {}", route.endpoint, route.backend);
                } else {
                    println!("route:   none for {}", args.path);
                }
            }
        }
    }

    Ok(())
}
