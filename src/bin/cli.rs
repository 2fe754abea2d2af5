use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use access_gate::authz::{AccessGate, Decision, GatePolicy, UserContext};
use access_gate::config::{load_env, policy_path_from_env};
use access_gate::jwt::JwtConfig;
use access_gate::routes;

#[derive(Parser, Debug)]
#[command(author, version, about = "access gate operator tool", long_about = None)]
struct Cli {
    /// Policy file; defaults to GATE_POLICY_PATH, then the embedded tables
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the gate for a route name and a hypothetical user
    Check {
        route: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        superuser: bool,
        /// Evaluate as a signed-out visitor
        #[arg(long, conflicts_with_all = ["role", "superuser"])]
        anonymous: bool,
    },
    /// Show the module and action derived from a route name
    Split { route: String },
    /// Print the effective policy as TOML
    Policy,
    /// List gated routes with their classification
    Routes,
    /// Mint a session token for local testing (needs JWT_SECRET)
    Token {
        #[arg(long)]
        user_id: Option<Uuid>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        superuser: bool,
    },
}

fn main() -> anyhow::Result<()> {
    load_env();

    let cli = Cli::parse();
    let policy = load_policy(cli.policy)?;

    match cli.command {
        Commands::Check {
            route,
            role,
            superuser,
            anonymous,
        } => {
            let user = if anonymous {
                UserContext::anonymous()
            } else {
                let user = UserContext::authenticated(Uuid::nil()).with_superuser(superuser);
                match role {
                    Some(role) => user.with_role(role),
                    None => user,
                }
            };
            let gate = AccessGate::new(Arc::new(policy));
            match gate.evaluate(&route, &user) {
                Decision::Allow => println!("allow"),
                Decision::PassThrough => println!("pass_through"),
                Decision::DenyRedirect(target) => println!("deny_redirect -> {target}"),
            }
        }
        Commands::Split { route } => match policy.split_route(&route) {
            Some((module, action)) => {
                println!("module: {}", if module.is_empty() { "<empty>" } else { module.as_str() });
                println!("action: {action}");
                println!("class:  {}", serde_json::to_string(&policy.classify(&route))?);
            }
            None => println!("no action token in {route:?}"),
        },
        Commands::Policy => {
            print!("{}", policy.to_toml_string()?);
        }
        Commands::Routes => {
            let (_, table) = routes::gated(&policy).finish();
            println!("{:<8} {:<28} {:<28} {}", "Method", "Path", "Name", "Class");
            for entry in table.entries() {
                println!(
                    "{:<8} {:<28} {:<28} {}",
                    entry.method.as_str(),
                    entry.path,
                    entry.name,
                    serde_json::to_string(&entry.class)?
                );
            }
        }
        Commands::Token {
            user_id,
            role,
            superuser,
        } => {
            let jwt = JwtConfig::from_env()?;
            let token = jwt.encode(user_id.unwrap_or_else(Uuid::new_v4), role.as_deref(), superuser)?;
            println!("{token}");
        }
    }

    Ok(())
}

fn load_policy(path: Option<PathBuf>) -> anyhow::Result<GatePolicy> {
    match path.or_else(policy_path_from_env) {
        Some(path) => GatePolicy::from_path(&path)
            .with_context(|| format!("failed to load policy from {}", path.display())),
        None => Ok(GatePolicy::default()),
    }
}
