mod cli;

use std::future::Future;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use tether::config::{CONFIG_DIR, CONFIG_FILE, Config};
use tether::portainer::{self, PortainerClient};
use tether::{Backend, Container, DeployOptions};
use tracing::debug;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
const STATUS_TIMEOUT: Duration = Duration::from_secs(15);
const DEPLOY_TIMEOUT: Duration = Duration::from_secs(30);
const LIFECYCLE_TIMEOUT: Duration = Duration::from_secs(30);
const REMOVE_TIMEOUT: Duration = Duration::from_secs(15);
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    match cli.command {
        Commands::Login { username, password } => login(&username, password).await?,

        Commands::Status => status().await?,

        Commands::Deploy {
            image,
            name,
            ports,
            env,
            restart,
            auto_remove,
        } => deploy(image, name, ports, env, restart, auto_remove).await?,

        Commands::Start { container } => start(&container).await?,

        Commands::Stop { container } => stop(&container).await?,

        Commands::Rm { container, force } => remove(&container, force).await?,

        Commands::Compose { file, name } => compose(&file, name).await?,
    }

    Ok(())
}

/// Builds the backend client from the saved session.
fn connect() -> Result<PortainerClient> {
    let config = Config::load()?;
    debug!("using control plane at {}", config.portainer_url);
    Ok(PortainerClient::new(&config.portainer_url, &config.jwt)?)
}

/// Bounds a backend operation; on expiry the future is dropped, which aborts
/// the in-flight request.
async fn bounded<T>(
    limit: Duration,
    op: impl Future<Output = tether::Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => Ok(result?),
        Err(_) => bail!("operation timed out after {}s", limit.as_secs()),
    }
}

async fn login(username: &str, password: Option<String>) -> Result<()> {
    print!("Control plane URL (e.g. https://portainer.example.com): ");
    io::stdout().flush()?;

    let mut url = String::new();
    io::stdin().read_line(&mut url).context("failed to read URL")?;
    let url = url.trim().to_string();
    if url.is_empty() {
        bail!("URL cannot be empty");
    }

    let password = match password.filter(|password| !password.is_empty()) {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("failed to read password")?,
    };
    if password.is_empty() {
        bail!("password cannot be empty");
    }

    println!("Authenticating...");
    let jwt = bounded(LOGIN_TIMEOUT, portainer::authenticate(&url, username, &password))
        .await
        .context("authentication failed")?;

    println!("Validating credentials...");
    let client = PortainerClient::new(&url, &jwt)?;
    bounded(LOGIN_TIMEOUT, client.validate())
        .await
        .context("validation failed")?;

    let config = Config {
        portainer_url: url,
        jwt,
    };
    config.save().context("failed to save config")?;

    println!("✓ Login successful. Config saved to ~/{CONFIG_DIR}/{CONFIG_FILE}");
    Ok(())
}

async fn status() -> Result<()> {
    let client = connect()?;

    let containers = bounded(STATUS_TIMEOUT, client.list_containers())
        .await
        .context("failed to fetch containers")?;

    if containers.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    print_container_table(&containers);
    Ok(())
}

fn print_container_table(containers: &[Container]) {
    println!(
        "{:<14} {:<25} {:<30} {:<10} {:<20}",
        "CONTAINER ID", "NAME", "IMAGE", "STATE", "STATUS"
    );
    println!("{}", "─".repeat(100));

    for container in containers {
        println!(
            "{:<14} {:<25} {:<30} {:<10} {:<20}",
            container.id, container.name, container.image, container.state, container.status
        );
    }
}

async fn deploy(
    image: String,
    name: Option<String>,
    ports: Vec<String>,
    env: Vec<String>,
    restart: String,
    auto_remove: bool,
) -> Result<()> {
    let ports = cli::parse_ports(&ports).context("invalid port mapping")?;
    let env = cli::parse_env(&env).context("invalid environment variable")?;

    let client = connect()?;
    let opts = DeployOptions {
        name,
        image: image.clone(),
        ports,
        env,
        restart,
        auto_remove,
    };

    println!("Deploying container from image {image}...");
    let container = bounded(DEPLOY_TIMEOUT, client.deploy_container(opts))
        .await
        .context("deployment failed")?;

    println!("✓ Container deployed successfully");
    println!("  ID:    {}", container.id);
    println!("  Name:  {}", container.name);
    println!("  Image: {}", container.image);
    println!("  State: {}", container.state);
    Ok(())
}

async fn start(container: &str) -> Result<()> {
    let client = connect()?;

    println!("Starting container {container}...");
    bounded(LIFECYCLE_TIMEOUT, client.start_container(container))
        .await
        .context("failed to start container")?;

    println!("✓ Container started successfully");
    Ok(())
}

async fn stop(container: &str) -> Result<()> {
    let client = connect()?;

    println!("Stopping container {container}...");
    bounded(LIFECYCLE_TIMEOUT, client.stop_container(container))
        .await
        .context("failed to stop container")?;

    println!("✓ Container stopped successfully");
    Ok(())
}

async fn remove(container: &str, force: bool) -> Result<()> {
    let client = connect()?;

    println!("Removing container {container}...");
    bounded(REMOVE_TIMEOUT, client.remove_container(container, force))
        .await
        .context("failed to remove container")?;

    println!("✓ Container removed successfully");
    Ok(())
}

async fn compose(file: &str, name: Option<String>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read compose file {file}"))?;

    // reject files that are not even YAML before shipping them to the remote
    serde_yaml::from_str::<serde_yaml::Value>(&content)
        .with_context(|| format!("compose file {file} is not valid YAML"))?;

    let name = match name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty()) {
        Some(name) => name,
        None => Path::new(file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .context("could not derive a stack name from the file path")?,
    };

    let client = connect()?;

    println!("Deploying compose stack {name} from {file}...");
    let stack_id = bounded(COMPOSE_TIMEOUT, client.deploy_compose_stack(&name, &content))
        .await
        .context("compose deployment failed")?;

    println!("✓ Stack deployed successfully (ID: {stack_id})");
    Ok(())
}
