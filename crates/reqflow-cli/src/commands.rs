//! Subcommand implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::net::TcpListener;

use reqflow_core::config::{build_registry, Timeouts};
use reqflow_core::{
    create_provider, Agent, AgentConfig, CollisionPolicy, ConfigFile, DesignGenerator, DiscoveryClient, DiscoveryReport,
    EnvSecretStore, Logger, McpConnector, RequirementsPipeline, RequirementsServer, ServiceRegistry,
    Settings, ToolBridge,
};

fn resolve_settings(config: ConfigFile) -> Result<Settings> {
    Settings::resolve(config, &EnvSecretStore::new())
        .map_err(|e| anyhow::anyhow!("[{}] {}", e.kind(), e))
}

async fn discover(
    registry: &ServiceRegistry,
    connector: Arc<McpConnector>,
    policy: CollisionPolicy,
    timeout: Duration,
    logger: Arc<dyn Logger>,
) -> Result<DiscoveryReport> {
    let report = DiscoveryClient::new(connector, timeout, logger)
        .with_policy(policy)
        .discover(registry)
        .await;

    match report {
        Ok(report) => Ok(report),
        Err(e) => bail!("[{}] {}", e.kind(), e),
    }
}

pub async fn run(config: ConfigFile, request: &str, logger: Arc<dyn Logger>) -> Result<()> {
    let settings = resolve_settings(config)?;
    let registry = settings.registry(Arc::clone(&logger));
    let connector = Arc::new(McpConnector::new(Arc::clone(&logger)));

    let report = discover(
        &registry,
        Arc::clone(&connector),
        settings.agent.collision_policy,
        settings.timeouts.discovery,
        Arc::clone(&logger),
    )
    .await?;
    for failure in &report.failures {
        eprintln!("warning: {}", failure);
    }

    let bridge = Arc::new(ToolBridge::from_report(
        report,
        connector,
        settings.timeouts.invocation,
        Arc::clone(&logger),
    ));
    let provider = create_provider(&settings.agent.model.provider, Arc::clone(&logger));
    let agent = Agent::new(provider, bridge, AgentConfig::from_settings(&settings), logger);

    let outcome = match agent.run(request).await {
        Ok(outcome) => outcome,
        Err(e) => bail!("[{}] {}", e.kind(), e),
    };

    for failure in &outcome.tool_failures {
        eprintln!("tool failure: {}", failure);
    }
    println!("{}", outcome.answer);
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ConfigFile::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub async fn tools(config: ConfigFile, logger: Arc<dyn Logger>) -> Result<()> {
    let timeouts = Timeouts::from(&config.timeouts);
    let registry = build_registry(&config.services, Arc::clone(&logger));
    let connector = Arc::new(McpConnector::new(Arc::clone(&logger)));

    let report = discover(
        &registry,
        connector,
        config.agent.collision_policy,
        timeouts.discovery,
        logger,
    )
    .await?;

    for name in report.catalog.names() {
        if let Some(tool) = report.catalog.get(&name) {
            println!("{:<36} [{}] {}", tool.name, tool.service.name, tool.description);
        }
    }
    for failure in &report.failures {
        println!("unreachable: {}", failure);
    }
    Ok(())
}

pub async fn serve(
    config: ConfigFile,
    host: Option<String>,
    port: Option<u16>,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let settings = resolve_settings(config)?;
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {}:{}", host, port))?;
    let server = RequirementsServer::from_settings(&settings, Arc::clone(&logger));

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    reqflow_core::server::serve_http(server, listener, shutdown, logger).await?;
    Ok(())
}

pub async fn pipeline(
    config: ConfigFile,
    description: &str,
    design: bool,
    output: Option<PathBuf>,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let mut settings = resolve_settings(config)?;
    if let Some(output) = output {
        settings.pipeline.output_file = output;
    }

    let json = if design {
        let report = DesignGenerator::from_settings(&settings, logger)
            .run(description)
            .await
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.kind(), e))?;
        serde_json::to_string_pretty(&report)?
    } else {
        let report = RequirementsPipeline::from_settings(&settings, logger)
            .run(description)
            .await
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.kind(), e))?;
        serde_json::to_string_pretty(&report)?
    };

    println!("{}", json);
    Ok(())
}
