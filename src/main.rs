use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use waypoint_sim::adapters::inbound::{forward_command_lines, CommandDispatcher};
use waypoint_sim::adapters::outbound::{
    init_buffered_logger, init_simulation_logger, spawn_effect_worker, ChannelEffectSink, InMemoryAgentRegistry,
};
use waypoint_sim::application::{CommandGateway, TickScheduler};
use waypoint_sim::domains::agent::SimAgent;
use waypoint_sim::domains::logger::DynLogger;
use waypoint_sim::Config;

const EFFECT_QUEUE_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // stdout carries responses and notifications; diagnostics go to stderr.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting waypoint simulator");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::from_file(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load {}: {}; using defaults", config_path, e);
            Config::default()
        }
    };
    info!(
        "Tick interval {}ms, zero-speed policy {:?}",
        config.simulation.tick_interval_ms, config.simulation.zero_speed_policy
    );

    let sink_logger = init_simulation_logger(config.logging.file.as_deref(), config.log_level());
    let logger: DynLogger = init_buffered_logger(sink_logger, config.logging.buffer_capacity);

    let (effect_tx, effect_rx) = mpsc::channel(EFFECT_QUEUE_CAPACITY);
    let effect_worker = spawn_effect_worker(effect_rx, logger.clone());
    let effects = Arc::new(ChannelEffectSink::new(effect_tx));

    let registry = Arc::new(InMemoryAgentRegistry::new());
    let settings = config.motion_settings();
    for agent in &config.agents {
        registry.spawn(SimAgent::new(agent.uid.clone(), agent.kind, agent.position.into(), settings));
        info!("Spawned {:?} agent '{}'", agent.kind, agent.uid);
    }

    let scheduler = Arc::new(TickScheduler::new(effects, logger.clone(), config.simulation.max_dt));
    let gateway = Arc::new(CommandGateway::new(
        registry.clone(),
        scheduler.clone(),
        logger.clone(),
        config.simulation.zero_speed_policy,
    ));
    let dispatcher = CommandDispatcher::new(gateway);

    let (line_tx, mut line_rx) = mpsc::channel::<Vec<u8>>(64);
    tokio::spawn(forward_command_lines(BufReader::new(tokio::io::stdin()), line_tx));

    let mut stdout = tokio::io::stdout();
    let mut interval = tokio::time::interval(Duration::from_millis(config.simulation.tick_interval_ms));
    let mut last_tick = tokio::time::Instant::now();

    info!("Simulator ready with {} agent(s)", registry.len());

    // Commands and ticks share this task, so an install never interleaves with a tick.
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = tokio::time::Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;

                for envelope in scheduler.tick(dt) {
                    let mut line = serde_json::to_string(&envelope)?;
                    line.push('\n');
                    stdout.write_all(line.as_bytes()).await?;
                }
                stdout.flush().await?;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    info!("stdin closed");
                    break;
                };
                let mut response = dispatcher.handle_bytes(&line).to_json_line();
                response.push('\n');
                stdout.write_all(response.as_bytes()).await?;
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("Shutting down waypoint simulator after {} ticks", scheduler.tick_count());
    effect_worker.abort();
    Ok(())
}
