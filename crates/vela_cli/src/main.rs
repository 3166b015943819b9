use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vela_companion::{plan, respond, Companion};
use vela_core::{Channel, CommandEvent, EmotionObservation, EventBus, VelaConfig};
use vela_signals::{SignalRuntime, SyntheticSampler};
use vela_triage::{Dispatcher, GateOutcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config
    #[arg(short, long, default_value = "vela.toml")]
    config: String,

    /// Override the sampler polling interval in milliseconds
    #[arg(long)]
    sample_interval_ms: Option<u64>,

    /// Run headless for this many seconds, then exit
    #[arg(long)]
    demo_secs: Option<u64>,

    /// Start without the synthetic samplers
    #[arg(long)]
    no_samplers: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut config = VelaConfig::load_or_default(&args.config);
    if let Some(ms) = args.sample_interval_ms {
        config.sampler.interval_ms = ms;
    }

    let epoch = Instant::now();
    let bus = EventBus::default();
    let dispatcher = Arc::new(Mutex::new(Dispatcher::new(config.clone(), bus.clone())));
    let companion = Arc::new(Mutex::new(Companion::new(config.companion.clone())));

    let mut runtime = SignalRuntime::new(config.clone(), bus.clone());
    if !args.no_samplers {
        for channel in [Channel::Face, Channel::Voice] {
            runtime
                .add_sampler(Box::new(SyntheticSampler::new(
                    channel,
                    config.sampler.clone(),
                    &config.vocabulary,
                )))
                .await;
        }
    }
    runtime.start();
    info!("Vela online, sampling every {}ms", config.sampler.interval_ms);

    spawn_bridge(
        bus.clone(),
        Arc::clone(&dispatcher),
        Arc::clone(&companion),
        epoch,
    );

    if let Some(secs) = args.demo_secs {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        runtime.stop();
        let d = dispatcher.lock().await;
        let state = companion.lock().await.state();
        println!(
            "Demo finished: {} notification(s), companion showing {} ({:.0}%)",
            d.center().len(),
            state.label,
            state.score * 100.0
        );
        return Ok(());
    }

    println!("Vela console. Commands: scan, status, notifications, read, quit. Anything else is chat.");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        input.clear();
        stdin.read_line(&mut input)?;
        let trimmed = input.trim();

        match trimmed {
            "quit" | "exit" => break,
            "" => {}
            "scan" => {
                bus.publish_command(CommandEvent {
                    kind: "emotion-scan".to_string(),
                });
            }
            "status" => {
                let state = companion.lock().await.state();
                let fused = dispatcher.lock().await.current_fused();
                println!(
                    "{} ({:.0}%) via {}{} | fused {} ({} risk)",
                    state.label,
                    state.score * 100.0,
                    state.source,
                    if state.dimmed { ", dimmed" } else { "" },
                    fused.descriptor,
                    fused.risk
                );
                if let Some(d) = runtime.subscribe_dominant().borrow().clone() {
                    println!("dominant bar: {} ({:.0}%)", d.label, d.score * 100.0);
                }
                for category in config.vocabulary.categories() {
                    if let Some(bar) = runtime.bars_snapshot(category).await {
                        println!("  {:<10} {:>5.1} -> {:>5.1}", category, bar.current, bar.target);
                    }
                }
            }
            "notifications" => {
                let d = dispatcher.lock().await;
                if d.center().is_empty() {
                    println!("No notifications.");
                }
                for n in d.center().iter() {
                    println!(
                        "{} [{}] {}: {}",
                        if n.read { " " } else { "*" },
                        n.ts.format("%H:%M:%S"),
                        n.title,
                        n.body
                    );
                }
            }
            "read" => {
                dispatcher.lock().await.mark_all_read();
                println!("All notifications marked read.");
            }
            text => {
                let dominant = {
                    let mut c = companion.lock().await;
                    c.set_chat_open(true);
                    config.vocabulary.classify(&c.state().label)
                };
                for line in respond(text, dominant) {
                    println!("\nVela: {line}");
                }
                println!();
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    runtime.stop();
    Ok(())
}

/// Forward bus traffic into the dispatcher and companion, and run the
/// companion's inactivity tick.
fn spawn_bridge(
    bus: EventBus,
    dispatcher: Arc<Mutex<Dispatcher>>,
    companion: Arc<Mutex<Companion>>,
    epoch: Instant,
) {
    let mut emotion_rx = bus.subscribe_emotion();
    let mut command_rx = bus.subscribe_command();

    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(1000));

        loop {
            tokio::select! {
                event = emotion_rx.recv() => {
                    let event = match event {
                        Ok(event) => event,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::debug!(skipped = n, "emotion subscriber lagged");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    };
                    let now_ms = event.ts_ms;

                    // Raw channel readings feed the dispatcher, which
                    // republishes the fused top; the companion sees both.
                    if event.source != Channel::Fused {
                        let obs = EmotionObservation::new(
                            event.top.label.clone(),
                            event.top.score,
                            event.source,
                            event.ts_ms,
                        );
                        let report = dispatcher.lock().await.ingest(obs, now_ms);
                        if report.notified {
                            let d = dispatcher.lock().await;
                            if let Some(n) = d.center().iter().last() {
                                println!("\n[notification] {}: {}", n.title, n.body);
                            }
                        }
                        if report.intervention {
                            println!();
                            for line in plan(&report.fused) {
                                println!("[Vela] {line}");
                            }
                        }
                    }

                    let mut c = companion.lock().await;
                    c.observe(event);
                    if c.evaluate(now_ms) == Some(GateOutcome::Accepted) {
                        let state = c.state();
                        info!(
                            label = %state.label,
                            score = state.score,
                            source = %state.source,
                            "companion update"
                        );
                    }
                }
                cmd = command_rx.recv() => {
                    let cmd = match cmd {
                        Ok(cmd) => cmd,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    };
                    if cmd.kind == "emotion-scan" {
                        let fused = dispatcher.lock().await.current_fused();
                        println!("\n[scan] {} ({} risk)", fused.descriptor, fused.risk);
                        for line in plan(&fused) {
                            println!("  {line}");
                        }
                        print!("> ");
                        let _ = io::stdout().flush();
                    }
                }
                _ = tick.tick() => {
                    companion.lock().await.tick(epoch.elapsed().as_millis() as u64);
                }
            }
        }
    });
}
