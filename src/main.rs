use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rand::rngs::StdRng;
use rand::SeedableRng;

use nexfloor::config::{self, LogFormat};
use nexfloor::errors::{self, AppError};
use nexfloor::models::block::{generate_integrity_history, BlockGridCache, DEFAULT_GRID_SIZE};
use nexfloor::models::event::{events_for_obra, mock_events, ObraEvent};
use nexfloor::models::notification::{Notification, Severity};
use nexfloor::models::obra::{find_obra, mock_obras, IntegrityBand, Obra, ObraQuery};
use nexfloor::models::stats::FleetStats;
use nexfloor::notification::center::{Filter, NotificationCenter};
use nexfloor::notification::feed::{HeaderFeed, Toast, ToastKind};
use nexfloor::notification::format::format_time_ago;
use nexfloor::notification::NotificationBus;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let format = config::log_format(std::env::var("NEXFLOOR_LOG_FORMAT").ok().as_deref());
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nexfloor=debug".into()),
        ))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Watch {
            duration,
            tick,
            probability,
        }) => watch(cfg, duration, tick, probability).await,
        Some(cli::Commands::Notifications { unread, obra, json }) => {
            list_notifications(unread, obra.as_deref(), json)
        }
        Some(cli::Commands::Obras {
            min,
            max,
            city,
            sort,
            stats,
            json,
        }) => {
            let query = ObraQuery {
                min_integrity: min,
                max_integrity: max,
                cities: city,
                sort,
            };
            list_obras(&query, stats, json)
        }
        Some(cli::Commands::Events { obra, json }) => list_events(obra.as_deref(), json),
        Some(cli::Commands::Blocks { obra, json }) => show_blocks(&cfg, &obra, json),
        Some(cli::Commands::History { obra, json }) => show_history(&cfg, &obra, json),
        Some(cli::Commands::Emit {
            obra,
            severity,
            message,
        }) => emit_manual(cfg, &obra, severity, message),
        None => watch(cfg, None, None, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error {}", errors::report(e));
    }
    result
}

fn log_toast(toast: Toast) {
    match toast.kind {
        ToastKind::Error => tracing::error!(
            id = %toast.id,
            duration_secs = toast.duration.as_secs(),
            "{}: {}", toast.title, toast.message
        ),
        ToastKind::Warning => tracing::warn!(
            id = %toast.id,
            duration_secs = toast.duration.as_secs(),
            "{}: {}", toast.title, toast.message
        ),
    }
}

async fn watch(
    cfg: config::Config,
    duration: Option<u64>,
    tick: Option<u64>,
    probability: Option<f64>,
) -> anyhow::Result<()> {
    let mut bus_cfg = cfg.bus_config();
    if let Some(secs) = tick {
        bus_cfg.tick_interval = Duration::from_secs(secs);
    }
    if let Some(p) = probability {
        bus_cfg.emit_probability = p;
    }
    let bus = NotificationBus::new(bus_cfg).context("invalid bus configuration")?;

    let center = NotificationCenter::with_mock_data();
    let feed = HeaderFeed::new(center.unread_count());

    // The feed is subscribed first so the badge already counts an event
    // when the log listener sees it.
    let toasts = feed.attach(&bus, log_toast);
    let badge_feed = feed.clone();
    let log = bus.subscribe(move |n| {
        tracing::info!(
            id = %n.id,
            obra_id = %n.obra_id,
            obra = %n.obra_name,
            severity = %n.severity,
            badge = badge_feed.badge().as_deref().unwrap_or("-"),
            "{} {}",
            n.severity.icon(),
            n.message
        );
    });

    bus.connect();
    tracing::info!(unread = feed.unread(), "watching notification feed (Ctrl-C to stop)");

    match duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                res = tokio::signal::ctrl_c() => res?,
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    toasts.unsubscribe();
    log.unsubscribe();
    bus.dispose();
    tracing::info!(unread = feed.unread(), "stopped watching");
    Ok(())
}

fn list_notifications(unread: bool, obra: Option<&str>, json: bool) -> anyhow::Result<()> {
    let center = NotificationCenter::with_mock_data();
    let filter = if unread { Filter::Unread } else { Filter::All };
    let items: Vec<&Notification> = center
        .filtered(filter)
        .into_iter()
        .filter(|n| obra.map_or(true, |id| n.obra_id == id))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No notifications found.");
        return Ok(());
    }

    let now = Utc::now();
    println!("Notifications ({} unread)", center.unread_count());
    for n in items {
        println!(
            "{} {} {:<34} {:<30} {}",
            if n.read { " " } else { "•" },
            n.severity.icon(),
            n.title,
            n.obra_name,
            format_time_ago(n.timestamp, now)
        );
        println!("      {}", n.message);
    }
    Ok(())
}

fn lookup_obra<'a>(obras: &'a [Obra], id: &str) -> anyhow::Result<&'a Obra> {
    Ok(find_obra(obras, id).ok_or_else(|| AppError::UnknownObra(id.to_string()))?)
}

fn list_obras(query: &ObraQuery, with_stats: bool, json: bool) -> anyhow::Result<()> {
    let obras = mock_obras();
    let items = query.apply(&obras);
    // Fleet figures always cover the whole catalogue, not the filtered view.
    let stats = with_stats.then(|| FleetStats::compute(&obras)).flatten();

    if json {
        let out = match stats {
            Some(stats) => serde_json::json!({ "obras": items, "stats": stats }),
            None => serde_json::to_value(&items)?,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if let Some(stats) = stats {
        println!(
            "Average integrity {}% ({})  Blocks {}  Needing attention {}  At or above average {}/{}",
            stats.average_integrity,
            if stats.trend_positive() { "↑" } else { "↓" },
            stats.total_blocks,
            stats.needing_attention,
            stats.above_average,
            stats.total_obras
        );
        println!();
    }

    if items.is_empty() {
        println!("No obras match.");
        return Ok(());
    }

    println!(
        "{:<4} {:<30} {:>9} {:<8} {:<28} {:<10}",
        "ID", "NAME", "INTEGRITY", "BAND", "LOCATION", "UPDATED"
    );
    for o in items {
        println!(
            "{:<4} {:<30} {:>8}% {:<8} {:<28} {:<10}",
            o.id,
            o.name,
            o.integrity,
            o.band().label(),
            o.location,
            o.last_update
        );
    }
    Ok(())
}

fn list_events(obra: Option<&str>, json: bool) -> anyhow::Result<()> {
    let obras = mock_obras();
    let events = mock_events(Utc::now());
    let items: Vec<&ObraEvent> = match obra {
        Some(id) => {
            lookup_obra(&obras, id)?;
            events_for_obra(&events, id)
        }
        None => {
            let mut all: Vec<&ObraEvent> = events.iter().collect();
            all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            all
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    let now = Utc::now();
    for e in items {
        let obra_name = find_obra(&obras, &e.obra_id).map_or("?", |o| o.name.as_str());
        println!(
            "{:<11} {:<30} {:<16} {}",
            e.kind.label(),
            obra_name,
            e.user.as_deref().unwrap_or("-"),
            format_time_ago(e.timestamp, now)
        );
        println!("            {}", e.description);
    }
    Ok(())
}

fn show_blocks(cfg: &config::Config, obra_id: &str, json: bool) -> anyhow::Result<()> {
    let obras = mock_obras();
    let obra = lookup_obra(&obras, obra_id)?;
    let blocks = BlockGridCache::new(cfg.seed).blocks_for_obra(&obra.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    println!("{} ({} blocks)", obra.name, blocks.len());
    for row in blocks.chunks(usize::from(DEFAULT_GRID_SIZE)) {
        let line: String = row
            .iter()
            .map(|b| match b.band() {
                IntegrityBand::Good => '●',
                IntegrityBand::Warning => '◐',
                IntegrityBand::Critical => '○',
            })
            .collect();
        println!("  {}", line);
    }
    for band in [IntegrityBand::Good, IntegrityBand::Warning, IntegrityBand::Critical] {
        let count = blocks.iter().filter(|b| b.band() == band).count();
        println!("{:<8} {}", band.label(), count);
    }
    Ok(())
}

fn show_history(cfg: &config::Config, obra_id: &str, json: bool) -> anyhow::Result<()> {
    let obras = mock_obras();
    let obra = lookup_obra(&obras, obra_id)?;
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let history = generate_integrity_history(&mut rng, obra.integrity, Utc::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("{} (last {} days)", obra.name, history.len());
    for point in &history {
        println!(
            "{}  {:>3}%  {}",
            point.date,
            point.integrity,
            "▇".repeat(usize::from(point.integrity / 5))
        );
    }
    Ok(())
}

fn emit_manual(
    cfg: config::Config,
    obra_id: &str,
    severity: Severity,
    message: String,
) -> anyhow::Result<()> {
    let obras = mock_obras();
    let obra = lookup_obra(&obras, obra_id)?;

    let bus = NotificationBus::new(cfg.bus_config())?;
    let center = NotificationCenter::with_mock_data();
    let feed = HeaderFeed::new(center.unread_count());
    let subscription = feed.attach(&bus, log_toast);

    let notification = Notification {
        id: format!("manual-{}", uuid::Uuid::new_v4()),
        obra_id: obra.id.clone(),
        obra_name: obra.name.clone(),
        severity,
        title: severity.title().to_string(),
        message,
        timestamp: Utc::now(),
        read: false,
    };

    let reached = bus.emit(&notification);
    subscription.unsubscribe();

    println!("{}", serde_json::to_string_pretty(&notification)?);
    println!(
        "Delivered to {} listener(s). Unread badge: {}",
        reached,
        feed.badge().unwrap_or_default()
    );
    Ok(())
}
