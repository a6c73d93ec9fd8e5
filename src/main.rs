//! Application entry point: chart playback demo and catalog search.

mod api;
mod core;
mod models;
mod state;

use crate::api::catalog::{CatalogClient, CatalogError};
use crate::core::input::InputKind;
use crate::core::input::bindings::KeyBindings;
use crate::models::chart::{Chart, load_chart};
use crate::models::hit_window::HitWindow;
use crate::models::result::SessionResults;
use crate::models::search::SearchRequest;
use crate::models::settings::Settings;
use crate::state::{GameSession, SessionPhase};
use std::path::Path;

/// Tick cadence of the headless driver, matching a 60 fps frame.
const FRAME_MS: f64 = 16.0;

fn main() {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    log::info!("MAIN: Booting rmania...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((flag, rest)) if flag == "--search" => run_search(&rest.join(" ")),
        Some((path, rest)) => {
            let as_json = rest.iter().any(|a| a == "--json");
            run_chart(Path::new(path), as_json);
        }
        None => {
            log::error!("MAIN: Usage: rmania <chart.osu> [--json] | rmania --search <query>");
        }
    }
}

/// Loads a chart and plays it through with perfectly timed scripted input.
fn run_chart(path: &Path, as_json: bool) {
    let settings_path = Path::new("settings.toml");
    let settings = match Settings::load(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("MAIN: Could not load settings: {}", e);
            return;
        }
    };
    // Write the migrated file back so newly seeded defaults stick.
    if let Err(e) = settings.save(settings_path) {
        log::warn!("MAIN: Could not save settings: {}", e);
    }

    let window = match settings.hit_window() {
        Ok(window) => window,
        Err(e) => {
            log::error!("MAIN: Bad timing windows: {}", e);
            return;
        }
    };

    let chart = match load_chart(path) {
        Ok(chart) => chart,
        Err(e) => {
            log::error!("MAIN: Could not load chart {:?}: {}", path, e);
            return;
        }
    };
    log::info!(
        "MAIN: {} - {} [{}] ({}K, {} judged events, md5 {})",
        chart.artist,
        chart.title,
        chart.version,
        chart.key_count,
        chart.total_hit_objects,
        chart.hash
    );

    let mut bindings = KeyBindings::new();
    bindings.reload_from_settings(&settings);
    if let Some(keys) = bindings.keys_for(chart.key_count) {
        log::info!("MAIN: {}K layout: {}", chart.key_count, keys.join(" "));
    }

    let Some(results) = autoplay(&chart, window, settings.show_max_judgement) else {
        log::error!("MAIN: Session ended without results");
        return;
    };

    if as_json {
        match serde_json::to_string_pretty(&results) {
            Ok(body) => println!("{}", body),
            Err(e) => log::error!("MAIN: Could not serialize results: {}", e),
        }
    } else {
        print_results(&chart, &results);
    }
}

/// Drives a session with inputs scripted from the chart itself.
///
/// Events are submitted just-in-time the way a host window thread would,
/// then judged against their own timestamps by the session.
fn autoplay(chart: &Chart, window: HitWindow, show_max_judgement: bool) -> Option<SessionResults> {
    let mut session = GameSession::new(chart, window, show_max_judgement);
    let handle = session.input_handle();

    // Perfect play: press on every head, release on every tail.
    let mut script: Vec<(f64, usize, InputKind)> = Vec::new();
    for object in &chart.objects {
        script.push((object.time_ms as f64, object.column, InputKind::Press));
        if object.is_hold() {
            script.push((object.end_ms() as f64, object.column, InputKind::Release));
        }
    }
    script.sort_by(|a, b| a.0.total_cmp(&b.0));

    session.start();
    let deadline = chart.last_event_ms() as f64 + 2000.0;
    let mut now = 0.0;
    let mut next = 0;
    while session.phase() == SessionPhase::Playing && now < deadline {
        now += FRAME_MS;
        while next < script.len() && script[next].0 <= now {
            let (at_ms, column, kind) = script[next];
            match kind {
                InputKind::Press => handle.press(column, at_ms),
                InputKind::Release => handle.release(column, at_ms),
            }
            next += 1;
        }
        session.tick(now);
    }

    session.results()
}

fn print_results(chart: &Chart, results: &SessionResults) {
    println!();
    println!("  {} - {} [{}]", chart.artist, chart.title, chart.version);
    println!("  Score     {:>9}", results.score);
    println!("  Accuracy  {:>8.2}%", results.accuracy_percent());
    println!("  Max combo {:>9}", format!("x{}", results.max_combo));
    let c = &results.counts;
    println!(
        "  MAX {} / 300 {} / 200 {} / 100 {} / 50 {} / miss {}",
        c.marv, c.perfect, c.great, c.good, c.bad, c.miss
    );
    if results.is_full_combo() {
        println!("  Full combo!");
    }
}

/// Searches the catalog and lists the matching sets.
fn run_search(query: &str) {
    let mut client = CatalogClient::from_env();
    let request = SearchRequest {
        query: query.to_string(),
        ..Default::default()
    };

    match client.search(&request) {
        Ok(page) => {
            for set in &page.beatmapsets {
                println!("{} - {} (by {})", set.artist, set.title, set.creator);
                for difficulty in set.mania_difficulties() {
                    println!(
                        "    [{:>2}K] {:<24} {:.2}*",
                        difficulty.key_count(),
                        difficulty.version,
                        difficulty.difficulty_rating
                    );
                }
            }
            println!(
                "{} of {} matching sets{}",
                page.beatmapsets.len(),
                page.total,
                if page.cursor_string.is_some() {
                    " (more pages available)"
                } else {
                    ""
                }
            );
        }
        Err(CatalogError::NoCredentials) => {
            log::error!("MAIN: Set OSU_CLIENT_ID and OSU_CLIENT_SECRET to search the catalog");
        }
        Err(e) => log::error!("MAIN: Search failed: {}", e),
    }
}
