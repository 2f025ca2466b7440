use clap::Parser;
use std::process::ExitCode;
use std::sync::{Arc, Condvar, Mutex};
use winit::event_loop::EventLoop;

use gallery_lightbox::cli::Cli;
use gallery_lightbox::files::{build_collection, collect_images};
use gallery_lightbox::lightbox::Controls;
use gallery_lightbox::loader::{spawn_decode_workers, CacheState, SharedState, UserEvent};
use gallery_lightbox::ui::state::PageState;
use gallery_lightbox::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let files = match collect_images(&cli.scan_options()) {
        Ok(files) => files,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        log::warn!("No image files found; lightbox disabled.");
    }

    let collection = build_collection(files);
    let budget = cli.memory_budget();
    log::info!(
        "{} images, cache budget {:.0} MB",
        collection.len(),
        budget as f64 / (1024.0 * 1024.0)
    );

    let shared: SharedState = Arc::new((
        Mutex::new(CacheState::new(budget, collection.len(), cli.thumb_size)),
        Condvar::new(),
    ));

    let num_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(2, 8);

    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    spawn_decode_workers(
        Arc::clone(&shared),
        collection.clone(),
        event_loop.create_proxy(),
        num_threads,
    );

    let controls = if cli.no_nav_buttons {
        Controls {
            close: true,
            ..Controls::NONE
        }
    } else {
        Controls::ALL
    };

    let mut state = PageState::new(collection, shared, cli.columns, controls);
    if let Some(index) = cli.open {
        state.lightbox.open(index);
    }

    let mut app = App::new(state);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
