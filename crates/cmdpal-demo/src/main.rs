#![forbid(unsafe_code)]

//! cmdpal demo binary entry point.

use std::io;
use std::time::Duration;

use cmdpal_core::terminal_session::{SessionOptions, TerminalSession};
use cmdpal_demo::app::HostApp;
use cmdpal_demo::cli::Opts;
use cmdpal_demo::{logging, view};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() {
    let opts = Opts::parse();

    if let Err(e) = logging::init(opts.log.as_deref(), opts.log_json) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&opts) {
        tracing::error!(error = %e, "demo terminated");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: opts.alt_screen,
        ..SessionOptions::default()
    })?;

    let mut app = HostApp::new(&opts.root, opts.depth);
    let size = session.size()?;
    app.update(&cmdpal_core::event::Event::Resize {
        width: size.width,
        height: size.height,
    });

    let mut stdout = io::stdout();
    loop {
        view::render(&app).flush(&mut stdout)?;
        if app.should_quit() {
            break;
        }
        if session.poll_event(POLL_INTERVAL)?
            && let Some(event) = session.read_event()?
        {
            app.update(&event);
        }
    }
    tracing::info!("demo exiting");
    Ok(())
}
