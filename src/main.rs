use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::Result;
use cityweather_core::{Config, ConfigError};
use cityweather_ui::{AppServices, Route, Shell, ShellAction};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Initialize core
    cityweather_core::init()?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                eprintln!("{}", config_err.user_message());
            }
            return Err(e.context("Failed to load configuration"));
        }
    };
    tracing::info!("Config directory: {}", config.config_dir.display());

    let services = AppServices::init(config)?;

    // Optional start path, e.g. `cityweather /city/Paris`
    let start = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let mut shell = Shell::new(services, Route::parse(&start));

    tracing::info!("cityweather started");

    let input = spawn_stdin_reader();
    draw(&shell)?;

    loop {
        let mut dirty = shell.poll();

        match input.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if shell.handle_line(&line) == ShellAction::Quit {
                    break;
                }
                dirty = true;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if dirty {
            draw(&shell)?;
        }
    }

    tracing::info!("cityweather stopped");
    Ok(())
}

/// Read stdin lines on a separate thread so the UI loop keeps polling.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn draw(shell: &Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    // Clear screen, cursor home
    write!(stdout, "\x1b[2J\x1b[H{}\n> ", shell.render())?;
    stdout.flush()?;
    Ok(())
}
