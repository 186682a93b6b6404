//! Entry point for the **sizerd** daemon.
//!
//! Spawns the socket listener on a background thread and processes
//! incoming commands one at a time on the main thread, in arrival
//! order.  A command's retry loop runs to completion before the next
//! command is handled, so a placement is never raced by a later
//! command against the same focused window.

use log::{error, info};
use sizerd::command::Command;
use sizerd::config::Config;
use sizerd::hyprland::wm::HyprlandCompositor;
use sizerd::ipc::listener::UnixSocketListener;
use sizerd::report::SizeReport;
use sizerd::sizer::Sizer;
use sizerd::traits::CommandSource;
use std::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/sizerd.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/sizerd`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("sizerd")
}

/// Try to load the config from `$XDG_CONFIG_HOME/sizerd/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let socket_path = config
        .socket
        .path
        .clone()
        .unwrap_or_else(default_socket_path);

    let mut sizer = Sizer::with_engine(HyprlandCompositor::new(), config.placement.engine());

    let (report_tx, report_rx) = mpsc::channel::<SizeReport>();
    sizer.set_report_sink(report_tx);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket_path);
        if let Err(e) = source.run(cmd_tx) {
            error!("socket listener error: {}", e);
        }
    });

    info!("sizerd running");
    for cmd in cmd_rx {
        if let Err(e) = sizer.handle(cmd) {
            error!("command error: {}", e);
        }
        // Surface any size report the command produced.
        for report in report_rx.try_iter() {
            info!("{}", report);
        }
    }
    info!("command source closed, exiting");
}
