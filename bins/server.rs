use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env first so RUST_LOG and LOG_FORMAT take effect.
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "laundry", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    let instance_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "laundry", event = "panic", %instance_id, pid, message = %info, "unhandled panic occurred");
    }));

    // config.toml first, then TOKIO_WORKER_THREADS. A malformed file stops startup.
    let worker_threads = match configs::AppConfig::load_or_env() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(e) => {
            error!(service = "laundry", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "laundry", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "laundry",
        event = "start",
        %instance_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "laundry server starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::run());

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "laundry", event = "stop", %instance_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(service = "laundry", event = "run_failed", error = %e, "server::run returned error");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(service = "laundry", event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "laundry", event = "shutdown_signal", %instance_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
