//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `flexiplan_core` linkage with deterministic output.
//! - When `FLEXIPLAN_API_BASE_URL` is set, load the routine and print today.

use flexiplan_core::{
    ClientConfig, HttpRoutineRemote, RoutineRemote, RoutineSession, SystemDateProvider,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("flexiplan_core ping={}", flexiplan_core::ping());
    println!("flexiplan_core version={}", flexiplan_core::core_version());

    if std::env::var_os(flexiplan_core::config::ENV_BASE_URL).is_none() {
        return ExitCode::SUCCESS;
    }
    match print_today().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn print_today() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let user_id = config.user_id;
    let remote: Arc<dyn RoutineRemote> = Arc::new(HttpRoutineRemote::new(config)?);
    let session = RoutineSession::new(remote, user_id, SystemDateProvider);

    let status = session.load().await?;
    println!(
        "{} ({}) status={}",
        session.current_day_label(),
        session.current_date_label(),
        status.as_str()
    );
    match session.current_display_list() {
        Ok(tasks) if tasks.is_empty() => println!("  nothing scheduled"),
        Ok(tasks) => {
            for task in tasks {
                let mark = if task.completed { "x" } else { " " };
                println!(
                    "  [{mark}] {} {} {}",
                    task.icon, task.time_range_label, task.name
                );
            }
        }
        Err(err) => println!("  {err}"),
    }
    Ok(())
}
