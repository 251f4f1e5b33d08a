//! Service health command (administrators only).

use tokio::sync::watch;

use campus_client::require_elevated;
use campus_client::services::{HealthPoller, HealthReport};

use super::{CommandError, Context};

/// Show service health: one snapshot, or a repeating watch.
pub async fn show(ctx: &Context, watch_mode: bool) -> Result<(), CommandError> {
    ctx.enforce(require_elevated(&ctx.session.current()))?;

    let poller = HealthPoller::new(
        ctx.http.clone(),
        ctx.config.users_url.clone(),
        ctx.config.health_interval,
    );

    if !watch_mode {
        let report = poller.fetch().await?;
        print_report(&report);
        return Ok(());
    }

    // Watch mode: run the poller until Ctrl-C tears it down.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut reports = poller.subscribe();

    let printer = tokio::spawn(async move {
        while reports.changed().await.is_ok() {
            if let Some(report) = reports.borrow_and_update().clone() {
                print_report(&report);
            }
        }
    });

    tokio::select! {
        () = poller.run(shutdown_rx) => {}
        _ = tokio::signal::ctrl_c() => {
            shutdown_tx.send(true).ok();
        }
    }
    printer.abort();
    Ok(())
}

fn print_report(report: &HealthReport) {
    if !report.timestamp.is_empty() {
        println!("-- {}", report.timestamp);
    }
    for service in &report.services {
        println!(
            "{:<20} {:<10} port {:<6} {}",
            service.name, service.status, service.port, service.container
        );
    }
}
