//! Interactive console
//!
//! Command loop over stdin plus a periodic refresh task (stats + alerts
//! every few seconds). Detection runs execute in their own task so the loop
//! stays responsive to `cancel` while the backend works.

pub mod render;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::backend::types::{LogRecord, StatsSummary};
use crate::backend::BackendClient;
use crate::constants;
use crate::error::MonitorError;
use crate::monitor::feed::AlertReconciler;
use crate::monitor::filter::{FilterPipeline, LabelFilter};
use crate::monitor::job::{JobController, JobState};
use crate::monitor::series;

const HELP: &str = "\
Commands:
  stats                                  fetch backend counters
  status                                 job state + last polled stats
  alerts                                 show the live alert feed
  run [limit]                            start a detection run
  cancel                                 request cancellation of the run
  results                                show the filtered run results
  filter <all|attack|suspicious|normal> [ip-substring]
  timeline                               distribution + timeline chart
  submit <ip> <sent> <recv> <dur_ms> <packets>
  logs                                   show recent stored logs
  count                                  count stored logs
  clear-alerts                           clear stored alerts and the feed
  clear-logs [keep-alerts]               clear stored logs
  help                                   this text
  quit                                   exit";

pub struct Console {
    client: Arc<BackendClient>,
    job: JobController<BackendClient>,
    reconciler: Arc<Mutex<AlertReconciler>>,
    pipeline: Arc<Mutex<FilterPipeline>>,
    last_stats: Arc<Mutex<Option<StatsSummary>>>,
}

impl Console {
    pub fn new(client: BackendClient) -> Self {
        let client = Arc::new(client);
        Self {
            job: JobController::new(Arc::clone(&client)),
            client,
            reconciler: Arc::new(Mutex::new(AlertReconciler::new())),
            pipeline: Arc::new(Mutex::new(FilterPipeline::new())),
            last_stats: Arc::new(Mutex::new(None)),
        }
    }

    /// Run the console until `quit` or stdin closes. Owns the refresh task
    /// and shuts it down explicitly on the way out.
    pub async fn run(&self) -> anyhow::Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = tokio::spawn(refresh_loop(
            Arc::clone(&self.client),
            Arc::clone(&self.reconciler),
            Arc::clone(&self.last_stats),
            shutdown_rx,
        ));

        println!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
        println!("Backend: {}", self.client.base_url());
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if !self.dispatch(line.trim()).await {
                break;
            }
        }

        shutdown_tx.send(true).ok();
        refresh.await.ok();
        log::info!("Console shut down");
        Ok(())
    }

    /// Handle one command line. Returns false when the loop should exit.
    async fn dispatch(&self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => return true,
        };
        let args: Vec<&str> = parts.collect();

        let outcome = match command {
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            "quit" | "exit" => return false,
            "stats" => self.cmd_stats().await,
            "status" => self.cmd_status(),
            "alerts" => self.cmd_alerts(),
            "run" => self.cmd_run(&args).await,
            "cancel" => self.job.cancel().await,
            "results" => self.cmd_results(),
            "filter" => self.cmd_filter(&args),
            "timeline" => self.cmd_timeline().await,
            "submit" => self.cmd_submit(&args).await,
            "logs" => self.cmd_logs().await,
            "count" => self.cmd_count().await,
            "clear-alerts" => self.cmd_clear_alerts().await,
            "clear-logs" => self.cmd_clear_logs(&args).await,
            other => Err(MonitorError::InvalidInput(format!(
                "unknown command '{}' (try `help`)",
                other
            ))),
        };

        if let Err(e) = outcome {
            println!("error: {}", e);
        }
        true
    }

    async fn cmd_stats(&self) -> Result<(), MonitorError> {
        let stats = self.client.stats().await?;
        print!("{}", render::render_stats(&stats));
        *self.last_stats.lock() = Some(stats);
        Ok(())
    }

    fn cmd_status(&self) -> Result<(), MonitorError> {
        let state = match self.job.state() {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::CancelRequested => "cancelling",
        };
        println!("  Detection job: {}", state);
        match self.last_stats.lock().as_ref() {
            Some(stats) => print!("{}", render::render_stats(stats)),
            None => println!("  (no stats polled yet)"),
        }
        Ok(())
    }

    fn cmd_alerts(&self) -> Result<(), MonitorError> {
        let reconciler = self.reconciler.lock();
        print!("{}", render::render_feed(reconciler.feed()));
        Ok(())
    }

    /// Start a detection run in its own task. A run over a very large log
    /// store is refused here unless the user supplies a limit; the controller
    /// itself does not enforce this.
    async fn cmd_run(&self, args: &[&str]) -> Result<(), MonitorError> {
        let limit = match args.first() {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                MonitorError::InvalidInput(format!("limit must be a number, got '{}'", raw))
            })?),
            None => None,
        };

        if self.job.state() != JobState::Idle {
            return Err(MonitorError::DetectionBusy);
        }

        if limit.is_none() {
            let count = self.client.count_logs().await?;
            if count > constants::LARGE_RUN_THRESHOLD {
                return Err(MonitorError::InvalidInput(format!(
                    "{} logs stored; pass a limit (e.g. `run 1000`) for large stores",
                    count
                )));
            }
        }

        let job = self.job.clone();
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            match job.start(limit).await {
                Ok(result) => {
                    println!(
                        "\nDetection run finished: {}/{} logs analyzed{}",
                        result.analyzed_count,
                        result.total_logs,
                        if result.cancelled { " (cancelled)" } else { "" }
                    );
                    pipeline.lock().set_results(result);
                    println!("Use `results` to inspect, `filter` to narrow down.");
                }
                Err(MonitorError::DetectionBusy) => {
                    println!("\nA detection run is already in progress.")
                }
                Err(e) => {
                    log::error!("Detection run failed: {}", e);
                    println!("\nDetection run failed: {}", e);
                }
            }
        });

        println!("Detection run started.");
        Ok(())
    }

    fn cmd_results(&self) -> Result<(), MonitorError> {
        let view = self.pipeline.lock().view();
        print!("{}", render::render_view(&view));
        Ok(())
    }

    fn cmd_filter(&self, args: &[&str]) -> Result<(), MonitorError> {
        let label: LabelFilter = args
            .first()
            .ok_or_else(|| {
                MonitorError::InvalidInput(
                    "usage: filter <all|attack|suspicious|normal> [ip-substring]".to_string(),
                )
            })?
            .parse()?;
        let ip_substring = args.get(1).copied().unwrap_or("");

        let view = {
            let mut pipeline = self.pipeline.lock();
            pipeline.set_filter(label, ip_substring);
            pipeline.view()
        };
        print!("{}", render::render_view(&view));
        Ok(())
    }

    async fn cmd_timeline(&self) -> Result<(), MonitorError> {
        let alerts = self.client.list_alerts().await?;
        print!("{}", render::render_series(&series::aggregate(&alerts)));
        Ok(())
    }

    async fn cmd_submit(&self, args: &[&str]) -> Result<(), MonitorError> {
        if args.len() != 5 {
            return Err(MonitorError::InvalidInput(
                "usage: submit <ip> <sent> <recv> <dur_ms> <packets>".to_string(),
            ));
        }

        let numeric = |raw: &str, field: &str| {
            raw.parse::<u64>().map_err(|_| {
                MonitorError::InvalidInput(format!("{} must be a number, got '{}'", field, raw))
            })
        };

        let record = LogRecord {
            source_ip: args[0].to_string(),
            bytes_sent: numeric(args[1], "sent")?,
            bytes_received: numeric(args[2], "recv")?,
            duration_ms: numeric(args[3], "dur_ms")?,
            packet_count: numeric(args[4], "packets")?,
        };

        self.client.submit_log(&record).await?;
        println!("Log stored.");
        Ok(())
    }

    async fn cmd_logs(&self) -> Result<(), MonitorError> {
        let logs = self.client.recent_logs().await?;
        println!("  {} recent log(s):", logs.len());
        for record in &logs {
            println!(
                "  {:<15}  sent {:>8}  recv {:>8}  {:>6} ms  {:>5} pkts",
                record.source_ip,
                record.bytes_sent,
                record.bytes_received,
                record.duration_ms,
                record.packet_count
            );
        }
        Ok(())
    }

    async fn cmd_count(&self) -> Result<(), MonitorError> {
        let count = self.client.count_logs().await?;
        println!("  {} stored log(s)", count);
        Ok(())
    }

    async fn cmd_clear_alerts(&self) -> Result<(), MonitorError> {
        self.client.clear_alerts().await?;
        self.reconciler.lock().clear();
        println!("Stored alerts and the live feed cleared.");
        Ok(())
    }

    async fn cmd_clear_logs(&self, args: &[&str]) -> Result<(), MonitorError> {
        let clear_alerts = !matches!(args.first(), Some(&"keep-alerts"));
        self.client.clear_logs(clear_alerts).await?;
        if clear_alerts {
            self.reconciler.lock().clear();
            println!("Stored logs and alerts cleared.");
        } else {
            println!("Stored logs cleared; alerts kept.");
        }
        Ok(())
    }
}

/// Periodic poll: stats + alerts on every tick. Failures are logged and
/// retried naturally on the next tick; the loop stops when the shutdown
/// channel fires.
async fn refresh_loop(
    client: Arc<BackendClient>,
    reconciler: Arc<Mutex<AlertReconciler>>,
    last_stats: Arc<Mutex<Option<StatsSummary>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(constants::get_refresh_interval()));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.stats().await {
                    Ok(stats) => *last_stats.lock() = Some(stats),
                    Err(e) => log::warn!("Stats poll failed: {}", e),
                }

                match client.list_alerts().await {
                    Ok(alerts) => {
                        let admitted = reconciler.lock().reconcile(&alerts);
                        for alert in &admitted {
                            println!("{}", render::render_alert_row(alert));
                        }
                    }
                    Err(e) => log::warn!("Alert poll failed: {}", e),
                }
            }
            _ = shutdown.changed() => {
                log::debug!("Refresh loop stopped");
                break;
            }
        }
    }
}
