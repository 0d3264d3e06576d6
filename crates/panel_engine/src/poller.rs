use std::time::Duration;

use panel_logging::{panel_debug, panel_warn};
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::client::{ControlPlane, JobStatus};
use crate::types::{JobId, JobOutcome, QueryError};

/// Polling policy for outstanding jobs.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Fixed delay between status queries; the first query fires immediately.
    pub interval: Duration,
    /// Consecutive transport failures tolerated before polling is abandoned.
    pub max_transport_failures: u32,
    /// Overall deadline after which the job is declared timed out.
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_transport_failures: 3,
            max_wait: Duration::from_secs(10 * 60),
        }
    }
}

/// Polls `job_id` until a terminal outcome and returns it exactly once. The
/// only status that keeps the poll loop alive is pending; everything else
/// (success, failure, unknown status, exhausted transport retries, deadline)
/// ends it.
pub async fn poll_to_completion(
    client: &dyn ControlPlane,
    job_id: &JobId,
    settings: &PollSettings,
) -> JobOutcome {
    let deadline = Instant::now() + settings.max_wait;
    let mut ticker = interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut transport_failures = 0;

    loop {
        ticker.tick().await;
        if Instant::now() >= deadline {
            panel_warn!("job {} exceeded the maximum wait, giving up", job_id);
            return JobOutcome::TimedOut;
        }

        match client.query_job(job_id).await {
            Ok(poll) => {
                transport_failures = 0;
                match poll.status {
                    JobStatus::Pending => {
                        panel_debug!("job {} still pending", job_id);
                    }
                    JobStatus::Succeeded => {
                        return JobOutcome::Succeeded {
                            virtual_machine: poll.virtual_machine,
                        };
                    }
                    JobStatus::Failed => {
                        return JobOutcome::Failed {
                            reason: poll
                                .job_result
                                .unwrap_or_else(|| "no reason reported".to_string()),
                        };
                    }
                }
            }
            Err(QueryError::UnknownJobStatus(code)) => {
                panel_warn!("job {} reported unknown status {}", job_id, code);
                return JobOutcome::Aborted {
                    message: format!("unknown job status {code}"),
                };
            }
            Err(err) => {
                transport_failures += 1;
                panel_warn!(
                    "poll for job {} failed ({}/{}): {}",
                    job_id,
                    transport_failures,
                    settings.max_transport_failures,
                    err
                );
                if transport_failures >= settings.max_transport_failures {
                    return JobOutcome::Aborted {
                        message: format!(
                            "control plane unreachable after {} attempts",
                            settings.max_transport_failures
                        ),
                    };
                }
            }
        }
    }
}
