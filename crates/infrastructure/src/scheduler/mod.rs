//! Background task scheduler
//!
//! Runs the recurring weather refresh either on a fixed interval or on a
//! cron schedule. Uses `tokio-cron-scheduler` underneath and keeps per-task
//! execution statistics.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// Interval of zero or otherwise unusable
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// When a task fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSchedule {
    /// Six-field cron expression (sec min hour day month weekday)
    Cron(String),
    /// Fixed period, first run one period after scheduling
    Interval(Duration),
}

impl fmt::Display for TaskSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cron(expression) => write!(f, "cron '{expression}'"),
            Self::Interval(period) => write!(f, "every {}s", period.as_secs()),
        }
    }
}

/// Task status for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for its first run
    Scheduled,
    /// Currently executing
    Running,
    /// Last run succeeded
    Completed,
    /// Last run failed
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Statistics for a scheduled task
#[derive(Debug, Clone)]
pub struct TaskStats {
    pub name: String,
    pub schedule: TaskSchedule,
    pub status: TaskStatus,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Average execution duration in milliseconds
    pub avg_duration_ms: u64,
}

struct TaskMetadata {
    name: String,
    schedule: TaskSchedule,
    status: RwLock<TaskStatus>,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_success: RwLock<Option<DateTime<Utc>>>,
    last_failure: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    total_duration_ms: AtomicU64,
}

impl TaskMetadata {
    fn new(name: String, schedule: TaskSchedule) -> Self {
        Self {
            name,
            schedule,
            status: RwLock::new(TaskStatus::Scheduled),
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_success: RwLock::new(None),
            last_failure: RwLock::new(None),
            last_error: RwLock::new(None),
            total_duration_ms: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> TaskStats {
        let success = self.success_count.load(Ordering::Relaxed);
        let failure = self.failure_count.load(Ordering::Relaxed);
        let total = success + failure;
        let avg_duration = if total > 0 {
            self.total_duration_ms.load(Ordering::Relaxed) / total
        } else {
            0
        };

        TaskStats {
            name: self.name.clone(),
            schedule: self.schedule.clone(),
            status: *self.status.read(),
            success_count: success,
            failure_count: failure,
            last_run: *self.last_run.read(),
            last_success: *self.last_success.read(),
            last_failure: *self.last_failure.read(),
            last_error: self.last_error.read().clone(),
            avg_duration_ms: avg_duration,
        }
    }

    fn record_start(&self) {
        *self.status.write() = TaskStatus::Running;
        *self.last_run.write() = Some(Utc::now());
    }

    fn record_success(&self, duration_ms: u64) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.status.write() = TaskStatus::Completed;
        *self.last_success.write() = Some(Utc::now());
    }

    fn record_failure(&self, error: String, duration_ms: u64) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.status.write() = TaskStatus::Failed;
        *self.last_failure.write() = Some(Utc::now());
        *self.last_error.write() = Some(error);
    }
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether to start the scheduler immediately
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Task scheduler for recurring background tasks
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>,
    running: Arc<AtomicBool>,
}

impl fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a new task scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;

        let instance = Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: Arc::new(AtomicBool::new(false)),
        };

        if config.auto_start {
            instance.start().await?;
        }

        debug!("Task scheduler initialized");
        Ok(instance)
    }

    /// Start the scheduler
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already running");
            return Ok(());
        }

        self.scheduler.lock().await.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!("Task scheduler started");
        Ok(())
    }

    /// Stop the scheduler
    ///
    /// A stopped scheduler cannot be restarted; create a new one instead.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already stopped");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Task scheduler stopped");
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Add a task on a cron schedule
    ///
    /// ```text
    /// ┌──────────── second (0-59)
    /// │ ┌────────── minute (0-59)
    /// │ │ ┌──────── hour (0-23)
    /// │ │ │ ┌────── day of month (1-31)
    /// │ │ │ │ ┌──── month (1-12)
    /// │ │ │ │ │ ┌── day of week (0-6, Sunday=0)
    /// │ │ │ │ │ │
    /// * * * * * *
    /// ```
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        cron_expression.parse::<cron::Schedule>().map_err(|e| {
            SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}"))
        })?;

        let runner = Self::runner(name.to_string(), Arc::clone(&self.tasks), task);
        let job = Job::new_async(cron_expression, move |_uuid, _lock| runner())
            .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        self.register(name, TaskSchedule::Cron(cron_expression.to_string()), job)
            .await
    }

    /// Add a task repeating every `period`
    #[instrument(skip(self, task))]
    pub async fn add_interval_task<F, Fut>(
        &self,
        name: &str,
        period: Duration,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        if period.is_zero() {
            return Err(SchedulerError::InvalidInterval(
                "period must be greater than zero".to_string(),
            ));
        }

        let runner = Self::runner(name.to_string(), Arc::clone(&self.tasks), task);
        let job = Job::new_repeated_async(period, move |_uuid, _lock| runner())
            .map_err(|e| SchedulerError::InvalidInterval(e.to_string()))?;

        self.register(name, TaskSchedule::Interval(period), job)
            .await
    }

    /// Wrap a task so each run updates its statistics
    fn runner<F, Fut>(
        name: String,
        tasks: Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>,
        task: F,
    ) -> impl Fn() -> JobFuture + Send + Sync + 'static
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        move || {
            let name = name.clone();
            let metadata = tasks.read().get(&name).cloned();
            let task_future = task();

            Box::pin(async move {
                debug!(task = %name, "Starting scheduled task");
                if let Some(metadata) = &metadata {
                    metadata.record_start();
                }
                let start = Instant::now();
                let result = task_future.await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match result {
                    Ok(()) => {
                        if let Some(metadata) = &metadata {
                            metadata.record_success(duration_ms);
                        }
                        debug!(task = %name, duration_ms, "Task completed");
                    },
                    Err(e) => {
                        error!(task = %name, error = %e, duration_ms, "Task failed");
                        if let Some(metadata) = &metadata {
                            metadata.record_failure(e, duration_ms);
                        }
                    },
                }
            })
        }
    }

    async fn register(
        &self,
        name: &str,
        schedule: TaskSchedule,
        job: Job,
    ) -> Result<(), SchedulerError> {
        // Metadata goes in first so the earliest run already finds it
        let metadata = Arc::new(TaskMetadata::new(name.to_string(), schedule.clone()));
        self.tasks.write().insert(name.to_string(), metadata);

        if let Err(e) = self.scheduler.lock().await.add(job).await {
            self.tasks.write().remove(name);
            return Err(e.into());
        }

        info!(task = %name, schedule = %schedule, "Task scheduled");
        Ok(())
    }

    /// Get statistics for a specific task
    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.tasks.read().get(name).map(|m| m.to_stats())
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn scheduler_creation_without_start() {
        let config = SchedulerConfig { auto_start: false };
        let scheduler = TaskScheduler::new(config).await.unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn scheduler_start_stop() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();
        assert!(scheduler.is_running());

        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn add_cron_task() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();

        scheduler
            .add_task("refresh", "0 */30 * * * *", || async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(scheduler.task_count(), 1);
        let stats = scheduler.get_task_stats("refresh").unwrap();
        assert_eq!(stats.status, TaskStatus::Scheduled);
        assert_eq!(stats.schedule, TaskSchedule::Cron("0 */30 * * * *".to_string()));

        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_cron_expression() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();

        let result = scheduler
            .add_task("bad-task", "invalid cron", || async { Ok(()) })
            .await;

        assert!(matches!(
            result,
            Err(SchedulerError::InvalidCronExpression(_))
        ));
        assert_eq!(scheduler.task_count(), 0);

        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();

        let result = scheduler
            .add_interval_task("never", Duration::ZERO, || async { Ok(()) })
            .await;

        assert!(matches!(result, Err(SchedulerError::InvalidInterval(_))));
        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn interval_task_executes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();

        scheduler
            .add_interval_task("counter-task", Duration::from_secs(1), move || {
                let counter = Arc::clone(&counter_clone);
                async move {
                    counter.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
            })
            .await
            .unwrap();

        sleep(Duration::from_millis(2500)).await;

        let count = counter.load(Ordering::Relaxed);
        assert!(count >= 1, "Task should have executed at least once, got {count}");

        let stats = scheduler.get_task_stats("counter-task").unwrap();
        assert!(stats.success_count >= 1);
        assert_eq!(stats.failure_count, 0);
        assert_eq!(stats.status, TaskStatus::Completed);
        assert!(stats.last_success.is_some());

        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn failure_is_tracked() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();

        scheduler
            .add_task("failing-task", "* * * * * *", || async {
                Err("Data unavailable: HTTP 503".to_string())
            })
            .await
            .unwrap();

        sleep(Duration::from_secs(2)).await;

        let stats = scheduler.get_task_stats("failing-task").unwrap();
        assert!(stats.failure_count >= 1);
        assert_eq!(stats.status, TaskStatus::Failed);
        assert_eq!(stats.last_error.as_deref(), Some("Data unavailable: HTTP 503"));

        scheduler.stop().await.unwrap();
    }

    #[test]
    fn schedule_display() {
        assert_eq!(
            TaskSchedule::Interval(Duration::from_secs(1800)).to_string(),
            "every 1800s"
        );
        assert_eq!(
            TaskSchedule::Cron("0 0 * * * *".to_string()).to_string(),
            "cron '0 0 * * * *'"
        );
    }

    #[test]
    fn task_status_display() {
        assert_eq!(TaskStatus::Scheduled.to_string(), "scheduled");
        assert_eq!(TaskStatus::Running.to_string(), "running");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn scheduler_error_display() {
        let err = SchedulerError::InvalidCronExpression("bad cron".to_string());
        assert!(err.to_string().contains("Invalid cron expression"));

        let err = SchedulerError::InvalidInterval("zero".to_string());
        assert!(err.to_string().contains("Invalid interval"));

        let err = SchedulerError::Internal("internal error".to_string());
        assert!(err.to_string().contains("Internal"));
    }
}
