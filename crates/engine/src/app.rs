//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use clockwork_domain::{ClockError, TimeComponents};

use crate::api::{ClockCommand, ClockOption};
use crate::infrastructure::{
    ports::{ClockNotifier, ClockPort},
    scheduler::{run_tick_driver, TokioTickScheduler},
    settings::{ClockSettings, SettingsError},
};
use crate::use_cases::clock::{ClockEngine, ClockLifecycle, ClockSnapshot};

/// Result of executing one host command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Applied,
    Snapshot(ClockSnapshot),
    Quit,
}

/// Host-facing handle: the engine behind one async mutex plus its tick driver.
///
/// Every mutation, including tick delivery, goes through the mutex, so the
/// engine only ever sees serialized calls. Must be created inside a tokio
/// runtime.
pub struct ClockApp {
    engine: Arc<Mutex<ClockEngine>>,
    driver: JoinHandle<()>,
    startup: Option<JoinHandle<()>>,
}

impl ClockApp {
    pub fn new(
        settings: &ClockSettings,
        clock: Arc<dyn ClockPort>,
        notifier: Option<Arc<dyn ClockNotifier>>,
    ) -> Result<Self, SettingsError> {
        let (scheduler, schedules) = TokioTickScheduler::new();
        let mut engine = ClockEngine::new(settings.engine_config()?, Box::new(scheduler), clock);
        engine.set_notifier(notifier);

        let engine = Arc::new(Mutex::new(engine));
        let driver = tokio::spawn(run_tick_driver(engine.clone(), schedules));

        Ok(Self {
            engine,
            driver,
            startup: None,
        })
    }

    pub fn engine(&self) -> Arc<Mutex<ClockEngine>> {
        self.engine.clone()
    }

    pub async fn start(&self) {
        self.engine.lock().await.start();
    }

    pub async fn stop(&self) {
        self.engine.lock().await.stop();
    }

    pub async fn toggle(&self) -> ClockLifecycle {
        self.engine.lock().await.toggle()
    }

    pub async fn configure(&self, option: ClockOption) -> Result<(), ClockError> {
        option.apply_to(&mut *self.engine.lock().await)
    }

    pub async fn set_local_time(&self, time: TimeComponents) -> Result<(), ClockError> {
        self.engine
            .lock()
            .await
            .set_local_time(time.hour(), time.minute(), time.second())
    }

    pub async fn snapshot(&self) -> ClockSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn execute(&self, command: ClockCommand) -> Result<CommandOutcome, ClockError> {
        match command {
            ClockCommand::Start => self.start().await,
            ClockCommand::Stop => self.stop().await,
            ClockCommand::Toggle => {
                self.toggle().await;
            }
            ClockCommand::Status => return Ok(CommandOutcome::Snapshot(self.snapshot().await)),
            ClockCommand::Set(time) => self.set_local_time(time).await?,
            ClockCommand::Configure(option) => self.configure(option).await?,
            ClockCommand::Quit => return Ok(CommandOutcome::Quit),
        }
        Ok(CommandOutcome::Applied)
    }

    /// Switch into real time (which also starts the clock) after `delay`.
    ///
    /// Replaces any pending startup switch.
    pub fn schedule_real_time_startup(&mut self, delay: Duration) {
        let engine = self.engine.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(delay_ms = delay.as_millis() as u64, "Switching to real time");
            engine.lock().await.set_display_real_time(true);
        });
        if let Some(previous) = self.startup.replace(task) {
            previous.abort();
        }
    }

    /// Stop the clock and the background tasks.
    pub async fn shutdown(self) {
        if let Some(startup) = self.startup {
            startup.abort();
        }
        self.engine.lock().await.stop();
        self.driver.abort();
        tracing::info!("Clock app shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::test_fixtures::{hms, ClockEvent, RecordingNotifier};
    use clockwork_domain::DriveMode;

    fn app_with(settings: ClockSettings) -> (ClockApp, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let app = ClockApp::new(
            &settings,
            Arc::new(FixedClock::at(14, 30, 5)),
            Some(notifier.clone()),
        )
        .unwrap();
        (app, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn execute_applies_commands() {
        let (app, notifier) = app_with(ClockSettings {
            manual_time_set_allowed: true,
            ..ClockSettings::default()
        });

        assert_eq!(
            app.execute(ClockCommand::Set(hms(8, 0, 0))).await,
            Ok(CommandOutcome::Applied)
        );
        app.execute(ClockCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let Ok(CommandOutcome::Snapshot(snapshot)) = app.execute(ClockCommand::Status).await
        else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.time, hms(8, 0, 2));
        assert_eq!(snapshot.lifecycle, ClockLifecycle::Running);
        assert_eq!(notifier.events(), vec![ClockEvent::TimeIsSetManually]);

        assert_eq!(app.execute(ClockCommand::Quit).await, Ok(CommandOutcome::Quit));
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn execute_reports_rejections() {
        let (app, _notifier) = app_with(ClockSettings::default());

        assert_eq!(
            app.execute(ClockCommand::Set(hms(8, 0, 0))).await,
            Err(ClockError::ManualSetNotAllowed)
        );
        assert_eq!(
            app.execute(ClockCommand::Configure(ClockOption::Rate(0.01)))
                .await,
            Err(ClockError::InvalidRate(0.01))
        );
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn startup_switches_to_real_time_after_delay() {
        let (mut app, _notifier) = app_with(ClockSettings::default());
        app.schedule_real_time_startup(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(app.snapshot().await.drive, DriveMode::FreeRunning);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let snapshot = app.snapshot().await;
        assert_eq!(snapshot.drive, DriveMode::RealTime);
        assert_eq!(snapshot.lifecycle, ClockLifecycle::Running);
        assert_eq!(snapshot.time, hms(14, 30, 5));
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_and_shutdown_notify_stops() {
        let (app, notifier) = app_with(ClockSettings::default());

        assert_eq!(app.toggle().await, ClockLifecycle::Running);
        assert_eq!(app.toggle().await, ClockLifecycle::Stopped);
        app.start().await;
        app.shutdown().await;

        assert_eq!(
            notifier.events(),
            vec![ClockEvent::ClockStopped, ClockEvent::ClockStopped]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expires_through_the_driver() {
        let (app, notifier) = app_with(ClockSettings::default());
        app.configure(ClockOption::CountDownTimer(true)).await.unwrap();
        app.start().await;

        tokio::time::sleep(Duration::from_secs(6)).await;

        let snapshot = app.snapshot().await;
        assert_eq!(snapshot.time, TimeComponents::MIDNIGHT);
        assert_eq!(snapshot.lifecycle, ClockLifecycle::Stopped);
        assert_eq!(snapshot.drive, DriveMode::FreeRunning);
        assert_eq!(
            notifier.events(),
            vec![ClockEvent::ClockStopped, ClockEvent::CountDownExpired]
        );
        app.shutdown().await;
    }
}
