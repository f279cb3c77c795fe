//! Daily trigger and polling loop.

use chrono::{Local, NaiveDateTime, NaiveTime};
use rates_alerts::{MessageSender, ReportTask};
use rates_core::ScheduleSpec;
use rates_feeds::RateSource;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Host local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Decides when the daily report is due.
///
/// The first run is today at the trigger time if that is still ahead, otherwise
/// tomorrow, so a start after the trigger time skips that day. After firing,
/// the next run moves to the following day.
#[derive(Debug, Clone)]
pub struct DailyTrigger {
    at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailyTrigger {
    pub fn new(schedule: ScheduleSpec, now: NaiveDateTime) -> Self {
        let at = schedule.at();
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// Returns true if the report is due at `now`. Fires at most once per
    /// scheduled run regardless of how often it is polled.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        if now < self.next_run {
            return false;
        }
        self.next_run = next_occurrence(self.at, now);
        true
    }
}

/// First instant strictly after `now` whose time of day is `at`.
fn next_occurrence(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        return today;
    }
    now.date()
        .succ_opt()
        .map(|tomorrow| tomorrow.and_time(at))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Polls the clock and runs the report task when the trigger fires.
/// The task runs to completion before the next poll unless shutdown
/// resolves first.
pub struct Scheduler<C, R, S> {
    clock: C,
    trigger: DailyTrigger,
    task: ReportTask<R, S>,
    poll_interval: Duration,
}

impl<C, R, S> Scheduler<C, R, S>
where
    C: Clock,
    R: RateSource,
    S: MessageSender,
{
    pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(schedule: ScheduleSpec, clock: C, task: ReportTask<R, S>) -> Self {
        let trigger = DailyTrigger::new(schedule, clock.now());
        info!("Next report scheduled for {}", trigger.next_run().format("%Y-%m-%d %H:%M"));

        Self {
            clock,
            trigger,
            task,
            poll_interval: Self::POLL_INTERVAL,
        }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.trigger.next_run()
    }

    /// Check the clock once. Returns true if the report task ran.
    pub async fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.trigger.poll(now) {
            return false;
        }

        debug!("Trigger fired at {}", now.format("%Y-%m-%d %H:%M:%S"));
        self.task.run().await;
        info!("Next report scheduled for {}", self.next_run().format("%Y-%m-%d %H:%M"));
        true
    }

    /// Poll until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }

            // A hung request must not block shutdown.
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!("Report interrupted by shutdown");
                    break;
                }
                _ = self.tick() => {}
            }
        }

        debug!("Scheduler loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeDelta};
    use pretty_assertions::assert_eq;
    use rates_alerts::TelegramError;
    use rates_core::{Credentials, Quote};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn at(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(time.0, time.1, time.2)
            .unwrap()
    }

    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<NaiveDateTime>>);

    impl ManualClock {
        fn new(now: NaiveDateTime) -> Self {
            Self(Arc::new(Mutex::new(now)))
        }

        fn advance(&self, by: TimeDelta) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }

    struct StaticSource;

    #[async_trait]
    impl RateSource for StaticSource {
        async fn fiat_rate(&self) -> Quote {
            Quote::fixed(90.12)
        }

        async fn crypto_prices(&self) -> (Quote, Quote) {
            (Quote::grouped(65000.0), Quote::grouped(3200.5))
        }
    }

    #[derive(Clone, Default)]
    struct CountingSender(Arc<AtomicUsize>);

    #[async_trait]
    impl MessageSender for CountingSender {
        async fn send_message(&self, _chat_id: &str, _text: &str) -> Result<(), TelegramError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn scheduler(
        clock: ManualClock,
        sender: CountingSender,
    ) -> Scheduler<ManualClock, StaticSource, CountingSender> {
        let credentials = Credentials::new("T", "C").unwrap();
        let task = ReportTask::new(StaticSource, sender, &credentials);
        Scheduler::new(ScheduleSpec::default(), clock, task)
    }

    #[test]
    fn test_first_run_today_when_before_trigger() {
        let trigger = DailyTrigger::new(ScheduleSpec::default(), at((2024, 5, 17), (8, 30, 0)));
        assert_eq!(trigger.next_run(), at((2024, 5, 17), (9, 0, 0)));
    }

    #[test]
    fn test_start_after_trigger_skips_today() {
        let trigger = DailyTrigger::new(ScheduleSpec::default(), at((2024, 5, 17), (9, 0, 1)));
        assert_eq!(trigger.next_run(), at((2024, 5, 18), (9, 0, 0)));
    }

    #[test]
    fn test_poll_fires_once_per_day() {
        let mut trigger =
            DailyTrigger::new(ScheduleSpec::default(), at((2024, 5, 17), (8, 59, 58)));

        assert!(!trigger.poll(at((2024, 5, 17), (8, 59, 59))));
        assert!(trigger.poll(at((2024, 5, 17), (9, 0, 0))));
        assert!(!trigger.poll(at((2024, 5, 17), (9, 0, 1))));
        assert!(!trigger.poll(at((2024, 5, 17), (23, 59, 59))));
        assert_eq!(trigger.next_run(), at((2024, 5, 18), (9, 0, 0)));

        assert!(trigger.poll(at((2024, 5, 18), (9, 0, 0))));
    }

    #[test]
    fn test_year_boundary() {
        let trigger = DailyTrigger::new(ScheduleSpec::default(), at((2024, 12, 31), (10, 0, 0)));
        assert_eq!(trigger.next_run(), at((2025, 1, 1), (9, 0, 0)));
    }

    #[tokio::test]
    async fn test_report_fires_exactly_once_across_many_polls() {
        let clock = ManualClock::new(at((2024, 5, 17), (8, 59, 50)));
        let sender = CountingSender::default();
        let mut scheduler = scheduler(clock.clone(), sender.clone());

        let mut fired = 0;
        // Poll once per simulated second for an hour, crossing 09:00.
        for _ in 0..3600 {
            if scheduler.tick().await {
                fired += 1;
            }
            clock.advance(TimeDelta::seconds(1));
        }

        assert_eq!(fired, 1);
        assert_eq!(sender.0.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.next_run(), at((2024, 5, 18), (9, 0, 0)));
    }

    #[tokio::test]
    async fn test_fires_again_next_day() {
        let clock = ManualClock::new(at((2024, 5, 17), (8, 0, 0)));
        let sender = CountingSender::default();
        let mut scheduler = scheduler(clock.clone(), sender.clone());

        for _ in 0..(3 * 24) {
            scheduler.tick().await;
            clock.advance(TimeDelta::hours(1));
        }

        assert_eq!(sender.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_polls_and_stops() {
        let clock = ManualClock::new(at((2024, 5, 17), (8, 59, 59)));
        let sender = CountingSender::default();
        let mut scheduler = scheduler(clock.clone(), sender.clone());
        clock.advance(TimeDelta::seconds(1));

        scheduler
            .run_until(tokio::time::sleep(Duration::from_secs(5)))
            .await;

        assert_eq!(sender.0.load(Ordering::SeqCst), 1);
    }

    struct HangingSource;

    #[async_trait]
    impl RateSource for HangingSource {
        async fn fiat_rate(&self) -> Quote {
            std::future::pending().await
        }

        async fn crypto_prices(&self) -> (Quote, Quote) {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_hung_report() {
        let clock = ManualClock::new(at((2024, 5, 17), (8, 59, 59)));
        let sender = CountingSender::default();
        let credentials = Credentials::new("T", "C").unwrap();
        let task = ReportTask::new(HangingSource, sender.clone(), &credentials);
        let mut scheduler = Scheduler::new(ScheduleSpec::default(), clock.clone(), task);
        clock.advance(TimeDelta::seconds(1));

        let stopped = tokio::time::timeout(
            Duration::from_secs(3600),
            scheduler.run_until(tokio::time::sleep(Duration::from_secs(3))),
        )
        .await;

        assert!(stopped.is_ok(), "run_until kept waiting on the report");
        assert_eq!(sender.0.load(Ordering::SeqCst), 0);
    }
}
