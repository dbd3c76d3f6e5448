//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use parking_lot::Mutex;

use slotbook::models::{Appointment, AppointmentId, NotificationKind};
use slotbook::NotificationDispatcher;

/// Route log output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

/// 2030-01-07 is a Monday, comfortably in the future.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    date.and_time(t(h, m)).and_utc()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// Dispatcher that records every delivery instead of sending anything.
#[derive(Default)]
pub struct RecordingDispatcher {
    deliveries: Mutex<Vec<(AppointmentId, NotificationKind)>>,
    fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent delivery fail.
    pub fn fail_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn deliveries(&self) -> Vec<(AppointmentId, NotificationKind)> {
        self.deliveries.lock().clone()
    }

    pub fn delivered(&self, kind: NotificationKind) -> usize {
        self.deliveries
            .lock()
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn deliver(
        &self,
        appointment: &Appointment,
        kind: NotificationKind,
    ) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("transport unreachable");
        }
        self.deliveries.lock().push((appointment.id, kind));
        Ok(())
    }
}
