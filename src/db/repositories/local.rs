//! In-memory repository implementation.
//!
//! All data lives behind a single `RwLock`, which keeps the implementation
//! deterministic and makes the check-and-insert in
//! [`insert_appointment_if_free`](LocalRepository::insert_appointment_if_free)
//! genuinely atomic: the overlap check and the insert happen under one write
//! lock, so two concurrent confirms of the same slot resolve to exactly one
//! winner.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use parking_lot::RwLock;

use crate::availability::overlap::{conflicts_with, intervals_overlap};
use crate::db::repository::{
    AppointmentRepository, NotificationRepository, RepositoryError, RepositoryResult,
    ScheduleRepository,
};
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, ClientId, DateOverride, Master, MasterId,
    NewAppointment, NewNotification, Notification, NotificationId, RecurringRule, Service,
    ServiceId,
};

/// In-memory repository.
///
/// Cloning is cheap and clones share the same underlying data.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    masters: HashMap<MasterId, Master>,
    services: HashMap<ServiceId, Service>,
    rules: Vec<RecurringRule>,
    overrides: Vec<DateOverride>,
    appointments: HashMap<AppointmentId, Appointment>,
    notifications: HashMap<NotificationId, Notification>,

    next_master_id: i64,
    next_service_id: i64,
    next_appointment_id: i64,
    next_notification_id: i64,

    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            masters: HashMap::new(),
            services: HashMap::new(),
            rules: Vec::new(),
            overrides: Vec::new(),
            appointments: HashMap::new(),
            notifications: HashMap::new(),
            next_master_id: 1,
            next_service_id: 1,
            next_appointment_id: 1,
            next_notification_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    // ==================== Seeding helpers ====================

    /// Add a master and return the assigned id. A `None` reminder lead means
    /// the configured default applies.
    pub fn add_master(
        &self,
        display_name: impl Into<String>,
        reminder_hours: impl Into<Option<i64>>,
    ) -> MasterId {
        let mut data = self.data.write();
        let id = MasterId(data.next_master_id);
        data.next_master_id += 1;
        let mut master = Master::new(id, display_name);
        master.reminder_hours = reminder_hours.into();
        data.masters.insert(id, master);
        id
    }

    /// Add a service to a master's catalog and return the assigned id.
    pub fn add_service(
        &self,
        master_id: MasterId,
        name: impl Into<String>,
        price: f64,
        duration_minutes: i64,
    ) -> ServiceId {
        let mut data = self.data.write();
        let id = ServiceId(data.next_service_id);
        data.next_service_id += 1;
        let service = Service::new(id, master_id, name, price, duration_minutes);
        data.services.insert(id, service);
        id
    }

    /// Insert an appointment directly, bypassing the overlap check.
    ///
    /// Test seeding only; production inserts go through
    /// `insert_appointment_if_free`.
    pub fn add_appointment(
        &self,
        master_id: MasterId,
        client_id: ClientId,
        service_id: ServiceId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        status: AppointmentStatus,
    ) -> AppointmentId {
        let mut data = self.data.write();
        let id = AppointmentId(data.next_appointment_id);
        data.next_appointment_id += 1;
        data.appointments.insert(
            id,
            Appointment {
                id,
                master_id,
                client_id,
                service_id,
                start_time,
                end_time,
                status,
                client_phone: None,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Set the health status for testing store failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData::default();
    }

    /// Number of stored appointments, any status.
    pub fn appointment_count(&self) -> usize {
        self.data.read().appointments.len()
    }

    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(
                RepositoryError::unavailable("store is not healthy").with_operation(operation)
            );
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_master(&self, master_id: MasterId) -> RepositoryResult<Master> {
        let data = self.data.read();
        data.masters
            .get(&master_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("master {} not found", master_id)))
    }

    async fn get_service(&self, service_id: ServiceId) -> RepositoryResult<Service> {
        let data = self.data.read();
        data.services
            .get(&service_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("service {} not found", service_id)))
    }

    async fn services_for(&self, master_id: MasterId) -> RepositoryResult<Vec<Service>> {
        let data = self.data.read();
        let mut services: Vec<Service> = data
            .services
            .values()
            .filter(|s| s.master_id == master_id && s.is_active)
            .cloned()
            .collect();
        services.sort_by_key(|s| s.id);
        Ok(services)
    }

    async fn rules_for(
        &self,
        master_id: MasterId,
        weekday: Weekday,
    ) -> RepositoryResult<Vec<RecurringRule>> {
        let data = self.data.read();
        Ok(data
            .rules
            .iter()
            .filter(|r| r.master_id == master_id && r.weekday == weekday)
            .cloned()
            .collect())
    }

    async fn overrides_for(
        &self,
        master_id: MasterId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<DateOverride>> {
        let data = self.data.read();
        Ok(data
            .overrides
            .iter()
            .filter(|o| o.master_id == master_id && o.date == date)
            .cloned()
            .collect())
    }

    async fn set_recurring_rule(&self, rule: RecurringRule) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data, "set_recurring_rule")?;
        // Upsert: one active rule per (master, weekday).
        data.rules
            .retain(|r| !(r.master_id == rule.master_id && r.weekday == rule.weekday));
        data.rules.push(rule);
        Ok(())
    }

    async fn clear_recurring_rule(
        &self,
        master_id: MasterId,
        weekday: Weekday,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        data.rules
            .retain(|r| !(r.master_id == master_id && r.weekday == weekday));
        Ok(())
    }

    async fn set_date_override(&self, date_override: DateOverride) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data, "set_date_override")?;
        // Upsert: one active override per (master, date).
        data.overrides.retain(|o| {
            !(o.master_id == date_override.master_id && o.date == date_override.date)
        });
        data.overrides.push(date_override);
        Ok(())
    }

    async fn clear_date_override(
        &self,
        master_id: MasterId,
        date: NaiveDate,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        data.overrides
            .retain(|o| !(o.master_id == master_id && o.date == date));
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for LocalRepository {
    async fn get_appointment(&self, id: AppointmentId) -> RepositoryResult<Appointment> {
        let data = self.data.read();
        data.appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("appointment {} not found", id)))
    }

    async fn appointments_in(
        &self,
        master_id: MasterId,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Appointment>> {
        let data = self.data.read();
        Self::check_health(&data, "appointments_in")?;
        let mut appointments: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| {
                a.master_id == master_id
                    && intervals_overlap(a.start_time, a.end_time, from, until)
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| (a.start_time, a.id));
        Ok(appointments)
    }

    async fn insert_appointment_if_free(
        &self,
        new: NewAppointment,
    ) -> RepositoryResult<Appointment> {
        // Write lock held across check and insert: this is the atomic unit
        // that closes the generation-to-confirm race.
        let mut data = self.data.write();
        Self::check_health(&data, "insert_appointment_if_free")?;

        if new.end_time <= new.start_time {
            return Err(RepositoryError::validation(
                "appointment end time must be after start time",
            )
            .with_operation("insert_appointment_if_free"));
        }
        if !data.masters.contains_key(&new.master_id) {
            return Err(
                RepositoryError::not_found(format!("master {} not found", new.master_id))
                    .with_operation("insert_appointment_if_free"),
            );
        }

        let existing: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| a.master_id == new.master_id)
            .cloned()
            .collect();
        if conflicts_with(&existing, new.start_time, new.end_time, None) {
            return Err(RepositoryError::conflict(
                new.master_id,
                new.start_time,
                new.end_time,
            ));
        }

        let id = AppointmentId(data.next_appointment_id);
        data.next_appointment_id += 1;
        let appointment = Appointment {
            id,
            master_id: new.master_id,
            client_id: new.client_id,
            service_id: new.service_id,
            start_time: new.start_time,
            end_time: new.end_time,
            status: AppointmentStatus::Confirmed,
            client_phone: new.client_phone,
            created_at: Utc::now(),
        };
        data.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<Appointment> {
        let mut data = self.data.write();
        Self::check_health(&data, "update_appointment_status")?;
        let appointment = data
            .appointments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(format!("appointment {} not found", id)))?;
        appointment.status = status;
        Ok(appointment.clone())
    }
}

#[async_trait]
impl NotificationRepository for LocalRepository {
    async fn enqueue_notification(&self, new: NewNotification) -> RepositoryResult<Notification> {
        let mut data = self.data.write();
        Self::check_health(&data, "enqueue_notification")?;
        let id = NotificationId(data.next_notification_id);
        data.next_notification_id += 1;
        let notification = Notification {
            id,
            appointment_id: new.appointment_id,
            kind: new.kind,
            scheduled_for: new.scheduled_for,
            is_sent: false,
            sent_at: None,
        };
        data.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    async fn due_notifications(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Notification>> {
        let data = self.data.read();
        let mut due: Vec<Notification> = data
            .notifications
            .values()
            .filter(|n| !n.is_sent && n.scheduled_for <= now)
            .cloned()
            .collect();
        due.sort_by_key(|n| (n.scheduled_for, n.id));
        Ok(due)
    }

    async fn mark_notification_sent(
        &self,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> RepositoryResult<Notification> {
        let mut data = self.data.write();
        let notification = data
            .notifications
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(format!("notification {} not found", id)))?;
        notification.is_sent = true;
        notification.sent_at = Some(at);
        Ok(notification.clone())
    }
}
