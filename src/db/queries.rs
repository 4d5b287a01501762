use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentStatus, Provider, ScheduleRule, SlotMode};

// ── Providers ──

pub fn upsert_provider(conn: &Connection, provider: &Provider) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO providers (id, display_name, booking_limit_days)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
           display_name = excluded.display_name,
           booking_limit_days = excluded.booking_limit_days,
           updated_at = datetime('now')",
        params![provider.id, provider.display_name, provider.booking_limit_days],
    )?;
    Ok(())
}

pub fn get_provider(conn: &Connection, id: &str) -> anyhow::Result<Option<Provider>> {
    let result = conn.query_row(
        "SELECT id, display_name, booking_limit_days FROM providers WHERE id = ?1",
        params![id],
        |row| {
            Ok(Provider {
                id: row.get(0)?,
                display_name: row.get(1)?,
                booking_limit_days: row.get(2)?,
            })
        },
    );

    match result {
        Ok(provider) => Ok(Some(provider)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Schedule Rules ──

pub fn create_schedule_rule(conn: &Connection, rule: &ScheduleRule) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO schedule_rules (id, provider_id, day_of_week, start_time, end_time, slot_mode, slot_metric, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            rule.id,
            rule.provider_id,
            rule.day_of_week,
            rule.start_time.format("%H:%M").to_string(),
            rule.end_time.format("%H:%M").to_string(),
            rule.mode.as_str(),
            rule.mode.metric(),
            rule.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_schedule_rules(conn: &Connection, provider_id: &str) -> anyhow::Result<Vec<ScheduleRule>> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, day_of_week, start_time, end_time, slot_mode, slot_metric, created_at
         FROM schedule_rules WHERE provider_id = ?1
         ORDER BY day_of_week ASC, start_time ASC, end_time ASC",
    )?;

    let rows = stmt.query_map(params![provider_id], |row| Ok(parse_rule_row(row)))?;

    let mut rules = vec![];
    for row in rows {
        rules.push(row??);
    }
    Ok(rules)
}

pub fn delete_schedule_rule(conn: &Connection, provider_id: &str, rule_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM schedule_rules WHERE id = ?1 AND provider_id = ?2",
        params![rule_id, provider_id],
    )?;
    Ok(count > 0)
}

fn parse_rule_row(row: &rusqlite::Row) -> anyhow::Result<ScheduleRule> {
    let id: String = row.get(0)?;
    let provider_id: String = row.get(1)?;
    let day_of_week: u8 = row.get(2)?;
    let start_str: String = row.get(3)?;
    let end_str: String = row.get(4)?;
    let mode_str: String = row.get(5)?;
    let metric: u32 = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(ScheduleRule {
        id,
        provider_id,
        day_of_week,
        start_time: NaiveTime::parse_from_str(&start_str, "%H:%M")?,
        end_time: NaiveTime::parse_from_str(&end_str, "%H:%M")?,
        mode: SlotMode::parse(&mode_str, metric)?,
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    })
}

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appointment: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, customer_id, provider_id, appointment_date, start_time, end_time, status, service_description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appointment.id,
            appointment.customer_id,
            appointment.provider_id,
            appointment.appointment_date.format("%Y-%m-%d").to_string(),
            appointment.start_time.format("%H:%M").to_string(),
            appointment.end_time.format("%H:%M").to_string(),
            appointment.status.as_str(),
            appointment.service_description,
            appointment.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            appointment.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        "SELECT id, customer_id, provider_id, appointment_date, start_time, end_time, status, service_description, created_at, updated_at
         FROM appointments WHERE id = ?1",
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: &AppointmentStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

/// Scheduled appointments for a provider in an inclusive date range,
/// earliest first. Cancelled rows are kept in the table but never listed.
pub fn get_appointments_for_provider(
    conn: &Connection,
    provider_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, customer_id, provider_id, appointment_date, start_time, end_time, status, service_description, created_at, updated_at
         FROM appointments
         WHERE provider_id = ?1 AND appointment_date >= ?2 AND appointment_date <= ?3 AND status != 'cancelled'
         ORDER BY appointment_date ASC, start_time ASC",
    )?;

    let rows = stmt.query_map(
        params![
            provider_id,
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string(),
        ],
        |row| Ok(parse_appointment_row(row)),
    )?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn get_appointments_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, customer_id, provider_id, appointment_date, start_time, end_time, status, service_description, created_at, updated_at
         FROM appointments
         WHERE customer_id = ?1 AND status != 'cancelled'
         ORDER BY appointment_date ASC, start_time ASC",
    )?;

    let rows = stmt.query_map(params![customer_id], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let customer_id: String = row.get(1)?;
    let provider_id: String = row.get(2)?;
    let date_str: String = row.get(3)?;
    let start_str: String = row.get(4)?;
    let end_str: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let service_description: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Appointment {
        id,
        customer_id,
        provider_id,
        appointment_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
        start_time: NaiveTime::parse_from_str(&start_str, "%H:%M")?,
        end_time: NaiveTime::parse_from_str(&end_str, "%H:%M")?,
        status: AppointmentStatus::parse(&status_str),
        service_description,
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
        updated_at: NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
    })
}

// ── Booking Ledger ──

pub struct ScheduledCount {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub scheduled: i64,
}

/// Non-cancelled appointment counts for one provider/date, grouped by
/// window. The capacity a count is compared against comes from the
/// freshly generated windows, never from this table.
pub fn scheduled_counts(
    conn: &Connection,
    provider_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<ScheduledCount>> {
    let mut stmt = conn.prepare(
        "SELECT start_time, end_time, COUNT(*)
         FROM appointments
         WHERE provider_id = ?1 AND appointment_date = ?2 AND status != 'cancelled'
         GROUP BY start_time, end_time",
    )?;

    let rows = stmt.query_map(
        params![provider_id, date.format("%Y-%m-%d").to_string()],
        |row| {
            let start_str: String = row.get(0)?;
            let end_str: String = row.get(1)?;
            let scheduled: i64 = row.get(2)?;
            Ok((start_str, end_str, scheduled))
        },
    )?;

    let mut counts = vec![];
    for row in rows {
        let (start_str, end_str, scheduled) = row?;
        counts.push(ScheduledCount {
            start_time: NaiveTime::parse_from_str(&start_str, "%H:%M")?,
            end_time: NaiveTime::parse_from_str(&end_str, "%H:%M")?,
            scheduled,
        });
    }
    Ok(counts)
}

/// Admission-time recount for a single window.
pub fn count_scheduled(
    conn: &Connection,
    provider_id: &str,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE provider_id = ?1 AND appointment_date = ?2 AND start_time = ?3 AND end_time = ?4 AND status != 'cancelled'",
        params![
            provider_id,
            date.format("%Y-%m-%d").to_string(),
            start_time.format("%H:%M").to_string(),
            end_time.format("%H:%M").to_string(),
        ],
        |row| row.get(0),
    )?;
    Ok(count)
}
