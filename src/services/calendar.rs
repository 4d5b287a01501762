use crate::models::Appointment;

const PRODID: &str = "-//Slotbook//Availability Engine//EN";

fn event_block(appointment: &Appointment, provider_name: &str) -> String {
    let dtstart = appointment
        .appointment_date
        .and_time(appointment.start_time)
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtend = appointment
        .appointment_date
        .and_time(appointment.end_time)
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = appointment.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@slotbook", appointment.id);

    let summary = format!("Appointment with {provider_name}");
    let description = appointment
        .service_description
        .as_deref()
        .unwrap_or("No service details");

    format!(
        "BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n"
    )
}

pub fn single_event_ics(appointment: &Appointment, provider_name: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:{PRODID}\r\n\
         {}END:VCALENDAR\r\n",
        event_block(appointment, provider_name)
    )
}

/// One VCALENDAR holding every appointment passed in, for provider
/// feed subscriptions.
pub fn feed_ics(appointments: &[Appointment], provider_name: &str) -> String {
    let mut ics = format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:{PRODID}\r\n"
    );
    for appointment in appointments {
        ics.push_str(&event_block(appointment, provider_name));
    }
    ics.push_str("END:VCALENDAR\r\n");
    ics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn appointment(id: &str, date: &str, start: &str, end: &str, description: Option<&str>) -> Appointment {
        Appointment {
            id: id.to_string(),
            customer_id: "cust-1".to_string(),
            provider_id: "prov-1".to_string(),
            appointment_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            status: AppointmentStatus::Scheduled,
            service_description: description.map(|s| s.to_string()),
            created_at: NaiveDateTime::parse_from_str("2025-06-10 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            updated_at: NaiveDateTime::parse_from_str("2025-06-10 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_single_event_ics() {
        let a = appointment("test-123", "2025-06-16", "14:00", "15:00", Some("Haircut"));
        let ics = single_event_ics(&a, "Bob's Barbershop");

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART:20250616T140000"));
        assert!(ics.contains("DTEND:20250616T150000"));
        assert!(ics.contains("SUMMARY:Appointment with Bob's Barbershop"));
        assert!(ics.contains("DESCRIPTION:Haircut"));
        assert!(ics.contains("UID:test-123@slotbook"));
        assert!(ics.contains("END:VEVENT"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn test_single_event_ics_no_description() {
        let a = appointment("test-456", "2025-06-17", "09:30", "10:00", None);
        let ics = single_event_ics(&a, "Test Biz");

        assert!(ics.contains("DTSTART:20250617T093000"));
        assert!(ics.contains("DESCRIPTION:No service details"));
    }

    #[test]
    fn test_feed_holds_every_appointment() {
        let appointments = vec![
            appointment("a-1", "2025-06-16", "09:00", "09:30", None),
            appointment("a-2", "2025-06-16", "09:30", "10:00", None),
        ];
        let ics = feed_ics(&appointments, "Test Biz");

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("UID:a-1@slotbook"));
        assert!(ics.contains("UID:a-2@slotbook"));
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }
}
