//! Random and default form data for StormX pages

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;

/// Issued-by name and comment text for hotel and room-transfer forms
pub fn random_name_and_email() -> (String, String) {
    (Name().fake(), SafeEmail().fake())
}

/// SSO user id: one lowercase letter followed by six digits
pub fn random_sso_user_id() -> String {
    let mut rng = rand::thread_rng();
    let letter = rng.gen_range(b'a'..=b'z') as char;
    let digits: String = (0..6).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("{}{}", letter, digits)
}

/// Password nobody has, for negative login checks
pub fn random_password() -> String {
    let mut rng = rand::thread_rng();
    let random_part: String = (0..12)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect();
    format!("wrong-{}", random_part)
}

/// Event time used when booking against hotel inventory
///
/// Before `cutoff_hour` the inventory still belongs to the previous day, so
/// the event is placed at 23:45 yesterday.
pub fn inventory_event_time(now: NaiveDateTime, cutoff_hour: u32) -> NaiveDateTime {
    if now.hour() < cutoff_hour {
        let yesterday = now.date() - Duration::days(1);
        yesterday.and_time(NaiveTime::from_hms_opt(23, 45, 0).unwrap_or_default())
    } else {
        now.date()
            .and_time(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default())
    }
}

/// Fields of the hotel availability block form
#[derive(Debug, Clone, PartialEq)]
pub struct HotelBlockFields {
    pub airline_client: String,
    pub pax_pay_block: u32,
    pub pax_pay_rate: String,
    pub issued_by: String,
    pub position: String,
    pub comments: String,
    pub date: String,
    pub room_type: String,
    pub airline_pay_block: u32,
    pub airline_pay_rate: String,
}

impl HotelBlockFields {
    /// Default blocks and rates, random issued-by and comments
    pub fn with_defaults(airline_client: &str, date: &str) -> Self {
        let (issued_by, comments) = random_name_and_email();
        Self {
            airline_client: airline_client.to_string(),
            pax_pay_block: 100,
            pax_pay_rate: "30.00".to_string(),
            issued_by,
            position: String::new(),
            comments,
            date: date.to_string(),
            room_type: String::new(),
            airline_pay_block: 25,
            airline_pay_rate: "170.00".to_string(),
        }
    }
}

/// Fields of the quick room transfer form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickRoomTransferForm {
    pub airline: String,
    pub port: String,
    pub room_need: String,
    pub direct_phone_number: String,
    pub phone_extension: String,
    pub comments: String,
    pub flight_number: String,
}

impl QuickRoomTransferForm {
    pub fn new(airline: &str, port: &str) -> Self {
        Self {
            airline: airline.to_string(),
            port: port.to_string(),
            room_need: "2".to_string(),
            direct_phone_number: "123456789654".to_string(),
            phone_extension: "152".to_string(),
            comments: "For the sake of practicing automation!".to_string(),
            flight_number: "AC123".to_string(),
        }
    }

    pub fn with_room_need(mut self, room_need: &str) -> Self {
        self.room_need = room_need.to_string();
        self
    }

    pub fn with_flight_number(mut self, flight_number: &str) -> Self {
        self.flight_number = flight_number.to_string();
        self
    }
}
