use serde::Deserialize;

/// Contact form body.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Appointment request form body.
#[derive(Debug, Deserialize)]
pub struct AppointmentForm {
    pub name: String,
    pub date: String,
    pub issue: String,
}
