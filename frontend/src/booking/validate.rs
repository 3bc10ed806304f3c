use once_cell::sync::Lazy;
use regex::Regex;

/// Something shaped like `local@domain.tld`. Deliberately loose.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    /// Document order; the first invalid field in this order gets focus.
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn input_id(self) -> &'static str {
        match self {
            Field::Name => "booking-name",
            Field::Email => "booking-email",
            Field::Message => "booking-message",
        }
    }

    pub fn error_id(self) -> &'static str {
        match self {
            Field::Name => "booking-name-error",
            Field::Email => "booking-email-error",
            Field::Message => "booking-message-error",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Checks every field and returns all problems in document order.
pub fn validate(fields: &BookingFields) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if fields.name.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Name,
            message: "Please enter your name.",
        });
    }

    let email = fields.email.trim();
    if email.is_empty() {
        errors.push(FieldError {
            field: Field::Email,
            message: "Please enter your email.",
        });
    } else if !is_email_shaped(email) {
        errors.push(FieldError {
            field: Field::Email,
            message: "Please enter a valid email address.",
        });
    }

    if fields.message.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Message,
            message: "Please enter your message.",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
