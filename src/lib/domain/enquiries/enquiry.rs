//! Enquiry payload and validation

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EnquiryValidationError::{self, *};

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// An enquiry as submitted by a customer, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryPayload {
    /// The customer's first name
    #[schema(example = "Jane")]
    pub first_name: Option<String>,

    /// The customer's email address
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,

    /// The customer's phone number, in any format
    #[schema(example = "555-1234567")]
    pub phone_number: Option<String>,

    /// The customer's city
    #[schema(example = "Delhi")]
    pub city: Option<String>,

    /// The kind of enquiry
    #[schema(example = "Freight")]
    pub inquiry_type: Option<String>,

    /// Legacy name for `inquiryType`, used when `inquiryType` is blank
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(deprecated)]
    pub inquiry: Option<String>,

    /// Free-form message
    #[schema(example = "Need a quote")]
    pub message: Option<String>,
}

/// A validated enquiry. Every field is trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enquiry {
    first_name: String,
    email: String,
    phone_number: String,
    city: String,
    inquiry_type: String,
    message: String,
}

impl Enquiry {
    /// The customer's first name
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The customer's email address
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The customer's phone number, as submitted
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// The customer's city
    pub fn city(&self) -> &str {
        &self.city
    }

    /// The kind of enquiry
    pub fn inquiry_type(&self) -> &str {
        &self.inquiry_type
    }

    /// The customer's message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validates an enquiry payload.
///
/// Rules are applied in a fixed order and the first failure is returned:
/// the payload must be present, all six fields must be non-blank, the email must
/// contain a single `@` that is neither the first nor the last character, and the
/// phone number must contain between 7 and 15 digits.
///
/// # Returns
/// - [`Ok`] with the validated [`Enquiry`].
/// - [`Err`] with the first [`EnquiryValidationError`] encountered.
pub fn validate(payload: Option<&EnquiryPayload>) -> Result<Enquiry, EnquiryValidationError> {
    let payload = payload.ok_or(MissingBody)?;

    let enquiry = Enquiry {
        first_name: required(&payload.first_name)?,
        email: required(&payload.email)?,
        phone_number: required(&payload.phone_number)?,
        city: required(&payload.city)?,
        inquiry_type: required(&payload.inquiry_type)
            .or_else(|_| required(&payload.inquiry))?,
        message: required(&payload.message)?,
    };

    if !is_valid_email(&enquiry.email) {
        return Err(InvalidEmail);
    }

    if !is_valid_phone_number(&enquiry.phone_number) {
        return Err(InvalidPhoneNumber);
    }

    Ok(enquiry)
}

// Values are trimmed before the format checks, so "x@ " is an invalid email and the
// notification carries the trimmed text.
fn required(field: &Option<String>) -> Result<String, EnquiryValidationError> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(MissingFields),
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.find('@') {
        Some(at) => at != 0 && at != email.len() - 1 && email.matches('@').count() == 1,
        None => false,
    }
}

fn is_valid_phone_number(phone_number: &str) -> bool {
    let digits = phone_number.chars().filter(char::is_ascii_digit).count();

    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

#[cfg(test)]
pub mod tests {
    use testresult::TestResult;

    use super::*;

    /// A payload that passes validation
    pub fn valid_payload() -> EnquiryPayload {
        EnquiryPayload {
            first_name: Some("Jane".to_string()),
            email: Some("jane@x.com".to_string()),
            phone_number: Some("555-1234567".to_string()),
            city: Some("Delhi".to_string()),
            inquiry_type: Some("Freight".to_string()),
            inquiry: None,
            message: Some("Need quote".to_string()),
        }
    }

    fn with_email(email: &str) -> EnquiryPayload {
        EnquiryPayload {
            email: Some(email.to_string()),
            ..valid_payload()
        }
    }

    fn with_phone(phone_number: &str) -> EnquiryPayload {
        EnquiryPayload {
            phone_number: Some(phone_number.to_string()),
            ..valid_payload()
        }
    }

    #[test]
    fn test_valid_enquiry() -> TestResult {
        let payload = EnquiryPayload {
            email: Some("a@b.com".to_string()),
            phone_number: Some("123-456-7890".to_string()),
            ..valid_payload()
        };

        let enquiry = validate(Some(&payload))?;

        assert_eq!(enquiry.first_name(), "Jane");
        assert_eq!(enquiry.email(), "a@b.com");
        assert_eq!(enquiry.phone_number(), "123-456-7890");
        assert_eq!(enquiry.city(), "Delhi");
        assert_eq!(enquiry.inquiry_type(), "Freight");
        assert_eq!(enquiry.message(), "Need quote");

        Ok(())
    }

    #[test]
    fn test_fields_are_trimmed() -> TestResult {
        let payload = EnquiryPayload {
            first_name: Some("  Jane \n".to_string()),
            ..valid_payload()
        };

        assert_eq!(validate(Some(&payload))?.first_name(), "Jane");

        Ok(())
    }

    #[test]
    fn test_missing_body() {
        assert_eq!(validate(None), Err(MissingBody));
    }

    #[test]
    fn test_each_missing_or_blank_field_is_rejected() {
        let blankers: [fn(&mut EnquiryPayload, Option<String>); 6] = [
            |p, v| p.first_name = v,
            |p, v| p.email = v,
            |p, v| p.phone_number = v,
            |p, v| p.city = v,
            |p, v| p.inquiry_type = v,
            |p, v| p.message = v,
        ];

        for blank in blankers {
            for value in [None, Some(String::new()), Some(" \t ".to_string())] {
                let mut payload = valid_payload();
                blank(&mut payload, value);

                assert_eq!(validate(Some(&payload)), Err(MissingFields));
            }
        }
    }

    #[test]
    fn test_missing_fields_are_reported_before_format_errors() {
        let payload = EnquiryPayload {
            email: Some("not an email".to_string()),
            city: None,
            ..valid_payload()
        };

        assert_eq!(validate(Some(&payload)), Err(MissingFields));
    }

    #[test]
    fn test_email_at_boundaries_is_invalid() {
        assert_eq!(validate(Some(&with_email("@x.com"))), Err(InvalidEmail));
        assert_eq!(validate(Some(&with_email("x@"))), Err(InvalidEmail));
    }

    #[test]
    fn test_email_without_at_symbol_is_invalid() {
        assert_eq!(validate(Some(&with_email("jane.x.com"))), Err(InvalidEmail));
    }

    #[test]
    fn test_email_with_two_at_symbols_is_invalid() {
        assert_eq!(validate(Some(&with_email("a@b@c.com"))), Err(InvalidEmail));
    }

    #[test]
    fn test_short_email_is_valid() {
        assert!(validate(Some(&with_email("a@b.co"))).is_ok());
    }

    #[test]
    fn test_email_is_checked_after_trimming() {
        assert_eq!(validate(Some(&with_email("jane@ "))), Err(InvalidEmail));
    }

    #[test]
    fn test_phone_digit_count_bounds() {
        assert_eq!(validate(Some(&with_phone("123-456"))), Err(InvalidPhoneNumber));
        assert_eq!(
            validate(Some(&with_phone("+12 3456 7890 123456"))),
            Err(InvalidPhoneNumber)
        );

        assert!(validate(Some(&with_phone("(123) 4567"))).is_ok());
        assert!(validate(Some(&with_phone("+123 456 789 012 345"))).is_ok());
    }

    #[test]
    fn test_phone_without_digits_is_invalid() {
        assert_eq!(
            validate(Some(&with_phone("call me maybe"))),
            Err(InvalidPhoneNumber)
        );
    }

    #[test]
    fn test_payload_accepts_legacy_inquiry_key() -> TestResult {
        let payload: EnquiryPayload = serde_json::from_str(
            r#"{"firstName":"Jane","email":"jane@x.com","phoneNumber":"5551234567","city":"Delhi","inquiry":"Freight","message":"Hi"}"#,
        )?;

        assert_eq!(validate(Some(&payload))?.inquiry_type(), "Freight");

        Ok(())
    }

    #[test]
    fn test_both_inquiry_keys_prefer_inquiry_type() -> TestResult {
        let payload: EnquiryPayload = serde_json::from_str(
            r#"{"firstName":"Jane","email":"jane@x.com","phoneNumber":"5551234567","city":"Delhi","inquiryType":"Freight","inquiry":"Storage","message":"Hi"}"#,
        )?;

        assert_eq!(validate(Some(&payload))?.inquiry_type(), "Freight");

        let payload = EnquiryPayload {
            inquiry_type: Some("  ".to_string()),
            inquiry: Some("Storage".to_string()),
            ..valid_payload()
        };

        assert_eq!(validate(Some(&payload))?.inquiry_type(), "Storage");

        Ok(())
    }

    #[test]
    fn test_null_fields_deserialize_as_missing() -> TestResult {
        let payload: EnquiryPayload = serde_json::from_str(r#"{"firstName":null}"#)?;

        assert_eq!(payload, EnquiryPayload::default());
        assert_eq!(validate(Some(&payload)), Err(MissingFields));

        Ok(())
    }
}
