//! Enquiry notification message

use crate::domain::enquiries::Enquiry;

use super::MailConfig;

/// A plain-text notification ready to be dispatched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The sender of the email
    pub from: String,

    /// The operational recipient of the email
    pub to: String,

    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub body: String,
}

impl OutboundMessage {
    /// Builds the notification for a validated enquiry.
    ///
    /// The sender and recipient come from `config`; the client never chooses the recipient.
    pub fn compose(enquiry: &Enquiry, config: &MailConfig) -> Self {
        let subject = format!(
            "New Enquiry from {} [{}]",
            enquiry.first_name(),
            enquiry.inquiry_type()
        );

        let body = format!(
            "You have received a new enquiry:\n\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             City: {}\n\
             Type: {}\n\n\
             Message:\n{}\n",
            enquiry.first_name(),
            enquiry.email(),
            enquiry.phone_number(),
            enquiry.city(),
            enquiry.inquiry_type(),
            enquiry.message(),
        );

        Self {
            from: config.sender().to_string(),
            to: config.to_address.clone(),
            subject,
            body,
        }
    }
}
