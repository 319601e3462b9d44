//! Lead notification email: template, payload composition and delivery.

pub mod composer;
pub mod dispatcher;
pub mod template;

pub use composer::{Attachment, Content, EmailAddress, EmailComposer, EmailMessage, Personalization};
pub use dispatcher::{DeliveryReceipt, EmailSender, SendGridClient};
