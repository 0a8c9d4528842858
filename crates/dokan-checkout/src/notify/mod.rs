//! Order confirmation delivery.

pub mod email;
pub mod template;

pub use email::{
    EmailNotifier, EmailProvider, HttpApiConfig, HttpApiProvider, MockEmailProvider, SmtpConfig,
    SmtpProvider,
};
pub use template::{order_confirmation, EmailMessage};
