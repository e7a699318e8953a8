//! Email templates.
//!
//! Every template renders a plain-text body that links back into the
//! frontend.

use domain::{Complaint, ComplaintStatus, Tenant, User};

use crate::config::APP_DISPLAY_NAME;
use crate::infra::Email;

/// Renders the emails sent by the auth and complaint flows.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    frontend_url: String,
}

impl EmailTemplates {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn welcome(&self, user: &User) -> Email {
        Email::new(
            &user.email,
            format!("Welcome to {}", APP_DISPLAY_NAME),
            format!(
                "Hi {name},\n\n\
                 Thank you for joining {app}. Your account has been created.\n\
                 Role: {role}\n\n\
                 Log in at {url}/login to get started.\n\n\
                 Team {app}",
                name = user.name,
                app = APP_DISPLAY_NAME,
                role = user.role,
                url = self.frontend_url,
            ),
        )
    }

    pub fn verify_email(&self, user: &User, token: &str) -> Email {
        Email::new(
            &user.email,
            format!("Verify Your Email - {}", APP_DISPLAY_NAME),
            format!(
                "Hi {name},\n\n\
                 Please verify your email address:\n\
                 {url}/verify-email?token={token}\n\n\
                 This link will expire in 24 hours.\n\
                 If you didn't create an account, please ignore this email.",
                name = user.name,
                url = self.frontend_url,
                token = token,
            ),
        )
    }

    pub fn reset_password(&self, user: &User, token: &str) -> Email {
        Email::new(
            &user.email,
            format!("Reset Your Password - {}", APP_DISPLAY_NAME),
            format!(
                "Hi {name},\n\n\
                 You requested to reset your password:\n\
                 {url}/reset-password?token={token}\n\n\
                 This link will expire in 10 minutes.\n\
                 If you didn't request a password reset, please ignore this email.",
                name = user.name,
                url = self.frontend_url,
                token = token,
            ),
        )
    }

    pub fn complaint_update(&self, tenant: &Tenant, complaint: &Complaint) -> Email {
        let status = match complaint.status {
            ComplaintStatus::Open => "received",
            ComplaintStatus::InProgress => "being worked on",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        };
        let response = complaint
            .response
            .as_deref()
            .map(|r| format!("Response: {}\n", r))
            .unwrap_or_default();

        Email::new(
            &tenant.email,
            format!("Complaint Update - {}", APP_DISPLAY_NAME),
            format!(
                "Hi {name},\n\n\
                 Your complaint has been updated.\n\
                 Title: {title}\n\
                 Status: {status}\n\
                 {response}\n\
                 Details: {url}/tenant/complaints",
                name = tenant.full_name,
                title = complaint.title,
                status = status,
                response = response,
                url = self.frontend_url,
            ),
        )
    }
}
