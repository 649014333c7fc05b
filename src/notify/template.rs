//! HTML bodies for outbound account emails.

/// Subject line for OTP verification emails.
pub const OTP_SUBJECT: &str = "Verify your email address";

/// Subject line for password-reset emails.
pub const RESET_SUBJECT: &str = "Reset your password";

/// Render the email-verification OTP message.
pub fn render_otp_email(
    owner_name: &str,
    otp: &str,
    validity_minutes: i64,
    support_email: &str,
) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Email Verification</h2>
  <p>Hi {owner_name},</p>
  <p>Use the code below to verify your email address:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{otp}</p>
  <p>This code expires in {validity_minutes} minutes. If you did not create an
  account, you can safely ignore this email.</p>
  <p>Need help? Contact <a href="mailto:{support_email}">{support_email}</a>.</p>
</body>
</html>"#
    )
}

/// Render the password-reset message.
pub fn render_reset_email(owner_name: &str, reset_link: &str, support_email: &str) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Password Reset</h2>
  <p>Hi {owner_name},</p>
  <p>We received a request to reset your password. Click the link below to
  choose a new one:</p>
  <p><a href="{reset_link}">{reset_link}</a></p>
  <p>The link expires in one hour. If you did not request a reset, no action
  is needed; your password is unchanged.</p>
  <p>Need help? Contact <a href="mailto:{support_email}">{support_email}</a>.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_email_contains_code() {
        let html = render_otp_email("Asha", "123456", 5, "support@x.com");
        assert!(html.contains("123456"));
        assert!(html.contains("Hi Asha"));
        assert!(html.contains("5 minutes"));
    }

    #[test]
    fn test_reset_email_contains_link() {
        let html = render_reset_email("Asha", "https://x.com/reset?token=abc", "support@x.com");
        assert!(html.contains("https://x.com/reset?token=abc"));
        assert!(html.contains("support@x.com"));
    }
}
