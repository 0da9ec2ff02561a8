use common::misc::{format_en_in, format_inr, non_negative};
use serde_json::Value;

use crate::dtos::email::{EmailKind, RenderedEmail};

fn number(data: &Value, key: &str) -> f64 {
    let value = data.get(key).and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
    });
    non_negative(value)
}

fn text(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => escape_html(s.trim()),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(heading: &str, accent: &str, greeting: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background:#f4f7f5;font-family:Arial,Helvetica,sans-serif;color:#1f2933;">
    <table role="presentation" width="100%" cellpadding="0" cellspacing="0">
      <tr><td align="center" style="padding:32px 16px;">
        <table role="presentation" width="600" cellpadding="0" cellspacing="0" style="background:#ffffff;border-radius:12px;overflow:hidden;">
          <tr><td style="background:{accent};padding:24px 32px;color:#ffffff;">
            <h1 style="margin:0;font-size:22px;">{heading}</h1>
          </td></tr>
          <tr><td style="padding:32px;font-size:15px;line-height:1.6;">
            <p style="margin-top:0;">Hi {greeting},</p>
            {body}
            <p style="margin-bottom:0;">Team EcoFin</p>
          </td></tr>
          <tr><td style="padding:16px 32px;background:#f4f7f5;font-size:12px;color:#6b7280;">
            GST invoices to carbon credits. You receive this email because you have an EcoFin account.
          </td></tr>
        </table>
      </td></tr>
    </table>
  </body>
</html>"#
    )
}

/// Renders the fixed template of a notification type.
///
/// Missing numbers render as 0 and missing strings as `N/A`; string
/// fields are HTML-escaped.
pub fn render(kind: EmailKind, recipient_name: Option<&str>, data: &Value) -> RenderedEmail {
    let greeting = recipient_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "there".to_string());

    match kind {
        EmailKind::CreditEarned => {
            let credits = format_en_in(number(data, "credits"));
            let value = format_inr(number(data, "value"));
            RenderedEmail {
                subject: format!("You earned {credits} carbon credits"),
                html: layout(
                    "New carbon credits verified",
                    "#15803d",
                    &greeting,
                    &format!(
                        "<p>Your GST invoice has been verified and <strong>{credits} carbon credits</strong> \
                         worth <strong>{value}</strong> were added to your account.</p>\
                         <p>Credits raise your green loan limit and can be redeemed from your dashboard.</p>"
                    ),
                ),
            }
        }
        EmailKind::RedemptionCompleted => {
            let credits = format_en_in(number(data, "credit_amount"));
            let value = format_inr(number(data, "monetary_value"));
            let transaction_id = text(data, "transaction_id");
            RenderedEmail {
                subject: "Your credit redemption is complete".to_string(),
                html: layout(
                    "Redemption completed",
                    "#0f766e",
                    &greeting,
                    &format!(
                        "<p>Your redemption of <strong>{credits} credits</strong> for \
                         <strong>{value}</strong> has been processed.</p>\
                         <p>Transaction ID: <code>{transaction_id}</code></p>"
                    ),
                ),
            }
        }
        EmailKind::LoanApproved => {
            let amount = format_inr(number(data, "amount"));
            let rate = number(data, "interest_rate");
            let tenure = number(data, "tenure_months");
            RenderedEmail {
                subject: "Your green loan has been approved".to_string(),
                html: layout(
                    "Loan approved",
                    "#1d4ed8",
                    &greeting,
                    &format!(
                        "<p>Good news: your green loan of <strong>{amount}</strong> has been approved \
                         at <strong>{rate}% p.a.</strong> for <strong>{tenure} months</strong>.</p>\
                         <p>Our team will contact you to complete disbursement.</p>"
                    ),
                ),
            }
        }
        EmailKind::LoanRejected => {
            let reason = text(data, "reason");
            RenderedEmail {
                subject: "Update on your loan application".to_string(),
                html: layout(
                    "Loan application update",
                    "#b45309",
                    &greeting,
                    &format!(
                        "<p>We could not approve your loan application this time.</p>\
                         <p>Reason: {reason}</p>\
                         <p>Earning more verified credits and improving your ESG score raise your eligibility.</p>"
                    ),
                ),
            }
        }
    }
}
