//! HTML body of the lead notification.

use leadrelay_core::{AppError, Lead};
use std::fmt::Write;

/// Plain-text fallback shown by clients that do not render HTML.
pub const PLAIN_TEXT_BODY: &str = "You got new lead";

fn labeled_fields(lead: &Lead) -> [(&'static str, &str); 7] {
    [
        ("Project type", lead.project_type.as_str()),
        ("Work type", lead.work_type.as_str()),
        ("When start", lead.when_start.as_str()),
        ("Fio", lead.fio.as_str()),
        ("Phone or skype", lead.phone_or_skype.as_str()),
        ("Email", lead.email.as_str()),
        ("Description", lead.description.as_str()),
    ]
}

/// Render one `<p>` per lead field. Values are escaped, labels are fixed.
pub fn render_lead_html(lead: &Lead) -> Result<String, AppError> {
    let mut html = String::with_capacity(512);
    html.push_str("<div>\n");
    for (label, value) in labeled_fields(lead) {
        writeln!(
            html,
            "<p><strong>{}:</strong> {}</p>",
            label,
            html_escape::encode_safe(value)
        )?;
    }
    html.push_str("</div>");
    Ok(html)
}
