use serde::{Deserialize, Serialize};

/// A single sales inquiry submitted through the public web form.
///
/// Field names serialize with the same PascalCase names the form uses, so the
/// JSON echoed back to the client matches what it posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lead {
    pub project_type: String,
    pub work_type: String,
    pub when_start: String,
    /// Contact full name
    pub fio: String,
    pub phone_or_skype: String,
    pub email: String,
    pub description: String,
}

impl Lead {
    /// Form field names recognized when binding a submission.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "ProjectType",
        "WorkType",
        "WhenStart",
        "Fio",
        "PhoneOrSkype",
        "Email",
        "Description",
    ];

    /// Mutable slot for a form field name, or `None` when the name is not a lead field.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "ProjectType" => Some(&mut self.project_type),
            "WorkType" => Some(&mut self.work_type),
            "WhenStart" => Some(&mut self.when_start),
            "Fio" => Some(&mut self.fio),
            "PhoneOrSkype" => Some(&mut self.phone_or_skype),
            "Email" => Some(&mut self.email),
            "Description" => Some(&mut self.description),
            _ => None,
        }
    }

    /// Email subject announcing this lead.
    pub fn subject(&self) -> String {
        format!(
            "New Lead - {} / {} / {}",
            self.fio, self.email, self.phone_or_skype
        )
    }
}
