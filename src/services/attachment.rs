//! File attachments. No parsing happens; the acknowledgement is templated.

use serde::{Deserialize, Serialize};

use crate::pipeline::types::{ResponsePayload, UserRole};

/// A file the user selected in the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Human-readable size, e.g. "2.4 KB".
    pub fn display_size(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        let bytes = self.size_bytes as f64;
        if bytes >= MB {
            format!("{:.1} MB", bytes / MB)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes / KB)
        } else {
            format!("{} B", self.size_bytes)
        }
    }

    /// The user-side message text shown when the file is attached.
    pub fn summary(&self) -> String {
        format!("📎 Uploaded file: {} ({})", self.file_name, self.display_size())
    }
}

/// Produces the assistant's reply to an attachment.
pub trait AttachmentAcknowledger: Send + Sync {
    fn acknowledge(&self, attachment: &Attachment, role: UserRole) -> ResponsePayload;
}

/// Static acknowledgement copy.
#[derive(Debug, Default, Clone)]
pub struct TemplateAcknowledger;

impl AttachmentAcknowledger for TemplateAcknowledger {
    fn acknowledge(&self, attachment: &Attachment, role: UserRole) -> ResponsePayload {
        let text = match role {
            UserRole::Jobseeker => format!(
                "Thanks for sharing \"{}\"! 📄 I've received your file. I'll review it for structure, keywords and impact, then suggest improvements to help you stand out.",
                attachment.file_name
            ),
            UserRole::Recruiter => format!(
                "Got it! I've received \"{}\". 📄 I'll summarize the candidate's key skills and experience so you can compare them against your open roles.",
                attachment.file_name
            ),
        };
        ResponsePayload::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_size_units() {
        assert_eq!(Attachment::new("a", 512).display_size(), "512 B");
        assert_eq!(Attachment::new("a", 2458).display_size(), "2.4 KB");
        assert_eq!(Attachment::new("a", 3 * 1024 * 1024).display_size(), "3.0 MB");
    }

    #[test]
    fn summary_names_file() {
        let summary = Attachment::new("resume.pdf", 2048).summary();
        assert!(summary.contains("resume.pdf"));
        assert!(summary.contains("2.0 KB"));
    }

    #[test]
    fn acknowledgement_is_text_naming_file() {
        let attachment = Attachment::new("cv.docx", 100).with_mime_type("application/msword");
        for role in [UserRole::Jobseeker, UserRole::Recruiter] {
            let payload = TemplateAcknowledger.acknowledge(&attachment, role);
            assert!(payload.as_card().is_none());
            assert!(payload.content().contains("cv.docx"));
        }
    }
}
