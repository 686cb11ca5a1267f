//! A host backed by an RFC 5322 `.eml` file.
//!
//! The file is parsed once; the item then lives in memory as a
//! [`MemoryItem`]. Writes never touch the source file. Callers that want to
//! keep the delivered body call [`EmlMailHost::save_body`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mailparse::{DispositionType, MailAddr, MailHeaderMap, ParsedMail};
use replypane_types::Mailbox;
use tracing::{debug, info};

use crate::error::{HostError, Result};
use crate::item::{MailHost, MailboxItem};
use crate::memory::MemoryItem;

/// Wrap width used when rendering an HTML-only body to text.
const HTML_RENDER_WIDTH: usize = 80;

/// Host exposing a single message loaded from disk.
#[derive(Debug)]
pub struct EmlMailHost {
    source: Option<PathBuf>,
    item: Arc<MemoryItem>,
}

impl EmlMailHost {
    /// Load `path`. The item is in compose mode when the file carries
    /// `X-Unsent: 1` or when `force_compose` is set.
    pub fn open(path: &Path, force_compose: bool) -> Result<Self> {
        let raw = std::fs::read(path)
            .map_err(|e| HostError::Load(format!("{}: {e}", path.display())))?;
        let mut host = Self::from_bytes(&raw, force_compose)?;
        host.source = Some(path.to_path_buf());
        info!(path = %path.display(), "loaded mailbox item");
        Ok(host)
    }

    /// Parse a raw message already in memory.
    pub fn from_bytes(raw: &[u8], force_compose: bool) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| HostError::Load(e.to_string()))?;
        let headers = parsed.get_headers();

        let subject = headers
            .get_first_value("Subject")
            .map(|s| s.trim().to_owned())
            .unwrap_or_default();
        let from = headers
            .get_first_header("From")
            .and_then(|h| mailparse::addrparse_header(h).ok())
            .and_then(|list| flatten_addrs(&list).into_iter().next());
        let to = headers
            .get_first_header("To")
            .and_then(|h| mailparse::addrparse_header(h).ok())
            .map(|list| flatten_addrs(&list))
            .unwrap_or_default();
        let created = headers
            .get_first_value("Date")
            .and_then(|value| mailparse::dateparse(&value).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        let unsent = headers
            .get_first_value("X-Unsent")
            .is_some_and(|v| v.trim() == "1");

        let mut parts = Parts::default();
        collect_parts(&parsed, &mut parts);
        let body = match (parts.plain, parts.html) {
            (Some(text), _) => text,
            (None, Some(html)) => html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH)
                .map_err(|e| HostError::Load(format!("rendering HTML body: {e}")))?,
            (None, None) => String::new(),
        };
        debug!(
            subject = %subject,
            attachments = parts.attachments.len(),
            compose = unsent || force_compose,
            "parsed message"
        );

        let mut item = MemoryItem::message(subject, body)
            .with_recipients(to)
            .with_attachments(parts.attachments);
        if let Some(from) = from {
            item = item.with_sender(from);
        }
        if let Some(created) = created {
            item = item.with_created(created);
        }
        if unsent || force_compose {
            item = item.in_compose_mode();
        }

        Ok(Self {
            source: None,
            item: Arc::new(item),
        })
    }

    /// Path the message was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn item(&self) -> Arc<MemoryItem> {
        Arc::clone(&self.item)
    }

    /// Current body text, including any delivered reply.
    pub fn body(&self) -> String {
        self.item.body()
    }

    /// Write the current body to `path` as plain text.
    pub fn save_body(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.item.body())
            .map_err(|e| HostError::Save(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "saved message body");
        Ok(())
    }
}

impl MailHost for EmlMailHost {
    fn current_item(&self) -> Option<Arc<dyn MailboxItem>> {
        Some(Arc::clone(&self.item) as Arc<dyn MailboxItem>)
    }
}

#[derive(Default)]
struct Parts {
    plain: Option<String>,
    html: Option<String>,
    attachments: Vec<String>,
}

fn collect_parts(part: &ParsedMail<'_>, out: &mut Parts) {
    let disposition = part.get_content_disposition();
    let filename = disposition
        .params
        .get("filename")
        .cloned()
        .or_else(|| part.ctype.params.get("name").cloned());

    if disposition.disposition == DispositionType::Attachment || filename.is_some() {
        out.attachments
            .push(filename.unwrap_or_else(|| format!("attachment-{}", out.attachments.len() + 1)));
        return;
    }

    if part.subparts.is_empty() {
        let mime = part.ctype.mimetype.to_ascii_lowercase();
        let slot = match mime.as_str() {
            "text/plain" => &mut out.plain,
            "text/html" => &mut out.html,
            _ => return,
        };
        if slot.is_none() {
            *slot = part.get_body().ok();
        }
        return;
    }

    for sub in &part.subparts {
        collect_parts(sub, out);
    }
}

fn flatten_addrs(list: &[MailAddr]) -> Vec<Mailbox> {
    list.iter()
        .flat_map(|addr| match addr {
            MailAddr::Single(info) => vec![info.clone()],
            MailAddr::Group(group) => group.addrs.clone(),
        })
        .map(|info| Mailbox::new(info.display_name.unwrap_or_default(), info.addr))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemMode, ItemType};

    const PLAIN: &str = "From: Ana Ruiz <ana@example.com>\r\n\
To: Bo Chen <bo@example.com>, ops@example.com\r\n\
Subject: Offsite agenda\r\n\
Date: Tue, 5 Mar 2024 09:15:00 +0000\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Can you confirm the room booking?\r\n";

    const MULTIPART: &str = "From: ana@example.com\r\n\
Subject: Invoice\r\n\
X-Unsent: 1\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>Please <b>pay</b> soon.</p>\r\n\
--XYZ\r\n\
Content-Type: application/pdf; name=\"invoice.pdf\"\r\n\
Content-Disposition: attachment; filename=\"invoice.pdf\"\r\n\
\r\n\
JVBERi0=\r\n\
--XYZ--\r\n";

    #[test]
    fn parses_plain_message() {
        let host = EmlMailHost::from_bytes(PLAIN.as_bytes(), false).unwrap();
        let item = host.item();
        assert_eq!(item.subject(), "Offsite agenda");
        assert_eq!(item.item_type(), ItemType::Message);
        assert_eq!(item.mode(), ItemMode::Read);
        assert_eq!(
            item.from(),
            Some(Mailbox::new("Ana Ruiz", "ana@example.com"))
        );
        assert_eq!(item.to().len(), 2);
        assert_eq!(item.to()[1].address, "ops@example.com");
        assert_eq!(
            item.date_time_created().map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-03-05T09:15:00+00:00")
        );
        assert!(host.body().contains("Can you confirm the room booking?"));
    }

    #[test]
    fn unsent_flag_means_compose_and_html_is_rendered() {
        let host = EmlMailHost::from_bytes(MULTIPART.as_bytes(), false).unwrap();
        let item = host.item();
        assert_eq!(item.mode(), ItemMode::Compose);
        assert_eq!(item.attachments(), vec!["invoice.pdf".to_string()]);
        let body = host.body();
        assert!(body.contains("pay"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn force_compose() {
        let host = EmlMailHost::from_bytes(PLAIN.as_bytes(), true).unwrap();
        assert!(host.item().is_composable());
    }

    #[test]
    fn open_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("msg.eml");
        std::fs::write(&src, PLAIN).unwrap();
        let host = EmlMailHost::open(&src, true).unwrap();
        assert_eq!(host.source(), Some(src.as_path()));

        let out = dir.path().join("reply.txt");
        host.save_body(&out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), host.body());
    }

    #[test]
    fn unwritable_save_path_is_a_save_error() {
        let host = EmlMailHost::from_bytes(PLAIN.as_bytes(), true).unwrap();
        let err = host
            .save_body(Path::new("/nonexistent/replypane/reply.txt"))
            .unwrap_err();
        assert!(matches!(err, HostError::Save(ref m) if m.contains("/nonexistent/replypane")));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = EmlMailHost::open(Path::new("/nonexistent/msg.eml"), false).unwrap_err();
        assert!(matches!(err, HostError::Load(_)));
    }
}
