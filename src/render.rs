//! HTML preview rendering of a single message
//!
//! Builds a self-contained HTML document for one message, writes it to the
//! configured render directory, and hands it to the system handler. Message
//! HTML is sanitized with `ammonia` before interpolation. Render failures
//! are reported to the user as warnings and never terminate the session.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::Message;

/// Render capability for displaying one message
///
/// Side-effecting by nature (writes a file, spawns the system opener).
/// Implemented by [`HtmlRenderer`] in production and by recording fakes in
/// tests.
pub trait Renderer {
    /// Render `message` in a human-viewable form
    ///
    /// # Errors
    ///
    /// Returns `Render` when the artifact cannot be produced. The caller
    /// reports this and continues; it is never fatal.
    fn render(&self, message: &Message) -> AppResult<()>;
}

/// Renderer that writes an HTML preview file and opens it in the browser
#[derive(Debug)]
pub struct HtmlRenderer {
    output_dir: PathBuf,
    open_browser: bool,
}

impl HtmlRenderer {
    /// Create a renderer writing previews under `output_dir`
    ///
    /// With `open_browser` disabled the preview file is written but not
    /// handed to the system opener, which suits headless environments.
    pub fn new(output_dir: impl Into<PathBuf>, open_browser: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            open_browser,
        }
    }

    fn preview_path(&self, message: &Message) -> PathBuf {
        self.output_dir.join(format!("email_{}.html", message.id))
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, message: &Message) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| AppError::Render(format!("cannot create render dir: {e}")))?;

        let path = self.preview_path(message);
        fs::write(&path, build_html(message))
            .map_err(|e| AppError::Render(format!("cannot write {}: {e}", path.display())))?;
        info!(id = %message.id, path = %path.display(), "wrote message preview");

        if self.open_browser {
            open_in_browser(&path)?;
        }
        Ok(())
    }
}

fn open_in_browser(path: &Path) -> AppResult<()> {
    open::that(path)
        .map_err(|e| AppError::Render(format!("cannot open {}: {e}", path.display())))
}

/// Build the full HTML document for one message
///
/// Uses the sanitized HTML body when present, otherwise the escaped plain
/// body inside `<pre>` to keep its original line breaks. The HTML body is
/// remote-controlled content, so it goes through `ammonia` before touching
/// the document; all header text is escaped before interpolation.
pub fn build_html(message: &Message) -> String {
    let body = if message.html_body.is_empty() {
        format!("<pre>{}</pre>", escape_html(&message.plain_body))
    } else {
        ammonia::clean(&message.html_body)
    };

    let mut doc = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Message preview</title>
<style>
body {{ font-family: sans-serif; margin: 20px; line-height: 1.6; background-color: #f4f4f9; color: #333; }}
.container {{ max-width: 800px; margin: auto; background: #fff; padding: 30px; border-radius: 8px; }}
h1 {{ color: #0056b3; border-bottom: 2px solid #eee; padding-bottom: 10px; }}
pre {{ background: #f0f0f0; padding: 15px; border-radius: 5px; white-space: pre-wrap; word-wrap: break-word; }}
.attachments {{ margin-top: 20px; border-top: 1px solid #eee; padding-top: 15px; }}
</style>
</head>
<body>
<div class="container">
<div class="header-info">
<p><strong>From:</strong> {sender}</p>
<p><strong>To:</strong> {recipient}</p>
<p><strong>Date:</strong> {timestamp}</p>
</div>
<h1>{subject}</h1>
<hr>
<div>{body}</div>
"#,
        sender = escape_html(&message.sender),
        recipient = escape_html(&message.recipient),
        timestamp = escape_html(&message.timestamp),
        subject = escape_html(&message.subject),
        body = body,
    );

    if !message.attachments.is_empty() {
        doc.push_str(&format!(
            "<div class=\"attachments\">\n<h3>Attachments ({})</h3>\n<ul>\n",
            message.attachments.len()
        ));
        for attachment in &message.attachments {
            doc.push_str(&format!(
                "<li>{} ({})</li>\n",
                escape_html(&attachment.filename),
                escape_html(&attachment.mime_type)
            ));
        }
        doc.push_str("</ul>\n</div>\n");
    }

    doc.push_str("</div>\n</body>\n</html>\n");
    doc
}

/// Minimal HTML entity escaping for interpolated text
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::{HtmlRenderer, Renderer, build_html, escape_html};
    use crate::models::{AttachmentRef, Message};

    fn message() -> Message {
        Message {
            id: "msg-1".to_owned(),
            subject: "Q1 <review>".to_owned(),
            sender: "alice@example.com".to_owned(),
            recipient: "bob@example.com".to_owned(),
            timestamp: "Mon, 2 Mar 2026 10:00:00 +0000".to_owned(),
            plain_body: "Numbers & notes attached.".to_owned(),
            html_body: String::new(),
            attachments: vec![AttachmentRef {
                filename: "q1.pdf".to_owned(),
                mime_type: "application/pdf".to_owned(),
                payload_ref: "ref-1".to_owned(),
            }],
        }
    }

    #[test]
    fn escape_html_neutralizes_markup_characters() {
        assert_eq!(escape_html("<a href=\"x\">&"), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }

    #[test]
    fn build_html_escapes_headers_and_wraps_plain_body() {
        let doc = build_html(&message());
        assert!(doc.contains("Q1 &lt;review&gt;"));
        assert!(doc.contains("<pre>Numbers &amp; notes attached.</pre>"));
        assert!(doc.contains("Attachments (1)"));
        assert!(doc.contains("q1.pdf (application/pdf)"));
    }

    #[test]
    fn build_html_prefers_html_body_when_present() {
        let mut msg = message();
        msg.html_body = "<p>rich</p>".to_owned();
        let doc = build_html(&msg);
        assert!(doc.contains("<p>rich</p>"));
        assert!(!doc.contains("<pre>"));
    }

    #[test]
    fn build_html_strips_script_from_html_body() {
        let mut msg = message();
        msg.html_body = "<p>hello</p><script>alert('pwned')</script>".to_owned();
        let doc = build_html(&msg);
        assert!(doc.contains("<p>hello</p>"));
        assert!(!doc.contains("<script>"));
        assert!(!doc.contains("alert('pwned')"));
    }

    #[test]
    fn build_html_strips_event_handlers_from_html_body() {
        let mut msg = message();
        msg.html_body = "<img src=\"x\" onerror=\"alert(1)\">".to_owned();
        let doc = build_html(&msg);
        assert!(!doc.contains("onerror"));
    }

    #[test]
    fn render_writes_preview_file() {
        let dir = env::temp_dir().join(format!("mail-cache-render-{}", std::process::id()));
        let renderer = HtmlRenderer::new(&dir, false);

        renderer.render(&message()).expect("render must succeed");
        let written = fs::read_to_string(dir.join("email_msg-1.html")).expect("preview file");
        assert!(written.contains("alice@example.com"));

        fs::remove_dir_all(&dir).ok();
    }
}
