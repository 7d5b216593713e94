//! Inline HTML views for the demo UI.
//!
//! Three small pages: question form at `/`, upload form at `/upload`, and
//! the chat page at `/askQuestion` listing the ingested documents. All
//! user-supplied values are escaped before interpolation.

const STYLE: &str = "\
body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem;}\
textarea,input[type=text]{width:100%;box-sizing:border-box;}\
pre{white-space:pre-wrap;background:#f4f4f4;padding:1rem;}\
nav a{margin-right:1rem;}";

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>{title} - docuchat</title><style>{STYLE}</style></head>\
         <body><nav><a href=\"/\">Home</a><a href=\"/upload\">Upload PDF</a>\
         <a href=\"/askQuestion\">Ask a question</a></nav>\
         <h1>{title}</h1>{body}</body></html>"
    )
}

/// Landing page: a bare question form. Answers are rendered on the chat
/// page the form posts to.
pub fn index_page() -> String {
    let body = "<form method=\"post\" action=\"/askQuestion\">\
         <p><textarea name=\"question\" rows=\"3\" \
         placeholder=\"Ask something about your documents\"></textarea></p>\
         <p><button type=\"submit\">Ask</button></p></form>";
    page("docuchat", body)
}

/// Upload form, optionally showing the result message of the last attempt.
pub fn upload_page(message: Option<&str>) -> String {
    let mut body = String::from(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
         <p><input type=\"file\" name=\"pdfFile\" accept=\"application/pdf\"></p>\
         <p><button type=\"submit\">Upload</button></p></form>",
    );
    if let Some(message) = message {
        body.push_str(&format!("<p><strong>{}</strong></p>", escape_html(message)));
    }
    page("Upload PDF", &body)
}

/// Chat page: ingested document list, question form, optional answer.
pub fn chat_page(document_names: &[String], response: Option<&str>) -> String {
    let mut body = String::from("<h2>Indexed documents</h2>");
    if document_names.is_empty() {
        body.push_str("<p><em>No documents ingested yet.</em></p>");
    } else {
        body.push_str("<ul>");
        for name in document_names {
            body.push_str(&format!("<li>{}</li>", escape_html(name)));
        }
        body.push_str("</ul>");
    }

    body.push_str(
        "<form method=\"post\" action=\"/askQuestion\">\
         <p><textarea name=\"question\" rows=\"3\" \
         placeholder=\"Your question\"></textarea></p>\
         <p><button type=\"submit\">Ask</button></p></form>",
    );

    if let Some(response) = response {
        body.push_str(&format!("<h2>Answer</h2><pre>{}</pre>", escape_html(response)));
    }
    page("Ask a question", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html("<script>\"&'</script>"),
            "&lt;script&gt;&quot;&amp;&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn index_page_renders_question_form() {
        let html = index_page();
        assert!(html.contains("action=\"/askQuestion\""));
        assert!(html.contains("name=\"question\""));
        assert!(!html.contains("<h2>Answer</h2>"));
    }

    #[test]
    fn chat_page_lists_documents_and_answer() {
        let html = chat_page(
            &["manual.json".to_string()],
            Some("It is twelve <months>."),
        );
        assert!(html.contains("manual.json"));
        assert!(html.contains("It is twelve &lt;months&gt;."));
    }

    #[test]
    fn upload_page_shows_message() {
        let html = upload_page(Some("Please select a PDF file to upload."));
        assert!(html.contains("Please select a PDF file to upload."));
        assert!(html.contains("pdfFile"));
    }
}
