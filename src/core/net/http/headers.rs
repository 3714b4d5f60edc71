use core::fmt::Write;

use bin_monitor_core::api::Method;
use embassy_net::tcp::{Error as TcpError, TcpSocket};

pub(crate) type StatusCode = u16;

fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug)]
pub(crate) enum ContentType {
    Json,
    TextHtml,
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TextHtml => "text/html",
        }
    }
}

/// Text Encoding.
#[derive(Debug)]
pub(crate) enum TextEncoding {
    Utf8,
}

impl TextEncoding {
    fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug)]
enum ConnectionPolicy {
    Close,
}

impl ConnectionPolicy {
    fn as_str(&self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
        }
    }
}

pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
pub(crate) struct ContentHeaders {
    content_type: ContentType,
    content_length: Option<usize>,
    text_encoding: Option<TextEncoding>,
}

impl ContentHeaders {
    pub(crate) const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
            text_encoding: None,
        }
    }

    #[must_use]
    pub(crate) const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    #[must_use]
    pub(crate) const fn with_text_encoding(
        mut self,
        text_encoding: TextEncoding,
    ) -> Self {
        self.text_encoding = Some(text_encoding);
        self
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}", self.content_type.as_str())?;
        if let Some(text_encoding) = &self.text_encoding {
            write!(writer, "; charset={}", text_encoding.as_str())?;
        }
        write!(writer, "\r\n")?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        Ok(())
    }
}

/// Response Headers.
pub(crate) struct ResponseHeaders {
    status: StatusCode,
    connection: ConnectionPolicy,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    pub(crate) const fn from_code(code: StatusCode) -> Self {
        Self {
            status: code,
            content: None,
            connection: ConnectionPolicy::Close,
        }
    }

    pub(crate) const fn success() -> Self {
        Self::from_code(200)
    }

    pub(crate) const fn success_no_content() -> Self {
        Self::from_code(204)
    }

    pub(crate) const fn bad_request() -> Self {
        Self::from_code(400)
    }

    pub(crate) const fn not_found() -> Self {
        Self::from_code(404)
    }

    pub(crate) const fn unavailable() -> Self {
        Self::from_code(503)
    }

    #[must_use]
    pub(crate) const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }
}

impl TargetWriter for ResponseHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason)?;
        if let Some(content) = &self.content {
            content.write_to(writer)?;
        }

        write!(writer, "Connection: {}\r\n", self.connection.as_str())?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

/// Parse the request line from the header string.
///
/// Returns the method, path, and rest of the header block.
pub(super) fn parse_request_line(header_str: &str) -> Option<(Method, &str, &str)> {
    let line_end = header_str.find("\r\n").unwrap_or(header_str.len());
    let first_line = &header_str[..line_end];
    let mut parts = first_line.split_whitespace();
    let method = parts.next().and_then(Method::parse)?;
    let path = parts.next()?;

    Some((method, path, header_str.get(line_end + 2..).unwrap_or("")))
}

/// Read the start line and headers from the socket.
///
/// Returns the position of the end of the headers and the length read so far.
pub(super) async fn read_heading(
    buf: &mut [u8],
    socket: &mut TcpSocket<'_>,
) -> Result<(usize, usize), TcpError> {
    let mut header_len = 0;
    let mut header_end = None;
    loop {
        let n = socket.read(&mut buf[header_len..]).await?;
        if n == 0 {
            return Ok((0, 0));
        }
        header_len += n;
        // Check for end of headers
        if let Some(pos) = buf[..header_len].windows(4).position(|w| w == b"\r\n\r\n")
        {
            header_end = Some(pos + 4);
            break;
        }
        if header_len >= buf.len() {
            break;
        }
    }

    let header_end = header_end.unwrap_or(header_len);

    Ok((header_end, header_len))
}

/// Find a header value by its lower-cased name (colon included in `target`).
fn find_header<'a>(headers: &'a str, target: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (name, value) = line.split_at_checked(target.len())?;
        if name.eq_ignore_ascii_case(target) {
            Some(value.trim())
        } else {
            None
        }
    })
}

/// Find the content length in the header block.
pub(super) fn find_content_length(headers: &str) -> Option<u32> {
    find_header(headers, "content-length:")?.parse().ok()
}

/// Find the Host header. Clients probing for a captive portal send arbitrary
/// hosts; the portal page echoes it back.
pub(super) fn find_host(headers: &str) -> Option<&str> {
    find_header(headers, "host:")
}
