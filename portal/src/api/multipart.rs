use std::path::Path;

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// `multipart/form-data` body builder for the employee upload.
#[derive(Debug)]
pub struct Multipart {
    boundary: String,
    body: BytesMut,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(format!("----hr-portal-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: String) -> Self {
        Self {
            boundary,
            body: BytesMut::new(),
        }
    }

    /// Value of the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.open_part();
        self.body.put_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape(name)).as_bytes(),
        );
        self.body.put_slice(value.as_bytes());
        self.body.put_slice(b"\r\n");
        self
    }

    /// Appends a file part; the content type is guessed from the file name.
    pub fn file(&mut self, name: &str, path: &Path, contents: &[u8]) -> &mut Self {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        self.open_part();
        self.body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                escape(name),
                escape(&filename),
                mime.essence_str()
            )
            .as_bytes(),
        );
        self.body.put_slice(contents);
        self.body.put_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Bytes {
        self.body.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body.freeze()
    }

    fn open_part(&mut self) {
        self.body.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(value: &str) -> String {
    value.replace('"', "%22").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_and_file_parts() {
        let mut form = Multipart::with_boundary("XYZ".into());
        form.text("first_name", "Ada")
            .file("image", Path::new("/tmp/ada.png"), b"\x89PNG");
        let ct = form.content_type();
        let body = form.finish();
        let text = String::from_utf8_lossy(&body);

        assert_eq!(ct, "multipart/form-data; boundary=XYZ");
        assert!(text.starts_with("--XYZ\r\nContent-Disposition: form-data; name=\"first_name\"\r\n\r\nAda\r\n"));
        assert!(text.contains("name=\"image\"; filename=\"ada.png\"\r\nContent-Type: image/png\r\n\r\n"));
        assert!(text.ends_with("--XYZ--\r\n"));
    }

    #[test]
    fn quotes_in_names_cannot_break_the_header() {
        let mut form = Multipart::with_boundary("B".into());
        form.text("a\"b", "v");
        let body = form.finish();
        assert!(String::from_utf8_lossy(&body).contains("name=\"a%22b\""));
    }

    #[test]
    fn fresh_builders_use_distinct_boundaries() {
        assert_ne!(Multipart::new().content_type(), Multipart::new().content_type());
    }
}
