use axum::{
    extract::{FromRequest, Multipart},
    http::Request,
};

use crate::endpoints;

/// A file to include in a test multipart upload.
pub(crate) struct UploadFile<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub contents: &'a str,
}

impl<'a> UploadFile<'a> {
    pub fn csv(file_name: &'a str, contents: &'a str) -> Self {
        Self {
            file_name,
            content_type: "text/csv",
            contents,
        }
    }
}

const BOUNDARY: &str = "MY_BOUNDARY123456789";

/// The raw multipart form body for `files`, all under the field name `files`.
pub(crate) fn multipart_body(files: &[UploadFile<'_>]) -> String {
    let boundary_start = format!("--{BOUNDARY}");
    let boundary_end = format!("--{BOUNDARY}--");

    let mut lines: Vec<String> = Vec::new();

    for file in files {
        lines.push(boundary_start.clone());
        lines.push(format!(
            "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"",
            file.file_name
        ));
        lines.push(format!("Content-Type: {}", file.content_type));
        lines.push("".to_owned());
        lines.push(file.contents.to_owned());
    }

    lines.push(boundary_end);

    lines.join("\r\n")
}

pub(crate) async fn must_make_multipart(files: &[UploadFile<'_>]) -> Multipart {
    must_make_multipart_from_body(multipart_body(files)).await
}

/// Wrap a raw multipart body, which may be malformed, in a [Multipart] extractor.
pub(crate) async fn must_make_multipart_from_body(body: String) -> Multipart {
    let request = Request::builder()
        .method("POST")
        .uri(endpoints::UPLOAD)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body.into())
        .unwrap();

    Multipart::from_request(request, &{}).await.unwrap()
}
