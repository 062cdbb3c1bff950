#![allow(missing_docs)]

pub(crate) mod alert;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod multipart;

pub(crate) use alert::get_alerts;
pub(crate) use form::{assert_hx_endpoint, must_get_element, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::assert_content_type;
pub(crate) use multipart::{
    UploadFile, multipart_body, must_make_multipart, must_make_multipart_from_body,
};
