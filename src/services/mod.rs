//! Omada OpenAPI service implementations.
//!
//! Each service is a thin wrapper: it renders the path template for one
//! remote operation and hands the call to the shared [`RequestExecutor`].

mod clients;
mod devices;
mod sites;
mod threats;

pub use clients::ClientsService;
pub use devices::DevicesService;
pub use sites::SitesService;
pub use threats::ThreatsService;

use crate::client::RequestExecutor;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes one path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// `/openapi/v1/{omadacId}` followed by the encoded `segments`.
pub(crate) fn controller_path(executor: &RequestExecutor, segments: &[&str]) -> String {
    let mut path = format!(
        "/openapi/v1/{}",
        encode_segment(&executor.config().controller_id)
    );
    for segment in segments {
        path.push('/');
        path.push_str(&encode_segment(segment));
    }
    path
}
