use moja_api::BaseAddress;
use serde::Serialize;

/// A started live stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSession {
    /// Absolute playlist URL: `base` followed by the playlist path the
    /// device returned.
    pub url: String,
    /// The origin the start call went through.
    pub base: BaseAddress,
}
