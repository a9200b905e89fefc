// moja-api: Async client plumbing for moja devices (recorder, relay, device-local)

pub mod auth;
pub mod error;
pub mod probe;
pub mod recorder;
pub mod relay;
pub mod request;
pub mod router;
pub mod transport;

pub use auth::{Identity, Role, StaticToken};
pub use error::Error;
pub use probe::{DEFAULT_PROBE_TIMEOUT, ReachabilityProbe};
pub use recorder::RecorderClient;
pub use relay::RelayClient;
pub use request::{RawResponse, RequestClient, RequestOptions};
pub use router::{BaseAddress, ConnectivityRouter, Route, RouteConfig, Routed, UpstreamVariant};
pub use transport::{TlsMode, TransportConfig};
