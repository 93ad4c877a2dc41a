// HTTP client for the CharacterWorks endpoint
//
// Sends commands (singly or batched) with a bounded timeout, then parses
// and optionally validates the JSON the device sends back.

mod device_client;
mod error;
mod transport;

pub use device_client::{
    parse_response, parse_response_with_schema, read_success_text, CharacterWorksClient, Validation,
    REQUEST_TIMEOUT,
};
pub use error::{BoxError, ClientError, Result};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, ResponseBody};
