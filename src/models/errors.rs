use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,
    #[error("Impossible to parse amount '{input}': expected at most one decimal separator")]
    TooManySeparators { input: String },
    #[error("Impossible to parse amount '{input}': not a number")]
    NotNumeric { input: String },
}

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Not a {expected} type")]
    UnexpectedMessage { expected: &'static str },
    #[error("error converting {field}: '{address}' is not a valid bech32 address")]
    InvalidAddress { field: &'static str, address: String },
    #[error("Error parsing amount: {0}")]
    Amount(#[from] AmountError),
}

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Transaction {hash} carries unreadable base64 payload: {source}")]
    Base64 {
        hash: String,
        #[source]
        source: base64::DecodeError,
    },
}

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("error getting response from server {status} {body}")]
    Status { status: u16, body: String },
    #[error("unable to decode result body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Error fetching {endpoint}: {message}")]
    Query { endpoint: &'static str, message: String },
    #[error("Response from {endpoint} carries no result")]
    MissingResult { endpoint: &'static str },
    #[error("Invalid {field} in response: {value}")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("cannot unmarshal payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("end height is zero")]
    EndHeightZero,
    #[error("Errors Getting Blocks: - {0}")]
    Blocks(String),
    #[error("Errors Searching Transactions: - {0}")]
    Search(String),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("stream {0} is closed")]
    StreamClosed(String),
}
