use snafu::{Backtrace, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Invalid encryption key: {}", msg))]
    InvalidKey { msg: String },

    #[snafu(display("Unable to decode cipher data: {}", source))]
    Decode {
        source: base64::DecodeError,
        backtrace: Backtrace,
    },

    #[snafu(display("Unable to encrypt data"))]
    Encrypt,

    #[snafu(display("Unable to decrypt data"))]
    Decrypt,

    #[snafu(display("Decrypted data is not valid UTF-8"))]
    Utf8 {
        source: std::string::FromUtf8Error,
        backtrace: Backtrace,
    },
}
