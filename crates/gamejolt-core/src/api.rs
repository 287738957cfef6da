use crate::error::Result;

/// HTTP status the service uses for every answered request.
pub const STATUS_OK: u16 = 200;

/// Status code and body of one executed request.
///
/// For any status other than 200 the body is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ResponseEnvelope {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: STATUS_OK,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Trait abstracting the network for testing.
///
/// `execute` performs a GET on a fully signed URL, handling any content
/// encoding itself. Ordinary HTTP error statuses are returned, not raised;
/// only I/O-level failures produce [`Error::Transport`](crate::Error::Transport).
pub trait Transport: Send + Sync {
    fn execute(&self, url: &str) -> Result<ResponseEnvelope>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, url: &str) -> Result<ResponseEnvelope> {
        (**self).execute(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, url: &str) -> Result<ResponseEnvelope> {
        (**self).execute(url)
    }
}
