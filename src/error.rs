use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_validation_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_storage_error(&self) -> bool {
        (2..=5).contains(&self.code)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        io_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        serialization_error(err)
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn invalid_config_error(message: impl Into<String>) -> Error {
    Error {
        code: 102,
        message: message.into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn storage_error() -> Error {
    Error {
        code: 2,
        message: "storage error".into(),
    }
}

pub fn serialization_error<T: Debug>(err: T) -> Error {
    Error {
        code: 3,
        message: format!("serialization error: {:?}", err),
    }
}

pub fn io_error(err: std::io::Error) -> Error {
    Error {
        code: 4,
        message: format!("io error: {}", err),
    }
}

pub fn quota_exceeded_error() -> Error {
    Error {
        code: 5,
        message: "storage quota exceeded".into(),
    }
}
