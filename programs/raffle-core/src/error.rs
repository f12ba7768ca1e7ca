use thiserror::Error;

pub type Result<T> = std::result::Result<T, RaffleError>;

/// Coarse classification the routing layer maps onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Storage,
}

#[derive(Debug, Error)]
pub enum RaffleError {
    #[error("Please enter name and password!")]
    MissingNameOrSecret,
    #[error("Name or password too long!")]
    NameOrSecretTooLong,
    #[error("Text of ticket too long!")]
    ContentTooLong,
    #[error("Participant identity too long")]
    OwnerTooLong,
    #[error("Raffle not found")]
    NotFound,
    #[error("Invalid password!")]
    InvalidPassword,
    #[error("Raffle store is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Raffle record could not be encoded or decoded")]
    Encoding(#[from] std::io::Error),
    #[error("Record exceeds maximum size of {max} bytes")]
    RecordTooLarge { max: usize },
    #[error("Raffle already exists")]
    DuplicateRaffle,
    #[error("Entropy source failed: {0}")]
    Entropy(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RaffleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RaffleError::MissingNameOrSecret
            | RaffleError::NameOrSecretTooLong
            | RaffleError::ContentTooLong
            | RaffleError::OwnerTooLong => ErrorKind::Validation,
            RaffleError::NotFound => ErrorKind::NotFound,
            RaffleError::InvalidPassword => ErrorKind::Unauthorized,
            RaffleError::StoreUnavailable(_)
            | RaffleError::Encoding(_)
            | RaffleError::RecordTooLarge { .. }
            | RaffleError::DuplicateRaffle
            | RaffleError::Entropy(_)
            | RaffleError::InvalidConfig(_) => ErrorKind::Storage,
        }
    }
}
