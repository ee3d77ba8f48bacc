use minefield_common::models::{ErrorBody, ErrorKind, Pos};
use rocket::{
    Request,
    http::Status,
    response::{self, Responder},
    serde::json::Json,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("tile {0} is out of bounds or no longer hidden")]
    InvalidMove(Pos),
    #[error("game {0} does not exist")]
    NotFound(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("{0}")]
    Internal(String),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidArgument(_) | GameError::InvalidMove(_) => ErrorKind::InvalidArgument,
            GameError::NotFound(_) => ErrorKind::NotFound,
            GameError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            GameError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> Status {
        match self.kind() {
            ErrorKind::InvalidArgument => Status::BadRequest,
            ErrorKind::NotFound => Status::NotFound,
            ErrorKind::PermissionDenied => Status::Forbidden,
            ErrorKind::Internal => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for GameError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = ErrorBody {
            code: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).respond_to(request)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
