use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid entity graph: {0}")]
    Graph(#[from] taskboard_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
