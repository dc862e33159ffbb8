#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout option {name}: {value}")]
    InvalidOption { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
