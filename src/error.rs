use crate::fixed::ParseFixedError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{option}: {source}")]
    Parse {
        option: &'static str,
        #[source]
        source: ParseFixedError,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub fn parse(option: &'static str) -> impl FnOnce(ParseFixedError) -> Self {
        move |source| Error::Parse { option, source }
    }
}
