use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("invalid input")]
    Input,
    #[display("could not open the metadata cache")]
    Cache,
    #[display("could not resolve releases")]
    Resolve,
    #[display("no override file configured; pass --file or set `overrides`")]
    NoOverrideFile,
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Process exit code for a failure of this kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config | Self::Input | Self::NoOverrideFile => 2,
            Self::Cache | Self::Resolve | Self::Output => 1,
        }
    }
}
