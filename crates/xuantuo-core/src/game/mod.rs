pub mod error;
pub mod kou_le;
pub mod serialization;
pub mod session;
