mod directory;
mod memory;
mod model;
mod postgres;

pub use directory::{DirectoryError, UserDirectory};
pub use memory::MemoryDirectory;
pub use model::{NewUser, PublicProfile, User};
pub use postgres::PgDirectory;
