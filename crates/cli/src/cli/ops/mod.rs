pub mod add;
pub mod delete;
pub mod init;
pub mod list;
pub mod types;
pub mod verify;
pub mod version;

pub use add::Add;
pub use delete::Delete;
pub use init::Init;
pub use list::List;
pub use types::Types;
pub use verify::Verify;
pub use version::Version;
