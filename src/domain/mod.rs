//! Domain logic - pure release rules independent of version-control calls

pub mod branch;
pub mod message;
pub mod submodule;
pub mod tag;
pub mod version;

pub use branch::ReleaseBranch;
pub use message::MessageTemplate;
pub use submodule::{parse_gitmodules, SubmoduleEntry};
pub use tag::ReleaseTagPattern;
pub use version::VersionDescriptor;
