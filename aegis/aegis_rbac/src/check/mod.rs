mod decision;
mod engine;

pub use decision::Decision;
pub use engine::PermissionChecker;
