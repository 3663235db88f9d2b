/// Project management module
///
/// The project aggregate (project, materials, steps, categories), its
/// transactional repository and the service facade callers go through.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::ProjectRepository;
pub use service::ProjectService;
pub use types::{
    Category, Hours, Material, Project, ProjectChanges, ProjectId, Step, ValidationError,
};
