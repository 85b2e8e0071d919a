pub mod aggregate;
pub mod request;
pub mod response;

pub use aggregate::{AmenityTemplate, AmenityTemplateId, FieldSetError, DEFAULT_CATEGORY};
pub use request::{
    CommitRequest, CreateTemplateRequest, FieldEdits, ListTemplatesQuery, RenderRequest,
    UpdateTemplateRequest,
};
pub use response::{CategoryCount, UsageResponse};
