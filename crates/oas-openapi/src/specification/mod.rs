//! OpenAPI 3.1 entity declarations.
//!
//! Every object of the OpenAPI model is an [`oas_spec::EntityType`] declared
//! in a lazy static. Attributes are declared in the order their keys appear
//! in rendered documents.

pub mod components;
pub mod info;
pub mod operation;
pub mod reference;
pub mod schema;

pub use components::{COMPONENTS, OAUTH_FLOW, OAUTH_FLOWS, OPENAPI, SECURITY_SCHEME};
pub use info::{CONTACT, EXTERNAL_DOCS, INFO, LICENSE, SERVER, SERVER_VARIABLE, TAG};
pub use operation::{
    HEADER, LINK, LOCATIONS, MEDIA_TYPE, METHODS, OPERATION, PARAMETER, PATH_ITEM, REQUEST_BODY,
    RESPONSE,
};
pub use reference::{
    HEADER_REFERENCE, LINK_REFERENCE, PARAMETER_REFERENCE, REQUEST_BODY_REFERENCE,
    RESPONSE_REFERENCE,
};
pub use schema::SCHEMA;
