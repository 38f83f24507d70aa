pub mod catalog;
pub mod entity;
pub mod form;
pub mod query;
pub mod tab;

pub use catalog::CatalogEntity;
pub use entity::{EntityDescriptor, EntityKind};
pub use form::{FormState, TabForm, TabFormData};
pub use query::{TabOrder, TabQuery};
pub use tab::{
    DeletedTab, LocalizedTab, NewTab, OwnerIds, TabChanges, TabRecord, TabTranslation,
};
