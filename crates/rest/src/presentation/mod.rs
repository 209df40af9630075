//! Response shaping.
//!
//! - [`Presenter`] - renders a record for one resource
//! - [`FieldPicker`] - restricts and orders rendered attributes
//! - [`EmbedPicker`] - nests embedded relations

mod embed_picker;
mod field_picker;
mod presenter;

pub use embed_picker::EmbedPicker;
pub use field_picker::FieldPicker;
pub use presenter::Presenter;

/// Validated field and embed selections for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Requested fields in request order; empty means the build attributes.
    pub fields: Vec<String>,
    /// Relations to embed, in request order.
    pub embeds: Vec<String>,
}
