//! Procedural macros for entity types
//!
//! This crate provides the `Entity` derive and the `#[model]` attribute, which generate
//! the `EntityType` and `Entity` implementations the unit of work and the soft delete
//! services work through.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod model_macro;
mod parsing;

use codegen::{generate_entity_impl, generate_entity_type_impl};
use model_macro::model_attribute;
use parsing::{parse_entity_attributes, parse_fields};

/// Derive macro for the `EntityType` and `Entity` traits
///
/// ```ignore
/// #[derive(Debug, Clone, Entity)]
/// #[entity(name = "employees", contracts("CascadeSoftDelete"))]
/// pub struct Employee {
///     #[key]
///     pub id: i64,
///     pub name: String,
///     pub manager_id: Option<i64>,
///     pub soft_delete_level: u8,
/// }
/// ```
///
/// Every field type must implement `serde::Serialize` and `serde::de::DeserializeOwned`,
/// key fields must implement `IntoKeyValue`.
#[proc_macro_derive(Entity, attributes(entity, key))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let entity_info = match parse_entity_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match parse_fields(&input.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let entity_type_impl = generate_entity_type_impl(name, &entity_info, &fields);
    let entity_impl = generate_entity_impl(name, &entity_info, &fields);

    let expanded = quote::quote! {
        #entity_type_impl
        #entity_impl
    };

    TokenStream::from(expanded)
}

/// Convenience attribute macro that adds the derives an entity needs
///
/// ```ignore
/// #[model]
/// #[entity(name = "contracts", contracts("CascadeSoftDelete"))]
/// pub struct Contract {
///     #[key]
///     pub id: i64,
///     pub employee_id: i64,
///     pub soft_delete_level: u8,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
