//! Code generation for the `Entity` derive

use crate::parsing::{EntityInfo, FieldInfo};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

pub fn generate_entity_type_impl(name: &Ident, info: &EntityInfo, fields: &[FieldInfo]) -> TokenStream {
    let type_name = &info.name;
    let contracts = &info.contracts;
    let key_fields: Vec<TokenStream> = fields
        .iter()
        .filter(|field| field.is_key)
        .map(|field| {
            let field_name = field.name();
            let ty = &field.ty;
            quote! {
                ::softhaus::store_object::KeyField::new(
                    #field_name,
                    <#ty as ::softhaus::store_object::IntoKeyValue>::KIND,
                )
            }
        })
        .collect();

    quote! {
        impl ::softhaus::store_object::EntityType for #name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn key_fields() -> ::std::vec::Vec<::softhaus::store_object::KeyField> {
                ::std::vec![#(#key_fields),*]
            }

            fn type_contracts() -> &'static [&'static str] {
                &[#(#contracts),*]
            }
        }
    }
}

pub fn generate_entity_impl(name: &Ident, info: &EntityInfo, fields: &[FieldInfo]) -> TokenStream {
    let type_name = &info.name;

    let key_idents: Vec<&Ident> = fields
        .iter()
        .filter(|field| field.is_key)
        .map(|field| &field.ident)
        .collect();
    let key_names: Vec<String> = fields
        .iter()
        .filter(|field| field.is_key)
        .map(FieldInfo::name)
        .collect();

    let read_arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let field_name = field.name();
        quote! {
            #field_name => ::softhaus::store_object::serde_json::to_value(&self.#ident).ok(),
        }
    });

    let write_arms = fields.iter().filter(|field| !field.is_key).map(|field| {
        let ident = &field.ident;
        let field_name = field.name();
        quote! {
            #field_name => {
                self.#ident = ::softhaus::store_object::serde_json::from_value(value).map_err(|e| {
                    ::softhaus::store_object::StoreError::serialization(#type_name, name, e)
                })?;
                ::std::result::Result::Ok(())
            }
        }
    });

    quote! {
        impl ::softhaus::store_object::Entity for #name {
            fn entity_type(&self) -> &'static str {
                #type_name
            }

            fn key(&self) -> ::softhaus::store_object::EntityKey {
                ::softhaus::store_object::EntityKey::new(::std::vec![
                    #(::softhaus::store_object::IntoKeyValue::key_value(&self.#key_idents)),*
                ])
            }

            fn contracts(&self) -> &'static [&'static str] {
                <Self as ::softhaus::store_object::EntityType>::type_contracts()
            }

            fn field(&self, name: &str) -> ::std::option::Option<::softhaus::store_object::serde_json::Value> {
                match name {
                    #(#read_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: ::softhaus::store_object::serde_json::Value,
            ) -> ::std::result::Result<(), ::softhaus::store_object::StoreError> {
                match name {
                    #(#key_names => ::std::result::Result::Err(
                        ::softhaus::store_object::StoreError::read_only_field(#type_name, name)
                    ),)*
                    #(#write_arms)*
                    _ => ::std::result::Result::Err(
                        ::softhaus::store_object::StoreError::unknown_field(#type_name, name)
                    ),
                }
            }

            fn clone_entity(&self) -> ::std::boxed::Box<dyn ::softhaus::store_object::Entity> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    }
}
