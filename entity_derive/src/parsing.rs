//! Parsing utilities for entity and field attributes
//!
//! This module handles `#[entity(...)]` and `#[key]` and validates entity and field names
//! with the same rules the model builder applies at runtime.

use proc_macro2::Span;
use syn::parse::Parse;
use syn::{Attribute, Data, Error, Fields, Ident, LitStr, Result, Token, Type};

pub struct EntityInfo {
    pub name: String,
    pub contracts: Vec<String>,
}

pub struct FieldInfo {
    pub ident: Ident,
    pub ty: Type,
    pub is_key: bool,
}

impl FieldInfo {
    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

/// Validation logic that mirrors store_object::validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "ON", "AS", "AND",
        "OR", "NOT", "NULL", "TRUE", "FALSE", "CASE", "WHEN", "THEN", "ELSE", "END", "EXISTS",
        "IN", "LIKE", "BETWEEN", "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION",
        "ALL", "DISTINCT", "CREATE", "DROP", "ALTER", "TABLE", "PRIMARY", "FOREIGN",
        "REFERENCES", "UNIQUE", "CHECK", "DEFAULT", "CONSTRAINT", "RETURNING",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

pub fn validate_entity_name_syn(name: &str, span: Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid entity name '{}': {}", name, e)))
}

pub fn validate_field_name_syn(name: &str, span: Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid field name '{}': {}", name, e)))
}

pub fn parse_entity_attributes(attrs: &[Attribute]) -> Result<EntityInfo> {
    let mut name: Option<LitStr> = None;
    let mut contracts = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("contracts") {
                let content;
                syn::parenthesized!(content in meta.input);
                let list = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                for contract in list {
                    validate_entity_name_syn(&contract.value(), contract.span())?;
                    contracts.push(contract.value());
                }
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `name` or `contracts`"))
            }
        })?;
    }

    let name = name.ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "entity attribute is required: add #[entity(name = \"type_name\")] to your struct",
        )
    })?;
    validate_entity_name_syn(&name.value(), name.span())?;

    Ok(EntityInfo {
        name: name.value(),
        contracts,
    })
}

pub fn parse_fields(data: &Data) -> Result<Vec<FieldInfo>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        validate_field_name_syn(&ident.to_string(), ident.span())?;

        fields.push(FieldInfo {
            is_key: has_attribute(&field.attrs, "key"),
            ident,
            ty: field.ty.clone(),
        });
    }

    Ok(fields)
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
