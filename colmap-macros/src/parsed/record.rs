#[allow(unused_imports)]
use super::*;

pub(crate) struct ParsedRecord {
    name: Ident,
    fields: Vec<ParsedField>,
}

impl ParsedRecord {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new(
                input.generics.span(),
                "Record cannot be derived for generic structs; describe them by hand",
            ));
        }

        for attr in &input.attrs {
            if attr.path().is_ident("record") {
                return Err(Error::new(attr.span(), "#[record(...)] belongs on fields, not on the struct"));
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field)?);
                    }
                    parsed
                }
                _ => return Err(Error::new(input.ident.span(), "Record requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "Record can only be derived for structs")),
        };

        Ok(Self {
            name: input.ident.clone(),
            fields,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let name_lit = LitStr::new(&name.to_string(), name.span());
        let field_inits: Vec<_> = self.fields.iter().map(ParsedField::descriptor_tokens).collect();
        let assign_arms: Vec<_> = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| field.assign_arms(index))
            .collect();
        let descriptor_static_ident = format_ident!("__COLMAP_DESCRIPTOR_{}", name.to_string().to_uppercase());

        quote! {
            impl ::colmap::types::Described for #name {
                fn type_descriptor() -> ::colmap::types::TypeDescriptor {
                    ::colmap::types::TypeDescriptor::Record(::colmap::types::RecordRef::Static(
                        <#name as ::colmap::types::Record>::record_descriptor,
                    ))
                }
            }

            impl ::colmap::types::Record for #name {
                fn record_descriptor() -> &'static ::colmap::types::RecordDescriptor {
                    #[allow(non_upper_case_globals)]
                    static #descriptor_static_ident: ::std::sync::OnceLock<::colmap::types::RecordDescriptor> =
                        ::std::sync::OnceLock::new();
                    #descriptor_static_ident.get_or_init(|| ::colmap::types::RecordDescriptor {
                        name: #name_lit.to_string(),
                        fields: ::std::vec![#(#field_inits),*],
                    })
                }

                #[allow(unreachable_patterns, unused_variables)]
                fn assign(
                    &mut self,
                    path: &[usize],
                    value: ::colmap::value::Value,
                ) -> ::colmap::errors::BindResult<()> {
                    match path {
                        #(#assign_arms)*
                        _ => ::std::result::Result::Err(::colmap::errors::BindError::InvalidPath {
                            record: #name_lit,
                            path: path.to_vec(),
                        }),
                    }
                }
            }

            // Records are never stored whole; columns bind to their fields.
            impl ::colmap::value::FromValue for #name {
                const TYPE_NAME: &'static str = #name_lit;

                fn from_value(_value: ::colmap::value::Value) -> ::std::option::Option<Self> {
                    ::std::option::Option::None
                }
            }

            ::colmap::inventory::submit! {
                ::colmap::registry::RecordRegistration::new(
                    ::std::any::TypeId::of::<#name>,
                    #name_lit,
                    <#name as ::colmap::types::Record>::record_descriptor,
                )
            }
        }
    }
}
