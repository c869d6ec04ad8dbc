#[allow(unused_imports)]
use super::*;

pub(crate) struct ParsedField {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) ty: Type,
    pub(crate) exported: bool,
    /// `(key, value)` tag entries in declaration order.
    pub(crate) tags: Vec<(String, String)>,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "Record requires named fields"))?;
        let name = ident.to_string().trim_start_matches("r#").to_string();

        let mut tags = Vec::new();
        for attr in &field.attrs {
            if attr.path().is_ident("record") {
                Self::parse_field_attr(attr, &mut tags)?;
            }
        }

        Ok(Self {
            ident,
            name,
            ty: field.ty.clone(),
            exported: matches!(field.vis, Visibility::Public(_)),
            tags,
        })
    }

    fn parse_field_attr(attr: &Attribute, tags: &mut Vec<(String, String)>) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| meta.error("expected a tag key such as `db`"))?;

            if tags.iter().any(|(existing, _)| existing == &key) {
                return Err(meta.error(format!("tag `{key}` given more than once")));
            }

            if meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                tags.push((key, value.value()));
            } else if key == "inline" {
                tags.push((key, "true".to_string()));
            } else {
                return Err(meta.error(format!("tag `{key}` requires a value, e.g. `{key} = \"...\"`")));
            }
            Ok(())
        })
    }

    fn tag(&self, key: &str) -> &str {
        self.tags
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// A field the default resolver never matches, with or without legacy tags.
    ///
    /// The `db` name must be exactly `-` and a `field` override, if any, must be `-` too.
    pub(crate) fn is_skipped(&self) -> bool {
        let db_name = self.tag("db").split(',').next().unwrap_or("");
        let legacy = self.tag("field");
        db_name == "-" && (legacy.is_empty() || legacy == "-")
    }

    /// Whether any tag asks the resolver to descend into this field.
    pub(crate) fn is_inline(&self) -> bool {
        self.tags.iter().any(|(key, value)| {
            (key == "inline" && !value.is_empty())
                || value.split(',').skip(1).any(|option| option.trim() == "inline")
        })
    }

    /// Whether generated assignment code addresses this field at all.
    pub(crate) fn is_assignable(&self) -> bool {
        self.exported && !self.is_skipped()
    }

    pub(crate) fn descriptor_tokens(&self) -> TokenStream2 {
        let name = &self.name;
        let ty = &self.ty;
        let exported = self.exported;
        let tag_entries = self.tags.iter().map(|(key, value)| {
            quote! { .with(#key, #value) }
        });
        quote! {
            ::colmap::types::FieldDescriptor {
                name: #name.to_string(),
                exported: #exported,
                tag: ::colmap::tags::StructTag::new() #(#tag_entries)*,
                ty: <#ty as ::colmap::types::Described>::type_descriptor(),
            }
        }
    }

    pub(crate) fn assign_arms(&self, index: usize) -> TokenStream2 {
        if !self.is_assignable() {
            return quote! {};
        }

        let ident = &self.ident;
        let ty = &self.ty;
        let direct = quote! {
            [#index] => {
                self.#ident = <#ty as ::colmap::value::FromValue>::from_value(value).ok_or_else(|| {
                    ::colmap::errors::BindError::TypeMismatch {
                        column: ::std::string::String::new(),
                        expected: <#ty as ::colmap::value::FromValue>::TYPE_NAME,
                    }
                })?;
                ::std::result::Result::Ok(())
            }
        };

        if self.is_inline() {
            quote! {
                #direct
                [#index, rest @ ..] => <#ty as ::colmap::types::Record>::assign(&mut self.#ident, rest, value),
            }
        } else {
            direct
        }
    }
}
