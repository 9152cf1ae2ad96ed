use crate::config::FieldCase;
use crate::parser::ParsedFile;
use crate::warnings::Warnings;
use log::debug;
use std::collections::BTreeMap;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;

/// Type information extracted from a field's declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Last path segment of the type (`Vec`, `String`, `User`, ...)
    pub name: String,
    /// Type arguments, in declaration order
    pub generic_args: Vec<TypeInfo>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, generic_args: Vec<TypeInfo>) -> Self {
        Self {
            name: name.into(),
            generic_args,
        }
    }

    /// `Option<T>`
    pub fn option(inner: TypeInfo) -> Self {
        Self::generic("Option", vec![inner])
    }

    /// `Vec<T>`; also used for slices and arrays
    pub fn vec(inner: TypeInfo) -> Self {
        Self::generic("Vec", vec![inner])
    }

    pub fn is_option(&self) -> bool {
        self.name == "Option"
    }
}

/// Serde attributes for a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Whether the field is left out of serialization
    pub skip: bool,
}

/// Field of a struct declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier as declared
    pub name: String,
    pub type_info: TypeInfo,
    /// Whether the field carries a `pub` visibility
    pub exported: bool,
    pub serde_attrs: SerdeAttributes,
}

/// Declared shape of a struct, used to derive a schema without any runtime reflection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Struct-level `#[serde(rename_all = "...")]`, when it maps to a known convention
    pub rename_all: Option<FieldCase>,
}

/// Index of the named-field structs declared across all parsed files.
pub struct TypeResolver {
    structs: BTreeMap<String, StructDescriptor>,
}

impl TypeResolver {
    /// Collects every named-field struct. When a name is declared more than once, the first
    /// declaration (in file order) is kept.
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());

        let mut structs = BTreeMap::new();
        for parsed_file in parsed_files {
            for item in &parsed_file.syntax_tree.items {
                let syn::Item::Struct(item_struct) = item else {
                    continue;
                };
                let Some(descriptor) = Self::describe_struct(item_struct) else {
                    continue;
                };
                if structs.contains_key(&descriptor.name) {
                    debug!(
                        "Struct {} declared again in {}, keeping the first declaration",
                        descriptor.name,
                        parsed_file.path.display()
                    );
                    continue;
                }
                debug!("Found struct {} in {}", descriptor.name, parsed_file.path.display());
                structs.insert(descriptor.name.clone(), descriptor);
            }
        }

        Self { structs }
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDescriptor> {
        self.structs.get(name)
    }

    /// Returns the descriptors for the given struct names, warning about names with no
    /// declaration.
    pub fn select<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        warnings: &mut Warnings,
    ) -> BTreeMap<String, StructDescriptor> {
        let mut selected = BTreeMap::new();
        for name in names {
            match self.find_struct(name) {
                Some(descriptor) => {
                    selected.insert(name.to_string(), descriptor.clone());
                }
                None => warnings.add(format!(
                    "[Warning] @@struct: no struct declaration found for {}",
                    name
                )),
            }
        }
        selected
    }

    /// Describes a struct with named fields; tuple and unit structs have no properties to derive.
    fn describe_struct(item_struct: &syn::ItemStruct) -> Option<StructDescriptor> {
        let syn::Fields::Named(named_fields) = &item_struct.fields else {
            return None;
        };

        let fields = named_fields
            .named
            .iter()
            .filter_map(Self::describe_field)
            .collect();

        Some(StructDescriptor {
            name: item_struct.ident.unraw().to_string(),
            fields,
            rename_all: Self::parse_rename_all(&item_struct.attrs),
        })
    }

    fn describe_field(field: &syn::Field) -> Option<FieldDescriptor> {
        let name = field.ident.as_ref()?.unraw().to_string();
        let exported = !matches!(field.vis, syn::Visibility::Inherited);

        Some(FieldDescriptor {
            name,
            type_info: Self::extract_type_info(&field.ty),
            exported,
            serde_attrs: Self::parse_serde_attributes(&field.attrs),
        })
    }

    /// Parse Serde attributes from field attributes
    fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    serde_attrs.rename = Some(value.value());
                    return Ok(());
                }
                if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    serde_attrs.skip = true;
                }
                skip_meta(&meta)
            });
            if let Err(e) = result {
                debug!("Ignoring unparsable serde attribute: {}", e);
            }
        }

        serde_attrs
    }

    fn parse_rename_all(attrs: &[syn::Attribute]) -> Option<FieldCase> {
        let mut rule = None;

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    rule = Some(value.value());
                    return Ok(());
                }
                skip_meta(&meta)
            });
            if let Err(e) = result {
                debug!("Ignoring unparsable serde attribute: {}", e);
            }
        }

        let rule = rule?;
        let case = FieldCase::from_serde_rule(&rule);
        if case.is_none() {
            debug!("Unsupported rename_all rule: {}", rule);
        }
        case
    }

    /// Extract TypeInfo from a syn::Type
    pub fn extract_type_info(ty: &syn::Type) -> TypeInfo {
        match ty {
            syn::Type::Path(type_path) => Self::extract_type_info_from_path(&type_path.path),
            syn::Type::Reference(reference) => Self::extract_type_info(&reference.elem),
            syn::Type::Paren(paren) => Self::extract_type_info(&paren.elem),
            syn::Type::Group(group) => Self::extract_type_info(&group.elem),
            syn::Type::Slice(slice) => TypeInfo::vec(Self::extract_type_info(&slice.elem)),
            syn::Type::Array(array) => TypeInfo::vec(Self::extract_type_info(&array.elem)),
            _ => TypeInfo::new("Unknown"),
        }
    }

    /// Extract TypeInfo from a syn::Path
    fn extract_type_info_from_path(path: &syn::Path) -> TypeInfo {
        let Some(segment) = path.segments.last() else {
            return TypeInfo::new("Unknown");
        };

        let generic_args = match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(inner_ty) => Some(Self::extract_type_info(inner_ty)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        TypeInfo::generic(segment.ident.to_string(), generic_args)
    }
}

/// Consumes the value or nested list of a serde attribute item we do not interpret.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}
