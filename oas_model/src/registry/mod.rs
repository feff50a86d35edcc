//! The property schema registry.
//!
//! Every model kind the document model can represent is described here by a
//! static, declarative table of [`PropertyDescriptor`]s. The registry is
//! built and validated exactly once per process; a schema definition that
//! violates a registry invariant is a configuration error surfaced at first
//! use, never per document.

use std::sync::LazyLock;

use crate::error::OasError;
use crate::model::reference::ComponentBucket;

mod catalog;
mod descriptor;

pub use descriptor::{ElementType, MergeDirective, PropertyDescriptor, PropertyShape};

/// Identifier for every model kind in the catalog.
///
/// Order matters: it is the registry's index order and must match
/// [`ModelType::ALL`] and the catalog table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ModelType {
    /// Abstract base for every reference-capable kind. Never instantiated.
    Reference,
    /// The root document object.
    OpenApi,
    /// API metadata.
    Info,
    /// Contact information.
    Contact,
    /// License information.
    License,
    /// External documentation link.
    ExternalDocs,
    /// A server the API is available on.
    Server,
    /// A substitutable server URL variable.
    ServerVariable,
    /// A grouping tag.
    Tag,
    /// The container of path items.
    Paths,
    /// One path and its operations.
    PathItem,
    /// A single HTTP operation.
    Operation,
    /// An operation parameter.
    Parameter,
    /// An operation request body.
    RequestBody,
    /// The media-type container of a body or response.
    Content,
    /// One media type's payload description.
    MediaType,
    /// Serialization rules for one body property.
    Encoding,
    /// The container of an operation's responses.
    Responses,
    /// A single response.
    Response,
    /// An out-of-band callback definition.
    Callback,
    /// A reusable example.
    Example,
    /// A design-time link between operations.
    Link,
    /// A response or encoding header.
    Header,
    /// A JSON Schema object.
    Schema,
    /// XML serialization hints for a schema.
    Xml,
    /// Polymorphism discriminator for a schema.
    Discriminator,
    /// The reusable component buckets.
    Components,
    /// A map of required security schemes to scopes.
    SecurityRequirement,
    /// A security scheme definition.
    SecurityScheme,
    /// The set of OAuth flows of a scheme.
    OAuthFlows,
    /// One OAuth flow's configuration.
    OAuthFlow,
}

impl ModelType {
    /// All model kinds, in registry index order.
    pub const ALL: &'static [Self] = &[
        Self::Reference,
        Self::OpenApi,
        Self::Info,
        Self::Contact,
        Self::License,
        Self::ExternalDocs,
        Self::Server,
        Self::ServerVariable,
        Self::Tag,
        Self::Paths,
        Self::PathItem,
        Self::Operation,
        Self::Parameter,
        Self::RequestBody,
        Self::Content,
        Self::MediaType,
        Self::Encoding,
        Self::Responses,
        Self::Response,
        Self::Callback,
        Self::Example,
        Self::Link,
        Self::Header,
        Self::Schema,
        Self::Xml,
        Self::Discriminator,
        Self::Components,
        Self::SecurityRequirement,
        Self::SecurityScheme,
        Self::OAuthFlows,
        Self::OAuthFlow,
    ];

    /// The kind's registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reference => "Reference",
            Self::OpenApi => "OpenAPI",
            Self::Info => "Info",
            Self::Contact => "Contact",
            Self::License => "License",
            Self::ExternalDocs => "ExternalDocumentation",
            Self::Server => "Server",
            Self::ServerVariable => "ServerVariable",
            Self::Tag => "Tag",
            Self::Paths => "Paths",
            Self::PathItem => "PathItem",
            Self::Operation => "Operation",
            Self::Parameter => "Parameter",
            Self::RequestBody => "RequestBody",
            Self::Content => "Content",
            Self::MediaType => "MediaType",
            Self::Encoding => "Encoding",
            Self::Responses => "APIResponses",
            Self::Response => "APIResponse",
            Self::Callback => "Callback",
            Self::Example => "Example",
            Self::Link => "Link",
            Self::Header => "Header",
            Self::Schema => "Schema",
            Self::Xml => "XML",
            Self::Discriminator => "Discriminator",
            Self::Components => "Components",
            Self::SecurityRequirement => "SecurityRequirement",
            Self::SecurityScheme => "SecurityScheme",
            Self::OAuthFlows => "OAuthFlows",
            Self::OAuthFlow => "OAuthFlow",
        }
    }

    /// Look a kind up by its registry name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Static definition of one model kind: its flags and own property table.
#[derive(Debug)]
pub struct ModelKind {
    pub(crate) model_type: ModelType,
    pub(crate) extends: Option<ModelType>,
    pub(crate) incomplete: bool,
    pub(crate) extensible: bool,
    pub(crate) dynamic: bool,
    pub(crate) bucket: Option<ComponentBucket>,
    pub(crate) properties: &'static [PropertyDescriptor],
}

impl ModelKind {
    pub(crate) const fn new(
        model_type: ModelType,
        properties: &'static [PropertyDescriptor],
    ) -> Self {
        Self {
            model_type,
            extends: None,
            incomplete: false,
            extensible: true,
            dynamic: false,
            bucket: None,
            properties,
        }
    }

    pub(crate) const fn extending(mut self, base: ModelType) -> Self {
        self.extends = Some(base);
        self
    }

    pub(crate) const fn as_incomplete(mut self) -> Self {
        self.incomplete = true;
        self
    }

    pub(crate) const fn closed(mut self) -> Self {
        self.extensible = false;
        self
    }

    pub(crate) const fn as_dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub(crate) const fn referencing(mut self, bucket: ComponentBucket) -> Self {
        self.bucket = Some(bucket);
        self
    }
}

/// A validated registry entry: the kind plus its flattened property table
/// (inherited descriptors first).
#[derive(Debug)]
pub struct KindRecord {
    kind: &'static ModelKind,
    properties: Vec<PropertyDescriptor>,
}

impl KindRecord {
    /// The kind this record describes.
    #[must_use]
    pub const fn model_type(&self) -> ModelType {
        self.kind.model_type
    }

    /// The kind's registry name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.model_type.name()
    }

    /// Whether the kind is abstract and never instantiated directly.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        self.kind.incomplete
    }

    /// Whether the kind accepts vendor extension keys.
    #[must_use]
    pub const fn is_extensible(&self) -> bool {
        self.kind.extensible
    }

    /// Whether the kind's property set is open (unrecognized keys are
    /// retained rather than dropped). Only the Schema kind is dynamic.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.kind.dynamic
    }

    /// The component bucket this kind resolves references against, when the
    /// kind is reference-capable.
    #[must_use]
    pub const fn bucket(&self) -> Option<ComponentBucket> {
        self.kind.bucket
    }

    /// All property descriptors, inherited ones first, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Look up a descriptor by wire name.
    #[must_use]
    pub fn property(&self, wire_name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.wire_name() == wire_name)
    }

    /// The kind's unwrapped property, if it declares one.
    #[must_use]
    pub fn unwrapped_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_unwrapped())
    }

    /// The merge directive for the named property, defaulting to
    /// [`MergeDirective::MergeValues`] for undeclared names.
    #[must_use]
    pub fn merge_directive(&self, wire_name: &str) -> MergeDirective {
        self.property(wire_name)
            .map(PropertyDescriptor::directive)
            .unwrap_or_default()
    }
}

/// The validated property schema registry.
#[derive(Debug)]
pub struct Registry {
    records: Vec<KindRecord>,
}

impl Registry {
    /// Build and validate the registry from the static catalog.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::Registry`] when the catalog violates a registry
    /// invariant: table order out of sync with [`ModelType::ALL`], an
    /// unwrapped property that is not map-shaped, a property referencing an
    /// incomplete kind, `extends` pointing at a non-incomplete kind, or a
    /// duplicate wire name within one kind.
    #[expect(
        clippy::result_large_err,
        reason = "Only built once per process; error size is irrelevant here"
    )]
    pub fn try_build() -> Result<Self, OasError> {
        let kinds = catalog::kinds();

        if kinds.len() != ModelType::ALL.len() {
            return Err(OasError::registry(format!(
                "catalog declares {} kinds, expected {}",
                kinds.len(),
                ModelType::ALL.len()
            )));
        }

        for (slot, kind) in ModelType::ALL.iter().zip(kinds) {
            if kind.model_type != *slot {
                return Err(OasError::registry(format!(
                    "catalog entry for '{}' is out of order",
                    kind.model_type.name()
                )));
            }
        }

        let mut records = Vec::with_capacity(kinds.len());
        for kind in kinds {
            records.push(Self::validate(kind, kinds)?);
        }

        Ok(Self { records })
    }

    #[expect(
        clippy::result_large_err,
        reason = "Registry construction only; see try_build"
    )]
    fn validate(
        kind: &'static ModelKind,
        kinds: &'static [ModelKind],
    ) -> Result<KindRecord, OasError> {
        let name = kind.model_type.name();

        if let Some(base) = kind.extends {
            let base_kind = kinds.iter().find(|k| k.model_type == base);
            if !base_kind.is_some_and(|k| k.incomplete) {
                return Err(OasError::registry(format!(
                    "'{name}' extends '{}', which is not an incomplete kind",
                    base.name()
                )));
            }
        }

        let mut properties: Vec<PropertyDescriptor> = Vec::new();
        if let Some(base) = kind.extends {
            if let Some(base_kind) = kinds.iter().find(|k| k.model_type == base) {
                properties.extend_from_slice(base_kind.properties);
            }
        }
        properties.extend_from_slice(kind.properties);

        let mut unwrapped = 0_usize;
        for (i, property) in properties.iter().enumerate() {
            let wire = property.wire_name();

            if properties
                .iter()
                .take(i)
                .any(|other| other.wire_name() == wire)
            {
                return Err(OasError::registry(format!(
                    "'{name}' declares wire name '{wire}' more than once"
                )));
            }

            if property.is_unwrapped() {
                unwrapped += 1;
                if property.shape() != PropertyShape::Map {
                    return Err(OasError::registry(format!(
                        "unwrapped property '{name}.{wire}' must be map-shaped"
                    )));
                }
            }

            if let ElementType::Model(element) = property.element() {
                let element_kind = kinds.iter().find(|k| k.model_type == element);
                if element_kind.is_none_or(|k| k.incomplete) {
                    return Err(OasError::registry(format!(
                        "property '{name}.{wire}' references incomplete kind '{}'",
                        element.name()
                    )));
                }
            }
        }

        if unwrapped > 1 {
            return Err(OasError::registry(format!(
                "'{name}' declares more than one unwrapped property"
            )));
        }

        Ok(KindRecord { kind, properties })
    }

    /// The record for a model kind.
    ///
    /// # Panics
    ///
    /// Panics when the registry is missing an entry for `model_type`, which
    /// [`Registry::try_build`] rules out.
    #[must_use]
    pub fn describe(&self, model_type: ModelType) -> &KindRecord {
        self.records
            .get(model_type.index())
            .unwrap_or_else(|| panic!("registry entry missing for '{}'", model_type.name()))
    }

    /// Look a record up by kind name, as carried by metadata-tree instances.
    #[must_use]
    pub fn describe_name(&self, name: &str) -> Option<&KindRecord> {
        ModelType::by_name(name).map(|t| self.describe(t))
    }
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| match Registry::try_build() {
    Ok(registry) => registry,
    Err(error) => panic!("invalid property schema registry: {error}"),
});

/// The process-wide registry instance.
///
/// # Panics
///
/// Panics on first use when the static catalog violates a registry
/// invariant; the process cannot proceed with a broken registry.
#[must_use]
pub fn registry() -> &'static Registry {
    &REGISTRY
}
