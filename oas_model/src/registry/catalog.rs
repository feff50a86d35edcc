//! The static model-kind catalog: every OpenAPI 3.0/3.1 object type and its
//! properties.
//!
//! Table order must match [`ModelType::ALL`]; [`Registry::try_build`]
//! verifies this along with the structural invariants.
//!
//! [`Registry::try_build`]: super::Registry::try_build

use crate::model::reference::ComponentBucket;

use super::{ModelKind, ModelType, PropertyDescriptor as P};

pub(super) fn kinds() -> &'static [ModelKind] {
    &KINDS
}

// Abstract base for every reference-capable kind.
static REFERENCE_PROPS: [P; 1] = [P::string("$ref").accessor("ref")];

static OPEN_API_PROPS: [P; 10] = [
    P::string("openapi").preserve(),
    P::model("info", ModelType::Info),
    P::string("jsonSchemaDialect"),
    P::model_list("servers", ModelType::Server).singular("server"),
    P::model("paths", ModelType::Paths),
    P::model_map("webhooks", ModelType::PathItem).singular("webhook"),
    P::model("components", ModelType::Components),
    P::model_list("security", ModelType::SecurityRequirement).singular("securityRequirement"),
    P::model_list("tags", ModelType::Tag).singular("tag"),
    P::model("externalDocs", ModelType::ExternalDocs),
];

static INFO_PROPS: [P; 7] = [
    P::string("title"),
    P::string("summary"),
    P::string("description"),
    P::string("termsOfService"),
    P::model("contact", ModelType::Contact),
    P::model("license", ModelType::License),
    P::string("version"),
];

static CONTACT_PROPS: [P; 3] = [P::string("name"), P::string("url"), P::string("email")];

static LICENSE_PROPS: [P; 3] = [
    P::string("name"),
    P::string("identifier"),
    P::string("url"),
];

static EXTERNAL_DOCS_PROPS: [P; 2] = [P::string("description"), P::string("url")];

static SERVER_PROPS: [P; 3] = [
    P::string("url"),
    P::string("description"),
    P::model_map("variables", ModelType::ServerVariable).singular("variable"),
];

static SERVER_VARIABLE_PROPS: [P; 3] = [
    P::string_list("enum")
        .accessor("enumeration")
        .singular("enumeration"),
    P::string("default").accessor("default_value"),
    P::string("description"),
];

static TAG_PROPS: [P; 3] = [
    P::string("name"),
    P::string("description"),
    P::model("externalDocs", ModelType::ExternalDocs),
];

static PATHS_PROPS: [P; 1] = [P::model_map("pathItems", ModelType::PathItem)
    .singular("pathItem")
    .unwrapped()];

static PATH_ITEM_PROPS: [P; 12] = [
    P::string("summary"),
    P::string("description"),
    P::model("get", ModelType::Operation).accessor("get_operation"),
    P::model("put", ModelType::Operation).accessor("put_operation"),
    P::model("post", ModelType::Operation).accessor("post_operation"),
    P::model("delete", ModelType::Operation).accessor("delete_operation"),
    P::model("options", ModelType::Operation).accessor("options_operation"),
    P::model("head", ModelType::Operation).accessor("head_operation"),
    P::model("patch", ModelType::Operation).accessor("patch_operation"),
    P::model("trace", ModelType::Operation).accessor("trace_operation"),
    P::model_list("servers", ModelType::Server).singular("server"),
    P::model_list("parameters", ModelType::Parameter).singular("parameter"),
];

static OPERATION_PROPS: [P; 12] = [
    P::string_list("tags").singular("tag"),
    P::string("summary"),
    P::string("description"),
    P::model("externalDocs", ModelType::ExternalDocs),
    P::string("operationId"),
    P::model_list("parameters", ModelType::Parameter).singular("parameter"),
    P::model("requestBody", ModelType::RequestBody),
    P::model("responses", ModelType::Responses),
    P::model_map("callbacks", ModelType::Callback).singular("callback"),
    P::boolean("deprecated"),
    P::model_list("security", ModelType::SecurityRequirement).singular("securityRequirement"),
    P::model_list("servers", ModelType::Server).singular("server"),
];

static PARAMETER_PROPS: [P; 13] = [
    P::string("name"),
    P::string("in").accessor("in_"),
    P::string("description"),
    P::boolean("required"),
    P::boolean("deprecated"),
    P::boolean("allowEmptyValue"),
    P::string("style"),
    P::boolean("explode"),
    P::boolean("allowReserved"),
    P::model("schema", ModelType::Schema),
    P::any("example"),
    P::model_map("examples", ModelType::Example).singular("example"),
    P::model("content", ModelType::Content),
];

static REQUEST_BODY_PROPS: [P; 3] = [
    P::string("description"),
    P::model("content", ModelType::Content),
    P::boolean("required"),
];

static CONTENT_PROPS: [P; 1] = [P::model_map("mediaTypes", ModelType::MediaType)
    .singular("mediaType")
    .unwrapped()];

static MEDIA_TYPE_PROPS: [P; 4] = [
    P::model("schema", ModelType::Schema),
    P::any("example"),
    P::model_map("examples", ModelType::Example).singular("example"),
    P::model_map("encoding", ModelType::Encoding).singular("encoding"),
];

static ENCODING_PROPS: [P; 5] = [
    P::string("contentType"),
    P::model_map("headers", ModelType::Header).singular("header"),
    P::string("style"),
    P::boolean("explode"),
    P::boolean("allowReserved"),
];

static RESPONSES_PROPS: [P; 2] = [
    P::model("default", ModelType::Response).accessor("default_value"),
    P::model_map("responses", ModelType::Response)
        .singular("response")
        .unwrapped(),
];

static RESPONSE_PROPS: [P; 4] = [
    P::string("description"),
    P::model_map("headers", ModelType::Header).singular("header"),
    P::model("content", ModelType::Content),
    P::model_map("links", ModelType::Link).singular("link"),
];

static CALLBACK_PROPS: [P; 1] = [P::model_map("pathItems", ModelType::PathItem)
    .singular("pathItem")
    .unwrapped()];

static EXAMPLE_PROPS: [P; 4] = [
    P::string("summary"),
    P::string("description"),
    P::any("value"),
    P::string("externalValue"),
];

static LINK_PROPS: [P; 6] = [
    P::string("operationRef"),
    P::string("operationId"),
    P::any_map("parameters").singular("parameter"),
    P::any("requestBody"),
    P::string("description"),
    P::model("server", ModelType::Server),
];

static HEADER_PROPS: [P; 10] = [
    P::string("description"),
    P::boolean("required"),
    P::boolean("deprecated"),
    P::boolean("allowEmptyValue"),
    P::string("style"),
    P::boolean("explode"),
    P::model("schema", ModelType::Schema),
    P::any("example"),
    P::model_map("examples", ModelType::Example).singular("example"),
    P::model("content", ModelType::Content),
];

// JSON Schema is an open vocabulary: the kind is also flagged dynamic, so
// keywords outside this table are retained verbatim instead of dropped.
static SCHEMA_PROPS: [P; 55] = [
    P::string("$schema").accessor("schema_dialect"),
    P::string("$comment").accessor("comment"),
    P::string("title"),
    P::string("description"),
    P::string_list("type").accessor("type_").singular("type"),
    P::any_list("enum")
        .accessor("enumeration")
        .singular("enumeration"),
    P::any("const").accessor("const_value"),
    P::number("multipleOf"),
    P::number("maximum"),
    P::number("exclusiveMaximum"),
    P::number("minimum"),
    P::number("exclusiveMinimum"),
    P::integer("maxLength"),
    P::integer("minLength"),
    P::string("pattern"),
    P::integer("maxItems"),
    P::integer("minItems"),
    P::boolean("uniqueItems"),
    P::integer("maxContains"),
    P::integer("minContains"),
    P::integer("maxProperties"),
    P::integer("minProperties"),
    P::string_list("required").singular("required"),
    P::any_map("dependentRequired"),
    P::model_list("allOf", ModelType::Schema).singular("allOf"),
    P::model_list("anyOf", ModelType::Schema).singular("anyOf"),
    P::model_list("oneOf", ModelType::Schema).singular("oneOf"),
    P::model("not", ModelType::Schema),
    P::model("if", ModelType::Schema).accessor("if_schema"),
    P::model("then", ModelType::Schema).accessor("then_schema"),
    P::model("else", ModelType::Schema).accessor("else_schema"),
    P::model_map("dependentSchemas", ModelType::Schema),
    P::model_list("prefixItems", ModelType::Schema).singular("prefixItem"),
    P::model("items", ModelType::Schema),
    P::model("contains", ModelType::Schema),
    P::model_map("properties", ModelType::Schema).singular("property"),
    P::model_map("patternProperties", ModelType::Schema).singular("patternProperty"),
    P::model("additionalProperties", ModelType::Schema),
    P::model("propertyNames", ModelType::Schema),
    P::model("unevaluatedItems", ModelType::Schema),
    P::model("unevaluatedProperties", ModelType::Schema),
    P::string("format"),
    P::string("contentEncoding"),
    P::string("contentMediaType"),
    P::model("contentSchema", ModelType::Schema),
    P::boolean("readOnly"),
    P::boolean("writeOnly"),
    P::any_list("examples"),
    P::any("example"),
    P::any("default").accessor("default_value"),
    P::boolean("deprecated"),
    P::boolean("nullable"),
    P::model("discriminator", ModelType::Discriminator),
    P::model("xml", ModelType::Xml),
    P::model("externalDocs", ModelType::ExternalDocs),
];

static XML_PROPS: [P; 5] = [
    P::string("name"),
    P::string("namespace"),
    P::string("prefix"),
    P::boolean("attribute"),
    P::boolean("wrapped"),
];

static DISCRIMINATOR_PROPS: [P; 2] = [P::string("propertyName"), P::string_map("mapping")];

static COMPONENTS_PROPS: [P; 10] = [
    P::model_map("schemas", ModelType::Schema).singular("schema"),
    P::model_map("responses", ModelType::Response).singular("response"),
    P::model_map("parameters", ModelType::Parameter).singular("parameter"),
    P::model_map("examples", ModelType::Example).singular("example"),
    P::model_map("requestBodies", ModelType::RequestBody).singular("requestBody"),
    P::model_map("headers", ModelType::Header).singular("header"),
    P::model_map("securitySchemes", ModelType::SecurityScheme).singular("securityScheme"),
    P::model_map("links", ModelType::Link).singular("link"),
    P::model_map("callbacks", ModelType::Callback).singular("callback"),
    P::model_map("pathItems", ModelType::PathItem).singular("pathItem"),
];

// Scheme names map directly to scope lists.
static SECURITY_REQUIREMENT_PROPS: [P; 1] =
    [P::any_map("schemes").singular("scheme").unwrapped()];

static SECURITY_SCHEME_PROPS: [P; 8] = [
    P::string("type").accessor("type_"),
    P::string("description"),
    P::string("name"),
    P::string("in").accessor("in_"),
    P::string("scheme"),
    P::string("bearerFormat"),
    P::model("flows", ModelType::OAuthFlows),
    P::string("openIdConnectUrl"),
];

static OAUTH_FLOWS_PROPS: [P; 4] = [
    P::model("implicit", ModelType::OAuthFlow),
    P::model("password", ModelType::OAuthFlow),
    P::model("clientCredentials", ModelType::OAuthFlow),
    P::model("authorizationCode", ModelType::OAuthFlow),
];

static OAUTH_FLOW_PROPS: [P; 4] = [
    P::string("authorizationUrl"),
    P::string("tokenUrl"),
    P::string("refreshUrl"),
    P::string_map("scopes").singular("scope"),
];

static KINDS: [ModelKind; 31] = [
    ModelKind::new(ModelType::Reference, &REFERENCE_PROPS)
        .as_incomplete()
        .closed(),
    ModelKind::new(ModelType::OpenApi, &OPEN_API_PROPS),
    ModelKind::new(ModelType::Info, &INFO_PROPS),
    ModelKind::new(ModelType::Contact, &CONTACT_PROPS),
    ModelKind::new(ModelType::License, &LICENSE_PROPS),
    ModelKind::new(ModelType::ExternalDocs, &EXTERNAL_DOCS_PROPS),
    ModelKind::new(ModelType::Server, &SERVER_PROPS),
    ModelKind::new(ModelType::ServerVariable, &SERVER_VARIABLE_PROPS),
    ModelKind::new(ModelType::Tag, &TAG_PROPS),
    ModelKind::new(ModelType::Paths, &PATHS_PROPS),
    ModelKind::new(ModelType::PathItem, &PATH_ITEM_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::PathItems),
    ModelKind::new(ModelType::Operation, &OPERATION_PROPS),
    ModelKind::new(ModelType::Parameter, &PARAMETER_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Parameters),
    ModelKind::new(ModelType::RequestBody, &REQUEST_BODY_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::RequestBodies),
    // Media type keys live directly in the content object; no extensions.
    ModelKind::new(ModelType::Content, &CONTENT_PROPS).closed(),
    ModelKind::new(ModelType::MediaType, &MEDIA_TYPE_PROPS),
    ModelKind::new(ModelType::Encoding, &ENCODING_PROPS),
    ModelKind::new(ModelType::Responses, &RESPONSES_PROPS),
    ModelKind::new(ModelType::Response, &RESPONSE_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Responses),
    ModelKind::new(ModelType::Callback, &CALLBACK_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Callbacks),
    ModelKind::new(ModelType::Example, &EXAMPLE_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Examples),
    ModelKind::new(ModelType::Link, &LINK_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Links),
    ModelKind::new(ModelType::Header, &HEADER_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Headers),
    ModelKind::new(ModelType::Schema, &SCHEMA_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::Schemas)
        .as_dynamic(),
    ModelKind::new(ModelType::Xml, &XML_PROPS),
    ModelKind::new(ModelType::Discriminator, &DISCRIMINATOR_PROPS),
    ModelKind::new(ModelType::Components, &COMPONENTS_PROPS),
    ModelKind::new(ModelType::SecurityRequirement, &SECURITY_REQUIREMENT_PROPS).closed(),
    ModelKind::new(ModelType::SecurityScheme, &SECURITY_SCHEME_PROPS)
        .extending(ModelType::Reference)
        .referencing(ComponentBucket::SecuritySchemes),
    ModelKind::new(ModelType::OAuthFlows, &OAUTH_FLOWS_PROPS),
    ModelKind::new(ModelType::OAuthFlow, &OAUTH_FLOW_PROPS),
];
