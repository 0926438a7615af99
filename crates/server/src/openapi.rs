//! OpenAPI document for the resource routes.
//!
//! Every resource shares the same handlers, so the document is assembled with
//! utoipa's builders, one tag per resource.

use serde_json::{json, Value};
use service::resources::{Catalog, Resource};
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathItemType};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{ArrayBuilder, ObjectBuilder, Schema, SchemaType};
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{
    Content, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, RefOr, Required, Response, ResponseBuilder,
};

const JSON: &str = "application/json";

fn string_schema() -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(SchemaType::String).build()))
}

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Number,
}

/// Documented field of a resource record. Records stay free-form; these only
/// describe the fields the front end sends.
struct Field {
    name: &'static str,
    kind: Kind,
    description: &'static str,
    required: bool,
}

const fn text(name: &'static str, description: &'static str, required: bool) -> Field {
    Field { name, kind: Kind::Text, description, required }
}

const fn number(name: &'static str, description: &'static str) -> Field {
    Field { name, kind: Kind::Number, description, required: false }
}

const ALUNO: &[Field] = &[
    text("nome", "Nome do aluno", true),
    number("idade", "Idade do aluno"),
    text("pais", "Nome dos pais ou responsáveis", false),
    number("telefone", "Telefone de contato"),
    text("necessidade", "Necessidade especial", false),
    text("status", "Situação da matrícula", false),
];

const PROFESSOR: &[Field] = &[
    text("nome", "Nome do professor", true),
    text("disciplina", "Disciplina do professor", false),
];

const PROFISSIONAL: &[Field] = &[
    text("nome", "Nome do profissional", true),
    text("especialidade", "Especialidade do profissional", true),
    text("NRP", "Número de registro profissional", false),
    text("email", "E-mail de contato", false),
    number("telefone", "Telefone de contato"),
    text("status", "Situação do profissional", false),
];

const AGENDAMENTO: &[Field] = &[
    text("especialista", "Descrição do especialista", true),
    text("profissional", "Nome do especialista", false),
];

const EVENTO: &[Field] = &[
    text("descricao", "Descrição do evento", true),
    text("comentarios", "Comentários sobre o evento", false),
    number("data", "Data do evento"),
];

const USUARIO: &[Field] = &[
    text("nome", "Nome do usuário", true),
    text("usuario", "Login do usuário", false),
];

fn fields(resource: Resource) -> &'static [Field] {
    match resource {
        Resource::Alunos => ALUNO,
        Resource::Professores => PROFESSOR,
        Resource::Profissionais => PROFISSIONAL,
        Resource::Agendamentos => AGENDAMENTO,
        Resource::Eventos => EVENTO,
        Resource::Usuarios => USUARIO,
    }
}

fn example(resource: Resource) -> Value {
    match resource {
        Resource::Alunos => json!({
            "id": "1718000000000",
            "nome": "Lucas Almeida",
            "idade": 9,
            "pais": "Carla e Roberto Almeida",
            "telefone": 11987654321u64,
            "necessidade": "TEA",
            "status": "ativo"
        }),
        Resource::Professores => json!({"id": "2102", "nome": "Marcela Ferreira", "disciplina": "Língua Portuguesa"}),
        Resource::Profissionais => {
            json!({"id": "4807", "nome": "Paulo Marcelo de Farias", "especialidade": "Médico"})
        }
        Resource::Agendamentos => {
            json!({"id": "174452", "especialista": "Psicólogo", "profissional": "Fabiana Nunes"})
        }
        Resource::Eventos => json!({
            "id": "1718000000001",
            "descricao": "Reunião de pais",
            "comentarios": "Auditório",
            "data": 1718000000000u64
        }),
        Resource::Usuarios => json!({"id": "7041", "nome": "Pedro Soares", "usuario": "PSoares21"}),
    }
}

fn field_schema(field: &Field) -> RefOr<Schema> {
    let kind = match field.kind {
        Kind::Text => SchemaType::String,
        Kind::Number => SchemaType::Number,
    };
    RefOr::T(Schema::Object(
        ObjectBuilder::new().schema_type(kind).description(Some(field.description)).build(),
    ))
}

fn record_schema(resource: Resource) -> RefOr<Schema> {
    let mut object = ObjectBuilder::new()
        .schema_type(SchemaType::Object)
        .description(Some(format!(
            "{} record: free-form JSON object; `id` is assigned by the server",
            resource.label()
        )))
        .property("id", string_schema());
    for field in fields(resource) {
        object = object.property(field.name, field_schema(field));
        if field.required {
            object = object.required(field.name);
        }
    }
    RefOr::T(Schema::Object(object.example(Some(example(resource))).build()))
}

fn record_list_schema(resource: Resource) -> RefOr<Schema> {
    RefOr::T(Schema::Array(ArrayBuilder::new().items(record_schema(resource)).build()))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new().description(description).content(JSON, Content::new(schema)).build()
}

fn message_response(description: &str) -> Response {
    let body = RefOr::T(Schema::Object(
        ObjectBuilder::new().schema_type(SchemaType::Object).property("message", string_schema()).build(),
    ));
    json_response(description, body)
}

fn operation(resource: Resource, id: &str, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(resource.name())
        .operation_id(Some(format!("{}_{}", resource.name(), id)))
        .summary(Some(summary))
}

fn with_id_param(op: OperationBuilder) -> OperationBuilder {
    op.parameter(
        ParameterBuilder::new()
            .name("id")
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .description(Some("Record id"))
            .schema(Some(string_schema()))
            .build(),
    )
}

fn with_body(op: OperationBuilder, resource: Resource) -> OperationBuilder {
    op.request_body(Some(
        RequestBodyBuilder::new()
            .content(JSON, Content::new(record_schema(resource)))
            .required(Some(Required::True))
            .build(),
    ))
}

fn add_resource(paths: PathsBuilder, resource: Resource) -> PathsBuilder {
    let label = resource.label();
    let collection = PathItemBuilder::new()
        .operation(
            PathItemType::Get,
            operation(resource, "list", format!("List {}", resource.name()))
                .response("200", json_response("All records", record_list_schema(resource)))
                .response("500", message_response("Collection unreadable"))
                .build(),
        )
        .operation(
            PathItemType::Post,
            with_body(operation(resource, "create", format!("Create {label}")), resource)
                .response("201", json_response("Created, with its assigned id", record_schema(resource)))
                .response("400", message_response("Empty or invalid body"))
                .response("500", message_response("Collection unreadable or not writable"))
                .build(),
        )
        .build();

    let item = PathItemBuilder::new()
        .operation(
            PathItemType::Get,
            with_id_param(operation(resource, "get", format!("Get {label} by id")))
                .response("200", json_response("Found", record_schema(resource)))
                .response("404", message_response(&resource.not_found_message()))
                .response("500", message_response("Collection unreadable"))
                .build(),
        )
        .operation(
            PathItemType::Put,
            with_body(with_id_param(operation(resource, "update", format!("Update {label} by id"))), resource)
                .response("200", json_response("Merged record", record_schema(resource)))
                .response("400", message_response("Invalid body"))
                .response("404", message_response(&resource.not_found_message()))
                .response("500", message_response("Collection unreadable or not writable"))
                .build(),
        )
        .operation(
            PathItemType::Delete,
            with_id_param(operation(resource, "delete", format!("Delete {label} by id")))
                .response("204", ResponseBuilder::new().description("Deleted").build())
                .response("404", message_response(&resource.not_found_message()))
                .response("500", message_response("Collection unreadable or not writable"))
                .build(),
        )
        .build();

    paths
        .path(resource.mount_path(), collection)
        .path(format!("{}/{{id}}", resource.mount_path()), item)
}

pub fn build(catalog: &Catalog) -> OpenApi {
    let mut paths = PathsBuilder::new();
    let mut tags = Vec::new();
    for (resource, _) in catalog.iter() {
        paths = add_resource(paths, resource);
        tags.push(TagBuilder::new().name(resource.name()).build());
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Gestão de Ensino Especial API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(
                    "Professores, alunos, eventos, agendamentos de saúde, profissionais e usuários.",
                ))
                .build(),
        )
        .paths(paths.build())
        .tags(Some(tags))
        .build()
}
