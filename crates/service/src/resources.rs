//! The six resources served by the API and the collection backing each one.

use std::{path::Path, sync::Arc};

use configs::StorageConfig;

use crate::record::Document;
use crate::storage::json_collection::JsonCollection;
use crate::store::{Operation, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Alunos,
    Professores,
    Profissionais,
    Agendamentos,
    Eventos,
    Usuarios,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Alunos,
        Resource::Agendamentos,
        Resource::Eventos,
        Resource::Professores,
        Resource::Profissionais,
        Resource::Usuarios,
    ];

    /// Collection name used in logs, metrics and OpenAPI tags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Alunos => "alunos",
            Self::Professores => "professores",
            Self::Profissionais => "profissionais",
            Self::Agendamentos => "agendamentos",
            Self::Eventos => "eventos",
            Self::Usuarios => "usuarios",
        }
    }

    pub fn mount_path(self) -> &'static str {
        match self {
            Self::Alunos => "/alunos",
            Self::Professores => "/professores",
            Self::Profissionais => "/profissional",
            Self::Agendamentos => "/agendamentos",
            Self::Eventos => "/eventos",
            Self::Usuarios => "/usuarios",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Alunos => "alunos.json",
            Self::Professores => "professores.json",
            Self::Profissionais => "profissional.json",
            Self::Agendamentos => "agenda.json",
            Self::Eventos => "eventos.json",
            Self::Usuarios => "usuarios.json",
        }
    }

    /// Singular, capitalized label ("Aluno").
    pub fn label(self) -> &'static str {
        match self {
            Self::Alunos => "Aluno",
            Self::Professores => "Professor",
            Self::Profissionais => "Profissional",
            Self::Agendamentos => "Agendamento",
            Self::Eventos => "Evento",
            Self::Usuarios => "Usuário",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Alunos => "alunos",
            Self::Professores => "professores",
            Self::Profissionais => "profissionais",
            Self::Agendamentos => "agendamentos",
            Self::Eventos => "eventos",
            Self::Usuarios => "usuários",
        }
    }

    pub fn not_found_message(self) -> String {
        format!("{} não encontrado", self.label())
    }

    pub fn read_failed_message(self) -> String {
        format!("Erro na leitura dos dados dos {}.", self.plural())
    }

    pub fn corrupt_message(self) -> String {
        format!("Formato inválido para arquivo JSON dos {}.", self.plural())
    }

    pub fn invalid_input_message(self, op: Operation) -> String {
        match op {
            Operation::Update => "Dados inválidos para atualização!".to_string(),
            _ => "Dados inválidos para inclusão!".to_string(),
        }
    }

    pub fn write_failed_message(self, op: Operation) -> String {
        let label = self.label().to_lowercase();
        match op {
            Operation::Create => format!("Erro ao gravar dados do novo {label}."),
            Operation::Update => format!("Erro ao atualizar {label}."),
            _ => format!("Erro ao excluir {label}."),
        }
    }

    pub fn open(self, storage: &StorageConfig) -> Arc<JsonCollection<Document>> {
        let path = Path::new(&storage.data_dir).join(self.file_name());
        JsonCollection::new(self.name(), path, storage.id_strategy)
    }
}

/// One opened collection per resource.
#[derive(Clone)]
pub struct Catalog {
    entries: Vec<(Resource, Arc<dyn RecordStore<Document>>)>,
}

impl Catalog {
    pub fn open(storage: &StorageConfig) -> Self {
        let entries = Resource::ALL
            .iter()
            .map(|r| (*r, r.open(storage) as Arc<dyn RecordStore<Document>>))
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, &Arc<dyn RecordStore<Document>>)> {
        self.entries.iter().map(|(r, s)| (*r, s))
    }

    pub fn get(&self, resource: Resource) -> Option<Arc<dyn RecordStore<Document>>> {
        self.entries.iter().find(|(r, _)| *r == resource).map(|(_, s)| Arc::clone(s))
    }
}
