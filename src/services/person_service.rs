// src/services/person_service.rs
// Proprietários e inquilinos: a mesma tabela, sempre filtrada pelo `role`
// que o serviço recebeu na construção.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Filter, WritePayload},
    models::person::{
        NewPerson, PartnerPayload, Person, PersonDetail, PersonFilter, PersonPartner, PersonPatch,
        PersonReference, PersonRole, PersonScope, ReferencePayload,
    },
    services::{entity_service::EntityService, location_service::LocationService},
};

#[derive(Clone)]
pub struct PersonService {
    role: PersonRole,
    people: EntityService<Person>,
    locations: LocationService,
}

impl PersonService {
    pub fn new(role: PersonRole, people: EntityService<Person>, locations: LocationService) -> Self {
        Self {
            role,
            people,
            locations,
        }
    }

    pub fn role(&self) -> PersonRole {
        self.role
    }

    fn scope(&self) -> [Filter; 1] {
        [Filter::eq("role", self.role.as_str())]
    }

    fn owns(&self, person: &Person) -> bool {
        person.role == self.role
    }

    pub async fn get_all(&self) -> Result<Vec<Person>, AppError> {
        self.people.list_where(&self.scope()).await
    }

    pub async fn list(&self, filter: &PersonFilter) -> Result<Vec<Person>, AppError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    /// Uma pessoa do outro papel não existe para este serviço
    pub async fn get_by_id(&self, id: Uuid) -> Result<Person, AppError> {
        match self.people.find(id).await? {
            Some(person) if self.owns(&person) => Ok(person),
            _ => Err(AppError::NotFound(self.role.label())),
        }
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<PersonDetail, AppError> {
        let person = self.get_by_id(id).await?;
        let city = self.locations.find_city(person.city_id).await?;
        let marital_status = self.locations.find_marital_status(person.marital_status_id).await?;
        Ok(PersonDetail {
            person,
            city,
            marital_status,
        })
    }

    pub async fn create(&self, payload: NewPerson) -> Result<Person, AppError> {
        self.people.create_scoped(payload, &self.scope()).await
    }

    pub async fn update(&self, id: Uuid, patch: PersonPatch) -> Result<Person, AppError> {
        self.get_by_id(id).await?;
        self.people.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.people.find(id).await? {
            None => Ok(()),
            Some(person) if self.owns(&person) => self.people.delete(id).await,
            Some(_) => Err(AppError::NotFound(self.role.label())),
        }
    }
}

/// Imóveis e contratos só aceitam, em `owner_id`/`lessee_id`, pessoas do papel certo.
/// A FK de `persons` não enxerga o `role`, então a checagem fica aqui.
async fn ensure_role(
    people: &EntityService<Person>,
    field: &str,
    id: Uuid,
    role: PersonRole,
) -> Result<(), AppError> {
    match people.find(id).await? {
        Some(person) if person.role == role => Ok(()),
        Some(_) => Err(AppError::invalid_field(
            field,
            format!("A pessoa informada não é {}.", role.label().to_lowercase()),
        )),
        None => Err(AppError::invalid_field(field, format!("{} não encontrado(a).", role.label()))),
    }
}

/// Proprietário e inquilino de um imóvel ou contrato, quando informados
pub(crate) async fn check_parties(
    people: &EntityService<Person>,
    owner_id: Option<Uuid>,
    lessee_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(id) = owner_id {
        ensure_role(people, "owner_id", id, PersonRole::Owner).await?;
    }
    if let Some(id) = lessee_id {
        ensure_role(people, "lessee_id", id, PersonRole::Lessee).await?;
    }
    Ok(())
}

/// Os dois papéis lado a lado, escolhidos pela rota
#[derive(Clone)]
pub struct PeopleService {
    pub owners: PersonService,
    pub lessees: PersonService,
}

impl PeopleService {
    pub fn new(people: EntityService<Person>, locations: LocationService) -> Self {
        Self {
            owners: PersonService::new(PersonRole::Owner, people.clone(), locations.clone()),
            lessees: PersonService::new(PersonRole::Lessee, people, locations),
        }
    }

    pub fn scoped(&self, scope: PersonScope) -> &PersonService {
        match scope.role() {
            PersonRole::Owner => &self.owners,
            PersonRole::Lessee => &self.lessees,
        }
    }
}

#[derive(Clone)]
pub struct PartnerService {
    partners: EntityService<PersonPartner>,
}

impl PartnerService {
    pub fn new(partners: EntityService<PersonPartner>) -> Self {
        Self { partners }
    }

    pub async fn list_by_person(&self, person_id: Uuid) -> Result<Vec<PersonPartner>, AppError> {
        self.partners.list_where(&[Filter::eq("person_id", person_id)]).await
    }

    pub async fn create(&self, person: &Person, mut payload: PartnerPayload) -> Result<PersonPartner, AppError> {
        payload.prepare()?;
        payload.ensure_complete()?;
        self.partners
            .create_scoped(payload, &[Filter::eq("person_id", person.id)])
            .await
    }

    pub async fn update(&self, id: Uuid, payload: PartnerPayload) -> Result<PersonPartner, AppError> {
        self.partners.update(id, payload).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.partners.delete(id).await
    }
}

#[derive(Clone)]
pub struct ReferenceService {
    references: EntityService<PersonReference>,
}

impl ReferenceService {
    pub fn new(references: EntityService<PersonReference>) -> Self {
        Self { references }
    }

    pub async fn list_by_person(&self, person_id: Uuid) -> Result<Vec<PersonReference>, AppError> {
        self.references.list_where(&[Filter::eq("person_id", person_id)]).await
    }

    pub async fn create(&self, person: &Person, mut payload: ReferencePayload) -> Result<PersonReference, AppError> {
        payload.prepare()?;
        payload.ensure_complete()?;
        self.references
            .create_scoped(payload, &[Filter::eq("person_id", person.id)])
            .await
    }

    pub async fn update(&self, id: Uuid, payload: ReferencePayload) -> Result<PersonReference, AppError> {
        self.references.update(id, payload).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.references.delete(id).await
    }
}
