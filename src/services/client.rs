//! Client service

use crate::audit::RequestContext;
use crate::cache::{keys, Cache};
use crate::error::{AdminError, AdminResult};
use crate::models::{Client, ClientId, Document};
use crate::storage::Storage;

use super::effects::Effects;
use super::QueryString;

/// Fields for a new client
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub notes: String,
}

impl NewClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientPatch {
    fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            client.email = Some(email.trim().to_string());
        }
        if let Some(phone) = self.phone {
            client.phone = Some(phone);
        }
        if let Some(company) = self.company {
            client.company = Some(company);
        }
        if let Some(address) = self.address {
            client.address = Some(address);
        }
        if let Some(notes) = self.notes {
            client.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Case-insensitive match on name, company or email
    pub search: Option<String>,
}

impl ClientFilter {
    fn matches(&self, client: &Client) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        [Some(&client.name), client.company.as_ref(), client.email.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn query(&self) -> String {
        QueryString::default()
            .param("search", self.search.as_deref())
            .finish()
    }
}

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> ClientService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    pub fn create(&self, input: NewClient, ctx: &RequestContext) -> AdminResult<Client> {
        let mut client = Client::new(input.name.trim());
        client.email = input.email.map(|e| e.trim().to_string());
        client.phone = input.phone;
        client.company = input.company;
        client.address = input.address;
        client.notes = input.notes;

        client
            .validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        tracing::info!(id = %client.id, name = %client.name, "client created");
        self.effects().created(&client, ctx);

        Ok(client)
    }

    pub fn get(&self, id: ClientId) -> AdminResult<Client> {
        let key = keys::document_key(Client::KIND, id);
        self.cache.get_or_load(&key, || {
            self.storage
                .clients
                .get(id)?
                .ok_or_else(|| AdminError::not_found("Client", id.to_string()))
        })
    }

    pub fn list(&self, filter: &ClientFilter) -> AdminResult<Vec<Client>> {
        let key = keys::list_key(Client::KIND, &filter.query());
        self.cache
            .get_or_load(&key, || self.storage.clients.find(|c| filter.matches(c)))
    }

    pub fn update(&self, id: ClientId, patch: ClientPatch, ctx: &RequestContext) -> AdminResult<Client> {
        let before = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| AdminError::not_found("Client", id.to_string()))?;

        let mut client = before.clone();
        patch.apply(&mut client);
        client
            .validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;
        client.touch();

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.effects().updated(&before, &client, ctx, None);

        Ok(client)
    }

    /// Delete a client that no project references
    pub fn delete(&self, id: ClientId, ctx: &RequestContext) -> AdminResult<Client> {
        if self.storage.projects.any(|p| p.client == Some(id))? {
            return Err(AdminError::Validation(format!(
                "Client {} is referenced by projects",
                id
            )));
        }

        let client = self
            .storage
            .clients
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Client", id.to_string()))?;
        self.storage.clients.save()?;

        tracing::info!(id = %id, "client deleted");
        self.effects().deleted(&client, ctx);

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkpPaths;
    use crate::models::Project;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Cache) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(SkpPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage, Cache::memory(Duration::from_secs(60)))
    }

    #[test]
    fn test_invalid_email_rejected() {
        let (_temp, storage, cache) = setup();
        let service = ClientService::new(&storage, &cache);

        let mut input = NewClient::new("Venue Ltd");
        input.email = Some("bookings.venue.example".into());
        assert!(service
            .create(input, &RequestContext::system())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_search() {
        let (_temp, storage, cache) = setup();
        let service = ClientService::new(&storage, &cache);
        let ctx = RequestContext::system();

        let mut input = NewClient::new("Anna Berg");
        input.company = Some("Nordlicht Events".into());
        service.create(input, &ctx).unwrap();
        service.create(NewClient::new("City Hall"), &ctx).unwrap();

        let filter = ClientFilter {
            search: Some("nordlicht".into()),
        };
        let found = service.list(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Anna Berg");
        assert_eq!(service.list(&ClientFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_referenced_client_cannot_be_deleted() {
        let (_temp, storage, cache) = setup();
        let service = ClientService::new(&storage, &cache);
        let ctx = RequestContext::system();
        let client = service.create(NewClient::new("Arena"), &ctx).unwrap();

        let today = chrono::Utc::now().date_naive();
        let mut project = Project::new("Show", today, today);
        project.client = Some(client.id);
        storage.projects.upsert(project).unwrap();

        assert!(service.delete(client.id, &ctx).unwrap_err().is_validation());
        assert!(storage.clients.exists(client.id).unwrap());
    }
}
