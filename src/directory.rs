//! Client directory — the businesses a professional looks after.
//!
//! Mock data source injected into the page handler. Impersonated views use
//! it to show whose books are open; an unknown id still renders.

use async_trait::async_trait;
use serde::Serialize;

/// One business on a professional's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub city: String,
    pub open_tasks: u32,
}

/// Read-only access to the client roster.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// All clients, in roster order.
    async fn list_clients(&self) -> Vec<ClientSummary>;

    /// Look up one client by id.
    async fn find_client(&self, id: &str) -> Option<ClientSummary>;
}

/// Directory backed by a fixed list.
pub struct InMemoryClientDirectory {
    clients: Vec<ClientSummary>,
}

const SEED: &[(&str, &str, &str, &str, u32)] = &[
    ("acme-traders", "Acme Traders Pvt Ltd", "private_limited", "Pune", 3),
    ("blue-lotus", "Blue Lotus Foods LLP", "llp", "Bengaluru", 1),
    ("kaveri-textiles", "Kaveri Textiles", "partnership", "Coimbatore", 0),
    ("northwind-labs", "Northwind Labs OPC Pvt Ltd", "one_person_company", "Gurugram", 5),
];

impl InMemoryClientDirectory {
    pub fn new(clients: Vec<ClientSummary>) -> Self {
        Self { clients }
    }

    /// Directory preloaded with the demo roster.
    pub fn seeded() -> Self {
        Self::new(
            SEED.iter()
                .map(|&(id, name, entity_type, city, open_tasks)| ClientSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                    entity_type: entity_type.to_string(),
                    city: city.to_string(),
                    open_tasks,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn list_clients(&self) -> Vec<ClientSummary> {
        self.clients.clone()
    }

    async fn find_client(&self, id: &str) -> Option<ClientSummary> {
        self.clients.iter().find(|c| c.id == id).cloned()
    }
}
