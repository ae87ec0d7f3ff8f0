use serde::{Deserialize, Serialize};

/// Per-level service counts carried by every record and hierarchy node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCounts {
    pub a_platform: i64,
    pub alpha_services: i64,
    pub back_office: i64,
    pub custody: i64,
    pub digital: i64,
    pub global_markets: i64,
    pub middle_office: i64,
    pub ssga: i64,
    pub treasury: i64,
}

/// A denormalized product-services row.
///
/// One row per customer, repeating the parent and client attributes. The
/// parent id is kept as text because upstream data occasionally carries
/// non-numeric values; the hierarchy builder is responsible for rejecting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub parent_id: String,
    pub parent_name: String,
    pub client_id: String,
    pub client_name: String,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub parent_counts: ServiceCounts,
    pub client_counts: ServiceCounts,
    pub customer_counts: ServiceCounts,
}

impl FlatRecord {
    /// Creates a record for the given parent / client / customer triple.
    pub fn new(
        parent_id: impl Into<String>,
        client_id: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        let parent_id = parent_id.into();
        let client_id = client_id.into();
        let customer_id = customer_id.into();
        Self {
            parent_name: format!("Parent {}", parent_id),
            client_name: format!("Client {}", client_id),
            customer_name: format!("Customer {}", customer_id),
            parent_id,
            client_id,
            customer_id,
            ..Default::default()
        }
    }

    pub fn with_names(
        mut self,
        parent_name: impl Into<String>,
        client_name: impl Into<String>,
        customer_name: impl Into<String>,
    ) -> Self {
        self.parent_name = parent_name.into();
        self.client_name = client_name.into();
        self.customer_name = customer_name.into();
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the counts for all three levels.
    pub fn with_counts(
        mut self,
        parent: ServiceCounts,
        client: ServiceCounts,
        customer: ServiceCounts,
    ) -> Self {
        self.parent_counts = parent;
        self.client_counts = client;
        self.customer_counts = customer;
        self
    }
}
