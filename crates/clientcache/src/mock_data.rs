use clientcache_core::record::{FlatRecord, ServiceCounts};

/// Parent groups used for demo data: id, name, segment, region.
const DEMO_PARENTS: &[(&str, &str, &str, &str)] = &[
    ("1001", "Northwind Holdings", "Asset Manager", "AMRS"),
    ("1002", "Contoso Group", "Asset Owner", "EMEA"),
    ("1003", "Fabrikam Partners", "Insurance", "APAC"),
    ("1004", "Tailspin Capital", "Hedge Fund", "AMRS"),
];

const COUNTRIES: &[(&str, &[&str])] = &[
    ("AMRS", &["US", "CA", "BR"]),
    ("EMEA", &["GB", "DE", "FR"]),
    ("APAC", &["JP", "SG", "AU"]),
];

/// Generates demo records for seeding an empty store.
///
/// Each parent gets three clients and each client two customers. Counts are
/// derived from the ids so repeated runs produce identical data.
pub fn generate_demo_records() -> Vec<FlatRecord> {
    let mut records = Vec::new();

    for (p, (parent_id, parent_name, segment, region)) in DEMO_PARENTS.iter().enumerate() {
        let countries = COUNTRIES
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, c)| *c)
            .unwrap_or(&["US"]);
        let parent_counts = counts(p as i64 + 1, 12);

        for c in 0..3 {
            let client_id = format!("{}-{}", parent_id, c + 1);
            let client_name = format!("{} {}", parent_name, ["Funds", "Trust", "Markets"][c]);
            let client_counts = counts((p * 3 + c) as i64 + 1, 4);

            for k in 0..2 {
                let customer_id = format!("{}-{}", client_id, k + 1);
                let customer_name = format!("{} Account {}", client_name, k + 1);
                let country = countries[(c + k) % countries.len()];

                records.push(
                    FlatRecord::new(*parent_id, client_id.clone(), customer_id)
                        .with_names(*parent_name, client_name.clone(), customer_name)
                        .with_segment(*segment)
                        .with_region(*region)
                        .with_country(country)
                        .with_counts(
                            parent_counts,
                            client_counts,
                            counts((p * 6 + c * 2 + k) as i64 + 1, 1),
                        ),
                );
            }
        }
    }

    records
}

fn counts(seed: i64, scale: i64) -> ServiceCounts {
    let n = |offset: i64| ((seed * 7 + offset * 3) % 5) * scale;
    ServiceCounts {
        a_platform: n(0),
        alpha_services: n(1),
        back_office: n(2),
        custody: n(3) + scale,
        digital: n(4),
        global_markets: n(5),
        middle_office: n(6),
        ssga: n(7),
        treasury: n(8),
    }
}
