//! Built-in demo data: four cross-domain triples and their domain table

use knowmap_core::{DomainMap, Triple};

/// Triples of the cross-domain demo
pub fn demo_triples() -> Vec<Triple> {
    vec![
        Triple::new("Artificial Intelligence", "improves", "Healthcare"),
        Triple::new("Machine Learning", "supports", "Medical Diagnosis"),
        Triple::new("Neural Networks", "used_in", "Cancer Detection"),
        Triple::new("Google", "invests_in", "Artificial Intelligence"),
    ]
}

/// Domain table covering every demo entity
pub fn demo_domains() -> DomainMap {
    [
        ("Artificial Intelligence", "Technology"),
        ("Machine Learning", "Technology"),
        ("Neural Networks", "Technology"),
        ("Healthcare", "Medical"),
        ("Medical Diagnosis", "Medical"),
        ("Cancer Detection", "Medical"),
        ("Google", "Organization"),
    ]
    .into_iter()
    .collect()
}
