use rand::seq::IndexedRandom;
use serde::Serialize;

/// One entry in the fixed destination catalog. The catalog is compiled in
/// and never mutated; entries keep a stable order.
#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    pub name: &'static str,
    pub region: &'static str,
    pub tags: &'static [&'static str],
    pub description: &'static str,
}

const CATALOG: &[Destination] = &[
    Destination {
        name: "Garmisch-Partenkirchen, Germany",
        region: "Europe",
        tags: &["Adventure", "Nature"],
        description: "Alpine village with stunning mountain views",
    },
    Destination {
        name: "Munich, Germany",
        region: "Europe",
        tags: &["Culture", "Food"],
        description: "Bavarian capital famous for culture and beer",
    },
    Destination {
        name: "Barcelona, Spain",
        region: "Europe",
        tags: &["Beach", "Art"],
        description: "Coastal city with stunning architecture",
    },
    Destination {
        name: "Paris, France",
        region: "Europe",
        tags: &["Culture", "Art", "Food"],
        description: "The City of Light, romantic and iconic",
    },
    Destination {
        name: "Berlin, Germany",
        region: "Europe",
        tags: &["Culture", "History", "Nightlife"],
        description: "Historic and vibrant cultural hub",
    },
    Destination {
        name: "Tokyo, Japan",
        region: "Asia",
        tags: &["Culture", "Food", "Shopping"],
        description: "Bustling metropolis with ancient temples",
    },
    Destination {
        name: "Sydney, Australia",
        region: "Oceania",
        tags: &["Beach", "Nature"],
        description: "Opera House and beautiful beaches",
    },
    Destination {
        name: "New York, USA",
        region: "North America",
        tags: &["Shopping", "Art", "Nightlife"],
        description: "The city that never sleeps",
    },
    Destination {
        name: "Cairo, Egypt",
        region: "Africa",
        tags: &["History", "Culture"],
        description: "Gateway to ancient wonders",
    },
    Destination {
        name: "Cape Town, South Africa",
        region: "Africa",
        tags: &["Nature", "Adventure"],
        description: "Scenic beauty and Table Mountain",
    },
    Destination {
        name: "Rio de Janeiro, Brazil",
        region: "South America",
        tags: &["Beach", "Culture", "Nightlife"],
        description: "Vibrant culture and beaches",
    },
    Destination {
        name: "Bali, Indonesia",
        region: "Asia",
        tags: &["Beach", "Relaxation", "Nature"],
        description: "Tropical paradise and spiritual haven",
    },
];

/// All catalog entries, in their fixed order.
pub fn all() -> &'static [Destination] {
    CATALOG
}

/// Look up a destination by exact name.
pub fn find(name: &str) -> Option<&'static Destination> {
    CATALOG.iter().find(|d| d.name == name)
}

/// Pick one catalog entry uniformly at random.
pub fn random() -> &'static Destination {
    let mut rng = rand::rng();
    CATALOG
        .choose(&mut rng)
        .expect("destination catalog is never empty")
}
