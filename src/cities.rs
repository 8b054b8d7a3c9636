use serde::Serialize;
use std::collections::HashMap;

/// One entry in the fixed city directory.
#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub id: u32,
    pub name: &'static str,
}

/// Known cities in presentation order. Ids are OpenWeatherMap city ids.
pub const CITIES: &[City] = &[
    City { id: 1248991, name: "Colombo" },
    City { id: 1850147, name: "Tokyo" },
    City { id: 2644210, name: "Liverpool" },
    City { id: 2988507, name: "Paris" },
    City { id: 2147714, name: "Sydney" },
    City { id: 4930956, name: "Boston" },
    City { id: 1796236, name: "Shanghai" },
    City { id: 3143244, name: "Oslo" },
];

lazy_static::lazy_static! {
    static ref CITY_NAMES: HashMap<u32, &'static str> =
        CITIES.iter().map(|city| (city.id, city.name)).collect();
}

pub fn city_ids() -> Vec<u32> {
    CITIES.iter().map(|city| city.id).collect()
}

pub fn city_name(id: u32) -> Option<&'static str> {
    CITY_NAMES.get(&id).copied()
}
